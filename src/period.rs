// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar helpers shared by the gamification and billing engines.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

const DAY_MS: i64 = 86_400_000;

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// `YYYY-MM` bucket for monthly aggregation.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Calendar month arithmetic. A day-of-month that does not exist in the
/// target month is clamped to that month's last day (Jan 31 + 1 month is
/// Feb 28 or Feb 29).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Whole days from `now` until midnight starting `date`, rounded up.
/// A date earlier today is 0, yesterday is -1, tomorrow is 1.
pub fn days_until(date: NaiveDate, now: NaiveDateTime) -> i64 {
    let ms = (date.and_time(NaiveTime::MIN) - now).num_milliseconds();
    let whole = ms.div_euclid(DAY_MS);
    if ms.rem_euclid(DAY_MS) == 0 {
        whole
    } else {
        whole + 1
    }
}

/// Signed number of calendar days from `earlier` to `later`.
pub fn day_gap(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}
