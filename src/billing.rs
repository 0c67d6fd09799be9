// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::models::Frequency;
use crate::period::add_months;

/// Due date one billing cycle after `date`. Month-based cycles clamp to the
/// end of short months.
pub fn next_date(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Weekly => date + Duration::days(7),
        Frequency::Monthly => add_months(date, 1),
        Frequency::Quarterly => add_months(date, 3),
        Frequency::Yearly => add_months(date, 12),
    }
}

/// Average weeks per month used to normalize weekly charges.
pub fn weeks_per_month() -> Decimal {
    Decimal::new(433, 2)
}

/// Monthly equivalent of one charge of `amount` at `frequency`.
pub fn monthly_equivalent(amount: Decimal, frequency: Frequency) -> Decimal {
    match frequency {
        Frequency::Weekly => amount * weeks_per_month(),
        Frequency::Monthly => amount,
        Frequency::Quarterly => amount / Decimal::from(3),
        Frequency::Yearly => amount / Decimal::from(12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn month_end_start_clamps() {
        assert_eq!(next_date(d("2025-01-31"), Frequency::Monthly), d("2025-02-28"));
    }

    #[test]
    fn each_frequency_advances() {
        let start = d("2025-03-15");
        assert_eq!(next_date(start, Frequency::Weekly), d("2025-03-22"));
        assert_eq!(next_date(start, Frequency::Monthly), d("2025-04-15"));
        assert_eq!(next_date(start, Frequency::Quarterly), d("2025-06-15"));
        assert_eq!(next_date(start, Frequency::Yearly), d("2026-03-15"));
    }

    #[test]
    fn chained_cycles_strictly_increase() {
        for freq in [
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Quarterly,
            Frequency::Yearly,
        ] {
            let mut due = d("2024-01-31");
            for _ in 0..30 {
                let next = next_date(due, freq);
                assert!(next > due, "{freq} did not advance from {due}");
                due = next;
            }
        }
    }

    #[test]
    fn monthly_equivalents() {
        let ten = Decimal::from(10);
        assert_eq!(monthly_equivalent(ten, Frequency::Weekly), Decimal::new(433, 1));
        assert_eq!(monthly_equivalent(ten, Frequency::Monthly), ten);
        assert_eq!(
            monthly_equivalent(Decimal::from(30), Frequency::Quarterly),
            ten
        );
        assert_eq!(
            monthly_equivalent(Decimal::from(120), Frequency::Yearly),
            ten
        );
    }
}
