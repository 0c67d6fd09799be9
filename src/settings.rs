// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveTime;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::TrackerError;
use crate::gamification::DEFAULT_CHALLENGE_TARGET;
use crate::utils::{format_reminder_days, parse_decimal, parse_reminder_days};
use crate::validate;

pub const CURRENCY: &str = "currency";
pub const CHALLENGE_TARGET: &str = "challenge_target";
pub const REMINDER_DAYS: &str = "reminder_days";
pub const QUIET_HOURS: &str = "quiet_hours";

pub const KEYS: [&str; 4] = [CURRENCY, CHALLENGE_TARGET, REMINDER_DAYS, QUIET_HOURS];

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_REMINDER_DAYS: &str = "3,1";
const DEFAULT_QUIET_HOURS: &str = "22:00-08:00";

/// Window during which the watcher keeps notifications to itself. May wrap
/// past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl QuietHours {
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start <= self.end {
            t >= self.start && t < self.end
        } else {
            t >= self.start || t < self.end
        }
    }
}

impl fmt::Display for QuietHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

impl FromStr for QuietHours {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TrackerError::InvalidQuietHours(s.to_string());
        let (a, b) = s.trim().split_once('-').ok_or_else(bad)?;
        let start = NaiveTime::parse_from_str(a.trim(), "%H:%M").map_err(|_| bad())?;
        let end = NaiveTime::parse_from_str(b.trim(), "%H:%M").map_err(|_| bad())?;
        Ok(QuietHours { start, end })
    }
}

fn parse_quiet_hours(s: &str) -> Result<Option<QuietHours>, TrackerError> {
    match s.trim() {
        "off" | "" => Ok(None),
        other => other.parse().map(Some),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationSettings {
    /// Offsets given to new subscriptions that do not name their own.
    pub reminder_days: BTreeSet<u32>,
    pub quiet_hours: Option<QuietHours>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub currency: String,
    pub challenge_target: Decimal,
    pub notifications: NotificationSettings,
}

pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

/// Stores a setting after checking the key is known and the value parses.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    let normalized = match key {
        CURRENCY => {
            validate::required("currency", value)?;
            value.to_uppercase()
        }
        CHALLENGE_TARGET => validate::amount(parse_decimal(value)?)?.to_string(),
        REMINDER_DAYS => {
            let days = parse_reminder_days(value)?;
            validate::reminder_days(&days)?;
            format_reminder_days(&days)
        }
        QUIET_HOURS => match parse_quiet_hours(value)? {
            Some(q) => q.to_string(),
            None => "off".to_string(),
        },
        other => {
            return Err(anyhow!(
                "Unknown setting '{}' (known: {})",
                other,
                KEYS.join(", ")
            ));
        }
    };
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, normalized],
    )?;
    tracing::debug!(key, value = %normalized, "setting stored");
    Ok(())
}

fn get_or(conn: &Connection, key: &str, default: &str) -> Result<String> {
    Ok(get(conn, key)?.unwrap_or_else(|| default.to_string()))
}

pub fn currency(conn: &Connection) -> Result<String> {
    get_or(conn, CURRENCY, DEFAULT_CURRENCY)
}

pub fn load(conn: &Connection) -> Result<Settings> {
    let target = match get(conn, CHALLENGE_TARGET)? {
        Some(s) => parse_decimal(&s)
            .with_context(|| format!("Invalid stored setting {}", CHALLENGE_TARGET))?,
        None => Decimal::from(DEFAULT_CHALLENGE_TARGET),
    };
    let reminder_days = parse_reminder_days(&get_or(conn, REMINDER_DAYS, DEFAULT_REMINDER_DAYS)?)
        .with_context(|| format!("Invalid stored setting {}", REMINDER_DAYS))?;
    let quiet_hours = parse_quiet_hours(&get_or(conn, QUIET_HOURS, DEFAULT_QUIET_HOURS)?)?;
    Ok(Settings {
        currency: currency(conn)?,
        challenge_target: target,
        notifications: NotificationSettings {
            reminder_days,
            quiet_hours,
        },
    })
}

/// Every known key with its effective value, defaults included.
pub fn effective(conn: &Connection) -> Result<Vec<(String, String)>> {
    let s = load(conn)?;
    Ok(vec![
        (CURRENCY.to_string(), s.currency),
        (CHALLENGE_TARGET.to_string(), s.challenge_target.to_string()),
        (
            REMINDER_DAYS.to_string(),
            format_reminder_days(&s.notifications.reminder_days),
        ),
        (
            QUIET_HOURS.to_string(),
            s.notifications
                .quiet_hours
                .map(|q| q.to_string())
                .unwrap_or_else(|| "off".to_string()),
        ),
    ])
}
