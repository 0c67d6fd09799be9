// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Input checks run before anything reaches the engines.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::TrackerError;
use crate::models::{REMINDER_OFFSETS, SubscriptionDraft, SubscriptionUpdate, Transaction};

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("static regex"));

pub fn amount(v: Decimal) -> Result<Decimal, TrackerError> {
    if v <= Decimal::ZERO {
        return Err(TrackerError::InvalidAmount(v));
    }
    Ok(v)
}

pub fn required(field: &'static str, v: &str) -> Result<(), TrackerError> {
    if v.trim().is_empty() {
        return Err(TrackerError::MissingField(field));
    }
    Ok(())
}

pub fn color(v: &str) -> Result<(), TrackerError> {
    if !HEX_COLOR.is_match(v) {
        return Err(TrackerError::InvalidColor(v.to_string()));
    }
    Ok(())
}

pub fn reminder_days(days: &BTreeSet<u32>) -> Result<(), TrackerError> {
    match days.iter().find(|d| !REMINDER_OFFSETS.contains(d)) {
        Some(bad) => Err(TrackerError::InvalidReminderOffset(*bad)),
        None => Ok(()),
    }
}

pub fn transaction(tx: &Transaction) -> Result<(), TrackerError> {
    required("description", &tx.description)?;
    required("category", &tx.category)?;
    amount(tx.amount)?;
    Ok(())
}

pub fn subscription_draft(draft: &SubscriptionDraft) -> Result<(), TrackerError> {
    required("name", &draft.name)?;
    required("category", &draft.category)?;
    amount(draft.amount)?;
    color(&draft.color)?;
    reminder_days(&draft.reminder_days)?;
    Ok(())
}

pub fn subscription_update(update: &SubscriptionUpdate) -> Result<(), TrackerError> {
    if let Some(name) = &update.name {
        required("name", name)?;
    }
    if let Some(category) = &update.category {
        required("category", category)?;
    }
    if let Some(v) = update.amount {
        amount(v)?;
    }
    if let Some(c) = &update.color {
        color(c)?;
    }
    if let Some(days) = &update.reminder_days {
        reminder_days(days)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_amounts() {
        assert_eq!(
            amount(Decimal::ZERO),
            Err(TrackerError::InvalidAmount(Decimal::ZERO))
        );
        assert!(amount(Decimal::new(-1, 2)).is_err());
        assert!(amount(Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn color_must_be_hex() {
        assert!(color("#FFE4E1").is_ok());
        assert!(color("#ffe4e1").is_ok());
        assert!(color("FFE4E1").is_err());
        assert!(color("#FFF").is_err());
    }

    #[test]
    fn offsets_limited_to_known_set() {
        let ok: BTreeSet<u32> = [1, 3, 7].into_iter().collect();
        assert!(reminder_days(&ok).is_ok());
        let bad: BTreeSet<u32> = [1, 2].into_iter().collect();
        assert_eq!(
            reminder_days(&bad),
            Err(TrackerError::InvalidReminderOffset(2))
        );
    }

    #[test]
    fn blank_names_are_missing() {
        assert_eq!(required("name", "   "), Err(TrackerError::MissingField("name")));
    }
}
