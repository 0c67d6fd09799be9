// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(TrackerError::UnknownTransactionType(other.to_string())),
        }
    }
}

/// A ledger entry. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub r#type: TransactionType,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(
        r#type: TransactionType,
        description: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            r#type,
            description: description.into(),
            amount,
            category: category.into(),
            date,
        }
    }

    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(TrackerError::UnknownFrequency(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(SubscriptionStatus::Active),
            "paused" => Ok(SubscriptionStatus::Paused),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            other => Err(TrackerError::UnknownStatus(other.to_string())),
        }
    }
}

/// Days-before-due offsets a subscription can be configured to remind at.
pub const REMINDER_OFFSETS: [u32; 3] = [1, 3, 7];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub frequency: Frequency,
    pub category: String,
    pub start_date: NaiveDate,
    pub next_payment_date: NaiveDate,
    pub last_payment_date: Option<NaiveDate>,
    pub status: SubscriptionStatus,
    pub auto_renew: bool,
    pub reminder_days: BTreeSet<u32>,
    pub color: String,
    pub icon: Option<String>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}

/// Form input for a new subscription: everything except the fields the
/// engine assigns (id, status, next payment date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDraft {
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub frequency: Frequency,
    pub category: String,
    pub start_date: NaiveDate,
    pub auto_renew: bool,
    pub reminder_days: BTreeSet<u32>,
    pub color: String,
    pub icon: Option<String>,
}

/// Partial update merged over an existing subscription. `None` leaves the
/// field as is, so `description` and `icon` can be replaced but not cleared.
/// A cancelled subscription ignores any `status` other than cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub frequency: Option<Frequency>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub next_payment_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
    pub status: Option<SubscriptionStatus>,
    pub auto_renew: Option<bool>,
    pub reminder_days: Option<BTreeSet<u32>>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Upcoming,
    DueToday,
    Overdue,
}

impl ReminderKind {
    pub fn classify(days_until_payment: i64) -> Self {
        match days_until_payment {
            0 => ReminderKind::DueToday,
            d if d < 0 => ReminderKind::Overdue,
            _ => ReminderKind::Upcoming,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Upcoming => "upcoming",
            ReminderKind::DueToday => "due_today",
            ReminderKind::Overdue => "overdue",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReminderKind::Upcoming => "Upcoming Payment",
            ReminderKind::DueToday => "Payment Due Today",
            ReminderKind::Overdue => "Payment Overdue",
        }
    }

    pub fn is_high_priority(&self) -> bool {
        matches!(self, ReminderKind::DueToday | ReminderKind::Overdue)
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "upcoming" => Ok(ReminderKind::Upcoming),
            "due_today" => Ok(ReminderKind::DueToday),
            "overdue" => Ok(ReminderKind::Overdue),
            other => Err(TrackerError::UnknownReminderKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillReminder {
    pub id: String,
    pub subscription_id: String,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub is_read: bool,
    pub is_dismissed: bool,
    pub r#type: ReminderKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(" Monthly ".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("EXPENSE".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert_eq!(
            "Cancelled".parse::<SubscriptionStatus>().unwrap(),
            SubscriptionStatus::Cancelled
        );
        assert!(matches!(
            "fortnightly".parse::<Frequency>(),
            Err(TrackerError::UnknownFrequency(_))
        ));
    }

    #[test]
    fn reminder_kind_from_days() {
        assert_eq!(ReminderKind::classify(0), ReminderKind::DueToday);
        assert_eq!(ReminderKind::classify(-2), ReminderKind::Overdue);
        assert_eq!(ReminderKind::classify(3), ReminderKind::Upcoming);
        assert_eq!(
            serde_json::to_string(&ReminderKind::DueToday).unwrap(),
            "\"due_today\""
        );
    }
}
