// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{BillReminder, ReminderKind, Subscription};
use crate::period::days_until;

fn is_reminder_day(sub: &Subscription, days: i64) -> bool {
    days == 0 || u32::try_from(days).is_ok_and(|d| sub.reminder_days.contains(&d))
}

/// Reminders that should exist as of `now` and are not in `existing` yet.
/// A subscription gets at most one reminder per due date, across both the
/// existing set and this pass.
pub fn generate_reminders(
    subscriptions: &[Subscription],
    existing: &[BillReminder],
    now: NaiveDateTime,
) -> Vec<BillReminder> {
    let mut seen: HashSet<(&str, NaiveDate)> = existing
        .iter()
        .map(|r| (r.subscription_id.as_str(), r.due_date))
        .collect();
    let mut fresh = Vec::new();

    for sub in subscriptions.iter().filter(|s| s.is_active()) {
        let days = days_until(sub.next_payment_date, now);
        if !is_reminder_day(sub, days) {
            continue;
        }
        if !seen.insert((sub.id.as_str(), sub.next_payment_date)) {
            continue;
        }
        let kind = ReminderKind::classify(days);
        tracing::info!(subscription = %sub.name, due = %sub.next_payment_date, %kind, "reminder generated");
        fresh.push(BillReminder {
            id: uuid::Uuid::new_v4().to_string(),
            subscription_id: sub.id.clone(),
            due_date: sub.next_payment_date,
            amount: sub.amount,
            is_read: false,
            is_dismissed: false,
            r#type: kind,
        });
    }
    fresh
}

/// Runs [`generate_reminders`] and appends the result. Returns how many
/// reminders were added.
pub fn refresh(
    reminders: &mut Vec<BillReminder>,
    subscriptions: &[Subscription],
    now: NaiveDateTime,
) -> usize {
    let fresh = generate_reminders(subscriptions, reminders, now);
    let added = fresh.len();
    reminders.extend(fresh);
    added
}

pub fn mark_read(reminders: &mut [BillReminder], id: &str) -> bool {
    match reminders.iter_mut().find(|r| r.id == id) {
        Some(r) => {
            r.is_read = true;
            true
        }
        None => {
            tracing::debug!(id, "mark read: no such reminder");
            false
        }
    }
}

pub fn dismiss(reminders: &mut [BillReminder], id: &str) -> bool {
    match reminders.iter_mut().find(|r| r.id == id) {
        Some(r) => {
            r.is_dismissed = true;
            true
        }
        None => {
            tracing::debug!(id, "dismiss: no such reminder");
            false
        }
    }
}

/// Removes every reminder of `subscription_id`; returns how many went away.
pub fn drop_for_subscription(reminders: &mut Vec<BillReminder>, subscription_id: &str) -> usize {
    let before = reminders.len();
    reminders.retain(|r| r.subscription_id != subscription_id);
    before - reminders.len()
}

/// Non-dismissed reminders, soonest due date first.
pub fn active_reminders(reminders: &[BillReminder]) -> Vec<&BillReminder> {
    let mut active: Vec<&BillReminder> = reminders.iter().filter(|r| !r.is_dismissed).collect();
    active.sort_by_key(|r| r.due_date);
    active
}

pub fn unread_count(reminders: &[BillReminder]) -> usize {
    reminders
        .iter()
        .filter(|r| !r.is_read && !r.is_dismissed)
        .count()
}

pub fn has_high_priority(reminders: &[BillReminder]) -> bool {
    reminders
        .iter()
        .any(|r| !r.is_dismissed && r.r#type.is_high_priority())
}

/// Human-facing notification text for a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub reminder_id: String,
    pub title: String,
    pub message: String,
    pub kind: ReminderKind,
}

impl Notice {
    pub fn new(reminder: &BillReminder, subscription: &Subscription, currency: &str) -> Self {
        Self {
            reminder_id: reminder.id.clone(),
            title: reminder.r#type.title().to_string(),
            message: format!(
                "{} - {} {:.2} due {}",
                subscription.name,
                currency,
                reminder.amount,
                reminder.due_date.format("%b %-d, %Y")
            ),
            kind: reminder.r#type,
        }
    }
}

/// Notices for unread, non-dismissed reminders whose subscription is still
/// known, soonest first.
pub fn pending_notices(
    reminders: &[BillReminder],
    subscriptions: &[Subscription],
    currency: &str,
) -> Vec<Notice> {
    active_reminders(reminders)
        .into_iter()
        .filter(|r| !r.is_read)
        .filter_map(|r| {
            subscriptions
                .iter()
                .find(|s| s.id == r.subscription_id)
                .map(|s| Notice::new(r, s, currency))
        })
        .collect()
}
