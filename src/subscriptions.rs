// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::billing::{monthly_equivalent, next_date};
use crate::ledger::Ledger;
use crate::models::{
    BillReminder, Subscription, SubscriptionDraft, SubscriptionStatus, SubscriptionUpdate,
    Transaction, TransactionType,
};
use crate::period::days_until;
use crate::reminders;

/// Subscriptions and their pending reminders. Every operation on an unknown
/// id, or one the subscription's status does not allow, is a no-op that
/// reports `false`/`None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionBook {
    subscriptions: Vec<Subscription>,
    reminders: Vec<BillReminder>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingPayment<'a> {
    #[serde(flatten)]
    pub subscription: &'a Subscription,
    pub days_until_payment: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionStats {
    pub total: usize,
    pub active: usize,
    pub paused: usize,
    pub cancelled: usize,
    pub upcoming_this_week: usize,
    pub overdue: usize,
    pub total_monthly_cost: Decimal,
}

impl SubscriptionBook {
    pub fn new(subscriptions: Vec<Subscription>, reminders: Vec<BillReminder>) -> Self {
        Self {
            subscriptions,
            reminders,
        }
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn reminders(&self) -> &[BillReminder] {
        &self.reminders
    }

    pub fn get(&self, id: &str) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Subscription> {
        let found = self.subscriptions.iter_mut().find(|s| s.id == id);
        if found.is_none() {
            tracing::debug!(id, "no such subscription");
        }
        found
    }

    pub fn into_parts(self) -> (Vec<Subscription>, Vec<BillReminder>) {
        (self.subscriptions, self.reminders)
    }

    /// Registers a validated draft as an active subscription and returns it.
    pub fn add(&mut self, draft: SubscriptionDraft) -> &Subscription {
        let sub = Subscription {
            id: uuid::Uuid::new_v4().to_string(),
            next_payment_date: next_date(draft.start_date, draft.frequency),
            status: SubscriptionStatus::Active,
            last_payment_date: None,
            name: draft.name,
            description: draft.description,
            amount: draft.amount,
            frequency: draft.frequency,
            category: draft.category,
            start_date: draft.start_date,
            auto_renew: draft.auto_renew,
            reminder_days: draft.reminder_days,
            color: draft.color,
            icon: draft.icon,
        };
        tracing::info!(name = %sub.name, next = %sub.next_payment_date, "subscription added");
        self.subscriptions.push(sub);
        &self.subscriptions[self.subscriptions.len() - 1]
    }

    /// Merges `update` into the subscription. A frequency change re-anchors
    /// the cycle on the last payment (or the start date).
    pub fn update(&mut self, id: &str, update: SubscriptionUpdate) -> bool {
        let Some(sub) = self.get_mut(id) else {
            return false;
        };
        let old_frequency = sub.frequency;

        if let Some(v) = update.name {
            sub.name = v;
        }
        if let Some(v) = update.description {
            sub.description = Some(v);
        }
        if let Some(v) = update.amount {
            sub.amount = v;
        }
        if let Some(v) = update.frequency {
            sub.frequency = v;
        }
        if let Some(v) = update.category {
            sub.category = v;
        }
        if let Some(v) = update.start_date {
            sub.start_date = v;
        }
        if let Some(v) = update.next_payment_date {
            sub.next_payment_date = v;
        }
        if let Some(v) = update.last_payment_date {
            sub.last_payment_date = Some(v);
        }
        if let Some(v) = update.status {
            if sub.status == SubscriptionStatus::Cancelled && v != SubscriptionStatus::Cancelled {
                tracing::debug!(id, "status change ignored on cancelled subscription");
            } else {
                sub.status = v;
            }
        }
        if let Some(v) = update.auto_renew {
            sub.auto_renew = v;
        }
        if let Some(v) = update.reminder_days {
            sub.reminder_days = v;
        }
        if let Some(v) = update.color {
            sub.color = v;
        }
        if let Some(v) = update.icon {
            sub.icon = Some(v);
        }

        if sub.frequency != old_frequency {
            let anchor = sub.last_payment_date.unwrap_or(sub.start_date);
            sub.next_payment_date = next_date(anchor, sub.frequency);
        }
        true
    }

    pub fn cancel(&mut self, id: &str) -> bool {
        self.update(
            id,
            SubscriptionUpdate {
                status: Some(SubscriptionStatus::Cancelled),
                ..Default::default()
            },
        )
    }

    /// Active <-> Paused. Cancelled subscriptions stay cancelled.
    pub fn toggle_status(&mut self, id: &str) -> bool {
        let Some(sub) = self.get_mut(id) else {
            return false;
        };
        sub.status = match sub.status {
            SubscriptionStatus::Active => SubscriptionStatus::Paused,
            SubscriptionStatus::Paused => SubscriptionStatus::Active,
            SubscriptionStatus::Cancelled => {
                tracing::debug!(id, "toggle ignored on cancelled subscription");
                return false;
            }
        };
        true
    }

    /// Records one payment: an expense dated `today` goes to the ledger, the
    /// cycle advances, and the subscription's reminders are cleared. Nothing
    /// changes unless the subscription is active and the ledger accepted
    /// the entry.
    pub fn process_payment(
        &mut self,
        id: &str,
        ledger: &mut dyn Ledger,
        today: NaiveDate,
    ) -> Result<Option<Transaction>> {
        let Some(sub) = self.get(id) else {
            tracing::debug!(id, "payment ignored: no such subscription");
            return Ok(None);
        };
        if !sub.is_active() {
            tracing::debug!(id, status = %sub.status, "payment ignored: subscription not active");
            return Ok(None);
        }

        let tx = Transaction::new(
            TransactionType::Expense,
            format!("{} subscription", sub.name),
            sub.amount,
            sub.category.clone(),
            today,
        );
        ledger.append(tx.clone())?;

        let paid_through = sub.next_payment_date;
        let next = next_date(paid_through, sub.frequency);
        self.update(
            id,
            SubscriptionUpdate {
                last_payment_date: Some(paid_through),
                next_payment_date: Some(next),
                ..Default::default()
            },
        );
        let cleared = reminders::drop_for_subscription(&mut self.reminders, id);
        tracing::info!(id, amount = %tx.amount, %next, cleared, "subscription payment processed");
        Ok(Some(tx))
    }

    pub fn generate_reminders(&mut self, now: NaiveDateTime) -> usize {
        reminders::refresh(&mut self.reminders, &self.subscriptions, now)
    }

    pub fn mark_reminder_read(&mut self, id: &str) -> bool {
        reminders::mark_read(&mut self.reminders, id)
    }

    pub fn dismiss_reminder(&mut self, id: &str) -> bool {
        reminders::dismiss(&mut self.reminders, id)
    }

    pub fn active_reminders(&self) -> Vec<&BillReminder> {
        reminders::active_reminders(&self.reminders)
    }

    fn active(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.iter().filter(|s| s.is_active())
    }

    /// Active subscriptions, soonest payment first.
    pub fn upcoming(&self, now: NaiveDateTime) -> Vec<UpcomingPayment<'_>> {
        let mut upcoming: Vec<UpcomingPayment<'_>> = self
            .active()
            .map(|s| UpcomingPayment {
                subscription: s,
                days_until_payment: days_until(s.next_payment_date, now),
            })
            .collect();
        upcoming.sort_by_key(|u| u.days_until_payment);
        upcoming
    }

    pub fn total_monthly_cost(&self) -> Decimal {
        self.active()
            .map(|s| monthly_equivalent(s.amount, s.frequency))
            .sum()
    }

    /// Monthly-equivalent cost of active subscriptions per category, most
    /// expensive first.
    pub fn monthly_cost_by_category(&self) -> Vec<(String, Decimal)> {
        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        for s in self.active() {
            *totals.entry(s.category.as_str()).or_insert(Decimal::ZERO) +=
                monthly_equivalent(s.amount, s.frequency);
        }
        let mut items: Vec<(String, Decimal)> = totals
            .into_iter()
            .map(|(c, v)| (c.to_string(), v))
            .collect();
        items.sort_by(|a, b| b.1.cmp(&a.1));
        items
    }

    pub fn stats(&self, now: NaiveDateTime) -> SubscriptionStats {
        let count = |status: SubscriptionStatus| {
            self.subscriptions
                .iter()
                .filter(|s| s.status == status)
                .count()
        };
        let upcoming = self.upcoming(now);
        SubscriptionStats {
            total: self.subscriptions.len(),
            active: count(SubscriptionStatus::Active),
            paused: count(SubscriptionStatus::Paused),
            cancelled: count(SubscriptionStatus::Cancelled),
            upcoming_this_week: upcoming
                .iter()
                .filter(|u| u.days_until_payment <= 7)
                .count(),
            overdue: upcoming
                .iter()
                .filter(|u| u.days_until_payment < 0)
                .count(),
            total_monthly_cost: self.total_monthly_cost(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use crate::models::{Frequency, ReminderKind};
    use std::collections::BTreeSet;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn draft(name: &str, amount: i64, frequency: Frequency, start: &str) -> SubscriptionDraft {
        SubscriptionDraft {
            name: name.to_string(),
            description: None,
            amount: Decimal::from(amount),
            frequency,
            category: "Entertainment".into(),
            start_date: d(start),
            auto_renew: true,
            reminder_days: [1, 3].into_iter().collect::<BTreeSet<_>>(),
            color: "#E1F5FE".into(),
            icon: None,
        }
    }

    #[test]
    fn add_forces_active_and_computes_next_payment() {
        let mut book = SubscriptionBook::default();
        let sub = book.add(draft("Netflix", 16, Frequency::Monthly, "2025-01-31"));
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.next_payment_date, d("2025-02-28"));
        assert!(sub.last_payment_date.is_none());
    }

    #[test]
    fn frequency_change_reanchors_cycle() {
        let mut book = SubscriptionBook::default();
        let id = book
            .add(draft("Gym", 20, Frequency::Monthly, "2025-01-10"))
            .id
            .clone();
        assert!(book.update(
            &id,
            SubscriptionUpdate {
                frequency: Some(Frequency::Weekly),
                ..Default::default()
            }
        ));
        assert_eq!(book.get(&id).unwrap().next_payment_date, d("2025-01-17"));

        assert!(book.update(
            &id,
            SubscriptionUpdate {
                last_payment_date: Some(d("2025-03-01")),
                frequency: Some(Frequency::Quarterly),
                ..Default::default()
            }
        ));
        assert_eq!(book.get(&id).unwrap().next_payment_date, d("2025-06-01"));

        // Same frequency leaves the date alone.
        assert!(book.update(
            &id,
            SubscriptionUpdate {
                name: Some("Gym+".into()),
                frequency: Some(Frequency::Quarterly),
                ..Default::default()
            }
        ));
        assert_eq!(book.get(&id).unwrap().next_payment_date, d("2025-06-01"));
    }

    #[test]
    fn toggle_never_leaves_cancelled() {
        let mut book = SubscriptionBook::default();
        let id = book
            .add(draft("Spotify", 10, Frequency::Monthly, "2025-01-01"))
            .id
            .clone();
        assert!(book.toggle_status(&id));
        assert_eq!(book.get(&id).unwrap().status, SubscriptionStatus::Paused);
        assert!(book.toggle_status(&id));
        assert_eq!(book.get(&id).unwrap().status, SubscriptionStatus::Active);

        assert!(book.cancel(&id));
        assert!(!book.toggle_status(&id));
        assert_eq!(book.get(&id).unwrap().status, SubscriptionStatus::Cancelled);
        assert!(!book.toggle_status("missing"));
        assert!(!book.cancel("missing"));
    }

    #[test]
    fn update_cannot_revive_cancelled() {
        let mut book = SubscriptionBook::default();
        let id = book
            .add(draft("Hulu", 8, Frequency::Monthly, "2025-01-10"))
            .id
            .clone();
        assert!(book.cancel(&id));
        let revive = SubscriptionUpdate {
            status: Some(SubscriptionStatus::Active),
            amount: Some(Decimal::from(9)),
            ..Default::default()
        };
        assert!(book.update(&id, revive));
        let sub = book.get(&id).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
        assert_eq!(sub.amount, Decimal::from(9));
    }

    #[test]
    fn update_replaces_but_never_clears_optional_text() {
        let mut d0 = draft("Spotify", 11, Frequency::Monthly, "2025-01-10");
        d0.description = Some("family plan".into());
        d0.icon = Some("music".into());
        let mut book = SubscriptionBook::default();
        let id = book.add(d0).id.clone();

        assert!(book.update(
            &id,
            SubscriptionUpdate {
                name: Some("Spotify Duo".into()),
                ..Default::default()
            }
        ));
        let sub = book.get(&id).unwrap();
        assert_eq!(sub.description.as_deref(), Some("family plan"));
        assert_eq!(sub.icon.as_deref(), Some("music"));

        assert!(book.update(
            &id,
            SubscriptionUpdate {
                description: Some("duo plan".into()),
                ..Default::default()
            }
        ));
        assert_eq!(book.get(&id).unwrap().description.as_deref(), Some("duo plan"));
    }

    #[test]
    fn paying_a_due_subscription() {
        let today = d("2025-03-10");
        let now = today.and_hms_opt(8, 0, 0).unwrap();
        let mut book = SubscriptionBook::default();
        let id = book
            .add(draft("Netflix", 10, Frequency::Monthly, "2025-02-10"))
            .id
            .clone();
        assert_eq!(book.get(&id).unwrap().next_payment_date, today);

        assert_eq!(book.generate_reminders(now), 1);
        assert_eq!(book.reminders()[0].r#type, ReminderKind::DueToday);

        let mut ledger = MemoryLedger::new();
        let tx = book
            .process_payment(&id, &mut ledger, today)
            .unwrap()
            .expect("active subscription is paid");
        assert_eq!(tx.amount, Decimal::from(10));
        assert_eq!(tx.r#type, TransactionType::Expense);
        assert_eq!(tx.description, "Netflix subscription");
        assert_eq!(ledger.entries(), &[tx]);

        let sub = book.get(&id).unwrap();
        assert_eq!(sub.last_payment_date, Some(today));
        assert_eq!(sub.next_payment_date, d("2025-04-10"));
        assert!(book.reminders().is_empty());
    }

    #[test]
    fn payment_is_a_no_op_unless_active() {
        let mut book = SubscriptionBook::default();
        let id = book
            .add(draft("Medium", 5, Frequency::Monthly, "2025-01-01"))
            .id
            .clone();
        book.toggle_status(&id);
        let mut ledger = MemoryLedger::new();
        assert!(book.process_payment(&id, &mut ledger, d("2025-02-01")).unwrap().is_none());
        book.cancel(&id);
        assert!(book.process_payment(&id, &mut ledger, d("2025-02-01")).unwrap().is_none());
        assert!(book.process_payment("missing", &mut ledger, d("2025-02-01")).unwrap().is_none());
        assert!(ledger.is_empty());
        assert_eq!(book.get(&id).unwrap().next_payment_date, d("2025-02-01"));
    }

    #[test]
    fn aggregates_cover_active_only() {
        let now = d("2025-03-01").and_hms_opt(12, 0, 0).unwrap();
        let mut book = SubscriptionBook::default();
        book.add(draft("Weekly box", 10, Frequency::Weekly, "2025-02-24"));
        book.add(draft("Netflix", 15, Frequency::Monthly, "2025-02-20"));
        let prime = book
            .add(draft("Prime", 120, Frequency::Yearly, "2025-01-01"))
            .id
            .clone();
        let gone = book
            .add(draft("Old", 99, Frequency::Monthly, "2025-02-01"))
            .id
            .clone();
        book.cancel(&gone);

        // 43.30 + 15 + 10
        assert_eq!(book.total_monthly_cost(), Decimal::new(6830, 2));

        let upcoming = book.upcoming(now);
        assert_eq!(upcoming.len(), 3);
        assert_eq!(upcoming[0].days_until_payment, 2);
        assert_eq!(upcoming[2].subscription.id, prime);

        let stats = book.stats(now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.upcoming_this_week, 1);
        assert_eq!(stats.overdue, 0);

        let by_category = book.monthly_cost_by_category();
        assert_eq!(by_category, vec![("Entertainment".to_string(), Decimal::new(6830, 2))]);
    }
}
