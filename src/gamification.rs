// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::badges::{Badge, Stats, check_badge_conditions};
use crate::ledger::LedgerSummary;
use crate::models::Transaction;
use crate::period::{day_gap, week_start};

pub const CHALLENGE_ID: &str = "weekly-savings-50";
pub const DEFAULT_CHALLENGE_TARGET: i64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target: Decimal,
    pub progress: Decimal,
    pub is_complete: bool,
    pub start_date: NaiveDate,
}

impl Challenge {
    /// Fresh weekly savings challenge for the week beginning `start_date`.
    pub fn weekly_savings(target: Decimal, start_date: NaiveDate) -> Self {
        Self {
            id: CHALLENGE_ID.to_string(),
            name: "Weekly Savings Challenge".to_string(),
            description: format!("Save ${} this week!", target.normalize()),
            target,
            progress: Decimal::ZERO,
            is_complete: false,
            start_date,
        }
    }

    /// Share of the target reached, capped at 100.
    pub fn percent(&self) -> Decimal {
        if self.target.is_zero() {
            return Decimal::ONE_HUNDRED;
        }
        (self.progress / self.target * Decimal::ONE_HUNDRED)
            .min(Decimal::ONE_HUNDRED)
            .round_dp(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GamificationData {
    pub unlocked_badge_ids: BTreeSet<String>,
    pub positive_day_streak: u32,
    pub last_streak_update_date: Option<NaiveDate>,
    pub challenge: Challenge,
}

impl GamificationData {
    pub fn initial(today: NaiveDate, challenge_target: Decimal) -> Self {
        Self {
            unlocked_badge_ids: BTreeSet::new(),
            positive_day_streak: 0,
            last_streak_update_date: None,
            challenge: Challenge::weekly_savings(challenge_target, week_start(today)),
        }
    }

    pub fn is_unlocked(&self, badge: Badge) -> bool {
        self.unlocked_badge_ids.contains(badge.id())
    }
}

/// One full derivation pass: badges, then the weekly challenge, then the
/// streak. `transactions` must be ordered most recent first.
pub fn derive(
    transactions: &[Transaction],
    previous: &GamificationData,
    stats: &Stats,
    today: NaiveDate,
) -> GamificationData {
    let mut data = previous.clone();
    unlock_badges(&mut data, transactions, stats);
    update_challenge(&mut data, transactions, today);
    update_streak(&mut data, transactions);
    data
}

fn unlock_badges(data: &mut GamificationData, transactions: &[Transaction], stats: &Stats) {
    for id in check_badge_conditions(transactions, stats) {
        if data.unlocked_badge_ids.insert(id.to_string()) {
            tracing::info!(badge = id, "badge unlocked");
        }
    }
}

fn update_challenge(data: &mut GamificationData, transactions: &[Transaction], today: NaiveDate) {
    let start = week_start(today);
    if data.challenge.start_date != start {
        tracing::debug!(%start, "new week, resetting savings challenge");
        data.challenge = Challenge::weekly_savings(data.challenge.target, start);
    }
    let week = LedgerSummary::from_transactions(transactions.iter().filter(|t| t.date >= start));
    data.challenge.progress = week.balance.max(Decimal::ZERO);
    data.challenge.is_complete = week.balance >= data.challenge.target;
}

fn update_streak(data: &mut GamificationData, transactions: &[Transaction]) {
    let Some(latest) = transactions.first() else {
        return;
    };
    let day = latest.date;
    if data.last_streak_update_date == Some(day) {
        return;
    }

    let totals = LedgerSummary::from_transactions(transactions.iter().filter(|t| t.date == day));
    if totals.total_income > totals.total_expense {
        data.positive_day_streak = if data.last_streak_update_date == day.pred_opt() {
            data.positive_day_streak.saturating_add(1)
        } else {
            1
        };
        data.last_streak_update_date = Some(day);
    } else {
        // A negative day only breaks a streak it is adjacent to.
        let adjacent = data
            .last_streak_update_date
            .is_some_and(|last| day_gap(last, day) <= 1);
        if adjacent {
            data.positive_day_streak = 0;
        }
    }
}

/// Memoizing wrapper around [`derive`]. Remembers a fingerprint of the last
/// inputs it processed, the previous snapshot included, and reports `None` when there is nothing new to store.
#[derive(Debug, Default)]
pub struct GamificationEngine {
    last_input: Option<u64>,
}

impl GamificationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new snapshot when it differs from `previous`, `None` when
    /// the inputs were already processed or the derivation changed nothing.
    pub fn recompute(
        &mut self,
        transactions: &[Transaction],
        previous: &GamificationData,
        stats: &Stats,
        today: NaiveDate,
    ) -> Option<GamificationData> {
        let fingerprint = fingerprint(transactions, previous, stats, today);
        if self.last_input == Some(fingerprint) {
            tracing::debug!("gamification inputs unchanged, skipping");
            return None;
        }
        self.last_input = Some(fingerprint);

        let next = derive(transactions, previous, stats, today);
        if next == *previous { None } else { Some(next) }
    }
}

fn fingerprint(
    transactions: &[Transaction],
    previous: &GamificationData,
    stats: &Stats,
    today: NaiveDate,
) -> u64 {
    let mut hasher = DefaultHasher::new();
    transactions.hash(&mut hasher);
    previous.hash(&mut hasher);
    stats.hash(&mut hasher);
    today.hash(&mut hasher);
    hasher.finish()
}
