// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Transaction;
use crate::period::month_key;

/// Balance snapshot handed to the badge predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub balance: Decimal,
}

type UnlockCondition = fn(&[Transaction], &Stats) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Badge {
    FirstStep,
    BudgetBoss,
    SuperSaver,
    CategoryExplorer,
}

pub const CATALOG: [Badge; 4] = [
    Badge::FirstStep,
    Badge::BudgetBoss,
    Badge::SuperSaver,
    Badge::CategoryExplorer,
];

const BUDGET_BOSS_BALANCE: i64 = 1000;
const EXPLORER_CATEGORIES: usize = 5;

impl Badge {
    pub fn id(&self) -> &'static str {
        match self {
            Badge::FirstStep => "first-step",
            Badge::BudgetBoss => "budget-boss",
            Badge::SuperSaver => "super-saver",
            Badge::CategoryExplorer => "category-explorer",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Badge::FirstStep => "First Step",
            Badge::BudgetBoss => "Budget Boss",
            Badge::SuperSaver => "Super Saver",
            Badge::CategoryExplorer => "Category Explorer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Badge::FirstStep => "Add your first transaction.",
            Badge::BudgetBoss => "Reach a balance of $1,000.",
            Badge::SuperSaver => "Have a month where your income is double your expenses.",
            Badge::CategoryExplorer => "Use 5 different expense categories.",
        }
    }

    pub fn from_id(id: &str) -> Option<Badge> {
        CATALOG.iter().copied().find(|b| b.id() == id)
    }

    fn condition(&self) -> UnlockCondition {
        match self {
            Badge::FirstStep => first_step,
            Badge::BudgetBoss => budget_boss,
            Badge::SuperSaver => super_saver,
            Badge::CategoryExplorer => category_explorer,
        }
    }

    pub fn is_unlocked_by(&self, transactions: &[Transaction], stats: &Stats) -> bool {
        (self.condition())(transactions, stats)
    }
}

fn first_step(transactions: &[Transaction], _: &Stats) -> bool {
    !transactions.is_empty()
}

fn budget_boss(_: &[Transaction], stats: &Stats) -> bool {
    stats.balance >= Decimal::from(BUDGET_BOSS_BALANCE)
}

fn super_saver(transactions: &[Transaction], _: &Stats) -> bool {
    let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let entry = months
            .entry(month_key(t.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        if t.is_income() {
            entry.0 += t.amount;
        } else {
            entry.1 += t.amount;
        }
    }
    months
        .values()
        .any(|(income, expense)| *expense > Decimal::ZERO && *income >= *expense * Decimal::TWO)
}

fn category_explorer(transactions: &[Transaction], _: &Stats) -> bool {
    transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.category.as_str())
        .collect::<HashSet<_>>()
        .len()
        >= EXPLORER_CATEGORIES
}

/// Ids of every catalog badge whose condition currently holds.
pub fn check_badge_conditions(transactions: &[Transaction], stats: &Stats) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|b| b.is_unlocked_by(transactions, stats))
        .map(|b| b.id())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::NaiveDate;

    fn tx(kind: TransactionType, amount: i64, category: &str, date: &str) -> Transaction {
        Transaction::new(
            kind,
            "test",
            Decimal::from(amount),
            category,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        )
    }

    fn stats(balance: &str) -> Stats {
        Stats {
            balance: balance.parse().unwrap(),
        }
    }

    #[test]
    fn budget_boss_threshold_is_inclusive() {
        assert!(Badge::BudgetBoss.is_unlocked_by(&[], &stats("1000.00")));
        assert!(!Badge::BudgetBoss.is_unlocked_by(&[], &stats("999.99")));
    }

    #[test]
    fn super_saver_needs_expenses_in_the_same_month() {
        let income_only = vec![tx(TransactionType::Income, 500, "Salary", "2025-04-01")];
        assert!(!Badge::SuperSaver.is_unlocked_by(&income_only, &stats("0")));

        let split_months = vec![
            tx(TransactionType::Income, 500, "Salary", "2025-04-01"),
            tx(TransactionType::Expense, 100, "Food", "2025-05-01"),
        ];
        assert!(!Badge::SuperSaver.is_unlocked_by(&split_months, &stats("0")));

        let doubled = vec![
            tx(TransactionType::Income, 200, "Salary", "2025-05-03"),
            tx(TransactionType::Expense, 100, "Food", "2025-05-01"),
        ];
        assert!(Badge::SuperSaver.is_unlocked_by(&doubled, &stats("0")));
    }

    #[test]
    fn category_explorer_counts_distinct_expense_categories() {
        let mut txs: Vec<Transaction> = ["Food", "Housing", "Fun", "Health"]
            .iter()
            .map(|c| tx(TransactionType::Expense, 5, c, "2025-05-01"))
            .collect();
        txs.push(tx(TransactionType::Income, 5, "Gifts", "2025-05-01"));
        txs.push(tx(TransactionType::Expense, 5, "Food", "2025-05-02"));
        assert!(!Badge::CategoryExplorer.is_unlocked_by(&txs, &stats("0")));

        txs.push(tx(TransactionType::Expense, 5, "Utilities", "2025-05-02"));
        assert!(Badge::CategoryExplorer.is_unlocked_by(&txs, &stats("0")));
    }

    #[test]
    fn ids_round_trip_through_catalog() {
        for badge in CATALOG {
            assert_eq!(Badge::from_id(badge.id()), Some(badge));
        }
        assert_eq!(Badge::from_id("unknown"), None);
        assert_eq!(
            check_badge_conditions(&[], &stats("1500")),
            vec!["budget-boss"]
        );
    }
}
