// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::badges::Stats;
use crate::models::Transaction;

/// The append/remove-only transaction log shared by the app and the
/// subscription engine.
pub trait Ledger {
    fn append(&mut self, tx: Transaction) -> Result<()>;
    /// Returns whether an entry with `id` existed.
    fn remove(&mut self, id: &str) -> Result<bool>;
    /// All entries, most recent first.
    fn transactions(&self) -> Result<Vec<Transaction>>;
}

/// Ledger held in memory. New entries go to the front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryLedger {
    entries: Vec<Transaction>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(entries: Vec<Transaction>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Ledger for MemoryLedger {
    fn append(&mut self, tx: Transaction) -> Result<()> {
        self.entries.insert(0, tx);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|t| t.id != id);
        Ok(self.entries.len() != before)
    }

    fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.entries.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LedgerSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

impl LedgerSummary {
    pub fn from_transactions<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut s = LedgerSummary::default();
        for t in txs {
            if t.is_income() {
                s.total_income += t.amount;
            } else {
                s.total_expense += t.amount;
            }
        }
        s.balance = s.total_income - s.total_expense;
        s
    }

    pub fn stats(&self) -> Stats {
        Stats {
            balance: self.balance,
        }
    }
}
