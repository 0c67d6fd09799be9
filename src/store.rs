// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row mapping between the SQLite tables and the domain types. Amounts and
//! dates are stored as TEXT and parsed back on load.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::gamification::GamificationData;
use crate::ledger::Ledger;
use crate::models::{
    BillReminder, Frequency, ReminderKind, Subscription, SubscriptionStatus, Transaction,
    TransactionType,
};
use crate::subscriptions::SubscriptionBook;
use crate::utils::{format_reminder_days, parse_date, parse_decimal, parse_reminder_days};

fn opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
    s.as_deref().map(parse_date).transpose()
}

fn amount_col(s: &str) -> Result<Decimal> {
    parse_decimal(s).with_context(|| format!("Invalid stored amount '{}'", s))
}

// ---------------------------------------------------------------------------
// Transactions

/// Optional narrowing for transaction listings.
#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    pub month: Option<String>,
    pub category: Option<String>,
    pub r#type: Option<String>,
    pub limit: Option<usize>,
}

fn transaction_from_row(r: &Row<'_>) -> Result<Transaction> {
    let id: String = r.get(0)?;
    let kind: String = r.get(1)?;
    let amount: String = r.get(3)?;
    let date: String = r.get(5)?;
    Ok(Transaction {
        r#type: kind
            .parse::<TransactionType>()
            .with_context(|| format!("Transaction {} has a bad type", id))?,
        description: r.get(2)?,
        amount: amount_col(&amount)?,
        category: r.get(4)?,
        date: parse_date(&date)?,
        id,
    })
}

pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions(id, type, description, amount, category, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tx.id,
            tx.r#type.as_str(),
            tx.description,
            tx.amount.to_string(),
            tx.category,
            tx.date.to_string()
        ],
    )?;
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: &str) -> Result<bool> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(n > 0)
}

/// Transactions matching `filter`, most recent date first; entries on the
/// same date keep their reverse insertion order.
pub fn query_transactions(conn: &Connection, filter: &TxFilter) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT id, type, description, amount, category, date FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = &filter.month {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.clone());
    }
    if let Some(cat) = &filter.category {
        sql.push_str(" AND category=?");
        params_vec.push(cat.clone());
    }
    if let Some(kind) = &filter.r#type {
        sql.push_str(" AND type=?");
        params_vec.push(kind.clone());
    }
    sql.push_str(" ORDER BY date DESC, seq DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(transaction_from_row(r)?);
    }
    Ok(data)
}

pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    query_transactions(conn, &TxFilter::default())
}

/// [`Ledger`] backed by the `transactions` table.
pub struct SqliteLedger<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteLedger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl Ledger for SqliteLedger<'_> {
    fn append(&mut self, tx: Transaction) -> Result<()> {
        insert_transaction(self.conn, &tx)
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        delete_transaction(self.conn, id)
    }

    fn transactions(&self) -> Result<Vec<Transaction>> {
        load_transactions(self.conn)
    }
}

// ---------------------------------------------------------------------------
// Subscriptions and reminders

fn subscription_from_row(r: &Row<'_>) -> Result<Subscription> {
    let id: String = r.get(0)?;
    let amount: String = r.get(3)?;
    let frequency: String = r.get(4)?;
    let start: String = r.get(6)?;
    let next: String = r.get(7)?;
    let status: String = r.get(9)?;
    let days: String = r.get(11)?;
    Ok(Subscription {
        name: r.get(1)?,
        description: r.get(2)?,
        amount: amount_col(&amount)?,
        frequency: frequency
            .parse::<Frequency>()
            .with_context(|| format!("Subscription {} has a bad frequency", id))?,
        category: r.get(5)?,
        start_date: parse_date(&start)?,
        next_payment_date: parse_date(&next)?,
        last_payment_date: opt_date(r.get(8)?)?,
        status: status
            .parse::<SubscriptionStatus>()
            .with_context(|| format!("Subscription {} has a bad status", id))?,
        auto_renew: r.get(10)?,
        reminder_days: parse_reminder_days(&days)?,
        color: r.get(12)?,
        icon: r.get(13)?,
        id,
    })
}

pub fn load_subscriptions(conn: &Connection) -> Result<Vec<Subscription>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, amount, frequency, category, start_date,
                next_payment_date, last_payment_date, status, auto_renew, reminder_days,
                color, icon
         FROM subscriptions ORDER BY created_at, rowid",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(subscription_from_row(r)?);
    }
    Ok(data)
}

fn reminder_from_row(r: &Row<'_>) -> Result<BillReminder> {
    let id: String = r.get(0)?;
    let due: String = r.get(2)?;
    let amount: String = r.get(3)?;
    let kind: String = r.get(6)?;
    Ok(BillReminder {
        subscription_id: r.get(1)?,
        due_date: parse_date(&due)?,
        amount: amount_col(&amount)?,
        is_read: r.get(4)?,
        is_dismissed: r.get(5)?,
        r#type: kind
            .parse::<ReminderKind>()
            .with_context(|| format!("Reminder {} has a bad type", id))?,
        id,
    })
}

pub fn load_reminders(conn: &Connection) -> Result<Vec<BillReminder>> {
    let mut stmt = conn.prepare(
        "SELECT id, subscription_id, due_date, amount, is_read, is_dismissed, type
         FROM reminders ORDER BY rowid",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(reminder_from_row(r)?);
    }
    Ok(data)
}

pub fn load_book(conn: &Connection) -> Result<SubscriptionBook> {
    Ok(SubscriptionBook::new(
        load_subscriptions(conn)?,
        load_reminders(conn)?,
    ))
}

/// Writes every subscription and replaces the stored reminder set, all in
/// one SQLite transaction.
pub fn save_book(conn: &Connection, book: &SubscriptionBook) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    write_book(&tx, book)?;
    tx.commit()?;
    Ok(())
}

/// [`save_book`] for callers that already hold an open transaction.
pub fn write_book(conn: &Connection, book: &SubscriptionBook) -> Result<()> {
    {
        let mut upsert = conn.prepare(
            "INSERT INTO subscriptions(id, name, description, amount, frequency, category,
                start_date, next_payment_date, last_payment_date, status, auto_renew,
                reminder_days, color, icon)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(id) DO UPDATE SET
                name=excluded.name, description=excluded.description,
                amount=excluded.amount, frequency=excluded.frequency,
                category=excluded.category, start_date=excluded.start_date,
                next_payment_date=excluded.next_payment_date,
                last_payment_date=excluded.last_payment_date, status=excluded.status,
                auto_renew=excluded.auto_renew, reminder_days=excluded.reminder_days,
                color=excluded.color, icon=excluded.icon",
        )?;
        for s in book.subscriptions() {
            upsert.execute(params![
                s.id,
                s.name,
                s.description,
                s.amount.to_string(),
                s.frequency.as_str(),
                s.category,
                s.start_date.to_string(),
                s.next_payment_date.to_string(),
                s.last_payment_date.map(|d| d.to_string()),
                s.status.as_str(),
                s.auto_renew,
                format_reminder_days(&s.reminder_days),
                s.color,
                s.icon,
            ])?;
        }

        conn.execute("DELETE FROM reminders", [])?;
        let mut insert = conn.prepare(
            "INSERT INTO reminders(id, subscription_id, due_date, amount, is_read, is_dismissed, type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for r in book.reminders() {
            insert.execute(params![
                r.id,
                r.subscription_id,
                r.due_date.to_string(),
                r.amount.to_string(),
                r.is_read,
                r.is_dismissed,
                r.r#type.as_str(),
            ])?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Gamification snapshot

pub fn load_gamification(conn: &Connection) -> Result<Option<GamificationData>> {
    let raw: Option<String> = conn
        .query_row("SELECT data FROM gamification WHERE id=1", [], |r| r.get(0))
        .optional()?;
    raw.map(|s| serde_json::from_str(&s).context("Corrupt gamification snapshot"))
        .transpose()
}

pub fn save_gamification(conn: &Connection, data: &GamificationData) -> Result<()> {
    conn.execute(
        "INSERT INTO gamification(id, data) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET data=excluded.data, updated_at=datetime('now')",
        params![serde_json::to_string(data)?],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::SubscriptionDraft;
    use std::collections::BTreeSet;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        conn
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn ledger_orders_by_date_then_insertion() {
        let conn = conn();
        let mut ledger = SqliteLedger::new(&conn);
        let a = Transaction::new(TransactionType::Income, "a", Decimal::new(1050, 2), "Pay", d("2025-01-02"));
        let b = Transaction::new(TransactionType::Expense, "b", Decimal::from(3), "Food", d("2025-01-05"));
        let c = Transaction::new(TransactionType::Expense, "c", Decimal::from(4), "Food", d("2025-01-02"));
        for t in [&a, &b, &c] {
            ledger.append(t.clone()).unwrap();
        }
        let got = ledger.transactions().unwrap();
        assert_eq!(got, vec![b.clone(), c.clone(), a.clone()]);

        assert!(ledger.remove(&c.id).unwrap());
        assert!(!ledger.remove(&c.id).unwrap());

        let filtered = query_transactions(
            &conn,
            &TxFilter {
                category: Some("Pay".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(filtered, vec![a]);
    }

    #[test]
    fn book_survives_a_round_trip() {
        let conn = conn();
        let mut book = SubscriptionBook::default();
        book.add(SubscriptionDraft {
            name: "Netflix".into(),
            description: Some("Streaming".into()),
            amount: Decimal::new(1599, 2),
            frequency: Frequency::Monthly,
            category: "Entertainment".into(),
            start_date: d("2025-02-10"),
            auto_renew: true,
            reminder_days: [1, 3].into_iter().collect::<BTreeSet<_>>(),
            color: "#FFE4E1".into(),
            icon: Some("tv".into()),
        });
        book.generate_reminders(d("2025-03-09").and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(book.reminders().len(), 1);

        save_book(&conn, &book).unwrap();
        assert_eq!(load_book(&conn).unwrap(), book);

        // Saving again replaces rather than duplicates.
        save_book(&conn, &book).unwrap();
        assert_eq!(load_reminders(&conn).unwrap().len(), 1);
    }

    #[test]
    fn gamification_snapshot_is_optional() {
        let conn = conn();
        assert!(load_gamification(&conn).unwrap().is_none());
        let data = GamificationData::initial(d("2025-06-04"), Decimal::from(50));
        save_gamification(&conn, &data).unwrap();
        assert_eq!(load_gamification(&conn).unwrap(), Some(data));
    }
}
