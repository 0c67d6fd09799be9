// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::commands::gamification;
use crate::ledger::{Ledger, LedgerSummary};
use crate::models::{Transaction, TransactionType};
use crate::settings;
use crate::store::{self, SqliteLedger, TxFilter};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::validate;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub, today)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub, today)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().trim();
    let category = sub.get_one::<String>("category").unwrap().trim();
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today,
    };

    let tx = Transaction::new(kind, description, amount, category, date);
    validate::transaction(&tx)?;
    SqliteLedger::new(conn).append(tx.clone())?;
    tracing::info!(id = %tx.id, kind = %tx.r#type, amount = %tx.amount, "transaction recorded");

    let ccy = settings::currency(conn)?;
    println!(
        "Recorded {} {} on {} ({}) [{}]",
        tx.r#type,
        fmt_money(&tx.amount, &ccy),
        tx.date,
        tx.category,
        tx.id
    );
    gamification::refresh_and_announce(conn, today)
}

fn remove(conn: &Connection, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    if SqliteLedger::new(conn).remove(id)? {
        println!("Deleted transaction {}", id);
        gamification::refresh(conn, today)?;
    } else {
        println!("No transaction with id {}", id);
    }
    Ok(())
}

pub fn filter_from(sub: &clap::ArgMatches) -> TxFilter {
    TxFilter {
        month: sub.get_one::<String>("month").cloned(),
        category: sub.get_one::<String>("category").cloned(),
        r#type: sub.get_one::<String>("type").cloned(),
        limit: sub.get_one::<usize>("limit").copied(),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = store::query_transactions(conn, &filter_from(sub))?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.r#type.to_string(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.category.clone(),
                    t.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Description", "Amount", "Category", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct SummaryView {
    currency: String,
    transactions: usize,
    #[serde(flatten)]
    totals: LedgerSummary,
}

pub fn summary(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let data = store::load_transactions(conn)?;
    let view = SummaryView {
        currency: settings::currency(conn)?,
        transactions: data.len(),
        totals: LedgerSummary::from_transactions(&data),
    };
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &view)? {
        return Ok(());
    }
    let ccy = &view.currency;
    let rows = vec![
        vec!["Income".into(), fmt_money(&view.totals.total_income, ccy)],
        vec!["Expense".into(), fmt_money(&view.totals.total_expense, ccy)],
        vec!["Balance".into(), fmt_money(&view.totals.balance, ccy)],
    ];
    println!("{}", pretty_table(&["", "Total"], rows));
    Ok(())
}
