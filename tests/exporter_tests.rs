// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetquest::models::{Transaction, TransactionType};
use budgetquest::{cli, commands::exporter, db, store};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let rows = [
        (TransactionType::Expense, "Corner Shop", 1234, "Groceries", "2025-01-02"),
        (TransactionType::Income, "Salary", 250000, "Work", "2025-01-01"),
    ];
    for (kind, desc, cents, cat, date) in rows {
        let tx = Transaction::new(
            kind,
            desc,
            Decimal::new(cents, 2),
            cat,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        );
        store::insert_transaction(&conn, &tx).unwrap();
    }
    conn
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "budgetquest",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_writes_pretty_json_oldest_first() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    export(&conn, "json", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["description"], "Salary");
    assert_eq!(items[1]["type"], "expense");
    assert_eq!(items[1]["amount"], "12.34");
    assert_eq!(items[1]["category"], "Groceries");
    assert_eq!(items[1]["date"], "2025-01-02");
}

#[test]
fn export_transactions_writes_csv() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    export(&conn, "CSV", &out_path.to_string_lossy()).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "date", "type", "description", "amount", "category"]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[1][3], "Corner Shop");
    assert_eq!(&records[1][4], "12.34");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.xml");
    assert!(export(&conn, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}
