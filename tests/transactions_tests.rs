// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetquest::models::{Transaction, TransactionType};
use budgetquest::{cli, commands::transactions, db, store};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for i in 1..=3 {
        let tx = Transaction::new(
            TransactionType::Expense,
            "Lunch",
            Decimal::from(10),
            if i == 2 { "Transport" } else { "Food" },
            d(&format!("2025-01-0{}", i)),
        );
        store::insert_transaction(&conn, &tx).unwrap();
    }
    conn
}

fn run(conn: &Connection, args: &[&str], today: NaiveDate) {
    let mut argv = vec!["budgetquest", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, tx_m, today).unwrap();
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from(["budgetquest", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows =
                store::query_transactions(&conn, &transactions::filter_from(list_m)).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, d("2025-01-03"));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_category_and_month() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "budgetquest",
        "tx",
        "list",
        "--category",
        "Food",
        "--month",
        "2025-01",
    ]);
    let list_m = matches
        .subcommand_matches("tx")
        .and_then(|m| m.subcommand_matches("list"))
        .unwrap();
    let rows = store::query_transactions(&conn, &transactions::filter_from(list_m)).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|t| t.category == "Food"));
}

#[test]
fn add_records_and_unlocks_first_step() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let today = d("2025-06-04");
    run(
        &conn,
        &[
            "add",
            "--type",
            "income",
            "--amount",
            "25.50",
            "--description",
            "Freelance",
            "--category",
            "Work",
        ],
        today,
    );

    let txs = store::load_transactions(&conn).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].date, today);
    assert_eq!(txs[0].amount, Decimal::new(2550, 2));

    let game = store::load_gamification(&conn).unwrap().unwrap();
    assert!(game.unlocked_badge_ids.contains("first-step"));
    assert_eq!(game.positive_day_streak, 1);
    assert_eq!(game.challenge.progress, Decimal::new(2550, 2));
}

#[test]
fn add_rejects_non_positive_amount() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let matches = cli::build_cli().get_matches_from([
        "budgetquest",
        "tx",
        "add",
        "--type",
        "expense",
        "--amount",
        "0",
        "--description",
        "Nothing",
        "--category",
        "Misc",
    ]);
    let tx_m = matches.subcommand_matches("tx").unwrap();
    assert!(transactions::handle(&conn, tx_m, d("2025-06-04")).is_err());
    assert!(store::load_transactions(&conn).unwrap().is_empty());
}

#[test]
fn rm_deletes_by_id() {
    let conn = setup();
    let victim = store::load_transactions(&conn).unwrap()[0].id.clone();
    run(&conn, &["rm", &victim], d("2025-01-03"));
    let left = store::load_transactions(&conn).unwrap();
    assert_eq!(left.len(), 2);
    assert!(left.iter().all(|t| t.id != victim));

    // Unknown ids are reported, not errors.
    run(&conn, &["rm", "missing"], d("2025-01-03"));
    assert_eq!(store::load_transactions(&conn).unwrap().len(), 2);
}
