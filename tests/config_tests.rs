// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetquest::{cli, commands::config, db, settings};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["budgetquest", "config"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    config::handle(conn, matches.subcommand_matches("config").unwrap())
}

#[test]
fn defaults_apply_until_set() {
    let conn = setup();
    let s = settings::load(&conn).unwrap();
    assert_eq!(s.currency, "USD");
    assert_eq!(s.challenge_target, Decimal::from(50));
    assert_eq!(
        s.notifications.reminder_days.into_iter().collect::<Vec<_>>(),
        vec![1, 3]
    );
    assert_eq!(
        s.notifications.quiet_hours.map(|q| q.to_string()),
        Some("22:00-08:00".to_string())
    );
}

#[test]
fn set_normalizes_values() {
    let conn = setup();
    run(&conn, &["set", "currency", "eur"]).unwrap();
    run(&conn, &["set", "reminder_days", "1, 7"]).unwrap();
    run(&conn, &["set", "quiet_hours", "off"]).unwrap();
    run(&conn, &["set", "challenge_target", "75"]).unwrap();

    assert_eq!(settings::get(&conn, "currency").unwrap().as_deref(), Some("EUR"));
    assert_eq!(settings::get(&conn, "reminder_days").unwrap().as_deref(), Some("7,1"));
    let s = settings::load(&conn).unwrap();
    assert!(s.notifications.quiet_hours.is_none());
    assert_eq!(s.challenge_target, Decimal::from(75));
    run(&conn, &["get", "currency"]).unwrap();
    run(&conn, &["list"]).unwrap();
}

#[test]
fn set_rejects_bad_input() {
    let conn = setup();
    assert!(run(&conn, &["set", "colour", "blue"]).is_err());
    assert!(run(&conn, &["set", "reminder_days", "2"]).is_err());
    assert!(run(&conn, &["set", "challenge_target", "0"]).is_err());
    assert!(run(&conn, &["set", "quiet_hours", "late"]).is_err());
    assert!(run(&conn, &["get", "colour"]).is_err());
    assert!(settings::get(&conn, "reminder_days").unwrap().is_none());
}
