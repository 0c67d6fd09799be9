// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Budgetquest", "budgetquest"));

/// Overrides the database location, mainly for scripting and demos.
pub const DB_ENV: &str = "BUDGETQUEST_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("budgetquest.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS subscriptions(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        amount TEXT NOT NULL,
        frequency TEXT NOT NULL CHECK(frequency IN ('weekly','monthly','quarterly','yearly')),
        category TEXT NOT NULL,
        start_date TEXT NOT NULL,
        next_payment_date TEXT NOT NULL,
        last_payment_date TEXT,
        status TEXT NOT NULL CHECK(status IN ('active','paused','cancelled')),
        auto_renew INTEGER NOT NULL DEFAULT 1,
        reminder_days TEXT NOT NULL DEFAULT '',
        color TEXT NOT NULL,
        icon TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS reminders(
        id TEXT PRIMARY KEY,
        subscription_id TEXT NOT NULL,
        due_date TEXT NOT NULL,
        amount TEXT NOT NULL,
        is_read INTEGER NOT NULL DEFAULT 0,
        is_dismissed INTEGER NOT NULL DEFAULT 0,
        type TEXT NOT NULL CHECK(type IN ('upcoming','due_today','overdue')),
        FOREIGN KEY(subscription_id) REFERENCES subscriptions(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_reminders_subscription ON reminders(subscription_id);

    -- Single-row snapshot of the derived gamification state, stored as JSON
    CREATE TABLE IF NOT EXISTS gamification(
        id INTEGER PRIMARY KEY CHECK(id = 1),
        data TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}
