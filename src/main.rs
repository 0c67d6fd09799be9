// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use budgetquest::{cli, commands, db};

const LOG_ENV: &str = "BUDGETQUEST_LOG";

fn init_logging() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let now = chrono::Local::now().naive_local();
    let today = now.date();

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub, today)?,
        Some(("summary", sub)) => commands::transactions::summary(&conn, sub)?,
        Some(("game", sub)) => commands::gamification::handle(&conn, sub, today)?,
        Some(("sub", sub)) => commands::subscriptions::handle(&conn, sub, now)?,
        Some(("remind", sub)) => commands::reminders::handle(&conn, sub, now)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
