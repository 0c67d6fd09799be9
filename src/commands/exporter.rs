// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::store;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    // Oldest first, the order a spreadsheet expects.
    let mut rows = store::load_transactions(conn)?;
    rows.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "type", "description", "amount", "category"])?;
            for t in &rows {
                wtr.write_record([
                    t.id.as_str(),
                    t.date.to_string().as_str(),
                    t.r#type.as_str(),
                    t.description.as_str(),
                    t.amount.to_string().as_str(),
                    t.category.as_str(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
