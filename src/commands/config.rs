// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::settings;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let (_, value) = settings::effective(conn)?
                .into_iter()
                .find(|(k, _)| k == key)
                .ok_or_else(|| anyhow!("Unknown setting '{}'", key))?;
            println!("{}", value);
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap();
            settings::set(conn, key, value)?;
            let stored = settings::get(conn, key)?.unwrap_or_default();
            println!("{} = {}", key, stored);
        }
        Some(("list", sub)) => {
            let items = settings::effective(conn)?;
            let map: serde_json::Map<String, serde_json::Value> = items
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &map)? {
                let rows = items.into_iter().map(|(k, v)| vec![k, v]).collect();
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
