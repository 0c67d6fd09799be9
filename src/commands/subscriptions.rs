// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;

use crate::commands::gamification;
use crate::models::{Frequency, SubscriptionDraft, SubscriptionStatus, SubscriptionUpdate};
use crate::samples;
use crate::settings;
use crate::store::{self, SqliteLedger};
use crate::subscriptions::SubscriptionBook;
use crate::utils::{
    fmt_money, format_reminder_days, maybe_print_json, parse_date, parse_decimal,
    parse_reminder_days, pretty_table,
};
use crate::validate;

const DEFAULT_COLOR: &str = "#E0E6FF";

pub fn handle(conn: &Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub, now),
        Some(("list", sub)) => list(conn, sub),
        Some(("update", sub)) => update(conn, sub),
        Some(("cancel", sub)) => transition(conn, sub, "Cancelled", SubscriptionBook::cancel),
        Some(("toggle", sub)) => transition(conn, sub, "Toggled", SubscriptionBook::toggle_status),
        Some(("pay", sub)) => pay(conn, sub, now),
        Some(("upcoming", sub)) => upcoming(conn, sub, now),
        Some(("stats", sub)) => stats(conn, sub, now),
        Some(("seed-samples", _)) => seed(conn, now),
        _ => Ok(()),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let frequency: Frequency = sub.get_one::<String>("frequency").unwrap().parse()?;
    let reminder_days = match sub.get_one::<String>("remind") {
        Some(s) => parse_reminder_days(s)?,
        None => settings::load(conn)?.notifications.reminder_days,
    };
    let draft = SubscriptionDraft {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        description: sub.get_one::<String>("description").cloned(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        frequency,
        category: sub.get_one::<String>("category").unwrap().trim().to_string(),
        start_date: match sub.get_one::<String>("start") {
            Some(s) => parse_date(s)?,
            None => now.date(),
        },
        auto_renew: !sub.get_flag("no-auto-renew"),
        reminder_days,
        color: sub
            .get_one::<String>("color")
            .cloned()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        icon: sub.get_one::<String>("icon").cloned(),
    };
    validate::subscription_draft(&draft)?;

    let mut book = store::load_book(conn)?;
    let added = book.add(draft).clone();
    store::save_book(conn, &book)?;
    println!(
        "Added {} ({} {}), next payment {} [{}]",
        added.name,
        fmt_money(&added.amount, &settings::currency(conn)?),
        added.frequency,
        added.next_payment_date,
        added.id
    );
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let changes = SubscriptionUpdate {
        name: sub.get_one::<String>("name").map(|s| s.trim().to_string()),
        description: sub.get_one::<String>("description").cloned(),
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        frequency: sub
            .get_one::<String>("frequency")
            .map(|s| s.parse::<Frequency>())
            .transpose()?,
        category: sub.get_one::<String>("category").map(|s| s.trim().to_string()),
        start_date: sub
            .get_one::<String>("start")
            .map(|s| parse_date(s))
            .transpose()?,
        auto_renew: sub.get_one::<bool>("auto-renew").copied(),
        reminder_days: sub
            .get_one::<String>("remind")
            .map(|s| parse_reminder_days(s))
            .transpose()?,
        color: sub.get_one::<String>("color").cloned(),
        icon: sub.get_one::<String>("icon").cloned(),
        ..Default::default()
    };
    validate::subscription_update(&changes)?;

    let mut book = store::load_book(conn)?;
    if book.update(id, changes) {
        store::save_book(conn, &book)?;
        println!("Updated subscription {}", id);
    } else {
        println!("No subscription with id {}", id);
    }
    Ok(())
}

fn transition(
    conn: &Connection,
    sub: &clap::ArgMatches,
    verb: &str,
    op: fn(&mut SubscriptionBook, &str) -> bool,
) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let mut book = store::load_book(conn)?;
    if op(&mut book, id) {
        store::save_book(conn, &book)?;
        let status = book.get(id).map(|s| s.status.to_string()).unwrap_or_default();
        println!("{} subscription {} (now {})", verb, id, status);
    } else {
        println!("Nothing to do for subscription {}", id);
    }
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let today = now.date();
    let mut book = store::load_book(conn)?;

    let db_tx = conn.unchecked_transaction()?;
    let paid = book.process_payment(id, &mut SqliteLedger::new(&db_tx), today)?;
    let Some(tx) = paid else {
        println!("Subscription {} is not active or does not exist; nothing paid", id);
        return Ok(());
    };
    store::write_book(&db_tx, &book)?;
    db_tx.commit()?;

    let next = book
        .get(id)
        .map(|s| s.next_payment_date.to_string())
        .unwrap_or_default();
    println!(
        "Paid {} for {}; next payment {}",
        fmt_money(&tx.amount, &settings::currency(conn)?),
        tx.description,
        next
    );
    gamification::refresh_and_announce(conn, today)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let status = sub
        .get_one::<String>("status")
        .map(|s| s.parse::<SubscriptionStatus>())
        .transpose()?;
    let book = store::load_book(conn)?;
    let data: Vec<_> = book
        .subscriptions()
        .iter()
        .filter(|s| status.is_none_or(|st| s.status == st))
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|s| {
            vec![
                s.icon.clone().unwrap_or_default(),
                s.name.clone(),
                s.amount.to_string(),
                s.frequency.to_string(),
                s.category.clone(),
                s.next_payment_date.to_string(),
                s.status.to_string(),
                format_reminder_days(&s.reminder_days),
                s.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["", "Name", "Amount", "Frequency", "Category", "Next", "Status", "Remind", "Id"],
            rows
        )
    );
    Ok(())
}

fn upcoming(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let book = store::load_book(conn)?;
    let mut data = book.upcoming(now);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|u| {
            let when = match u.days_until_payment {
                0 => "today".to_string(),
                1 => "tomorrow".to_string(),
                d if d < 0 => format!("{} days overdue", -d),
                d => format!("in {} days", d),
            };
            vec![
                u.subscription.name.clone(),
                u.subscription.amount.to_string(),
                u.subscription.next_payment_date.to_string(),
                when,
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Name", "Amount", "Due", "When"], rows));
    Ok(())
}

#[derive(Serialize)]
struct CategoryCost {
    category: String,
    monthly_cost: rust_decimal::Decimal,
}

#[derive(Serialize)]
struct StatsView {
    currency: String,
    #[serde(flatten)]
    stats: crate::subscriptions::SubscriptionStats,
    by_category: Vec<CategoryCost>,
}

fn stats(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let book = store::load_book(conn)?;
    let view = StatsView {
        currency: settings::currency(conn)?,
        stats: book.stats(now),
        by_category: book
            .monthly_cost_by_category()
            .into_iter()
            .map(|(category, monthly_cost)| CategoryCost {
                category,
                monthly_cost: monthly_cost.round_dp(2),
            })
            .collect(),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }
    let s = &view.stats;
    let rows = vec![
        vec!["Total".into(), s.total.to_string()],
        vec!["Active".into(), s.active.to_string()],
        vec!["Paused".into(), s.paused.to_string()],
        vec!["Cancelled".into(), s.cancelled.to_string()],
        vec!["Due within 7 days".into(), s.upcoming_this_week.to_string()],
        vec!["Overdue".into(), s.overdue.to_string()],
        vec![
            "Monthly cost".into(),
            fmt_money(&s.total_monthly_cost, &view.currency),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    if !view.by_category.is_empty() {
        let rows = view
            .by_category
            .iter()
            .map(|c| vec![c.category.clone(), fmt_money(&c.monthly_cost, &view.currency)])
            .collect();
        println!("{}", pretty_table(&["Category", "Monthly"], rows));
    }
    Ok(())
}

fn seed(conn: &Connection, now: NaiveDateTime) -> Result<()> {
    let mut book = store::load_book(conn)?;
    let added = samples::seed(&mut book, now.date());
    store::save_book(conn, &book)?;
    println!("Added {} sample subscriptions", added);
    Ok(())
}
