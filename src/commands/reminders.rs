// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;

use crate::commands::gamification;
use crate::gamification::GamificationEngine;
use crate::models::BillReminder;
use crate::reminders::{Notice, has_high_priority, pending_notices, unread_count};
use crate::scheduler::{REMINDER_POLL_INTERVAL, ReminderPoller};
use crate::settings;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("check", _)) => check(conn, now),
        Some(("list", sub)) => list(conn, sub),
        Some(("read", sub)) => flag(conn, sub, "Marked read", |book, id| {
            book.mark_reminder_read(id)
        }),
        Some(("dismiss", sub)) => flag(conn, sub, "Dismissed", |book, id| {
            book.dismiss_reminder(id)
        }),
        Some(("watch", sub)) => watch(conn, sub),
        _ => Ok(()),
    }
}

/// Result of one reminder pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckOutcome {
    pub generated: usize,
    /// Unread reminders to surface, soonest first.
    pub notices: Vec<Notice>,
    /// True when quiet hours held the notices back.
    pub quiet: bool,
}

/// Generates due reminders and persists them. With `deliver`, notices
/// outside quiet hours are marked read as they are handed out.
pub fn run_check(conn: &Connection, now: NaiveDateTime, deliver: bool) -> Result<CheckOutcome> {
    let cfg = settings::load(conn)?;
    let mut book = store::load_book(conn)?;
    let generated = book.generate_reminders(now);

    let notices = pending_notices(book.reminders(), book.subscriptions(), &cfg.currency);
    let quiet = cfg
        .notifications
        .quiet_hours
        .is_some_and(|q| q.contains(now.time()));
    let mut changed = generated > 0;
    if deliver && !quiet {
        for n in &notices {
            changed |= book.mark_reminder_read(&n.reminder_id);
        }
    }
    if changed {
        store::save_book(conn, &book)?;
    }
    tracing::debug!(generated, pending = notices.len(), quiet, "reminder pass done");
    Ok(CheckOutcome {
        generated,
        notices,
        quiet,
    })
}

fn print_notices(notices: &[Notice]) {
    for n in notices {
        let marker = if n.kind.is_high_priority() { "!" } else { "-" };
        println!("{} {}: {}", marker, n.title, n.message);
    }
}

fn check(conn: &Connection, now: NaiveDateTime) -> Result<()> {
    let outcome = run_check(conn, now, false)?;
    println!("{} new reminder(s)", outcome.generated);
    print_notices(&outcome.notices);
    Ok(())
}

#[derive(Serialize)]
struct ReminderView<'a> {
    #[serde(flatten)]
    reminder: &'a BillReminder,
    subscription: String,
    title: &'static str,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let book = store::load_book(conn)?;
    let reminders: Vec<&BillReminder> = if sub.get_flag("all") {
        book.reminders().iter().collect()
    } else {
        book.active_reminders()
    };
    let data: Vec<ReminderView<'_>> = reminders
        .into_iter()
        .map(|r| ReminderView {
            reminder: r,
            subscription: book
                .get(&r.subscription_id)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            title: r.r#type.title(),
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|v| {
            let mut state = if v.reminder.is_read { "read" } else { "unread" }.to_string();
            if v.reminder.is_dismissed {
                state.push_str(", dismissed");
            }
            vec![
                v.title.to_string(),
                v.subscription.clone(),
                v.reminder.amount.to_string(),
                v.reminder.due_date.to_string(),
                state,
                v.reminder.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Type", "Subscription", "Amount", "Due", "State", "Id"], rows)
    );
    let all = book.reminders();
    println!(
        "{} unread{}",
        unread_count(all),
        if has_high_priority(all) { ", payments due" } else { "" }
    );
    Ok(())
}

fn flag(
    conn: &Connection,
    sub: &clap::ArgMatches,
    verb: &str,
    op: impl FnOnce(&mut crate::subscriptions::SubscriptionBook, &str) -> bool,
) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let mut book = store::load_book(conn)?;
    if op(&mut book, id) {
        store::save_book(conn, &book)?;
        println!("{} reminder {}", verb, id);
    } else {
        println!("No reminder with id {}", id);
    }
    Ok(())
}

fn watch(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = sub
        .get_one::<u64>("interval-secs")
        .map(|s| Duration::from_secs(*s))
        .unwrap_or(REMINDER_POLL_INTERVAL);
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let (tick_tx, mut ticks) = tokio::sync::mpsc::unbounded_channel::<()>();
        let mut poller = ReminderPoller::start(period, move || {
            let _ = tick_tx.send(());
        });
        let mut engine = GamificationEngine::new();
        println!("Watching reminders every {}s, Ctrl-C to stop", period.as_secs());

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        loop {
            tokio::select! {
                tick = ticks.recv() => {
                    if tick.is_none() {
                        break;
                    }
                    let now = chrono::Local::now().naive_local();
                    let outcome = run_check(conn, now, true)?;
                    if !outcome.quiet {
                        print_notices(&outcome.notices);
                    }
                    gamification::refresh_with(&mut engine, conn, now.date())?;
                }
                _ = &mut ctrl_c => {
                    tracing::info!("interrupted, stopping reminder watcher");
                    break;
                }
            }
        }
        poller.stop();
        Ok::<(), anyhow::Error>(())
    })
}
