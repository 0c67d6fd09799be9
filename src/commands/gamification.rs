// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::badges::CATALOG;
use crate::gamification::{Challenge, GamificationData, GamificationEngine};
use crate::ledger::LedgerSummary;
use crate::settings;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    match m.subcommand() {
        Some(("status", sub)) => status(conn, sub, today),
        _ => Ok(()),
    }
}

/// Re-derives the stored gamification snapshot from the ledger and writes it
/// back when something changed.
pub fn refresh(conn: &Connection, today: NaiveDate) -> Result<GamificationData> {
    refresh_with(&mut GamificationEngine::new(), conn, today)
}

/// Like [`refresh`] but reuses `engine`, so repeated calls with unchanged
/// inputs skip the derivation.
pub fn refresh_with(
    engine: &mut GamificationEngine,
    conn: &Connection,
    today: NaiveDate,
) -> Result<GamificationData> {
    let target = settings::load(conn)?.challenge_target;
    let stored = store::load_gamification(conn)?;
    let mut base = stored
        .clone()
        .unwrap_or_else(|| GamificationData::initial(today, target));
    if base.challenge.target != target {
        base.challenge = Challenge::weekly_savings(target, base.challenge.start_date);
    }

    let transactions = store::load_transactions(conn)?;
    let stats = LedgerSummary::from_transactions(&transactions).stats();
    let next = engine
        .recompute(&transactions, &base, &stats, today)
        .unwrap_or(base);

    if stored.as_ref() != Some(&next) {
        store::save_gamification(conn, &next)?;
        tracing::debug!(streak = next.positive_day_streak, "gamification snapshot saved");
    }
    Ok(next)
}

/// [`refresh`] after a ledger change, printing badges and challenge
/// completions that the change brought about.
pub fn refresh_and_announce(conn: &Connection, today: NaiveDate) -> Result<()> {
    let before = store::load_gamification(conn)?;
    let after = refresh(conn, today)?;
    for badge in CATALOG {
        let had = before.as_ref().is_some_and(|b| b.is_unlocked(badge));
        if !had && after.is_unlocked(badge) {
            println!("Badge unlocked: {} ({})", badge.name(), badge.description());
        }
    }
    let was_complete = before
        .as_ref()
        .is_some_and(|b| b.challenge.start_date == after.challenge.start_date && b.challenge.is_complete);
    if after.challenge.is_complete && !was_complete {
        println!("{} complete!", after.challenge.name);
    }
    Ok(())
}

#[derive(Serialize)]
struct BadgeView {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    unlocked: bool,
}

#[derive(Serialize)]
struct StatusView {
    badges: Vec<BadgeView>,
    challenge: Challenge,
    challenge_percent: Decimal,
    positive_day_streak: u32,
    last_streak_update_date: Option<NaiveDate>,
}

fn status(conn: &Connection, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let data = refresh(conn, today)?;
    let view = StatusView {
        badges: CATALOG
            .iter()
            .map(|b| BadgeView {
                id: b.id(),
                name: b.name(),
                description: b.description(),
                unlocked: data.is_unlocked(*b),
            })
            .collect(),
        challenge_percent: data.challenge.percent(),
        challenge: data.challenge.clone(),
        positive_day_streak: data.positive_day_streak,
        last_streak_update_date: data.last_streak_update_date,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }

    let rows = view
        .badges
        .iter()
        .map(|b| {
            vec![
                if b.unlocked { "✔" } else { " " }.to_string(),
                b.name.to_string(),
                b.description.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["", "Badge", "How to earn"], rows));

    let c = &view.challenge;
    println!(
        "{}: {} / {} ({}%){}",
        c.name,
        c.progress.round_dp(2),
        c.target,
        view.challenge_percent,
        if c.is_complete { " complete" } else { "" }
    );
    println!(
        "Positive-day streak: {}{}",
        view.positive_day_streak,
        view.last_streak_update_date
            .map(|d| format!(" (last {})", d))
            .unwrap_or_default()
    );
    Ok(())
}
