// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Demo catalog for `sub seed-samples`.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{Frequency, SubscriptionDraft};
use crate::subscriptions::SubscriptionBook;

struct Sample {
    name: &'static str,
    description: &'static str,
    cents: i64,
    frequency: Frequency,
    category: &'static str,
    started_days_ago: i64,
    reminder_days: &'static [u32],
    color: &'static str,
    icon: &'static str,
    paused: bool,
}

const SAMPLES: &[Sample] = &[
    Sample {
        name: "Netflix",
        description: "Premium Family Plan",
        cents: 1599,
        frequency: Frequency::Monthly,
        category: "Entertainment",
        started_days_ago: 27,
        reminder_days: &[3, 1],
        color: "#FFE4E1",
        icon: "🎬",
        paused: false,
    },
    Sample {
        name: "Spotify",
        description: "Premium Individual",
        cents: 999,
        frequency: Frequency::Monthly,
        category: "Music & Audio",
        started_days_ago: 12,
        reminder_days: &[1],
        color: "#E1F5FE",
        icon: "🎵",
        paused: false,
    },
    Sample {
        name: "Adobe Creative Cloud",
        description: "Photography Plan",
        cents: 1999,
        frequency: Frequency::Monthly,
        category: "Productivity",
        started_days_ago: 23,
        reminder_days: &[7, 3],
        color: "#F3E5F5",
        icon: "🎨",
        paused: false,
    },
    Sample {
        name: "Planet Fitness",
        description: "Monthly Membership",
        cents: 2299,
        frequency: Frequency::Monthly,
        category: "Health & Fitness",
        started_days_ago: 5,
        reminder_days: &[3],
        color: "#F1F8E9",
        icon: "💪",
        paused: false,
    },
    Sample {
        name: "Amazon Prime",
        description: "Annual Subscription",
        cents: 11900,
        frequency: Frequency::Yearly,
        category: "Shopping",
        started_days_ago: 200,
        reminder_days: &[7, 3, 1],
        color: "#FFF3E0",
        icon: "📦",
        paused: false,
    },
    Sample {
        name: "Medium",
        description: "Member subscription",
        cents: 500,
        frequency: Frequency::Monthly,
        category: "News & Media",
        started_days_ago: 15,
        reminder_days: &[1],
        color: "#E0E6FF",
        icon: "📰",
        paused: true,
    },
    Sample {
        name: "Dropbox Plus",
        description: "2TB Storage",
        cents: 999,
        frequency: Frequency::Monthly,
        category: "Cloud Storage",
        started_days_ago: 29,
        reminder_days: &[3, 1],
        color: "#FCE4EC",
        icon: "☁️",
        paused: false,
    },
    Sample {
        name: "Disney+",
        description: "Annual Bundle with Hulu",
        cents: 7999,
        frequency: Frequency::Yearly,
        category: "Entertainment",
        started_days_ago: 60,
        reminder_days: &[7],
        color: "#E8F5E8",
        icon: "🏰",
        paused: false,
    },
];

/// Drafts for the demo catalog, with start dates placed so the first
/// payments land around `today`.
pub fn sample_drafts(today: NaiveDate) -> Vec<(SubscriptionDraft, bool)> {
    SAMPLES
        .iter()
        .map(|s| {
            let draft = SubscriptionDraft {
                name: s.name.to_string(),
                description: Some(s.description.to_string()),
                amount: Decimal::new(s.cents, 2),
                frequency: s.frequency,
                category: s.category.to_string(),
                start_date: today - Duration::days(s.started_days_ago),
                auto_renew: !s.paused,
                reminder_days: s.reminder_days.iter().copied().collect(),
                color: s.color.to_string(),
                icon: Some(s.icon.to_string()),
            };
            (draft, s.paused)
        })
        .collect()
}

/// Adds the demo catalog to `book`; returns how many subscriptions were added.
pub fn seed(book: &mut SubscriptionBook, today: NaiveDate) -> usize {
    let mut added = 0;
    for (draft, paused) in sample_drafts(today) {
        let id = book.add(draft).id.clone();
        if paused {
            book.toggle_status(&id);
        }
        added += 1;
    }
    added
}
