// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while parsing or validating user input before it reaches
/// the engines. The engines themselves never fail.
#[derive(Debug, Error, PartialEq)]
pub enum TrackerError {
    #[error("Invalid amount '{0}', expected a positive value")]
    InvalidAmount(Decimal),
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("Unknown frequency '{0}' (use weekly|monthly|quarterly|yearly)")]
    UnknownFrequency(String),
    #[error("Unknown subscription status '{0}' (use active|paused|cancelled)")]
    UnknownStatus(String),
    #[error("Unknown transaction type '{0}' (use income|expense)")]
    UnknownTransactionType(String),
    #[error("Unknown reminder type '{0}' (use upcoming|due_today|overdue)")]
    UnknownReminderKind(String),
    #[error("Invalid reminder offset {0}, allowed offsets are 1, 3 and 7 days")]
    InvalidReminderOffset(u32),
    #[error("Invalid quiet hours '{0}', expected HH:MM-HH:MM or 'off'")]
    InvalidQuietHours(String),
}
