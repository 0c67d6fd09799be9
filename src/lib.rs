// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod badges;
pub mod billing;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod gamification;
pub mod ledger;
pub mod models;
pub mod period;
pub mod reminders;
pub mod samples;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod subscriptions;
pub mod utils;
pub mod validate;
