// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use tokio::task::JoinHandle;

/// How often the reminder generator runs while a watcher is attached.
pub const REMINDER_POLL_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Periodic reminder check bound to its owner's lifetime. The first tick
/// fires immediately; `stop` or dropping the poller tears the timer down so
/// no callback runs afterwards.
///
/// Must be started from inside a tokio runtime.
#[derive(Debug)]
pub struct ReminderPoller {
    handle: Option<JoinHandle<()>>,
}

impl ReminderPoller {
    pub fn start<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick();
            }
        });
        tracing::debug!(?period, "reminder poller started");
        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("reminder poller stopped");
        }
    }
}

impl Drop for ReminderPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
