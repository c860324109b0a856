// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer scheduler (the trigger runner)
//!
//! Timers are keyed by id, so setting a timer that already exists replaces
//! its deadline instead of adding a second one.

use rota_core::Event;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Pending one-shot timers
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: HashMap<String, Instant>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) a timer firing `duration` after `now`
    pub fn set_timer(&mut self, id: String, duration: Duration, now: Instant) {
        self.timers.insert(id, now + duration);
    }

    pub fn cancel_timer(&mut self, id: &str) {
        self.timers.remove(id);
    }

    /// Remove and return every timer whose deadline has passed
    pub fn fired_timers(&mut self, now: Instant) -> Vec<Event> {
        let mut fired: Vec<(Instant, String)> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, id.clone()))
            .collect();
        fired.sort();

        fired
            .into_iter()
            .map(|(_, id)| {
                self.timers.remove(&id);
                Event::Timer { id }
            })
            .collect()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().min().copied()
    }

    /// Time left until `id` fires
    #[cfg(test)]
    pub(crate) fn remaining(&self, id: &str, now: Instant) -> Option<Duration> {
        self.timers
            .get(id)
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
