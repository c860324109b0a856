// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule store: the durable schedule settings and their change feed

use crate::journal::Journal;
use rota_core::{Operation, ScheduleSettings};
use rota_storage::WalError;
use tokio::sync::watch;

#[derive(Clone)]
pub struct ScheduleStore {
    journal: Journal,
    changes: watch::Sender<ScheduleSettings>,
}

impl ScheduleStore {
    pub fn new(journal: Journal) -> Self {
        let current = journal.read(|s| s.settings.clone());
        let (changes, _) = watch::channel(current);
        Self { journal, changes }
    }

    pub fn get(&self) -> ScheduleSettings {
        self.journal.read(|s| s.settings.clone())
    }

    /// Atomically read, modify and persist the settings
    ///
    /// A mutation that changes nothing is not logged and not broadcast.
    pub fn update(
        &self,
        mutate: impl FnOnce(&mut ScheduleSettings),
    ) -> Result<ScheduleSettings, WalError> {
        let (settings, changed) = self.journal.transact(|state| {
            let mut settings = state.settings.clone();
            mutate(&mut settings);
            if settings == state.settings {
                return Ok::<_, WalError>((None, (settings, false)));
            }
            let op = Operation::SettingsReplace {
                settings: settings.clone(),
            };
            Ok((Some(op), (settings, true)))
        })?;

        if changed {
            tracing::info!(
                enabled = settings.enabled,
                synchronized = settings.synchronized,
                "schedule settings updated"
            );
            self.changes.send_replace(settings.clone());
        }
        Ok(settings)
    }

    /// Receive the settings after every change
    pub fn subscribe(&self) -> watch::Receiver<ScheduleSettings> {
        self.changes.subscribe()
    }

    /// Publish settings changed by a cascading operation (album delete)
    pub fn refresh(&self) {
        let current = self.get();
        self.changes.send_if_modified(|published| {
            if *published == current {
                return false;
            }
            *published = current;
            true
        });
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
