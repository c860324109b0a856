// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable state: the WAL and the state materialized from it
//!
//! Lock order is state, then WAL. Every write goes through [`Journal::transact`]
//! so validation, logging and applying an operation happen under one state
//! lock and nothing observes a half-applied change.

use rota_core::Operation;
use rota_storage::{MaterializedState, Wal, WalError};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Journal {
    wal: Arc<Mutex<Wal>>,
    state: Arc<Mutex<MaterializedState>>,
}

impl Journal {
    pub fn new(wal: Arc<Mutex<Wal>>, state: Arc<Mutex<MaterializedState>>) -> Self {
        Self { wal, state }
    }

    /// Read from the current state
    pub fn read<T>(&self, f: impl FnOnce(&MaterializedState) -> T) -> T {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }

    /// Log and apply a single operation
    #[cfg(test)]
    pub(crate) fn commit(&self, op: Operation) -> Result<(), WalError> {
        self.transact(|_| Ok::<_, WalError>((Some(op), ())))
    }

    /// Decide on an operation from the current state, then log and apply it
    ///
    /// `f` validates against the state it is given; returning `None` as the
    /// operation leaves the log untouched.
    pub fn transact<T, E>(
        &self,
        f: impl FnOnce(&MaterializedState) -> Result<(Option<Operation>, T), E>,
    ) -> Result<T, E>
    where
        E: From<WalError>,
    {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let (op, value) = f(&state)?;
        if let Some(op) = op {
            let seq = {
                let mut wal = self.wal.lock().unwrap_or_else(|e| e.into_inner());
                wal.append(&op)?
            };
            tracing::debug!(seq, op = op.name(), "committed");
            state.apply(&op);
        }
        Ok(value)
    }

    /// Number of entries in the log
    pub fn wal_len(&self) -> usize {
        self.wal.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Rewrite the log as a single snapshot of the current state
    ///
    /// Returns the number of entries the log held before.
    pub fn compact(&self) -> Result<usize, WalError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let mut wal = self.wal.lock().unwrap_or_else(|e| e.into_inner());
        let before = wal.len();
        wal.rewrite(&[state.snapshot()])?;
        tracing::info!(before, "wal compacted");
        Ok(before)
    }

    pub fn state(&self) -> Arc<Mutex<MaterializedState>> {
        Arc::clone(&self.state)
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
