// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake setter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ApplyError, WallpaperSetter};
use async_trait::async_trait;
use rota_core::{ApplyTarget, ScalingPolicy};
use std::sync::{Arc, Mutex};

/// Recorded apply call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyCall {
    pub image: String,
    pub target: ApplyTarget,
    pub scaling: ScalingPolicy,
}

/// Fake setter that records calls and can be told to fail
#[derive(Clone, Default)]
pub struct FakeSetter {
    calls: Arc<Mutex<Vec<ApplyCall>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl FakeSetter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ApplyCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make every following apply fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    /// Make following applies succeed again
    pub fn succeed(&self) {
        *self.fail_with.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[async_trait]
impl WallpaperSetter for FakeSetter {
    async fn apply(
        &self,
        image: &str,
        target: ApplyTarget,
        scaling: ScalingPolicy,
    ) -> Result<(), ApplyError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ApplyCall {
                image: image.to_string(),
                target,
                scaling,
            });

        let failure = self
            .fail_with
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match failure {
            Some(message) => Err(ApplyError::Rejected(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
