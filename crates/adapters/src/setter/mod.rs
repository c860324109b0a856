// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wallpaper setter adapters (the apply collaborator)

mod command;
mod noop;

pub use command::{CommandSetter, DEFAULT_APPLY_TIMEOUT};
pub use noop::NoOpSetter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ApplyCall, FakeSetter};

use async_trait::async_trait;
use rota_core::{ApplyTarget, ScalingPolicy};
use thiserror::Error;

/// Errors from apply calls
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("setter template error: {0}")]
    Template(String),
    #[error("failed to run setter: {0}")]
    Spawn(String),
    #[error("setter exited with {code:?}: {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },
    #[error("setter timed out after {0:?}")]
    TimedOut(std::time::Duration),
    #[error("apply rejected: {0}")]
    Rejected(String),
}

/// Paints an image onto one or both wallpaper surfaces
#[async_trait]
pub trait WallpaperSetter: Clone + Send + Sync + 'static {
    async fn apply(
        &self,
        image: &str,
        target: ApplyTarget,
        scaling: ScalingPolicy,
    ) -> Result<(), ApplyError>;
}
