// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op setter for when no setter command is configured

use super::{ApplyError, WallpaperSetter};
use async_trait::async_trait;
use rota_core::{ApplyTarget, ScalingPolicy};

/// Setter that accepts every image and paints nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpSetter;

impl NoOpSetter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WallpaperSetter for NoOpSetter {
    async fn apply(
        &self,
        _image: &str,
        _target: ApplyTarget,
        _scaling: ScalingPolicy,
    ) -> Result<(), ApplyError> {
        Ok(())
    }
}
