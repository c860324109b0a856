// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotation error taxonomy
//!
//! None of these are fatal to the host process: a firing that hits one is
//! skipped or reported and the schedule keeps running.

use crate::catalog::WallpaperId;
use crate::settings::ConflictReason;
use crate::target::{ApplyTarget, Target};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RotationError {
    #[error("nothing to show on {target}: rotation pool is empty")]
    EmptyPool { target: Target },

    #[error("image for {wallpaper} is no longer accessible: {image}")]
    ImageUnresolvable { wallpaper: WallpaperId, image: String },

    #[error("apply to {target} failed: {message}")]
    ApplyFailure { target: ApplyTarget, message: String },

    #[error("schedule conflict on {target}: {reason}")]
    ScheduleConflict {
        target: Target,
        reason: ConflictReason,
    },
}
