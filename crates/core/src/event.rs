// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events emitted by the rotation engine

use crate::catalog::{AlbumName, WallpaperId};
use crate::scheduling::TriggerSlot;
use crate::settings::ConflictReason;
use crate::target::{ApplyTarget, Target};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Something that happened, for logs, subscribers and the event loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Timer fired
    Timer { id: String },

    TriggerArmed {
        slot: TriggerSlot,
        #[serde(with = "humantime_serde")]
        interval: Duration,
    },
    TriggerDisarmed { slot: TriggerSlot },
    TriggerFired { slot: TriggerSlot },
    TriggerCompleted { slot: TriggerSlot, run_count: u64 },
    TriggerFailed { slot: TriggerSlot, error: String },

    QueueRebuilt {
        target: Target,
        album: AlbumName,
        size: usize,
    },
    /// A target's album was deleted out from under it
    QueueInvalidated { target: Target, album: AlbumName },

    WallpaperApplied {
        target: ApplyTarget,
        wallpaper: WallpaperId,
        image: String,
    },
    ApplyFailed {
        target: ApplyTarget,
        wallpaper: WallpaperId,
        error: String,
    },
    /// A firing found nothing to show
    RotationSkipped { target: Target, reason: String },

    ScheduleConflict {
        target: Target,
        reason: ConflictReason,
    },

    AlbumDeleted { album: AlbumName, wallpapers: usize },
    SettingsChanged,
}

impl Event {
    /// Event name for logs, formatted "category:action"
    pub fn name(&self) -> &'static str {
        match self {
            Event::Timer { .. } => "timer:fired",

            Event::TriggerArmed { .. } => "trigger:armed",
            Event::TriggerDisarmed { .. } => "trigger:disarmed",
            Event::TriggerFired { .. } => "trigger:fired",
            Event::TriggerCompleted { .. } => "trigger:completed",
            Event::TriggerFailed { .. } => "trigger:failed",

            Event::QueueRebuilt { .. } => "queue:rebuilt",
            Event::QueueInvalidated { .. } => "queue:invalidated",

            Event::WallpaperApplied { .. } => "rotation:applied",
            Event::ApplyFailed { .. } => "rotation:apply_failed",
            Event::RotationSkipped { .. } => "rotation:skipped",

            Event::ScheduleConflict { .. } => "schedule:conflict",
            Event::AlbumDeleted { .. } => "album:deleted",
            Event::SettingsChanged => "settings:changed",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
