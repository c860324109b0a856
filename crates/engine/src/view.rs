// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read models returned by the runtime API

use chrono::{DateTime, Utc};
use rota_core::{
    Album, AlbumName, ApplyTarget, Folder, ScheduleConflict, Target, TriggerStatus, Wallpaper,
    WallpaperId,
};
use serde::{Deserialize, Serialize};

/// Result of one rotation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RotationOutcome {
    Applied {
        target: ApplyTarget,
        wallpaper: WallpaperId,
        image: String,
    },
    /// Nothing to show; the schedule stays armed
    Skipped { target: Target, reason: String },
    Failed {
        target: ApplyTarget,
        wallpaper: WallpaperId,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub target: Target,
    pub album: Option<AlbumName>,
    pub size: usize,
    /// Entries not yet shown this cycle
    pub remaining: usize,
    pub last_drawn: Option<WallpaperId>,
    pub next: Option<WallpaperId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeStatus {
    pub enabled: bool,
    pub synchronized: bool,
    pub triggers: Vec<TriggerStatus>,
    pub queues: Vec<QueueStatus>,
    pub conflicts: Vec<ScheduleConflict>,
    pub wal_entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub name: AlbumName,
    pub created_at: DateTime<Utc>,
    pub images: usize,
    pub folders: usize,
    pub assigned_to: Vec<Target>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumDetail {
    pub album: Album,
    pub folders: Vec<Folder>,
    /// Direct and folder images ordered by ordering key
    pub wallpapers: Vec<Wallpaper>,
    pub assigned_to: Vec<Target>,
}
