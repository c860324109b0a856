// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the write-ahead log
//!
//! Each operation is one transaction: applying it updates the catalog, the
//! settings and every affected rotation queue together.

use crate::catalog::{AlbumName, Catalog, FolderId, FolderImage, WallpaperId};
use crate::rotation::RotationQueue;
use crate::settings::ScheduleSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operations that can be persisted to the WAL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AlbumCreate {
        name: AlbumName,
        created_at: DateTime<Utc>,
    },

    /// Delete an album, cascading to folders, wallpapers, queues and assignments
    AlbumDelete { name: AlbumName },

    WallpaperAdd {
        id: WallpaperId,
        album: AlbumName,
        source: String,
    },

    WallpaperRemove { id: WallpaperId },

    FolderAdd {
        id: FolderId,
        album: AlbumName,
        source: String,
        #[serde(default)]
        cover: Option<String>,
    },

    FolderRemove { id: FolderId },

    /// Replace a folder's snapshot with a fresh listing
    FolderSynced {
        id: FolderId,
        images: Vec<FolderImage>,
        at: DateTime<Utc>,
    },

    SettingsReplace { settings: ScheduleSettings },

    /// Full snapshot of one target's queue after a draw or rebuild
    QueueReplace { queue: RotationQueue },

    /// Entire state, written as the first entry of a compacted log
    Snapshot {
        catalog: Catalog,
        settings: ScheduleSettings,
        queues: Vec<RotationQueue>,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::AlbumCreate { .. } => "album_create",
            Operation::AlbumDelete { .. } => "album_delete",
            Operation::WallpaperAdd { .. } => "wallpaper_add",
            Operation::WallpaperRemove { .. } => "wallpaper_remove",
            Operation::FolderAdd { .. } => "folder_add",
            Operation::FolderRemove { .. } => "folder_remove",
            Operation::FolderSynced { .. } => "folder_synced",
            Operation::SettingsReplace { .. } => "settings_replace",
            Operation::QueueReplace { .. } => "queue_replace",
            Operation::Snapshot { .. } => "snapshot",
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
