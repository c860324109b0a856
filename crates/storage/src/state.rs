// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use rota_core::{
    AlbumName, CascadeReport, Catalog, Operation, RotationQueue, ScheduleSettings, Target,
    WallpaperId,
};
use std::collections::BTreeMap;

/// Materialized state built from WAL operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedState {
    pub catalog: Catalog,
    pub settings: ScheduleSettings,
    pub queues: BTreeMap<Target, RotationQueue>,
}

impl Default for MaterializedState {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            settings: ScheduleSettings::default(),
            queues: Target::ALL
                .into_iter()
                .map(|t| (t, RotationQueue::new(t)))
                .collect(),
        }
    }
}

impl MaterializedState {
    /// Rebuild state by applying `ops` in order
    pub fn from_operations<'a>(ops: impl IntoIterator<Item = &'a Operation>) -> Self {
        let mut state = Self::default();
        for op in ops {
            state.apply(op);
        }
        state
    }

    pub fn queue(&self, target: Target) -> Option<&RotationQueue> {
        self.queues.get(&target)
    }

    /// Apply an operation to update the state
    ///
    /// Operations are validated before they are logged; a rejected operation
    /// during replay is logged and skipped.
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::AlbumCreate { name, created_at } => {
                if let Err(e) = self.catalog.create_album(name.clone(), *created_at) {
                    tracing::warn!(album = %name, error = %e, "album create skipped");
                }
            }

            Operation::AlbumDelete { name } => match self.catalog.delete_album(name) {
                Ok(report) => self.cascade_album(name, &report),
                Err(e) => tracing::warn!(album = %name, error = %e, "album delete skipped"),
            },

            Operation::WallpaperAdd { id, album, source } => {
                if let Err(e) = self.catalog.add_wallpaper(id.clone(), album, source.clone()) {
                    tracing::warn!(wallpaper = %id, error = %e, "wallpaper add skipped");
                }
            }

            Operation::WallpaperRemove { id } => match self.catalog.remove_wallpaper(id) {
                Ok(_) => self.prune_queues(std::slice::from_ref(id)),
                Err(e) => tracing::warn!(wallpaper = %id, error = %e, "wallpaper remove skipped"),
            },

            Operation::FolderAdd {
                id,
                album,
                source,
                cover,
            } => {
                if let Err(e) =
                    self.catalog
                        .add_folder(id.clone(), album, source.clone(), cover.clone())
                {
                    tracing::warn!(folder = %id, error = %e, "folder add skipped");
                }
            }

            Operation::FolderRemove { id } => match self.catalog.remove_folder(id) {
                Ok(report) => self.prune_queues(&report.wallpapers),
                Err(e) => tracing::warn!(folder = %id, error = %e, "folder remove skipped"),
            },

            Operation::FolderSynced { id, images, at } => {
                match self.catalog.sync_folder(id, images, *at) {
                    Ok(sync) => self.prune_queues(&sync.removed),
                    Err(e) => tracing::warn!(folder = %id, error = %e, "folder sync skipped"),
                }
            }

            Operation::SettingsReplace { settings } => {
                self.settings = settings.clone();
            }

            Operation::QueueReplace { queue } => {
                self.queues.insert(queue.target, queue.clone());
            }

            Operation::Snapshot {
                catalog,
                settings,
                queues,
            } => {
                *self = Self::default();
                self.catalog = catalog.clone();
                self.settings = settings.clone();
                for queue in queues {
                    self.queues.insert(queue.target, queue.clone());
                }
            }
        }
    }

    /// Operations that recreate this state from an empty log
    pub fn snapshot(&self) -> Operation {
        Operation::Snapshot {
            catalog: self.catalog.clone(),
            settings: self.settings.clone(),
            queues: self.queues.values().cloned().collect(),
        }
    }

    /// Drop a deleted album from every queue and assignment
    fn cascade_album(&mut self, album: &AlbumName, report: &CascadeReport) {
        self.prune_queues(&report.wallpapers);
        for target in Target::ALL {
            let assigned = self.settings.target(target).album.as_ref() == Some(album);
            if assigned {
                self.settings.target_mut(target).album = None;
            }
            if let Some(queue) = self.queues.get_mut(&target) {
                if assigned || queue.album.as_ref() == Some(album) {
                    queue.invalidate();
                }
            }
        }
    }

    fn prune_queues(&mut self, removed: &[WallpaperId]) {
        if removed.is_empty() {
            return;
        }
        for queue in self.queues.values_mut() {
            queue.prune(removed);
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
