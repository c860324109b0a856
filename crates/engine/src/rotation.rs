// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotation service: queue rebuilds, folder refreshes and draws
//!
//! Every read-modify-persist of a target's queue runs under that target's
//! async lock, so draws for one target are serialized while home and lock
//! proceed independently.

use crate::error::RuntimeError;
use crate::journal::Journal;
use rota_adapters::MediaSource;
use rota_core::{
    AlbumName, CatalogError, Clock, FolderId, FolderSync, IdGen, Operation, RotationError,
    RotationQueue, SelectionOrder, Target, WallpaperId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// When folder snapshots are re-read from the media source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderRefreshPolicy {
    /// On every queue rebuild for the folder's album, and on request
    #[default]
    OnRebuild,
    /// Only when a folder is added or refreshed on request
    Manual,
}

/// Selection behavior shared by every target
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationConfig {
    pub order: SelectionOrder,
    pub folder_refresh: FolderRefreshPolicy,
}

/// A committed draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawn {
    pub target: Target,
    pub wallpaper: WallpaperId,
    pub image: String,
}

/// Outcome of a queue rebuild
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rebuilt {
    Pool { album: AlbumName, size: usize },
    /// No album is assigned; the queue was emptied
    Cleared,
}

#[derive(Default)]
struct TargetLocks {
    home: Mutex<()>,
    lock: Mutex<()>,
}

impl TargetLocks {
    fn get(&self, target: Target) -> &Mutex<()> {
        match target {
            Target::Home => &self.home,
            Target::Lock => &self.lock,
        }
    }
}

#[derive(Clone)]
pub struct RotationService<M, I, C> {
    journal: Journal,
    media: M,
    id_gen: I,
    clock: C,
    config: RotationConfig,
    locks: Arc<TargetLocks>,
}

impl<M, I, C> RotationService<M, I, C>
where
    M: MediaSource,
    I: IdGen,
    C: Clock,
{
    pub fn new(journal: Journal, media: M, id_gen: I, clock: C, config: RotationConfig) -> Self {
        Self {
            journal,
            media,
            id_gen,
            clock,
            config,
            locks: Arc::new(TargetLocks::default()),
        }
    }

    pub fn config(&self) -> RotationConfig {
        self.config
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Draw the next wallpaper for `target` and persist the consumption
    ///
    /// The queue is rebuilt first when it no longer matches the assigned
    /// album. Drawn images that fail the accessibility probe are pruned and
    /// the draw is retried.
    pub async fn draw(&self, target: Target) -> Result<Drawn, RuntimeError> {
        let _guard = self.locks.get(target).lock().await;

        if self.needs_rebuild(target) {
            self.rebuild_held(target).await?;
        }

        loop {
            let candidate = self.journal.read(|state| {
                let queue = state.queue(target)?;
                let wallpaper = queue.peek()?.clone();
                let image = state
                    .catalog
                    .wallpaper(&wallpaper)
                    .map(|w| w.source.clone());
                Some((wallpaper, image))
            });
            let Some((wallpaper, image)) = candidate else {
                return Err(RotationError::EmptyPool { target }.into());
            };

            let resolvable = match &image {
                Some(image) => self.media.is_accessible(image).await,
                None => false,
            };
            if !resolvable {
                let error = RotationError::ImageUnresolvable {
                    wallpaper: wallpaper.clone(),
                    image: image.unwrap_or_default(),
                };
                tracing::warn!(%target, %error, "pruning from queue");
                self.replace_queue(target, |queue| {
                    queue.prune(std::slice::from_ref(&wallpaper));
                })?;
                continue;
            }

            let now = self.clock.utc_now();
            let order = self.config.order;
            let drawn = self.journal.transact(|state| {
                let mut queue = state
                    .queue(target)
                    .cloned()
                    .unwrap_or_else(|| RotationQueue::new(target));
                if queue.peek() != Some(&wallpaper) {
                    // Catalog changed under us; look again
                    return Ok::<_, RuntimeError>((None, None));
                }
                let id = queue.next(now, order)?;
                Ok((Some(Operation::QueueReplace { queue }), Some(id)))
            })?;

            if let (Some(wallpaper), Some(image)) = (drawn, image) {
                tracing::info!(%target, %wallpaper, image = %image, "drawn");
                return Ok(Drawn {
                    target,
                    wallpaper,
                    image,
                });
            }
        }
    }

    /// What the next draw for `target` would return, without drawing
    pub fn preview(&self, target: Target) -> Option<Drawn> {
        self.journal.read(|state| {
            let wallpaper = state.queue(target)?.peek()?.clone();
            let image = state.catalog.wallpaper(&wallpaper)?.source.clone();
            Some(Drawn {
                target,
                wallpaper,
                image,
            })
        })
    }

    /// Regenerate `target`'s queue from its assigned album
    pub async fn rebuild(&self, target: Target) -> Result<Rebuilt, RuntimeError> {
        let _guard = self.locks.get(target).lock().await;
        self.rebuild_held(target).await
    }

    /// Re-read a folder from the media source and replace its snapshot
    pub async fn refresh_folder(&self, id: &FolderId) -> Result<FolderSync, RuntimeError> {
        let source = self
            .journal
            .read(|state| state.catalog.folder(id).map(|f| f.source.clone()))
            .ok_or_else(|| CatalogError::FolderNotFound(id.clone()))?;
        let listed = self.media.list_images(&source).await?;
        let at = self.clock.utc_now();

        let sync = self.journal.transact(|state| {
            let images = state.catalog.plan_folder_sync(id, listed, &self.id_gen)?;
            let mut catalog = state.catalog.clone();
            let sync = catalog.sync_folder(id, &images, at)?;
            let op = Operation::FolderSynced {
                id: id.clone(),
                images,
                at,
            };
            Ok::<_, RuntimeError>((Some(op), sync))
        })?;

        tracing::info!(
            folder = %id,
            added = sync.added.len(),
            removed = sync.removed.len(),
            "folder refreshed"
        );
        Ok(sync)
    }

    fn needs_rebuild(&self, target: Target) -> bool {
        self.journal.read(|state| {
            let assigned = state.settings.target(target).album.as_ref();
            match state.queue(target) {
                Some(queue) => {
                    queue.album.as_ref() != assigned || (assigned.is_some() && queue.is_empty())
                }
                None => true,
            }
        })
    }

    async fn rebuild_held(&self, target: Target) -> Result<Rebuilt, RuntimeError> {
        let assigned = self
            .journal
            .read(|state| state.settings.target(target).album.clone());
        let Some(album) = assigned else {
            self.replace_queue(target, |queue| queue.invalidate())?;
            return Ok(Rebuilt::Cleared);
        };

        if self.config.folder_refresh == FolderRefreshPolicy::OnRebuild {
            let folders: Vec<FolderId> = self.journal.read(|state| {
                state
                    .catalog
                    .folders_in(&album)
                    .into_iter()
                    .map(|f| f.id.clone())
                    .collect()
            });
            for folder in folders {
                // A folder that cannot be read keeps its last snapshot
                if let Err(e) = self.refresh_folder(&folder).await {
                    tracing::warn!(%folder, error = %e, "folder refresh failed");
                }
            }
        }

        let sources: Vec<(WallpaperId, String)> = self.journal.read(|state| {
            state
                .catalog
                .wallpapers_in(&album)
                .into_iter()
                .map(|w| (w.id.clone(), w.source.clone()))
                .collect()
        });
        let mut unreachable = HashSet::new();
        for (id, source) in sources {
            if !self.media.is_accessible(&source).await {
                tracing::warn!(wallpaper = %id, image = %source, "image not accessible");
                unreachable.insert(id);
            }
        }

        let order = self.config.order;
        let size = self.journal.transact(|state| {
            let candidates = state
                .catalog
                .resolve_candidates(&album, |w| !unreachable.contains(&w.id))?;
            let mut queue = state
                .queue(target)
                .cloned()
                .unwrap_or_else(|| RotationQueue::new(target));
            queue.rebuild(&album, &candidates, order);
            let size = queue.len();
            Ok::<_, RuntimeError>((Some(Operation::QueueReplace { queue }), size))
        })?;

        tracing::info!(%target, %album, size, "queue rebuilt");
        Ok(Rebuilt::Pool { album, size })
    }

    fn replace_queue(
        &self,
        target: Target,
        edit: impl FnOnce(&mut RotationQueue),
    ) -> Result<(), RuntimeError> {
        self.journal.transact(|state| {
            let current = state
                .queue(target)
                .cloned()
                .unwrap_or_else(|| RotationQueue::new(target));
            let mut queue = current.clone();
            edit(&mut queue);
            if queue == current {
                return Ok::<_, RuntimeError>((None, ()));
            }
            Ok((Some(Operation::QueueReplace { queue }), ()))
        })
    }
}

#[cfg(test)]
#[path = "rotation_tests.rs"]
mod tests;
