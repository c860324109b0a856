// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for the rotation engine
//!
//! Owns the schedule coordinator and wires the store, the rotation service
//! and the executor together. Every settings or catalog mutation ends with a
//! reconcile pass, so the armed triggers always reflect the stored settings.

use crate::error::RuntimeError;
use crate::journal::Journal;
use crate::rotation::{Drawn, Rebuilt, RotationConfig, RotationService};
use crate::store::ScheduleStore;
use crate::view::{AlbumDetail, AlbumSummary, QueueStatus, RotationOutcome, RuntimeStatus};
use crate::{Executor, Scheduler};
use rota_adapters::{MediaSource, NotifyAdapter, WallpaperSetter};
use rota_core::{
    reconcile, Album, AlbumName, CascadeReport, CatalogError, Clock, Effect, Event, Folder,
    FolderId, FolderSync, IdGen, Operation, Reconciliation, RotationError, ScalingPolicy,
    ScheduleConflict, ScheduleCoordinator, ScheduleSettings, Target, TriggerSlot, Wallpaper,
    WallpaperId,
};
use rota_storage::{MaterializedState, Wal};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::Instrument;

/// Runtime adapter dependencies
pub struct RuntimeDeps<S, M, N> {
    pub setter: S,
    pub media: M,
    pub notify: N,
    pub wal: Arc<Mutex<Wal>>,
    pub state: Arc<Mutex<MaterializedState>>,
}

/// Runtime that coordinates the system
#[derive(Clone)]
pub struct Runtime<S, M, N, C: Clock, I: IdGen> {
    executor: Executor<S, N, C>,
    journal: Journal,
    store: ScheduleStore,
    rotation: RotationService<M, I, C>,
    coordinator: Arc<Mutex<ScheduleCoordinator>>,
    conflicts: Arc<Mutex<Vec<ScheduleConflict>>>,
    clock: C,
    id_gen: I,
}

impl<S, M, N, C, I> Runtime<S, M, N, C, I>
where
    S: WallpaperSetter,
    M: MediaSource,
    N: NotifyAdapter,
    C: Clock + 'static,
    I: IdGen + 'static,
{
    /// Create a new runtime
    pub fn new(deps: RuntimeDeps<S, M, N>, clock: C, id_gen: I, config: RotationConfig) -> Self {
        let journal = Journal::new(deps.wal, deps.state);
        let executor = Executor::new(
            deps.setter,
            deps.notify,
            Arc::new(Mutex::new(Scheduler::new())),
            clock.clone(),
        );
        let rotation = RotationService::new(
            journal.clone(),
            deps.media,
            id_gen.clone(),
            clock.clone(),
            config,
        );
        Self {
            executor,
            store: ScheduleStore::new(journal.clone()),
            journal,
            rotation,
            coordinator: Arc::new(Mutex::new(ScheduleCoordinator::new())),
            conflicts: Arc::new(Mutex::new(Vec::new())),
            clock,
            id_gen,
        }
    }

    /// Handle an incoming event
    ///
    /// Returns any events that were produced by effects.
    pub async fn handle_event(&self, event: Event) -> Result<Vec<Event>, RuntimeError> {
        match event {
            Event::Timer { id } => self.handle_timer(&id).await,
            // Other events are informational
            _ => Ok(Vec::new()),
        }
    }

    /// Remove and return every timer that is due
    pub fn due_timers(&self) -> Vec<Event> {
        let now = self.clock.now();
        self.executor
            .scheduler()
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fired_timers(now)
    }

    /// How long the event loop may sleep before a timer comes due
    ///
    /// Never longer than `cap`; zero once a timer is overdue.
    pub fn next_wakeup(&self, cap: Duration) -> Duration {
        let now = self.clock.now();
        self.executor
            .scheduler()
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .next_deadline()
            .map_or(cap, |deadline| deadline.saturating_duration_since(now).min(cap))
    }

    async fn handle_timer(&self, id: &str) -> Result<Vec<Event>, RuntimeError> {
        let fired = {
            let mut coordinator = self.coordinator.lock().unwrap_or_else(|e| e.into_inner());
            coordinator.process_timer(id, &self.clock)
        };
        let Some((slot, effects)) = fired else {
            tracing::debug!(timer_id = id, "stale timer ignored");
            return Ok(Vec::new());
        };

        let mut events = self.executor.execute_all(effects).await;
        let result = self
            .rotate(slot)
            .instrument(tracing::info_span!("rotate", %slot))
            .await;

        let effects = {
            let mut coordinator = self.coordinator.lock().unwrap_or_else(|e| e.into_inner());
            match &result {
                Ok(RotationOutcome::Failed { error, .. }) => {
                    coordinator.fail(slot, error.clone(), &self.clock)
                }
                Ok(_) => coordinator.complete(slot, &self.clock),
                Err(e) => coordinator.fail(slot, e.to_string(), &self.clock),
            }
        };
        events.extend(self.executor.execute_all(effects).await);
        result?;
        Ok(events)
    }

    /// Draw for a slot and hand the image to the setter
    async fn rotate(&self, slot: TriggerSlot) -> Result<RotationOutcome, RuntimeError> {
        let target = slot.draw_target();
        let apply_target = slot.apply_target();

        let drawn = match self.rotation.draw(target).await {
            Ok(drawn) => drawn,
            Err(RuntimeError::Rotation(error @ RotationError::EmptyPool { .. })) => {
                let reason = error.to_string();
                self.executor
                    .execute_all(vec![
                        Effect::emit(Event::RotationSkipped {
                            target,
                            reason: reason.clone(),
                        }),
                        Effect::Notify {
                            title: "Wallpaper rotation skipped".to_string(),
                            message: reason.clone(),
                        },
                    ])
                    .await;
                return Ok(RotationOutcome::Skipped { target, reason });
            }
            Err(e) => return Err(e),
        };

        let scaling = self.store.get().target(target).scaling;
        let applied = self
            .executor
            .execute(Effect::Apply {
                target: apply_target,
                wallpaper: drawn.wallpaper.clone(),
                image: drawn.image.clone(),
                scaling,
            })
            .await;

        match applied {
            Some(Event::ApplyFailed { error, .. }) => {
                let failure = RotationError::ApplyFailure {
                    target: apply_target,
                    message: error.clone(),
                };
                self.executor
                    .execute_all(vec![
                        Effect::emit(Event::ApplyFailed {
                            target: apply_target,
                            wallpaper: drawn.wallpaper.clone(),
                            error: error.clone(),
                        }),
                        Effect::Notify {
                            title: "Wallpaper not applied".to_string(),
                            message: failure.to_string(),
                        },
                    ])
                    .await;
                Ok(RotationOutcome::Failed {
                    target: apply_target,
                    wallpaper: drawn.wallpaper,
                    error,
                })
            }
            _ => {
                self.executor
                    .execute(Effect::emit(Event::WallpaperApplied {
                        target: apply_target,
                        wallpaper: drawn.wallpaper.clone(),
                        image: drawn.image.clone(),
                    }))
                    .await;
                Ok(RotationOutcome::Applied {
                    target: apply_target,
                    wallpaper: drawn.wallpaper,
                    image: drawn.image,
                })
            }
        }
    }

    /// The slot a manual rotation of `target` goes through
    fn slot_for(&self, target: Target) -> TriggerSlot {
        if self.store.get().is_synchronized() {
            TriggerSlot::Synchronized
        } else {
            TriggerSlot::from(target)
        }
    }

    // ==================== Scheduling ====================

    /// Converge triggers onto the stored settings
    pub async fn reconcile(&self) -> Result<Reconciliation, RuntimeError> {
        let settings = self.store.get();
        let reconciliation = {
            let mut coordinator = self.coordinator.lock().unwrap_or_else(|e| e.into_inner());
            reconcile(&settings, &mut coordinator, &self.clock)
        };

        let fresh: Vec<ScheduleConflict> = {
            let mut known = self.conflicts.lock().unwrap_or_else(|e| e.into_inner());
            let fresh = reconciliation
                .conflicts
                .iter()
                .filter(|c| !known.contains(c))
                .copied()
                .collect();
            *known = reconciliation.conflicts.clone();
            fresh
        };

        let mut effects = reconciliation.effects.clone();
        effects.extend(fresh.into_iter().map(|c| {
            Effect::emit(Event::ScheduleConflict {
                target: c.target,
                reason: c.reason,
            })
        }));
        self.executor.execute_all(effects).await;

        if reconciliation.changed() {
            tracing::info!(
                synchronized = reconciliation.synchronized,
                conflicts = reconciliation.conflicts.len(),
                "schedule reconciled"
            );
        }
        Ok(reconciliation)
    }

    pub fn get_settings(&self) -> ScheduleSettings {
        self.store.get()
    }

    pub fn subscribe_settings(&self) -> watch::Receiver<ScheduleSettings> {
        self.store.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.executor.subscribe()
    }

    /// Change one target's schedule; `None` leaves a field as it is
    pub async fn update_schedule(
        &self,
        target: Target,
        enabled: Option<bool>,
        interval_minutes: Option<u32>,
    ) -> Result<ScheduleSettings, RuntimeError> {
        self.change_settings(|s| {
            let schedule = s.target_mut(target);
            if let Some(enabled) = enabled {
                schedule.enabled = enabled;
            }
            if let Some(minutes) = interval_minutes {
                schedule.interval_minutes = minutes;
            }
        })
        .await
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<ScheduleSettings, RuntimeError> {
        self.change_settings(|s| s.enabled = enabled).await
    }

    pub async fn set_synchronized(
        &self,
        synchronized: bool,
    ) -> Result<ScheduleSettings, RuntimeError> {
        self.change_settings(|s| s.synchronized = synchronized)
            .await
    }

    pub async fn set_separate_schedules(
        &self,
        separate: bool,
    ) -> Result<ScheduleSettings, RuntimeError> {
        self.change_settings(|s| s.separate_schedules = separate)
            .await
    }

    pub async fn set_scaling(
        &self,
        target: Target,
        scaling: ScalingPolicy,
    ) -> Result<ScheduleSettings, RuntimeError> {
        self.change_settings(|s| s.target_mut(target).scaling = scaling)
            .await
    }

    /// Assign (or clear) a target's album and rebuild its queue
    pub async fn set_assigned_album(
        &self,
        target: Target,
        album: Option<AlbumName>,
    ) -> Result<ScheduleSettings, RuntimeError> {
        if let Some(name) = &album {
            if !self.journal.read(|s| s.catalog.contains_album(name)) {
                return Err(CatalogError::AlbumNotFound(name.clone()).into());
            }
        }
        let settings = self
            .change_settings(|s| s.target_mut(target).album = album.clone())
            .await?;
        self.rebuild(target).await?;
        Ok(settings)
    }

    async fn change_settings(
        &self,
        mutate: impl FnOnce(&mut ScheduleSettings),
    ) -> Result<ScheduleSettings, RuntimeError> {
        let before = self.store.get();
        let settings = self.store.update(mutate)?;
        if settings != before {
            self.executor
                .execute(Effect::emit(Event::SettingsChanged))
                .await;
        }
        self.reconcile().await?;
        Ok(settings)
    }

    // ==================== Rotation ====================

    /// Rotate `target` immediately, outside its schedule
    ///
    /// In synchronized mode both targets receive the same image.
    pub async fn rotate_now(&self, target: Target) -> Result<RotationOutcome, RuntimeError> {
        let slot = self.slot_for(target);
        self.rotate(slot)
            .instrument(tracing::info_span!("rotate_now", %slot))
            .await
    }

    /// What the next rotation of `target` would show
    pub fn preview_next(&self, target: Target) -> Option<Drawn> {
        self.rotation.preview(self.slot_for(target).draw_target())
    }

    pub fn status(&self) -> RuntimeStatus {
        let settings = self.store.get();
        let triggers = self
            .coordinator
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .status(&self.clock);
        let queues: Vec<QueueStatus> = self.journal.read(|state| {
            state
                .queues
                .values()
                .map(|q| QueueStatus {
                    target: q.target,
                    album: q.album.clone(),
                    size: q.len(),
                    remaining: q.remaining(),
                    last_drawn: q.last_drawn().cloned(),
                    next: q.peek().cloned(),
                })
                .collect()
        });
        RuntimeStatus {
            enabled: settings.enabled,
            synchronized: settings.is_synchronized(),
            triggers,
            queues,
            conflicts: self
                .conflicts
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone(),
            wal_entries: self.journal.wal_len(),
        }
    }

    async fn rebuild(&self, target: Target) -> Result<(), RuntimeError> {
        if let Rebuilt::Pool { album, size } = self.rotation.rebuild(target).await? {
            self.executor
                .execute(Effect::emit(Event::QueueRebuilt {
                    target,
                    album,
                    size,
                }))
                .await;
        }
        Ok(())
    }

    /// Rebuild the queue of every target showing `album`
    async fn rebuild_album(&self, album: &AlbumName) -> Result<(), RuntimeError> {
        let targets = self.store.get().targets_using(album);
        for target in targets {
            self.rebuild(target).await?;
        }
        Ok(())
    }

    // ==================== Catalog ====================

    pub async fn create_album(&self, name: &str) -> Result<Album, RuntimeError> {
        let name = AlbumName::new(name);
        let created_at = self.clock.utc_now();
        let album = self.journal.transact(|state| {
            let mut catalog = state.catalog.clone();
            let album = catalog.create_album(name.clone(), created_at)?.clone();
            let op = Operation::AlbumCreate { name, created_at };
            Ok::<_, RuntimeError>((Some(op), album))
        })?;
        tracing::info!(album = %album.name, "album created");
        Ok(album)
    }

    /// Delete an album with its folders and images
    ///
    /// Targets showing it lose their assignment and their queue, which the
    /// next reconcile reports as a conflict when the target is enabled.
    pub async fn delete_album(&self, name: &AlbumName) -> Result<CascadeReport, RuntimeError> {
        let affected = self.journal.read(|s| s.settings.targets_using(name));
        let report = self.journal.transact(|state| {
            let mut catalog = state.catalog.clone();
            let report = catalog.delete_album(name)?;
            let op = Operation::AlbumDelete { name: name.clone() };
            Ok::<_, RuntimeError>((Some(op), report))
        })?;
        self.store.refresh();

        let mut effects = vec![Effect::emit(Event::AlbumDeleted {
            album: name.clone(),
            wallpapers: report.wallpapers.len(),
        })];
        effects.extend(affected.into_iter().map(|target| {
            Effect::emit(Event::QueueInvalidated {
                target,
                album: name.clone(),
            })
        }));
        self.executor.execute_all(effects).await;
        self.reconcile().await?;
        Ok(report)
    }

    /// Add a single image to an album
    pub async fn add_image(&self, album: &AlbumName, image: &str) -> Result<Wallpaper, RuntimeError> {
        if !self.rotation.media().is_accessible(image).await {
            return Err(RuntimeError::InvalidRequest(format!(
                "image is not accessible: {}",
                image
            )));
        }
        let id = WallpaperId::new(self.id_gen.next("wp"));
        let wallpaper = self.journal.transact(|state| {
            let mut catalog = state.catalog.clone();
            let wallpaper = catalog.add_wallpaper(id.clone(), album, image)?.clone();
            let op = Operation::WallpaperAdd {
                id,
                album: album.clone(),
                source: image.to_string(),
            };
            Ok::<_, RuntimeError>((Some(op), wallpaper))
        })?;
        self.rebuild_album(album).await?;
        Ok(wallpaper)
    }

    pub async fn remove_image(&self, id: &WallpaperId) -> Result<Wallpaper, RuntimeError> {
        let wallpaper = self.journal.transact(|state| {
            let mut catalog = state.catalog.clone();
            let wallpaper = catalog.remove_wallpaper(id)?;
            let op = Operation::WallpaperRemove { id: id.clone() };
            Ok::<_, RuntimeError>((Some(op), wallpaper))
        })?;
        self.rebuild_album(&wallpaper.album).await?;
        Ok(wallpaper)
    }

    /// Add a folder to an album and take its first snapshot
    pub async fn add_folder(
        &self,
        album: &AlbumName,
        source: &str,
        cover: Option<String>,
    ) -> Result<(Folder, FolderSync), RuntimeError> {
        // Fails early for a missing or unreadable directory
        self.rotation.media().list_images(source).await?;

        let id = FolderId::new(self.id_gen.next("folder"));
        let folder = self.journal.transact(|state| {
            let mut catalog = state.catalog.clone();
            let folder = catalog
                .add_folder(id.clone(), album, source, cover.clone())?
                .clone();
            let op = Operation::FolderAdd {
                id: id.clone(),
                album: album.clone(),
                source: source.to_string(),
                cover,
            };
            Ok::<_, RuntimeError>((Some(op), folder))
        })?;
        let sync = self.rotation.refresh_folder(&id).await?;
        self.rebuild_album(album).await?;
        Ok((folder, sync))
    }

    pub async fn remove_folder(&self, id: &FolderId) -> Result<CascadeReport, RuntimeError> {
        let (album, report) = self.journal.transact(|state| {
            let mut catalog = state.catalog.clone();
            let album = catalog
                .folder(id)
                .map(|f| f.album.clone())
                .ok_or_else(|| CatalogError::FolderNotFound(id.clone()))?;
            let report = catalog.remove_folder(id)?;
            let op = Operation::FolderRemove { id: id.clone() };
            Ok::<_, RuntimeError>((Some(op), (album, report)))
        })?;
        self.rebuild_album(&album).await?;
        Ok(report)
    }

    /// Re-read a folder and rebuild the queues showing its album
    pub async fn refresh_folder(&self, id: &FolderId) -> Result<FolderSync, RuntimeError> {
        let sync = self.rotation.refresh_folder(id).await?;
        let album = self
            .journal
            .read(|s| s.catalog.folder(id).map(|f| f.album.clone()));
        if let Some(album) = album {
            self.rebuild_album(&album).await?;
        }
        Ok(sync)
    }

    pub fn list_albums(&self) -> Vec<AlbumSummary> {
        self.journal.read(|state| {
            state
                .catalog
                .albums()
                .map(|album| AlbumSummary {
                    name: album.name.clone(),
                    created_at: album.created_at,
                    images: state.catalog.wallpapers_in(&album.name).len(),
                    folders: state.catalog.folders_in(&album.name).len(),
                    assigned_to: state.settings.targets_using(&album.name),
                })
                .collect()
        })
    }

    pub fn album_detail(&self, name: &AlbumName) -> Result<AlbumDetail, RuntimeError> {
        self.journal.read(|state| -> Result<AlbumDetail, RuntimeError> {
            let album = state
                .catalog
                .album(name)
                .cloned()
                .ok_or_else(|| CatalogError::AlbumNotFound(name.clone()))?;
            Ok(AlbumDetail {
                album,
                folders: state
                    .catalog
                    .folders_in(name)
                    .into_iter()
                    .cloned()
                    .collect(),
                wallpapers: state
                    .catalog
                    .wallpapers_in(name)
                    .into_iter()
                    .cloned()
                    .collect(),
                assigned_to: state.settings.targets_using(name),
            })
        })
    }

    // ==================== Maintenance ====================

    /// Rewrite the WAL as a snapshot once it holds more than `threshold` entries
    pub fn compact_if_needed(&self, threshold: usize) -> Result<bool, RuntimeError> {
        if self.journal.wal_len() <= threshold {
            return Ok(false);
        }
        self.journal.compact()?;
        Ok(true)
    }

    /// Get a reference to the state
    pub fn state(&self) -> Arc<Mutex<MaterializedState>> {
        self.journal.state()
    }

    /// Get a reference to the scheduler
    pub fn scheduler(&self) -> Arc<Mutex<Scheduler>> {
        self.executor.scheduler()
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
