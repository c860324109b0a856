// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rota-core: domain model for wallpaper rotation
//!
//! This crate provides:
//! - The media catalog (albums, folders, wallpapers) with explicit cascades
//! - Per-target rotation queues with no-immediate-repeat selection
//! - Schedule settings, trigger state machines and boot reconciliation
//! - Effects, events and WAL operations for the engine

pub mod catalog;
pub mod clock;
pub mod effect;
pub mod error;
pub mod event;
pub mod id;
pub mod operation;
pub mod rotation;
pub mod scheduling;
pub mod settings;
pub mod target;

pub use catalog::{
    Album, AlbumName, CascadeReport, Catalog, CatalogError, Folder, FolderId, FolderImage,
    FolderSync, Wallpaper, WallpaperId,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use effect::{Effect, TracedEffect};
pub use error::RotationError;
pub use event::Event;
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use operation::Operation;
pub use rotation::{QueueEntry, RotationQueue, SelectionOrder};
pub use scheduling::{
    reconcile, Reconciliation, ScheduleCoordinator, Trigger, TriggerEvent, TriggerSlot,
    TriggerState, TriggerStatus,
};
pub use settings::{
    ConflictReason, ScheduleConflict, SchedulePlan, ScheduleSettings, SlotPlan, TargetSchedule,
    DEFAULT_INTERVAL_MINUTES,
};
pub use target::{ApplyTarget, ScalingPolicy, Target};
