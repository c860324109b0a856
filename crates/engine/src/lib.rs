// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Wallpaper rotation engine: store, rotation service, trigger runner

mod error;
mod executor;
mod journal;
mod rotation;
mod runtime;
mod scheduler;
mod store;
mod view;

pub use error::RuntimeError;
pub use executor::Executor;
pub use journal::Journal;
pub use rotation::{Drawn, FolderRefreshPolicy, Rebuilt, RotationConfig, RotationService};
pub use runtime::{Runtime, RuntimeDeps};
pub use scheduler::Scheduler;
pub use store::ScheduleStore;
pub use view::{AlbumDetail, AlbumSummary, QueueStatus, RotationOutcome, RuntimeStatus};
