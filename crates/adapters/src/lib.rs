// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: setting wallpapers, reading media, notifying

pub mod media;
pub mod notify;
pub mod setter;
pub mod traced;

pub use media::{FsMediaSource, MediaError, MediaSource, IMAGE_EXTENSIONS};
pub use notify::{DesktopNotifier, NoOpNotifyAdapter, NotifyAdapter, NotifyError};
pub use setter::{ApplyError, CommandSetter, NoOpSetter, WallpaperSetter, DEFAULT_APPLY_TIMEOUT};
pub use traced::{TracedMediaSource, TracedNotifier, TracedSetter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use media::{FakeMediaSource, MediaCall};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use setter::{ApplyCall, FakeSetter};
