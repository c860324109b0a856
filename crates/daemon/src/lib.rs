// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rota-daemon: IPC protocol and directory layout shared with the CLI

pub mod paths;
pub mod protocol;

pub use paths::{DaemonPaths, PathError};
pub use protocol::{Query, Request, Response, PROTOCOL_VERSION};

// Read models carried in responses
pub use rota_engine::{AlbumDetail, AlbumSummary, Drawn, QueueStatus, RotationOutcome, RuntimeStatus};
