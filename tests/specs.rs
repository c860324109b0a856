//! Black-box behavior tests for the rota CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes against an isolated daemon.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// daemon/
#[path = "specs/daemon/lifecycle.rs"]
mod daemon_lifecycle;
#[path = "specs/daemon/logs.rs"]
mod daemon_logs;

// album/
#[path = "specs/album/manage.rs"]
mod album_manage;
#[path = "specs/album/folders.rs"]
mod album_folders;

// rotation/
#[path = "specs/rotation/apply.rs"]
mod rotation_apply;
#[path = "specs/rotation/schedule.rs"]
mod rotation_schedule;
