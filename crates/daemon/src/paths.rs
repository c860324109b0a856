// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where the daemon keeps its socket, lock, log, config and WAL

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Could not determine state directory (set ROTA_STATE_DIR or HOME)")]
    NoStateDir,
}

/// File layout of one daemon instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonPaths {
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    pub version_path: PathBuf,
    pub log_path: PathBuf,
    pub config_path: PathBuf,
    pub wal_path: PathBuf,
}

impl DaemonPaths {
    /// Lay out files under `state_dir`, with the socket in `socket_dir`
    pub fn new(state_dir: &Path, socket_dir: &Path) -> Self {
        Self {
            state_dir: state_dir.to_path_buf(),
            socket_path: socket_dir.join("rotad.sock"),
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            config_path: state_dir.join("config.toml"),
            wal_path: state_dir.join("wal").join("rota.wal"),
        }
    }

    /// Resolve directories from the environment
    pub fn from_env() -> Result<Self, PathError> {
        Ok(Self::new(&state_dir()?, &socket_dir()))
    }
}

/// Get the state directory for rota
///
/// `ROTA_STATE_DIR` wins, then `$XDG_STATE_HOME/rota`, then
/// `~/.local/state/rota`.
fn state_dir() -> Result<PathBuf, PathError> {
    if let Ok(dir) = std::env::var("ROTA_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("rota"));
    }

    let home = std::env::var("HOME").map_err(|_| PathError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/rota"))
}

/// Get the socket directory for rota
///
/// Uses /tmp/rota by default to keep paths short (macOS SUN_LEN = 104).
/// Can be overridden with ROTA_SOCKET_DIR for testing.
fn socket_dir() -> PathBuf {
    std::env::var("ROTA_SOCKET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp/rota"))
}
