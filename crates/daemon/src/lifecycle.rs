// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, recovery.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use fs2::FileExt;
use rota_adapters::{FsMediaSource, TracedMediaSource, TracedNotifier, TracedSetter};
use rota_core::{SystemClock, UuidIdGen};
use rota_daemon::{DaemonPaths, PathError};
use rota_engine::{Runtime, RuntimeDeps, RuntimeError};
use rota_storage::{MaterializedState, Wal};
use thiserror::Error;
use tokio::net::UnixListener;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::adapters::{DaemonNotifier, DaemonSetter};
use crate::config::{ConfigError, DaemonConfig};

/// Daemon runtime with concrete adapter types (wrapped with tracing)
pub type DaemonRuntime = Runtime<
    TracedSetter<DaemonSetter>,
    TracedMediaSource<FsMediaSource>,
    TracedNotifier<DaemonNotifier>,
    SystemClock,
    UuidIdGen,
>;

/// What a connection task needs from the daemon
#[derive(Clone)]
pub struct ConnectionContext {
    pub runtime: DaemonRuntime,
    pub start_time: Instant,
    /// Asks the event loop to shut down
    pub shutdown_tx: mpsc::Sender<()>,
}

/// Daemon state during operation
pub struct DaemonState {
    pub paths: DaemonPaths,
    pub config: DaemonConfig,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Unix socket listener
    pub listener: UnixListener,
    pub runtime: DaemonRuntime,
    /// When daemon started
    pub start_time: Instant,
    /// Shutdown requests from connection tasks
    pub shutdown_requests: mpsc::Receiver<()>,
    shutdown_tx: mpsc::Sender<()>,
}

impl DaemonState {
    pub fn connection_context(&self) -> ConnectionContext {
        ConnectionContext {
            runtime: self.runtime.clone(),
            start_time: self.start_time,
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    /// Start a rotation task for every timer that has come due
    ///
    /// Rotations run off the event loop so a slow setter never delays the
    /// next tick or a client request.
    pub fn fire_due_timers(&self) -> usize {
        let events = self.runtime.due_timers();
        let fired = events.len();
        for event in events {
            let runtime = self.runtime.clone();
            tokio::spawn(async move {
                if let Err(e) = runtime.handle_event(event).await {
                    error!(error = %e, "timer handling failed");
                }
            });
        }
        fired
    }

    /// Compact the WAL once it grows past the configured size
    pub fn maintain(&self) {
        match self
            .runtime
            .compact_if_needed(self.config.daemon.compact_after)
        {
            Ok(true) => info!("WAL compacted"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "WAL compaction failed"),
        }
    }

    /// Shutdown the daemon gracefully
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        for path in [
            &self.paths.socket_path,
            &self.paths.lock_path,
            &self.paths.version_path,
        ] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }

        // Lock file is released automatically when self.lock_file is dropped
        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Paths(#[from] PathError),

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(std::path::PathBuf, std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("WAL error: {0}")]
    Wal(#[from] rota_storage::WalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Start the daemon
pub async fn startup(
    paths: &DaemonPaths,
    config: DaemonConfig,
) -> Result<DaemonState, LifecycleError> {
    match startup_inner(paths, config).await {
        Ok(state) => Ok(state),
        // Another daemon owns these files
        Err(e @ LifecycleError::LockFailed(_)) => Err(e),
        Err(e) => {
            cleanup_on_failure(paths);
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(
    paths: &DaemonPaths,
    config: DaemonConfig,
) -> Result<DaemonState, LifecycleError> {
    // 1. Create directories
    std::fs::create_dir_all(&paths.state_dir)?;
    if let Some(parent) = paths.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Some(parent) = paths.wal_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 2. Acquire lock file FIRST - prevents races
    let mut lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&paths.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    std::fs::write(&paths.version_path, env!("CARGO_PKG_VERSION"))?;

    // 3. Load state from WAL
    let wal = Wal::open(&paths.wal_path)?;
    let ops = Wal::replay(&paths.wal_path)?;
    let state = MaterializedState::from_operations(&ops);

    info!(
        "Loaded state: {} albums, {} folders, {} WAL entries",
        state.catalog.albums().count(),
        state.catalog.folders().count(),
        ops.len()
    );

    // 4. Set up adapters (wrapped with tracing for observability)
    let setter = DaemonSetter::from_config(&config);
    if matches!(setter, DaemonSetter::NoOp(_)) {
        warn!("no setter.command configured; rotations will not change the wallpaper");
    }
    let runtime = Runtime::new(
        RuntimeDeps {
            setter: TracedSetter::new(setter),
            media: TracedMediaSource::new(FsMediaSource::new()),
            notify: TracedNotifier::new(DaemonNotifier::from_config(&config)),
            wal: Arc::new(Mutex::new(wal)),
            state: Arc::new(Mutex::new(state)),
        },
        SystemClock,
        UuidIdGen,
        config.rotation(),
    );

    if runtime.compact_if_needed(config.daemon.compact_after)? {
        info!("WAL compacted at startup");
    }

    // 5. Re-arm triggers from stored settings before anything can change them
    let reconciliation = runtime.reconcile().await?;
    for conflict in &reconciliation.conflicts {
        let (target, reason) = (conflict.target, conflict.reason);
        warn!(%target, %reason, "schedule not armed");
    }

    // 6. Remove stale socket and bind (LAST - only after all validation passes)
    if paths.socket_path.exists() {
        std::fs::remove_file(&paths.socket_path)?;
    }
    let listener = UnixListener::bind(&paths.socket_path)
        .map_err(|e| LifecycleError::BindFailed(paths.socket_path.clone(), e))?;

    info!("Daemon started with state in {}", paths.state_dir.display());

    let (shutdown_tx, shutdown_requests) = mpsc::channel(1);
    Ok(DaemonState {
        paths: paths.clone(),
        config,
        lock_file,
        listener,
        runtime,
        start_time: Instant::now(),
        shutdown_requests,
        shutdown_tx,
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(paths: &DaemonPaths) {
    for path in [&paths.socket_path, &paths.version_path, &paths.lock_path] {
        if path.exists() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
