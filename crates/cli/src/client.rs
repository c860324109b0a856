// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

use rota_core::{
    Album, AlbumName, CascadeReport, Folder, FolderId, FolderSync, ScalingPolicy,
    ScheduleSettings, Target, Wallpaper, WallpaperId,
};
use rota_daemon::protocol::{self, ProtocolError};
use rota_daemon::{
    AlbumDetail, AlbumSummary, DaemonPaths, Drawn, PathError, Query, Request, Response,
    RotationOutcome, RuntimeStatus,
};
use thiserror::Error;
use tokio::net::UnixStream;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for IPC requests
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("ROTA_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for daemon to start
pub fn timeout_connect() -> Duration {
    parse_duration_ms("ROTA_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for process to exit
pub fn timeout_exit() -> Duration {
    parse_duration_ms("ROTA_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(2))
}

/// Polling interval for retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("ROTA_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("Connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Paths(#[from] PathError),
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Connect to daemon, auto-starting if not running
    pub async fn connect_or_start() -> Result<Self, ClientError> {
        let paths = DaemonPaths::from_env()?;

        // Restart a daemon left over from another version
        if let Ok(daemon_version) = std::fs::read_to_string(&paths.version_path) {
            if daemon_version.trim() != env!("CARGO_PKG_VERSION") {
                let _ = daemon_stop(&paths).await;
            }
        }

        match Self::connect(&paths) {
            Ok(client) if client.ping().await.is_ok() => Ok(client),
            // A socket nobody answers on is left over from a crashed daemon
            Ok(_) | Err(ClientError::DaemonNotRunning) => {
                let child = start_daemon_background()?;
                Self::connect_with_retry(&paths, timeout_connect(), child).await
            }
            Err(e) => Err(wrap_with_startup_error(e, &paths)),
        }
    }

    /// Connect to existing daemon (no auto-start)
    pub fn connect(paths: &DaemonPaths) -> Result<Self, ClientError> {
        if !paths.socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }

        Ok(Self {
            socket_path: paths.socket_path.clone(),
        })
    }

    async fn connect_with_retry(
        paths: &DaemonPaths,
        timeout: Duration,
        mut child: std::process::Child,
    ) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            // Check if daemon process exited early (startup failure)
            if let Ok(Some(status)) = child.try_wait() {
                // Poll for startup error in log (filesystem may need to sync)
                let poll_start = Instant::now();
                while poll_start.elapsed() < timeout_exit() {
                    if let Some(err) = read_startup_error(paths) {
                        return Err(ClientError::DaemonStartFailed(err));
                    }
                    tokio::time::sleep(poll_interval()).await;
                }
                return Err(ClientError::DaemonStartFailed(format!(
                    "exited with {}",
                    status
                )));
            }

            // The socket appears before the daemon accepts; confirm with a ping
            if let Ok(client) = Self::connect(paths) {
                if client.ping().await.is_ok() {
                    return Ok(client);
                }
            }
            tokio::time::sleep(poll_interval()).await;
        }

        Err(wrap_with_startup_error(
            ClientError::DaemonStartTimeout,
            paths,
        ))
    }

    /// Send a request and receive a response with specific timeouts
    async fn send_with_timeout(
        &self,
        request: Request,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        let data = protocol::encode(&request)?;
        tokio::time::timeout(write_timeout, protocol::write_message(&mut writer, &data))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        let response_bytes =
            tokio::time::timeout(read_timeout, protocol::read_message(&mut reader))
                .await
                .map_err(|_| ProtocolError::Timeout)??;

        let response: Response = protocol::decode(&response_bytes)?;
        Ok(response)
    }

    /// Send a request and receive a response
    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        self.send_with_timeout(request, timeout_ipc(), timeout_ipc())
            .await
    }

    /// Send a request that answers with the stored settings
    async fn send_settings(&self, request: Request) -> Result<ScheduleSettings, ClientError> {
        match self.send(request).await? {
            Response::Settings { settings } => Ok(settings),
            other => Err(unexpected(other)),
        }
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Get daemon version via Hello handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        match self
            .send(Request::Hello {
                version: env!("CARGO_PKG_VERSION").to_string(),
            })
            .await?
        {
            Response::Hello { version } => Ok(version),
            other => Err(unexpected(other)),
        }
    }

    /// Get daemon status
    pub async fn status(&self) -> Result<(u64, RuntimeStatus), ClientError> {
        match self.send(Request::Status).await? {
            Response::Status {
                uptime_secs,
                status,
            } => Ok((uptime_secs, *status)),
            other => Err(unexpected(other)),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(Request::Shutdown).await? {
            Response::Ok | Response::ShuttingDown => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    pub async fn settings(&self) -> Result<ScheduleSettings, ClientError> {
        self.send_settings(Request::Query {
            query: Query::Settings,
        })
        .await
    }

    pub async fn update_schedule(
        &self,
        target: Target,
        enabled: Option<bool>,
        interval_minutes: Option<u32>,
    ) -> Result<ScheduleSettings, ClientError> {
        self.send_settings(Request::UpdateSchedule {
            target,
            enabled,
            interval_minutes,
        })
        .await
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<ScheduleSettings, ClientError> {
        self.send_settings(Request::SetEnabled { enabled }).await
    }

    pub async fn set_synchronized(
        &self,
        synchronized: bool,
    ) -> Result<ScheduleSettings, ClientError> {
        self.send_settings(Request::SetSynchronized { synchronized })
            .await
    }

    pub async fn set_separate_schedules(
        &self,
        separate: bool,
    ) -> Result<ScheduleSettings, ClientError> {
        self.send_settings(Request::SetSeparateSchedules { separate })
            .await
    }

    pub async fn set_scaling(
        &self,
        target: Target,
        scaling: ScalingPolicy,
    ) -> Result<ScheduleSettings, ClientError> {
        self.send_settings(Request::SetScaling { target, scaling })
            .await
    }

    pub async fn assign_album(
        &self,
        target: Target,
        album: Option<AlbumName>,
    ) -> Result<ScheduleSettings, ClientError> {
        self.send_settings(Request::AssignAlbum { target, album })
            .await
    }

    pub async fn rotate_now(&self, target: Target) -> Result<RotationOutcome, ClientError> {
        match self.send(Request::RotateNow { target }).await? {
            Response::Rotated { outcome } => Ok(outcome),
            other => Err(unexpected(other)),
        }
    }

    pub async fn preview(&self, target: Target) -> Result<Option<Drawn>, ClientError> {
        match self
            .send(Request::Query {
                query: Query::Preview { target },
            })
            .await?
        {
            Response::Preview { next } => Ok(next),
            other => Err(unexpected(other)),
        }
    }

    pub async fn list_albums(&self) -> Result<Vec<AlbumSummary>, ClientError> {
        match self
            .send(Request::Query {
                query: Query::ListAlbums,
            })
            .await?
        {
            Response::Albums { albums } => Ok(albums),
            other => Err(unexpected(other)),
        }
    }

    pub async fn get_album(&self, name: &str) -> Result<Option<AlbumDetail>, ClientError> {
        match self
            .send(Request::Query {
                query: Query::GetAlbum {
                    name: AlbumName::new(name),
                },
            })
            .await?
        {
            Response::Album { album } => Ok(album.map(|b| *b)),
            other => Err(unexpected(other)),
        }
    }

    pub async fn create_album(&self, name: &str) -> Result<Album, ClientError> {
        match self
            .send(Request::CreateAlbum {
                name: name.to_string(),
            })
            .await?
        {
            Response::AlbumCreated { album } => Ok(album),
            other => Err(unexpected(other)),
        }
    }

    pub async fn delete_album(&self, name: &str) -> Result<CascadeReport, ClientError> {
        match self
            .send(Request::DeleteAlbum {
                name: AlbumName::new(name),
            })
            .await?
        {
            Response::Removed { report } => Ok(report),
            other => Err(unexpected(other)),
        }
    }

    pub async fn add_image(&self, album: &str, image: &str) -> Result<Wallpaper, ClientError> {
        match self
            .send(Request::AddImage {
                album: AlbumName::new(album),
                image: image.to_string(),
            })
            .await?
        {
            Response::ImageAdded { wallpaper } => Ok(wallpaper),
            other => Err(unexpected(other)),
        }
    }

    pub async fn remove_image(&self, id: &str) -> Result<Wallpaper, ClientError> {
        match self
            .send(Request::RemoveImage {
                id: WallpaperId::new(id),
            })
            .await?
        {
            Response::ImageRemoved { wallpaper } => Ok(wallpaper),
            other => Err(unexpected(other)),
        }
    }

    pub async fn add_folder(
        &self,
        album: &str,
        source: &str,
        cover: Option<String>,
    ) -> Result<(Folder, FolderSync), ClientError> {
        match self
            .send(Request::AddFolder {
                album: AlbumName::new(album),
                source: source.to_string(),
                cover,
            })
            .await?
        {
            Response::FolderAdded { folder, sync } => Ok((folder, sync)),
            other => Err(unexpected(other)),
        }
    }

    pub async fn remove_folder(&self, id: &str) -> Result<CascadeReport, ClientError> {
        match self
            .send(Request::RemoveFolder {
                id: FolderId::new(id),
            })
            .await?
        {
            Response::Removed { report } => Ok(report),
            other => Err(unexpected(other)),
        }
    }

    pub async fn refresh_folder(&self, id: &str) -> Result<FolderSync, ClientError> {
        match self
            .send(Request::RefreshFolder {
                id: FolderId::new(id),
            })
            .await?
        {
            Response::FolderRefreshed { sync } => Ok(sync),
            other => Err(unexpected(other)),
        }
    }
}

/// Map a response the caller did not ask for to an error
fn unexpected(response: Response) -> ClientError {
    match response {
        Response::Error { message } => ClientError::Rejected(message),
        _ => ClientError::UnexpectedResponse,
    }
}

/// Start the daemon in the background, returning the child process handle
fn start_daemon_background() -> Result<std::process::Child, ClientError> {
    let rotad_path = find_rotad_binary();

    Command::new(&rotad_path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Stop the daemon (graceful first, then forceful)
/// Returns true if daemon was stopped, false if it wasn't running
pub async fn daemon_stop(paths: &DaemonPaths) -> Result<bool, ClientError> {
    let client = match DaemonClient::connect(paths) {
        Ok(c) => c,
        Err(ClientError::DaemonNotRunning) => {
            cleanup_stale_pid(paths);
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    let shutdown_result = client.shutdown().await;

    if let Some(pid) = read_daemon_pid(paths) {
        if shutdown_result.is_ok() {
            wait_for_exit(pid, timeout_exit()).await;
        }

        // Force kill if still running
        if process_exists(pid) {
            force_kill_daemon(pid);
            wait_for_exit(pid, timeout_exit()).await;
        }
    }

    cleanup_stale_pid(paths);
    if paths.socket_path.exists() {
        let _ = std::fs::remove_file(&paths.socket_path);
    }

    Ok(true)
}

/// Wait for a process to exit
async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !process_exists(pid) {
            return true;
        }
        tokio::time::sleep(poll_interval()).await;
    }
    false
}

/// Find the rotad binary
fn find_rotad_binary() -> PathBuf {
    // Explicit override (used by tests to ensure correct binary)
    if let Ok(path) = std::env::var("ROTA_DAEMON_BINARY") {
        return PathBuf::from(path);
    }

    // Check current executable's directory
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("rotad");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    // Fall back to PATH lookup
    PathBuf::from("rotad")
}

/// Clean up orphaned PID file during shutdown.
///
/// Called by daemon_stop when the daemon is not running or after stopping it.
fn cleanup_stale_pid(paths: &DaemonPaths) {
    if paths.lock_path.exists() {
        let _ = std::fs::remove_file(&paths.lock_path);
    }
}

/// Get the PID from the daemon PID file, if it exists
pub fn read_daemon_pid(paths: &DaemonPaths) -> Option<u32> {
    std::fs::read_to_string(&paths.lock_path)
        .ok()
        .and_then(|content| content.trim().parse::<u32>().ok())
}

/// Check if a process with the given PID exists
pub fn process_exists(pid: u32) -> bool {
    // Use kill -0 to check if process exists without sending a signal
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Force kill a daemon process
pub fn force_kill_daemon(pid: u32) -> bool {
    Command::new("kill")
        .args(["-9", &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Startup marker prefix that daemon writes to log before anything else.
/// Full format: "--- rotad: starting (pid: 12345) ---"
const STARTUP_MARKER_PREFIX: &str = "--- rotad: starting (pid: ";

/// Read daemon log from startup marker, looking for errors.
/// Returns the error message if found, None otherwise.
pub fn read_startup_error(paths: &DaemonPaths) -> Option<String> {
    let content = std::fs::read_to_string(&paths.log_path).ok()?;

    // Find the last startup marker
    let start_pos = content.rfind(STARTUP_MARKER_PREFIX)?;
    let startup_log = &content[start_pos..];

    let errors: Vec<&str> = startup_log
        .lines()
        .filter(|line| line.contains(" ERROR ") || line.contains("Failed to start"))
        .collect();

    if errors.is_empty() {
        return None;
    }

    // Strip timestamp/level prefix: "timestamp LEVEL target: message"
    let error_messages: Vec<String> = errors
        .iter()
        .filter_map(|line| line.split_once(": ").map(|(_, msg)| msg.to_string()))
        .collect();

    if error_messages.is_empty() {
        Some(errors.join("\n"))
    } else {
        Some(error_messages.join("\n"))
    }
}

/// Wrap an error with startup log info if available.
fn wrap_with_startup_error(err: ClientError, paths: &DaemonPaths) -> ClientError {
    // Don't double-wrap
    if matches!(err, ClientError::DaemonStartFailed(_)) {
        return err;
    }

    if let Some(startup_error) = read_startup_error(paths) {
        ClientError::DaemonStartFailed(startup_error)
    } else {
        err
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
