// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rota daemon` - Daemon management commands

use anyhow::Result;
use clap::{Args, Subcommand};
use rota_daemon::DaemonPaths;

use crate::client::{daemon_stop, read_daemon_pid, ClientError, DaemonClient};
use crate::error::RotaError;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon in the background
    Start,
    /// Stop the daemon
    Stop,
    /// Show whether the daemon is running
    Status,
    /// Print the end of the daemon log
    Logs {
        /// Number of lines to show
        #[arg(long, short = 'n', default_value = "50")]
        lines: usize,
    },
}

pub async fn handle(args: DaemonArgs, format: OutputFormat) -> Result<()> {
    let paths = DaemonPaths::from_env()?;
    match args.command {
        DaemonCommand::Start => start(&paths).await,
        DaemonCommand::Stop => stop(&paths).await,
        DaemonCommand::Status => status(&paths, format).await,
        DaemonCommand::Logs { lines } => logs(&paths, lines),
    }
}

async fn start(paths: &DaemonPaths) -> Result<()> {
    if let Ok(client) = DaemonClient::connect(paths) {
        if client.ping().await.is_ok() {
            println!("Daemon already running");
            return Ok(());
        }
    }

    DaemonClient::connect_or_start()
        .await
        .map_err(RotaError::from)?;
    println!("Daemon started");
    Ok(())
}

async fn stop(paths: &DaemonPaths) -> Result<()> {
    if daemon_stop(paths).await? {
        println!("Daemon stopped");
    } else {
        println!("Daemon not running");
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct DaemonInfo {
    running: bool,
    version: Option<String>,
    pid: Option<u32>,
    uptime_secs: Option<u64>,
    socket: String,
}

async fn status(paths: &DaemonPaths, format: OutputFormat) -> Result<()> {
    let mut info = DaemonInfo {
        running: false,
        version: None,
        pid: None,
        uptime_secs: None,
        socket: paths.socket_path.display().to_string(),
    };

    match DaemonClient::connect(paths) {
        Ok(client) => {
            if let Ok(version) = client.hello().await {
                let (uptime, _) = client.status().await?;
                info.running = true;
                info.version = Some(version);
                info.pid = read_daemon_pid(paths);
                info.uptime_secs = Some(uptime);
            }
        }
        Err(ClientError::DaemonNotRunning) => {}
        Err(e) => return Err(e.into()),
    }

    output::print(&info, format, |i| {
        if !i.running {
            return "Daemon not running\n".to_string();
        }
        format!(
            "Daemon running\n  Version: {}\n  PID: {}\n  Uptime: {}\n  Socket: {}\n",
            i.version.as_deref().unwrap_or("-"),
            i.pid.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
            humantime::format_duration(std::time::Duration::from_secs(
                i.uptime_secs.unwrap_or(0)
            )),
            i.socket
        )
    });
    Ok(())
}

fn logs(paths: &DaemonPaths, lines: usize) -> Result<()> {
    let content = match std::fs::read_to_string(&paths.log_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            println!("No daemon log at {}", paths.log_path.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let all: Vec<&str> = content.lines().collect();
    for line in &all[all.len().saturating_sub(lines)..] {
        println!("{}", line);
    }
    Ok(())
}
