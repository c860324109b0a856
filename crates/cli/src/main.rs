// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rota - wallpaper rotation CLI

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{album, daemon, folder, rotate, schedule};
use rota_core::Target;
use tracing_subscriber::EnvFilter;

use crate::client::{ClientError, DaemonClient};
use crate::error::RotaError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "rota", version, about = "Rota - Wallpaper rotation for home and lock screens")]
struct Cli {
    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daemon management
    Daemon(daemon::DaemonArgs),
    /// Show schedule, queues and timers
    Status,
    /// Show schedule settings
    Settings,
    /// Turn rotation on
    Enable,
    /// Turn rotation off
    Disable,
    /// Configure a target's schedule
    Schedule(schedule::ScheduleArgs),
    /// Show the same wallpaper on both targets
    Sync {
        #[arg(value_enum)]
        state: schedule::Toggle,
    },
    /// Give the lock screen its own interval
    Separate {
        #[arg(value_enum)]
        state: schedule::Toggle,
    },
    /// Set how a target's wallpaper is scaled
    Scaling(schedule::ScalingArgs),
    /// Choose the album a target draws from
    Assign(schedule::AssignArgs),
    /// Apply the next wallpaper now
    Rotate {
        #[arg(default_value = "home")]
        target: Target,
    },
    /// Show the wallpaper the next rotation would apply
    Preview {
        #[arg(default_value = "home")]
        target: Target,
    },
    /// Album management
    Album(album::AlbumArgs),
    /// Folder management
    Folder(folder::FolderArgs),
}

#[tokio::main]
async fn main() {
    if let Ok(filter) = EnvFilter::try_from_env("ROTA_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(err) = run().await {
        match err.downcast::<ClientError>() {
            Ok(client_err) => eprintln!("{}", RotaError::from(client_err)),
            Err(other) => eprintln!("Error: {:#}", other),
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    // Daemon management talks to the socket itself and must not auto-start
    if let Commands::Daemon(args) = cli.command {
        return daemon::handle(args, format).await;
    }

    let client = DaemonClient::connect_or_start()
        .await
        .map_err(RotaError::from)?;

    match cli.command {
        Commands::Status => rotate::status(&client, format).await?,
        Commands::Settings => rotate::settings(&client, format).await?,
        Commands::Enable => schedule::set_enabled(&client, true, format).await?,
        Commands::Disable => schedule::set_enabled(&client, false, format).await?,
        Commands::Schedule(args) => schedule::schedule(&client, args, format).await?,
        Commands::Sync { state } => schedule::sync(&client, state, format).await?,
        Commands::Separate { state } => schedule::separate(&client, state, format).await?,
        Commands::Scaling(args) => schedule::scaling(&client, args, format).await?,
        Commands::Assign(args) => schedule::assign(&client, args, format).await?,
        Commands::Rotate { target } => rotate::rotate(&client, target, format).await?,
        Commands::Preview { target } => rotate::preview(&client, target, format).await?,
        Commands::Album(args) => album::handle(&client, args.command, format).await?,
        Commands::Folder(args) => folder::handle(&client, args.command, format).await?,
        Commands::Daemon(_) => {}
    }

    Ok(())
}
