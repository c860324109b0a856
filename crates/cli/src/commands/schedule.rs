// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rota schedule`, `rota sync`, `rota assign` and friends

use anyhow::Result;
use clap::{Args, ValueEnum};
use rota_core::{AlbumName, ScalingPolicy, Target};

use crate::client::DaemonClient;
use crate::output::{self, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Args)]
pub struct ScheduleArgs {
    /// Target to configure (home or lock)
    pub target: Target,

    /// Rotate this target on its schedule
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Stop rotating this target
    #[arg(long)]
    pub disable: bool,

    /// Interval between rotations: minutes, or a duration such as 90m or 2h
    #[arg(long, value_parser = parse_interval)]
    pub interval: Option<u32>,
}

#[derive(Args)]
pub struct AssignArgs {
    /// Target to assign (home or lock)
    pub target: Target,

    /// Album to show on the target
    #[arg(required_unless_present = "clear")]
    pub album: Option<String>,

    /// Remove the target's album
    #[arg(long, conflicts_with = "album")]
    pub clear: bool,
}

#[derive(Args)]
pub struct ScalingArgs {
    pub target: Target,

    /// fill, fit, stretch or center
    pub policy: ScalingPolicy,
}

/// Parse an interval into whole minutes
///
/// A bare number is minutes; anything else goes through humantime.
pub fn parse_interval(s: &str) -> Result<u32, String> {
    let s = s.trim();
    if let Ok(minutes) = s.parse::<u32>() {
        return Ok(minutes);
    }

    let duration = humantime::parse_duration(s).map_err(|e| e.to_string())?;
    if duration.as_secs() % 60 != 0 || duration.subsec_nanos() != 0 {
        return Err(format!("{} is not a whole number of minutes", s));
    }
    u32::try_from(duration.as_secs() / 60).map_err(|_| format!("{} is too long", s))
}

pub async fn schedule(client: &DaemonClient, args: ScheduleArgs, format: OutputFormat) -> Result<()> {
    let enabled = match (args.enable, args.disable) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let settings = if enabled.is_none() && args.interval.is_none() {
        client.settings().await?
    } else {
        client
            .update_schedule(args.target, enabled, args.interval)
            .await?
    };
    output::print(&settings, format, output::settings);
    Ok(())
}

pub async fn set_enabled(client: &DaemonClient, enabled: bool, format: OutputFormat) -> Result<()> {
    let settings = client.set_enabled(enabled).await?;
    output::print(&settings, format, output::settings);
    Ok(())
}

pub async fn sync(client: &DaemonClient, state: Toggle, format: OutputFormat) -> Result<()> {
    let settings = client.set_synchronized(state.is_on()).await?;
    output::print(&settings, format, output::settings);
    Ok(())
}

pub async fn separate(client: &DaemonClient, state: Toggle, format: OutputFormat) -> Result<()> {
    let settings = client.set_separate_schedules(state.is_on()).await?;
    output::print(&settings, format, output::settings);
    Ok(())
}

pub async fn scaling(client: &DaemonClient, args: ScalingArgs, format: OutputFormat) -> Result<()> {
    let settings = client.set_scaling(args.target, args.policy).await?;
    output::print(&settings, format, output::settings);
    Ok(())
}

pub async fn assign(client: &DaemonClient, args: AssignArgs, format: OutputFormat) -> Result<()> {
    let album = if args.clear {
        None
    } else {
        args.album.map(AlbumName::new)
    };
    let settings = client.assign_album(args.target, album).await?;
    output::print(&settings, format, output::settings);
    Ok(())
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
