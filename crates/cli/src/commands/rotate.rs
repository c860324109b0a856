// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rota rotate`, `rota preview` and `rota status`

use anyhow::Result;
use rota_core::Target;
use rota_daemon::RotationOutcome;

use crate::client::DaemonClient;
use crate::output::{self, OutputFormat};

pub async fn rotate(client: &DaemonClient, target: Target, format: OutputFormat) -> Result<()> {
    let outcome = client.rotate_now(target).await?;
    output::print(&outcome, format, output::outcome);
    if let RotationOutcome::Failed { error, .. } = outcome {
        anyhow::bail!("wallpaper not applied: {}", error);
    }
    Ok(())
}

pub async fn preview(client: &DaemonClient, target: Target, format: OutputFormat) -> Result<()> {
    let next = client.preview(target).await?;
    output::print(&next, format, output::preview);
    Ok(())
}

pub async fn status(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let (uptime_secs, status) = client.status().await?;
    output::print(&status, format, |s| output::status(uptime_secs, s));
    Ok(())
}

pub async fn settings(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let settings = client.settings().await?;
    output::print(&settings, format, output::settings);
    Ok(())
}
