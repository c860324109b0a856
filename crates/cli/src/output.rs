// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use std::fmt::Write as _;

use clap::ValueEnum;
use rota_core::{CascadeReport, ScheduleSettings, Target, TargetSchedule, TriggerState};
use rota_daemon::{AlbumDetail, AlbumSummary, Drawn, RotationOutcome, RuntimeStatus};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `value` as JSON, or as text rendered by `text`
pub fn print<T: Serialize>(value: &T, format: OutputFormat, text: impl FnOnce(&T) -> String) {
    match format {
        OutputFormat::Text => print!("{}", text(value)),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn targets(list: &[Target]) -> String {
    if list.is_empty() {
        "-".to_string()
    } else {
        list.iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn schedule_line(out: &mut String, target: Target, schedule: &TargetSchedule) {
    let _ = writeln!(
        out,
        "  {:<5} {:<8} every {:>4} min  album: {}  scaling: {}",
        target.as_str(),
        if schedule.enabled { "enabled" } else { "disabled" },
        schedule.interval_minutes,
        schedule
            .album
            .as_ref()
            .map(|a| a.as_str())
            .unwrap_or("-"),
        schedule.scaling
    );
}

pub fn settings(settings: &ScheduleSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Rotation: {}",
        if settings.enabled { "on" } else { "off" }
    );
    let _ = writeln!(
        out,
        "Synchronized: {}",
        if settings.is_synchronized() { "yes" } else { "no" }
    );
    let _ = writeln!(
        out,
        "Separate schedules: {}",
        if settings.separate_schedules { "yes" } else { "no" }
    );
    schedule_line(&mut out, Target::Home, &settings.home);
    schedule_line(&mut out, Target::Lock, &settings.lock);
    out
}

pub fn status(uptime_secs: u64, status: &RuntimeStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Daemon up {}",
        humantime::format_duration(std::time::Duration::from_secs(uptime_secs))
    );
    let _ = writeln!(
        out,
        "Rotation: {}{}",
        if status.enabled { "on" } else { "off" },
        if status.synchronized {
            " (synchronized)"
        } else {
            ""
        }
    );

    let _ = writeln!(out, "\nTriggers:");
    let mut any = false;
    for trigger in &status.triggers {
        if trigger.state == TriggerState::Disarmed {
            continue;
        }
        any = true;
        let next = trigger
            .next_in
            .map(|d| humantime::format_duration(round_secs(d)).to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {:<13} {:<8} next in {:<12} runs: {}",
            trigger.slot.to_string(),
            format!("{:?}", trigger.state).to_lowercase(),
            next,
            trigger.run_count
        );
    }
    if !any {
        let _ = writeln!(out, "  none armed");
    }

    let _ = writeln!(out, "\nQueues:");
    for queue in &status.queues {
        let _ = writeln!(
            out,
            "  {:<5} album: {:<16} {}/{} remaining  next: {}",
            queue.target.as_str(),
            queue.album.as_ref().map(|a| a.as_str()).unwrap_or("-"),
            queue.remaining,
            queue.size,
            queue.next.as_ref().map(|w| w.as_str()).unwrap_or("-")
        );
    }

    for conflict in &status.conflicts {
        let _ = writeln!(
            out,
            "\nwarning: {} is enabled but not scheduled: {}",
            conflict.target, conflict.reason
        );
    }
    out
}

fn round_secs(d: std::time::Duration) -> std::time::Duration {
    std::time::Duration::from_secs(d.as_secs())
}

pub fn albums(albums: &[AlbumSummary]) -> String {
    if albums.is_empty() {
        return "No albums\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>7} {:>8}  ASSIGNED",
        "NAME", "IMAGES", "FOLDERS"
    );
    for album in albums {
        let _ = writeln!(
            out,
            "{:<24} {:>7} {:>8}  {}",
            truncate(album.name.as_str(), 24),
            album.images,
            album.folders,
            targets(&album.assigned_to)
        );
    }
    out
}

pub fn album_detail(detail: &AlbumDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Album: {}", detail.album.name);
    let _ = writeln!(
        out,
        "  Created: {}",
        detail.album.created_at.format("%Y-%m-%d %H:%M")
    );
    let _ = writeln!(out, "  Assigned to: {}", targets(&detail.assigned_to));

    if !detail.folders.is_empty() {
        let _ = writeln!(out, "\nFolders:");
        for folder in &detail.folders {
            let refreshed = folder
                .refreshed_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string());
            let _ = writeln!(
                out,
                "  {:<14} {}  (refreshed {})",
                folder.id, folder.source, refreshed
            );
        }
    }

    let _ = writeln!(out, "\nImages ({}):", detail.wallpapers.len());
    for wallpaper in &detail.wallpapers {
        let origin = if wallpaper.is_direct() { "" } else { "  [folder]" };
        let _ = writeln!(out, "  {:<14} {}{}", wallpaper.id, wallpaper.source, origin);
    }
    out
}

pub fn outcome(outcome: &RotationOutcome) -> String {
    match outcome {
        RotationOutcome::Applied { target, image, .. } => {
            format!("Applied {} to {}\n", image, target.as_str())
        }
        RotationOutcome::Skipped { target, reason } => {
            format!("Skipped {}: {}\n", target, reason)
        }
        RotationOutcome::Failed { target, error, .. } => {
            format!("Failed to apply to {}: {}\n", target.as_str(), error)
        }
    }
}

pub fn preview(next: &Option<Drawn>) -> String {
    match next {
        Some(drawn) => format!("{}  {}\n", drawn.wallpaper, drawn.image),
        None => "Nothing queued\n".to_string(),
    }
}

pub fn removed(report: &CascadeReport) -> String {
    let mut out = String::new();
    if let Some(album) = &report.album {
        let _ = writeln!(out, "Deleted album {}", album);
    }
    let _ = writeln!(
        out,
        "Removed {} folder(s) and {} image(s)",
        report.folders.len(),
        report.wallpapers.len()
    );
    out
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
