// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects requested by state machines and executed by the engine

use crate::catalog::WallpaperId;
use crate::event::Event;
use crate::target::{ApplyTarget, ScalingPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Side effects the pure core asks the runtime to perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Emit an event for logs and subscribers
    Emit { event: Event },

    /// Set (or replace) a timer
    SetTimer {
        id: String,
        #[serde(with = "humantime_serde")]
        duration: Duration,
    },

    /// Cancel a timer
    CancelTimer { id: String },

    /// Paint an image through the wallpaper setter
    Apply {
        target: ApplyTarget,
        wallpaper: WallpaperId,
        image: String,
        scaling: ScalingPolicy,
    },

    /// Send a desktop notification
    Notify { title: String, message: String },
}

/// Name and structured fields for an effect's log span
pub trait TracedEffect {
    fn name(&self) -> &'static str;

    fn fields(&self) -> Vec<(&'static str, String)>;
}

impl Effect {
    pub fn emit(event: Event) -> Self {
        Effect::Emit { event }
    }
}

impl TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::Emit { .. } => "emit",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
            Effect::Apply { .. } => "apply",
            Effect::Notify { .. } => "notify",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Emit { event } => vec![("event", event.name().to_string())],
            Effect::SetTimer { id, duration } => vec![
                ("timer_id", id.clone()),
                ("duration_secs", duration.as_secs().to_string()),
            ],
            Effect::CancelTimer { id } => vec![("timer_id", id.clone())],
            Effect::Apply {
                target,
                wallpaper,
                image,
                scaling,
            } => vec![
                ("target", target.to_string()),
                ("wallpaper", wallpaper.to_string()),
                ("image", image.clone()),
                ("scaling", scaling.to_string()),
            ],
            Effect::Notify { title, .. } => vec![("title", title.clone())],
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
