// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule settings and the trigger plan derived from them

use crate::catalog::AlbumName;
use crate::target::{ScalingPolicy, Target};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;

fn default_interval() -> u32 {
    DEFAULT_INTERVAL_MINUTES
}

/// Per-target schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSchedule {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,
    #[serde(default)]
    pub album: Option<AlbumName>,
    #[serde(default)]
    pub scaling: ScalingPolicy,
}

impl Default for TargetSchedule {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            album: None,
            scaling: ScalingPolicy::default(),
        }
    }
}

/// The singleton schedule record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub home: TargetSchedule,
    #[serde(default)]
    pub lock: TargetSchedule,
    #[serde(default)]
    pub synchronized: bool,
    #[serde(default)]
    pub separate_schedules: bool,
}

impl ScheduleSettings {
    pub fn target(&self, target: Target) -> &TargetSchedule {
        match target {
            Target::Home => &self.home,
            Target::Lock => &self.lock,
        }
    }

    pub fn target_mut(&mut self, target: Target) -> &mut TargetSchedule {
        match target {
            Target::Home => &mut self.home,
            Target::Lock => &mut self.lock,
        }
    }

    /// Interval a target actually runs at
    ///
    /// The lock screen adopts the home interval unless schedules are separate.
    pub fn effective_interval(&self, target: Target) -> u32 {
        match target {
            Target::Lock if !self.separate_schedules => self.home.interval_minutes,
            _ => self.target(target).interval_minutes,
        }
    }

    /// Whether the synchronized flag is honored
    ///
    /// Requires both targets enabled on the same album with shared schedules.
    pub fn is_synchronized(&self) -> bool {
        self.synchronized
            && self.home.enabled
            && self.lock.enabled
            && !self.separate_schedules
            && self.home.album.is_some()
            && self.home.album == self.lock.album
    }

    /// Targets currently assigned the given album
    pub fn targets_using(&self, album: &AlbumName) -> Vec<Target> {
        Target::ALL
            .into_iter()
            .filter(|t| self.target(*t).album.as_ref() == Some(album))
            .collect()
    }

    /// Derive the desired trigger state for every slot
    pub fn plan(&self) -> SchedulePlan {
        let mut plan = SchedulePlan {
            synchronized: false,
            home: SlotPlan::Disarmed,
            lock: SlotPlan::Disarmed,
            shared: SlotPlan::Disarmed,
            conflicts: Vec::new(),
        };
        if !self.enabled {
            return plan;
        }

        for target in Target::ALL {
            let schedule = self.target(target);
            if !schedule.enabled {
                continue;
            }
            let interval = self.effective_interval(target);
            let slot = if schedule.album.is_none() {
                plan.conflicts.push(ScheduleConflict {
                    target,
                    reason: ConflictReason::NoAlbum,
                });
                SlotPlan::Disarmed
            } else if interval == 0 {
                plan.conflicts.push(ScheduleConflict {
                    target,
                    reason: ConflictReason::ZeroInterval,
                });
                SlotPlan::Disarmed
            } else {
                SlotPlan::Armed {
                    interval: minutes(interval),
                }
            };
            match target {
                Target::Home => plan.home = slot,
                Target::Lock => plan.lock = slot,
            }
        }

        if self.is_synchronized() {
            if let SlotPlan::Armed { interval } = plan.home {
                plan.synchronized = true;
                plan.shared = SlotPlan::Armed { interval };
                plan.home = SlotPlan::Disarmed;
                plan.lock = SlotPlan::Disarmed;
            }
        }
        plan
    }
}

fn minutes(value: u32) -> Duration {
    Duration::from_secs(u64::from(value) * 60)
}

/// Desired state of one trigger slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPlan {
    Armed { interval: Duration },
    Disarmed,
}

/// Desired state of every trigger slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePlan {
    /// Home and lock share one trigger and one image
    pub synchronized: bool,
    pub home: SlotPlan,
    pub lock: SlotPlan,
    pub shared: SlotPlan,
    pub conflicts: Vec<ScheduleConflict>,
}

/// Why an enabled target cannot be armed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    NoAlbum,
    ZeroInterval,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::NoAlbum => write!(f, "no album assigned"),
            ConflictReason::ZeroInterval => write!(f, "interval is zero"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub target: Target,
    pub reason: ConflictReason,
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
