// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display targets and how an image is fitted onto them

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two independently schedulable rotation destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Home,
    Lock,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Home, Target::Lock];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Home => "home",
            Target::Lock => "lock",
        }
    }

    /// The other target
    pub fn other(&self) -> Target {
        match self {
            Target::Home => Target::Lock,
            Target::Lock => Target::Home,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Target::Home),
            "lock" => Ok(Target::Lock),
            _ => Err(format!("unknown target: {} (expected home or lock)", s)),
        }
    }
}

/// Surface(s) an apply call paints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyTarget {
    Home,
    Lock,
    Both,
}

impl ApplyTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyTarget::Home => "home",
            ApplyTarget::Lock => "lock",
            ApplyTarget::Both => "both",
        }
    }
}

impl From<Target> for ApplyTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Home => ApplyTarget::Home,
            Target::Lock => ApplyTarget::Lock,
        }
    }
}

impl fmt::Display for ApplyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the apply collaborator fits the image onto the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingPolicy {
    #[default]
    Fill,
    Fit,
    Stretch,
    Center,
}

impl ScalingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalingPolicy::Fill => "fill",
            ScalingPolicy::Fit => "fit",
            ScalingPolicy::Stretch => "stretch",
            ScalingPolicy::Center => "center",
        }
    }
}

impl fmt::Display for ScalingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScalingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fill" => Ok(ScalingPolicy::Fill),
            "fit" => Ok(ScalingPolicy::Fit),
            "stretch" => Ok(ScalingPolicy::Stretch),
            "center" => Ok(ScalingPolicy::Center),
            _ => Err(format!("unknown scaling policy: {}", s)),
        }
    }
}
