// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `config.toml` in the state directory
//!
//! ```toml
//! [setter]
//! command = "feh --bg-{{ scaling }} {{ image | quote }}"
//! timeout = "30s"
//!
//! [rotation]
//! order = "shuffle"          # or "sequential"
//! folder_refresh = "on_rebuild"  # or "manual"
//!
//! [daemon]
//! tick = "1s"
//! compact_after = 500
//!
//! [notify]
//! enabled = true
//! ```

use std::path::Path;
use std::time::Duration;

use rota_adapters::DEFAULT_APPLY_TIMEOUT;
use rota_core::SelectionOrder;
use rota_engine::{FolderRefreshPolicy, RotationConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    pub setter: SetterConfig,
    pub rotation: RotationSection,
    pub daemon: LoopConfig,
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetterConfig {
    /// Shell command template; without one rotations are only logged
    pub command: Option<String>,
    /// Longest a single command may run
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SetterConfig {
    fn default() -> Self {
        Self {
            command: None,
            timeout: DEFAULT_APPLY_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotationSection {
    pub order: SelectionOrder,
    pub folder_refresh: FolderRefreshPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    /// How often due timers are checked
    #[serde(with = "humantime_serde")]
    pub tick: Duration,
    /// WAL entries tolerated before compaction
    pub compact_after: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            compact_after: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifyConfig {
    pub enabled: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl DaemonConfig {
    /// Load from `path`; a missing file means defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        if config.daemon.tick.is_zero() {
            return Err(ConfigError::Invalid("daemon.tick must be positive".into()));
        }
        if config
            .setter
            .command
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            return Err(ConfigError::Invalid("setter.command is empty".into()));
        }
        if config.setter.timeout.is_zero() {
            return Err(ConfigError::Invalid("setter.timeout must be positive".into()));
        }
        Ok(config)
    }

    pub fn rotation(&self) -> RotationConfig {
        RotationConfig {
            order: self.rotation.order,
            folder_refresh: self.rotation.folder_refresh,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
