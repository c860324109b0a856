// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell command setter
//!
//! The command is a minijinja template rendered per apply call with
//! `image`, `target` and `scaling` in scope, then run through `sh -c`.
//! The `quote` filter single-quotes a value for the shell:
//!
//! ```text
//! feh --bg-{{ scaling }} {{ image | quote }}
//! ```
//!
//! A command that outlives its timeout is killed and reported as failed.

use super::{ApplyError, WallpaperSetter};
use async_trait::async_trait;
use minijinja::{context, Environment};
use rota_core::{ApplyTarget, ScalingPolicy};
use std::time::Duration;
use tokio::process::Command;

/// How long a setter command may run before it is killed
pub const DEFAULT_APPLY_TIMEOUT: Duration = Duration::from_secs(30);

/// Setter that runs a user-configured shell command
#[derive(Clone, Debug)]
pub struct CommandSetter {
    template: String,
    timeout: Duration,
}

impl CommandSetter {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            timeout: DEFAULT_APPLY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Render the command line for one apply call
    pub fn render(
        &self,
        image: &str,
        target: ApplyTarget,
        scaling: ScalingPolicy,
    ) -> Result<String, ApplyError> {
        let mut env = Environment::new();
        env.add_filter("quote", shell_quote);
        env.render_str(
            &self.template,
            context! {
                image => image,
                target => target.as_str(),
                scaling => scaling.as_str(),
            },
        )
        .map_err(|e| ApplyError::Template(e.to_string()))
    }
}

fn shell_quote(value: String) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[async_trait]
impl WallpaperSetter for CommandSetter {
    async fn apply(
        &self,
        image: &str,
        target: ApplyTarget,
        scaling: ScalingPolicy,
    ) -> Result<(), ApplyError> {
        let command = self.render(image, target, scaling)?;
        let mut shell = Command::new("sh");
        shell.arg("-c").arg(&command).kill_on_drop(true);
        let output = tokio::time::timeout(self.timeout, shell.output())
            .await
            .map_err(|_| ApplyError::TimedOut(self.timeout))?
            .map_err(|e| ApplyError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(ApplyError::CommandFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
