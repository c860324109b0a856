// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use std::fmt;

use crate::client::ClientError;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct RotaError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl RotaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Attach hints to the errors users commonly run into
    pub fn from_client(err: ClientError) -> Self {
        match err {
            ClientError::DaemonStartFailed(reason) => RotaError::new("Could not start rotad")
                .with_context(reason)
                .with_suggestion("Inspect the log: rota daemon logs")
                .with_suggestion("Check config.toml in the state directory"),
            ClientError::DaemonStartTimeout => {
                RotaError::new("Timed out waiting for rotad to start")
                    .with_suggestion("Inspect the log: rota daemon logs")
                    .with_suggestion("Raise ROTA_TIMEOUT_CONNECT_MS")
            }
            ClientError::Rejected(message) if message.starts_with("album not found") => {
                RotaError::new(message).with_suggestion("List albums: rota album list")
            }
            ClientError::Rejected(message) if message.starts_with("folder not found") => {
                RotaError::new(message)
                    .with_suggestion("Show folder ids: rota album show <album>")
            }
            ClientError::Rejected(message) if message.starts_with("wallpaper not found") => {
                RotaError::new(message)
                    .with_suggestion("Show image ids: rota album show <album>")
            }
            other => RotaError::new(other.to_string()),
        }
    }
}

impl fmt::Display for RotaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for RotaError {}

impl From<ClientError> for RotaError {
    fn from(err: ClientError) -> Self {
        RotaError::from_client(err)
    }
}
