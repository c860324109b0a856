// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use rota_adapters::MediaError;
use rota_core::{CatalogError, RotationError};
use rota_storage::WalError;
use thiserror::Error;

/// Errors that can occur in the runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Rotation(#[from] RotationError),
    #[error("storage error: {0}")]
    Storage(#[from] WalError),
    #[error("media error: {0}")]
    Media(#[from] MediaError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
