// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Media source adapters: folder listing and image accessibility

mod fs;

pub use fs::{FsMediaSource, IMAGE_EXTENSIONS};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMediaSource, MediaCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from media operations
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("folder not found: {0}")]
    FolderNotFound(String),
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },
}

/// Where images come from
#[async_trait]
pub trait MediaSource: Clone + Send + Sync + 'static {
    /// Image references directly inside `folder`, sorted
    async fn list_images(&self, folder: &str) -> Result<Vec<String>, MediaError>;

    /// Whether `image` can still be read
    async fn is_accessible(&self, image: &str) -> bool;
}
