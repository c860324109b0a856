// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local filesystem media source

use super::{MediaError, MediaSource};
use async_trait::async_trait;
use std::io;
use std::path::Path;

/// File extensions treated as images (compared case-insensitively)
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff", "heic", "avif",
];

/// Media source backed by local directories
#[derive(Clone, Copy, Debug, Default)]
pub struct FsMediaSource;

impl FsMediaSource {
    pub fn new() -> Self {
        Self
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn io_error(path: &str, e: io::Error) -> MediaError {
    match e.kind() {
        io::ErrorKind::NotFound => MediaError::FolderNotFound(path.to_string()),
        _ => MediaError::Io {
            path: path.to_string(),
            message: e.to_string(),
        },
    }
}

#[async_trait]
impl MediaSource for FsMediaSource {
    async fn list_images(&self, folder: &str) -> Result<Vec<String>, MediaError> {
        let metadata = tokio::fs::metadata(folder)
            .await
            .map_err(|e| io_error(folder, e))?;
        if !metadata.is_dir() {
            return Err(MediaError::NotADirectory(folder.to_string()));
        }

        let mut entries = tokio::fs::read_dir(folder)
            .await
            .map_err(|e| io_error(folder, e))?;
        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(folder, e))? {
            let path = entry.path();
            let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
            if is_file && is_image(&path) {
                images.push(path.display().to_string());
            }
        }
        images.sort();
        Ok(images)
    }

    async fn is_accessible(&self, image: &str) -> bool {
        tokio::fs::metadata(image)
            .await
            .is_ok_and(|m| m.is_file())
    }
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
