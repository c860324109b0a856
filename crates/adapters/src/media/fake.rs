// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake media source for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MediaError, MediaSource};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Recorded media call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    List { folder: String },
    Probe { image: String },
}

#[derive(Default)]
struct FakeMedia {
    folders: HashMap<String, Vec<String>>,
    missing: HashSet<String>,
}

/// In-memory media source
///
/// Every image is accessible unless marked missing.
#[derive(Clone, Default)]
pub struct FakeMediaSource {
    media: Arc<Mutex<FakeMedia>>,
    calls: Arc<Mutex<Vec<MediaCall>>>,
}

impl FakeMediaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listing of a folder
    pub fn set_folder(&self, folder: &str, images: &[&str]) {
        let mut media = self.media.lock().unwrap_or_else(|e| e.into_inner());
        let mut images: Vec<String> = images.iter().map(|s| s.to_string()).collect();
        images.sort();
        media.folders.insert(folder.to_string(), images);
    }

    /// Make an image inaccessible
    pub fn remove_image(&self, image: &str) {
        let mut media = self.media.lock().unwrap_or_else(|e| e.into_inner());
        media.missing.insert(image.to_string());
        for images in media.folders.values_mut() {
            images.retain(|i| i != image);
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: MediaCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl MediaSource for FakeMediaSource {
    async fn list_images(&self, folder: &str) -> Result<Vec<String>, MediaError> {
        self.record(MediaCall::List {
            folder: folder.to_string(),
        });
        let media = self.media.lock().unwrap_or_else(|e| e.into_inner());
        media
            .folders
            .get(folder)
            .cloned()
            .ok_or_else(|| MediaError::FolderNotFound(folder.to_string()))
    }

    async fn is_accessible(&self, image: &str) -> bool {
        self.record(MediaCall::Probe {
            image: image.to_string(),
        });
        let media = self.media.lock().unwrap_or_else(|e| e.into_inner());
        !media.missing.contains(image)
    }
}
