// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::media::{MediaError, MediaSource};
use crate::notify::{NotifyAdapter, NotifyError};
use crate::setter::{ApplyError, WallpaperSetter};
use async_trait::async_trait;
use rota_core::{ApplyTarget, ScalingPolicy};

/// Wrapper that adds tracing to any WallpaperSetter
#[derive(Clone)]
pub struct TracedSetter<S> {
    inner: S,
}

impl<S> TracedSetter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: WallpaperSetter> WallpaperSetter for TracedSetter<S> {
    async fn apply(
        &self,
        image: &str,
        target: ApplyTarget,
        scaling: ScalingPolicy,
    ) -> Result<(), ApplyError> {
        let span = tracing::info_span!("setter.apply", %target, %scaling);
        let _guard = span.enter();

        tracing::info!(image, "applying");

        // Precondition: an image reference is required
        if image.trim().is_empty() {
            tracing::error!("empty image reference");
            return Err(ApplyError::Rejected("empty image reference".to_string()));
        }

        let start = std::time::Instant::now();
        let result = self.inner.apply(image, target, scaling).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "applied"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "apply failed"
            ),
        }

        result
    }
}

/// Wrapper that adds tracing to any MediaSource
#[derive(Clone)]
pub struct TracedMediaSource<M> {
    inner: M,
}

impl<M> TracedMediaSource<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<M: MediaSource> MediaSource for TracedMediaSource<M> {
    async fn list_images(&self, folder: &str) -> Result<Vec<String>, MediaError> {
        let span = tracing::info_span!("media.list", folder);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.list_images(folder).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(images) => tracing::info!(
                count = images.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "listed"
            ),
            Err(e) => tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "listing failed"
            ),
        }

        result
    }

    async fn is_accessible(&self, image: &str) -> bool {
        let accessible = self.inner.is_accessible(image).await;
        tracing::trace!(image, accessible, "probed");
        accessible
    }
}

/// Wrapper that adds tracing to any NotifyAdapter
#[derive(Clone)]
pub struct TracedNotifier<N> {
    inner: N,
}

impl<N> TracedNotifier<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<N: NotifyAdapter> NotifyAdapter for TracedNotifier<N> {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let result = self.inner.notify(title, message).await;
        // Delivery failures never block rotation
        match &result {
            Ok(()) => tracing::debug!(title, "notified"),
            Err(e) => tracing::warn!(title, error = %e, "notification failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
