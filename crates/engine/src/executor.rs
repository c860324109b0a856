// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use crate::Scheduler;
use rota_adapters::{NotifyAdapter, WallpaperSetter};
use rota_core::{Clock, Effect, Event};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Executes effects using the configured adapters
#[derive(Clone)]
pub struct Executor<S, N, C> {
    setter: S,
    notify: N,
    scheduler: Arc<Mutex<Scheduler>>,
    events: broadcast::Sender<Event>,
    clock: C,
}

impl<S, N, C> Executor<S, N, C>
where
    S: WallpaperSetter,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(
        setter: S,
        notify: N,
        scheduler: Arc<Mutex<Scheduler>>,
        clock: C,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            setter,
            notify,
            scheduler,
            events,
            clock,
        }
    }

    /// Execute a single effect with tracing
    ///
    /// Returns an optional event that should be fed back to the caller.
    /// Adapter failures come back as events, so execution itself cannot fail.
    pub async fn execute(&self, effect: Effect) -> Option<Event> {
        use rota_core::TracedEffect;

        let op_name = effect.name();
        let span = tracing::info_span!("effect", effect = op_name);
        let _guard = span.enter();

        tracing::info!(fields = ?effect.fields(), "executing");

        let start = std::time::Instant::now();
        let event = self.execute_inner(effect).await;
        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            has_event = event.is_some(),
            "completed"
        );

        event
    }

    async fn execute_inner(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::Emit { event } => {
                tracing::info!(event = event.name(), detail = ?event, "event");
                // No subscribers is fine
                let _ = self.events.send(event);
                None
            }

            Effect::SetTimer { id, duration } => {
                let now = self.clock.now();
                self.scheduler
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .set_timer(id, duration, now);
                None
            }

            Effect::CancelTimer { id } => {
                self.scheduler
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .cancel_timer(&id);
                None
            }

            Effect::Apply {
                target,
                wallpaper,
                image,
                scaling,
            } => {
                // TracedSetter handles logging and precondition validation
                let event = match self.setter.apply(&image, target, scaling).await {
                    Ok(()) => Event::WallpaperApplied {
                        target,
                        wallpaper,
                        image,
                    },
                    Err(e) => Event::ApplyFailed {
                        target,
                        wallpaper,
                        error: e.to_string(),
                    },
                };
                Some(event)
            }

            Effect::Notify { title, message } => {
                if let Err(e) = self.notify.notify(&title, &message).await {
                    tracing::warn!(title = %title, error = %e, "notification not delivered");
                }
                None
            }
        }
    }

    /// Execute multiple effects in order
    ///
    /// Returns any events that were produced by effects.
    pub async fn execute_all(&self, effects: Vec<Effect>) -> Vec<Event> {
        let mut result_events = Vec::new();
        for effect in effects {
            if let Some(event) = self.execute(effect).await {
                result_events.push(event);
            }
        }
        result_events
    }

    /// Receive every emitted event
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn scheduler(&self) -> Arc<Mutex<Scheduler>> {
        Arc::clone(&self.scheduler)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
