// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling primitives for periodic rotation
//!
//! - **Trigger**: per-slot timer state machine
//! - **ScheduleCoordinator**: owns every trigger and converges them on a plan
//! - **reconcile**: idempotent rebuild of the coordinator from settings

mod coordinator;
mod reconcile;
mod trigger;

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod trigger_tests;



pub use coordinator::{ScheduleCoordinator, TriggerStatus};
pub use reconcile::{reconcile, Reconciliation};
pub use trigger::{Trigger, TriggerEvent, TriggerSlot, TriggerState};
