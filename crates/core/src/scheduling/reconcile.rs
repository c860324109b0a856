// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boot reconciliation
//!
//! Rebuilds the coordinator from persisted settings. Safe to run any number
//! of times: a coordinator already matching the settings produces no effects.

use super::ScheduleCoordinator;
use crate::clock::Clock;
use crate::effect::Effect;
use crate::settings::{ScheduleConflict, ScheduleSettings};

/// Outcome of one reconcile pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Timer changes and events needed to converge
    pub effects: Vec<Effect>,
    /// Enabled targets that could not be armed
    pub conflicts: Vec<ScheduleConflict>,
    pub synchronized: bool,
}

impl Reconciliation {
    /// Whether any timer was touched
    pub fn changed(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, Effect::SetTimer { .. } | Effect::CancelTimer { .. }))
    }
}

/// Converge the coordinator onto `settings`
pub fn reconcile(
    settings: &ScheduleSettings,
    coordinator: &mut ScheduleCoordinator,
    clock: &impl Clock,
) -> Reconciliation {
    let plan = settings.plan();
    let effects = coordinator.converge(&plan, clock);
    Reconciliation {
        effects,
        conflicts: plan.conflicts,
        synchronized: plan.synchronized,
    }
}
