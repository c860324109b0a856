// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ScheduleCoordinator - sole owner of when the next rotation fires
//!
//! Holds one [`Trigger`] per slot and drives them through their state
//! machine. Every operation returns the effects (timer changes, events) the
//! runtime must execute.

use super::{Trigger, TriggerEvent, TriggerSlot, TriggerState};
use crate::clock::Clock;
use crate::effect::Effect;
use crate::settings::{SchedulePlan, SlotPlan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Snapshot of one slot for status displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerStatus {
    pub slot: TriggerSlot,
    pub state: TriggerState,
    #[serde(with = "humantime_serde")]
    pub interval: Option<Duration>,
    /// Time until the next firing, when armed
    #[serde(with = "humantime_serde")]
    pub next_in: Option<Duration>,
    pub run_count: u64,
}

/// Armed-trigger state for every slot
#[derive(Debug, Clone)]
pub struct ScheduleCoordinator {
    triggers: BTreeMap<TriggerSlot, Trigger>,
    synchronized: bool,
}

impl Default for ScheduleCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleCoordinator {
    /// Create a coordinator with every slot disarmed
    pub fn new() -> Self {
        Self {
            triggers: TriggerSlot::ALL
                .into_iter()
                .map(|slot| (slot, Trigger::new(slot)))
                .collect(),
            synchronized: false,
        }
    }

    pub fn trigger(&self, slot: TriggerSlot) -> Option<&Trigger> {
        self.triggers.get(&slot)
    }

    /// Whether the shared slot is the one in use
    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    pub fn arm(&mut self, slot: TriggerSlot, interval: Duration, clock: &impl Clock) -> Vec<Effect> {
        self.transition(slot, TriggerEvent::Arm { interval }, clock)
    }

    pub fn disarm(&mut self, slot: TriggerSlot, clock: &impl Clock) -> Vec<Effect> {
        self.transition(slot, TriggerEvent::Disarm, clock)
    }

    pub fn fire(&mut self, slot: TriggerSlot, clock: &impl Clock) -> Vec<Effect> {
        self.transition(slot, TriggerEvent::Fire, clock)
    }

    pub fn complete(&mut self, slot: TriggerSlot, clock: &impl Clock) -> Vec<Effect> {
        self.transition(slot, TriggerEvent::Complete, clock)
    }

    pub fn fail(&mut self, slot: TriggerSlot, error: String, clock: &impl Clock) -> Vec<Effect> {
        self.transition(slot, TriggerEvent::Fail { error }, clock)
    }

    /// Handle a fired scheduler timer
    ///
    /// Returns the slot when it moved to `Running` and a rotation should
    /// start. Unknown timers and ticks for slots that are not armed yield
    /// `None`.
    pub fn process_timer(
        &mut self,
        timer_id: &str,
        clock: &impl Clock,
    ) -> Option<(TriggerSlot, Vec<Effect>)> {
        let slot = TriggerSlot::from_timer_id(timer_id)?;
        let armed = self
            .triggers
            .get(&slot)
            .is_some_and(|t| t.state == TriggerState::Armed);
        if !armed {
            return None;
        }
        let effects = self.fire(slot, clock);
        Some((slot, effects))
    }

    /// Drive every slot to the desired state of `plan`
    ///
    /// When the synchronized mode flips all slots are torn down first, so
    /// the old and new layouts never run side by side.
    pub fn converge(&mut self, plan: &SchedulePlan, clock: &impl Clock) -> Vec<Effect> {
        let mut effects = Vec::new();
        if plan.synchronized != self.synchronized {
            for slot in TriggerSlot::ALL {
                effects.extend(self.disarm(slot, clock));
            }
            self.synchronized = plan.synchronized;
        }

        for (slot, desired) in [
            (TriggerSlot::Home, plan.home),
            (TriggerSlot::Lock, plan.lock),
            (TriggerSlot::Synchronized, plan.shared),
        ] {
            effects.extend(match desired {
                SlotPlan::Armed { interval } => self.arm(slot, interval, clock),
                SlotPlan::Disarmed => self.disarm(slot, clock),
            });
        }
        effects
    }

    /// Status of every slot
    pub fn status(&self, clock: &impl Clock) -> Vec<TriggerStatus> {
        let now = clock.now();
        self.triggers
            .values()
            .map(|t| TriggerStatus {
                slot: t.slot,
                state: t.state,
                interval: t.interval,
                next_in: t.next_fire.map(|at| at.saturating_duration_since(now)),
                run_count: t.run_count,
            })
            .collect()
    }

    /// Number of slots with a live timer
    pub fn armed_count(&self) -> usize {
        self.triggers
            .values()
            .filter(|t| t.state == TriggerState::Armed)
            .count()
    }

    fn transition(
        &mut self,
        slot: TriggerSlot,
        event: TriggerEvent,
        clock: &impl Clock,
    ) -> Vec<Effect> {
        if let Some(trigger) = self.triggers.get(&slot) {
            let (new_trigger, effects) = trigger.transition(event, clock);
            self.triggers.insert(slot, new_trigger);
            effects
        } else {
            vec![]
        }
    }
}
