// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger state machine for periodic rotation
//!
//! A Trigger owns the timer of one slot. It fires at a fixed interval and
//! never overlaps: while a rotation is in flight the slot is `Running` and
//! further ticks are ignored until it completes or fails.

use crate::clock::Clock;
use crate::effect::Effect;
use crate::event::Event;
use crate::target::{ApplyTarget, Target};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// A schedulable trigger slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerSlot {
    Home,
    Lock,
    /// Shared slot used while home and lock are synchronized
    Synchronized,
}

impl TriggerSlot {
    pub const ALL: [TriggerSlot; 3] = [
        TriggerSlot::Home,
        TriggerSlot::Lock,
        TriggerSlot::Synchronized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSlot::Home => "home",
            TriggerSlot::Lock => "lock",
            TriggerSlot::Synchronized => "synchronized",
        }
    }

    /// Timer id used by the scheduler
    pub fn timer_id(&self) -> String {
        format!("trigger:{}", self.as_str())
    }

    /// Parse a scheduler timer id back into a slot
    pub fn from_timer_id(id: &str) -> Option<Self> {
        match id.strip_prefix("trigger:")? {
            "home" => Some(TriggerSlot::Home),
            "lock" => Some(TriggerSlot::Lock),
            "synchronized" => Some(TriggerSlot::Synchronized),
            _ => None,
        }
    }

    /// Queue the slot draws from
    pub fn draw_target(&self) -> Target {
        match self {
            TriggerSlot::Home | TriggerSlot::Synchronized => Target::Home,
            TriggerSlot::Lock => Target::Lock,
        }
    }

    /// Surface(s) the drawn image is applied to
    pub fn apply_target(&self) -> ApplyTarget {
        match self {
            TriggerSlot::Home => ApplyTarget::Home,
            TriggerSlot::Lock => ApplyTarget::Lock,
            TriggerSlot::Synchronized => ApplyTarget::Both,
        }
    }
}

impl From<Target> for TriggerSlot {
    fn from(target: Target) -> Self {
        match target {
            Target::Home => TriggerSlot::Home,
            Target::Lock => TriggerSlot::Lock,
        }
    }
}

impl fmt::Display for TriggerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current state of a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerState {
    /// No timer
    Disarmed,
    /// Timer set, will fire on schedule
    Armed,
    /// A rotation is in flight (prevents overlap)
    Running,
}

impl fmt::Display for TriggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerState::Disarmed => write!(f, "disarmed"),
            TriggerState::Armed => write!(f, "armed"),
            TriggerState::Running => write!(f, "running"),
        }
    }
}

/// Events that can transition a trigger's state
#[derive(Debug, Clone)]
pub enum TriggerEvent {
    /// Arm at an interval, or change the interval of an armed trigger
    Arm { interval: Duration },
    Disarm,
    /// Timer fired, start a rotation
    Fire,
    /// Rotation finished
    Complete,
    /// Rotation failed
    Fail { error: String },
}

/// The periodic trigger of one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub slot: TriggerSlot,
    pub state: TriggerState,
    /// Interval used for the next (re)arm; kept while running
    pub interval: Option<Duration>,
    pub last_fired: Option<Instant>,
    pub next_fire: Option<Instant>,
    pub run_count: u64,
}

impl Trigger {
    pub fn new(slot: TriggerSlot) -> Self {
        Self {
            slot,
            state: TriggerState::Disarmed,
            interval: None,
            last_fired: None,
            next_fire: None,
            run_count: 0,
        }
    }

    pub fn timer_id(&self) -> String {
        self.slot.timer_id()
    }

    /// Pure state transition returning new state and effects
    pub fn transition(&self, event: TriggerEvent, clock: &impl Clock) -> (Self, Vec<Effect>) {
        match (self.state, event) {
            (TriggerState::Disarmed, TriggerEvent::Arm { interval }) => {
                let new_state = Trigger {
                    state: TriggerState::Armed,
                    interval: Some(interval),
                    next_fire: Some(clock.now() + interval),
                    ..self.clone()
                };
                let effects = vec![
                    Effect::SetTimer {
                        id: self.timer_id(),
                        duration: interval,
                    },
                    Effect::emit(Event::TriggerArmed {
                        slot: self.slot,
                        interval,
                    }),
                ];
                (new_state, effects)
            }

            // Same parameters: already in the desired state
            (TriggerState::Armed, TriggerEvent::Arm { interval })
                if self.interval == Some(interval) =>
            {
                (self.clone(), vec![])
            }

            // New interval supersedes the old timer in one batch
            (TriggerState::Armed, TriggerEvent::Arm { interval }) => {
                let new_state = Trigger {
                    interval: Some(interval),
                    next_fire: Some(clock.now() + interval),
                    ..self.clone()
                };
                let effects = vec![
                    Effect::CancelTimer {
                        id: self.timer_id(),
                    },
                    Effect::SetTimer {
                        id: self.timer_id(),
                        duration: interval,
                    },
                    Effect::emit(Event::TriggerArmed {
                        slot: self.slot,
                        interval,
                    }),
                ];
                (new_state, effects)
            }

            // Takes effect when the in-flight rotation re-arms
            (TriggerState::Running, TriggerEvent::Arm { interval }) => {
                let new_state = Trigger {
                    interval: Some(interval),
                    ..self.clone()
                };
                (new_state, vec![])
            }

            (TriggerState::Armed | TriggerState::Running, TriggerEvent::Disarm) => {
                let new_state = Trigger {
                    state: TriggerState::Disarmed,
                    next_fire: None,
                    ..self.clone()
                };
                let effects = vec![
                    Effect::CancelTimer {
                        id: self.timer_id(),
                    },
                    Effect::emit(Event::TriggerDisarmed { slot: self.slot }),
                ];
                (new_state, effects)
            }

            (TriggerState::Armed, TriggerEvent::Fire) => {
                let new_state = Trigger {
                    state: TriggerState::Running,
                    last_fired: Some(clock.now()),
                    next_fire: None,
                    ..self.clone()
                };
                let effects = vec![Effect::emit(Event::TriggerFired { slot: self.slot })];
                (new_state, effects)
            }

            (TriggerState::Running, TriggerEvent::Complete) => {
                let run_count = self.run_count + 1;
                let event = Event::TriggerCompleted {
                    slot: self.slot,
                    run_count,
                };
                self.rearm(run_count, event, clock)
            }

            (TriggerState::Running, TriggerEvent::Fail { error }) => {
                let event = Event::TriggerFailed {
                    slot: self.slot,
                    error,
                };
                self.rearm(self.run_count + 1, event, clock)
            }

            // Disarmed meanwhile, or a stray tick: nothing to do
            (state, event) => {
                tracing::debug!(slot = %self.slot, %state, ?event, "ignoring trigger event");
                (self.clone(), vec![])
            }
        }
    }

    fn rearm(&self, run_count: u64, event: Event, clock: &impl Clock) -> (Self, Vec<Effect>) {
        let Some(interval) = self.interval else {
            let new_state = Trigger {
                state: TriggerState::Disarmed,
                run_count,
                ..self.clone()
            };
            return (new_state, vec![Effect::emit(event)]);
        };
        let new_state = Trigger {
            state: TriggerState::Armed,
            next_fire: Some(clock.now() + interval),
            run_count,
            ..self.clone()
        };
        let effects = vec![
            Effect::SetTimer {
                id: self.timer_id(),
                duration: interval,
            },
            Effect::emit(event),
        ];
        (new_state, effects)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TriggerState::Armed | TriggerState::Running)
    }
}
