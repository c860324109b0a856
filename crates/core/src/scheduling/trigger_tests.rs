// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use crate::effect::Effect;
use crate::event::Event;
use crate::target::{ApplyTarget, Target};
use std::time::Duration;
use yare::parameterized;

const HOUR: Duration = Duration::from_secs(3600);

fn armed(clock: &FakeClock) -> Trigger {
    let (trigger, _) = Trigger::new(TriggerSlot::Home).transition(
        TriggerEvent::Arm { interval: HOUR },
        clock,
    );
    trigger
}

fn running(clock: &FakeClock) -> Trigger {
    let (trigger, _) = armed(clock).transition(TriggerEvent::Fire, clock);
    trigger
}

#[parameterized(
    home = { TriggerSlot::Home, "trigger:home" },
    lock = { TriggerSlot::Lock, "trigger:lock" },
    synchronized = { TriggerSlot::Synchronized, "trigger:synchronized" },
)]
fn timer_ids_round_trip(slot: TriggerSlot, id: &str) {
    assert_eq!(slot.timer_id(), id);
    assert_eq!(TriggerSlot::from_timer_id(id), Some(slot));
}

#[test]
fn foreign_timer_ids_are_not_slots() {
    assert_eq!(TriggerSlot::from_timer_id("cron:home"), None);
    assert_eq!(TriggerSlot::from_timer_id("trigger:both"), None);
}

#[test]
fn synchronized_slot_draws_home_and_applies_both() {
    assert_eq!(TriggerSlot::Synchronized.draw_target(), Target::Home);
    assert_eq!(TriggerSlot::Synchronized.apply_target(), ApplyTarget::Both);
    assert_eq!(TriggerSlot::Lock.apply_target(), ApplyTarget::Lock);
}

#[test]
fn new_trigger_is_disarmed() {
    let trigger = Trigger::new(TriggerSlot::Lock);
    assert_eq!(trigger.state, TriggerState::Disarmed);
    assert!(trigger.next_fire.is_none());
    assert!(!trigger.is_active());
}

#[test]
fn arm_sets_timer() {
    let clock = FakeClock::new();
    let (trigger, effects) =
        Trigger::new(TriggerSlot::Home).transition(TriggerEvent::Arm { interval: HOUR }, &clock);

    assert_eq!(trigger.state, TriggerState::Armed);
    assert_eq!(trigger.interval, Some(HOUR));
    assert!(trigger.next_fire.is_some());
    assert_eq!(effects.len(), 2);
    assert!(effects.iter().any(|e| matches!(e, Effect::SetTimer { id, duration }
        if id == "trigger:home" && *duration == HOUR)));
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit {
        event: Event::TriggerArmed { slot: TriggerSlot::Home, .. }
    })));
}

#[test]
fn arm_with_same_interval_is_noop() {
    let clock = FakeClock::new();
    let trigger = armed(&clock);

    let (again, effects) = trigger.transition(TriggerEvent::Arm { interval: HOUR }, &clock);

    assert!(effects.is_empty());
    assert_eq!(again, trigger);
}

#[test]
fn arm_with_new_interval_cancels_then_sets() {
    let clock = FakeClock::new();
    let trigger = armed(&clock);
    let half = Duration::from_secs(1800);

    let (trigger, effects) = trigger.transition(TriggerEvent::Arm { interval: half }, &clock);

    assert_eq!(trigger.interval, Some(half));
    assert!(matches!(&effects[0], Effect::CancelTimer { id } if id == "trigger:home"));
    assert!(matches!(&effects[1], Effect::SetTimer { duration, .. } if *duration == half));
}

#[test]
fn arm_while_running_updates_interval_without_timer() {
    let clock = FakeClock::new();
    let half = Duration::from_secs(1800);

    let (trigger, effects) = running(&clock).transition(TriggerEvent::Arm { interval: half }, &clock);

    assert_eq!(trigger.state, TriggerState::Running);
    assert_eq!(trigger.interval, Some(half));
    assert!(effects.is_empty());

    let (trigger, effects) = trigger.transition(TriggerEvent::Complete, &clock);
    assert_eq!(trigger.state, TriggerState::Armed);
    assert!(effects.iter().any(|e| matches!(e, Effect::SetTimer { duration, .. }
        if *duration == half)));
}

#[test]
fn disarm_cancels_timer() {
    let clock = FakeClock::new();
    let (trigger, effects) = armed(&clock).transition(TriggerEvent::Disarm, &clock);

    assert_eq!(trigger.state, TriggerState::Disarmed);
    assert!(trigger.next_fire.is_none());
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::CancelTimer { id } if id == "trigger:home")));
}

#[test]
fn disarm_when_disarmed_is_noop() {
    let clock = FakeClock::new();
    let (_, effects) = Trigger::new(TriggerSlot::Home).transition(TriggerEvent::Disarm, &clock);
    assert!(effects.is_empty());
}

#[test]
fn fire_starts_running() {
    let clock = FakeClock::new();
    let (trigger, effects) = armed(&clock).transition(TriggerEvent::Fire, &clock);

    assert_eq!(trigger.state, TriggerState::Running);
    assert!(trigger.last_fired.is_some());
    assert!(trigger.next_fire.is_none());
    assert_eq!(effects.len(), 1);
}

#[parameterized(
    disarmed = { TriggerState::Disarmed },
    in_flight = { TriggerState::Running },
)]
fn fire_outside_armed_is_noop(state: TriggerState) {
    let clock = FakeClock::new();
    let trigger = match state {
        TriggerState::Running => running(&clock),
        _ => Trigger::new(TriggerSlot::Home),
    };
    let (after, effects) = trigger.transition(TriggerEvent::Fire, &clock);
    assert_eq!(after.state, state);
    assert!(effects.is_empty());
}

#[test]
fn complete_rearms_and_counts() {
    let clock = FakeClock::new();
    let (trigger, effects) = running(&clock).transition(TriggerEvent::Complete, &clock);

    assert_eq!(trigger.state, TriggerState::Armed);
    assert_eq!(trigger.run_count, 1);
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit {
        event: Event::TriggerCompleted { run_count: 1, .. }
    })));
}

#[test]
fn fail_rearms_so_future_firings_continue() {
    let clock = FakeClock::new();
    let (trigger, effects) = running(&clock).transition(
        TriggerEvent::Fail {
            error: "setter exited 1".to_string(),
        },
        &clock,
    );

    assert_eq!(trigger.state, TriggerState::Armed);
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::SetTimer { .. })));
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit {
        event: Event::TriggerFailed { error, .. }
    } if error == "setter exited 1")));
}

#[test]
fn complete_after_disarm_stays_disarmed() {
    let clock = FakeClock::new();
    let (trigger, _) = running(&clock).transition(TriggerEvent::Disarm, &clock);

    let (trigger, effects) = trigger.transition(TriggerEvent::Complete, &clock);

    assert_eq!(trigger.state, TriggerState::Disarmed);
    assert!(effects.is_empty());
}
