// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    timer = { Event::Timer { id: "trigger:home".into() }, "timer:fired" },
    armed = { Event::TriggerArmed { slot: TriggerSlot::Lock, interval: Duration::from_secs(60) }, "trigger:armed" },
    skipped = { Event::RotationSkipped { target: Target::Home, reason: "empty".into() }, "rotation:skipped" },
    settings = { Event::SettingsChanged, "settings:changed" },
)]
fn event_names(event: Event, expected: &str) {
    assert_eq!(event.name(), expected);
}

#[test]
fn armed_event_serializes_interval_as_humantime() {
    let event = Event::TriggerArmed {
        slot: TriggerSlot::Synchronized,
        interval: Duration::from_secs(30 * 60),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "trigger_armed");
    assert_eq!(json["slot"], "synchronized");
    assert_eq!(json["interval"], "30m");
}
