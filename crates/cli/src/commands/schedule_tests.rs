// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    bare_minutes = { "15", 15 },
    zero = { "0", 0 },
    minutes = { "90m", 90 },
    hours = { "2h", 120 },
    mixed = { "1h 30m", 90 },
    day = { "1day", 1440 },
)]
fn parses_interval(input: &str, minutes: u32) {
    assert_eq!(parse_interval(input), Ok(minutes));
}

#[parameterized(
    seconds = { "90s" },
    fraction = { "1500ms" },
    words = { "often" },
    negative = { "-5" },
)]
fn rejects_interval(input: &str) {
    assert!(parse_interval(input).is_err());
}

#[test]
fn toggle_is_on() {
    assert!(Toggle::On.is_on());
    assert!(!Toggle::Off.is_on());
}
