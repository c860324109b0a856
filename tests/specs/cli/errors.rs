//! Argument error specs
//!
//! These fail during parsing, before any daemon is contacted.

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    let temp = Project::empty();

    temp.rota()
        .args(&["frobnicate"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn unknown_target_fails() {
    let temp = Project::empty();

    temp.rota()
        .args(&["rotate", "desk"])
        .fails()
        .stderr_has("desk");
}

#[test]
fn fractional_minute_interval_fails() {
    let temp = Project::empty();

    temp.rota()
        .args(&["schedule", "home", "--interval", "90s"])
        .fails()
        .stderr_has("whole number of minutes");
}

#[test]
fn assign_needs_album_or_clear() {
    let temp = Project::empty();

    temp.rota().args(&["assign", "home"]).fails();
}

#[test]
fn enable_and_disable_conflict() {
    let temp = Project::empty();

    temp.rota()
        .args(&["schedule", "lock", "--enable", "--disable"])
        .fails()
        .stderr_has("cannot be used with");
}

#[test]
fn failed_commands_do_not_start_a_daemon() {
    let temp = Project::empty();
    temp.rota().args(&["frobnicate"]).fails();

    assert!(!temp.state_path().join("daemon.pid").exists());
}
