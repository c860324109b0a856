//! Schedule settings specs

use crate::prelude::*;

#[test]
fn settings_start_with_rotation_off() {
    let temp = Project::empty();

    temp.rota()
        .args(&["settings"])
        .passes()
        .stdout_has("Rotation: off");
}

#[test]
fn enable_turns_rotation_on() {
    let temp = Project::empty();

    temp.rota()
        .args(&["enable"])
        .passes()
        .stdout_has("Rotation: on");
    temp.rota()
        .args(&["disable"])
        .passes()
        .stdout_has("Rotation: off");
}

#[test]
fn schedule_interval_accepts_durations() {
    let temp = Project::empty();

    temp.rota()
        .args(&["schedule", "home", "--enable", "--interval", "2h"])
        .passes()
        .stdout_has("every  120 min");
}

#[test]
fn assign_and_clear_album() {
    let temp = Project::empty();
    temp.rota().args(&["album", "create", "beaches"]).passes();

    temp.rota()
        .args(&["assign", "lock", "beaches"])
        .passes()
        .stdout_has("album: beaches");
    temp.rota()
        .args(&["assign", "lock", "--clear"])
        .passes()
        .stdout_lacks("album: beaches");
}

#[test]
fn assign_unknown_album_fails_with_hint() {
    let temp = Project::empty();

    temp.rota()
        .args(&["assign", "home", "nowhere"])
        .fails()
        .stderr_has("album not found")
        .stderr_has("rota album list");
}

#[test]
fn sync_is_stored_but_needs_both_targets() {
    let temp = Project::empty();
    let settings = temp.rota().args(&["-o", "json", "sync", "on"]).passes().json();
    assert_eq!(settings["synchronized"], true);

    // Honored only once both targets rotate the same album
    temp.rota()
        .args(&["settings"])
        .passes()
        .stdout_has("Synchronized: no");
}

#[test]
fn scaling_is_stored_per_target() {
    let temp = Project::empty();

    let settings = temp
        .rota()
        .args(&["-o", "json", "scaling", "lock", "center"])
        .passes()
        .json();
    assert_eq!(settings["lock"]["scaling"], "center");
}

#[test]
fn status_shows_armed_trigger_once_enabled() {
    let temp = Project::empty();
    temp.rota().args(&["album", "create", "beaches"]).passes();
    temp.rota().args(&["assign", "home", "beaches"]).passes();
    temp.rota()
        .args(&["schedule", "home", "--enable", "--interval", "30"])
        .passes();
    temp.rota().args(&["enable"]).passes();

    temp.rota()
        .args(&["status"])
        .passes()
        .stdout_has("Rotation: on")
        .stdout_has("armed");
}

#[test]
fn settings_survive_daemon_restart() {
    let temp = Project::empty();
    temp.rota()
        .args(&["schedule", "lock", "--interval", "45"])
        .passes();
    temp.rota().args(&["daemon", "stop"]).passes();

    temp.rota()
        .args(&["settings"])
        .passes()
        .stdout_has("every   45 min");
}
