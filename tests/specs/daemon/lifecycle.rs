//! Daemon lifecycle specs
//!
//! Verify daemon start/stop/status lifecycle.

use crate::prelude::*;

#[test]
fn daemon_status_reports_not_running() {
    let temp = Project::empty();

    temp.rota()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_start_reports_success() {
    let temp = Project::empty();

    temp.rota()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon started");
}

#[test]
fn daemon_start_twice_reports_already_running() {
    let temp = Project::empty();
    temp.rota().args(&["daemon", "start"]).passes();

    temp.rota()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon already running");
}

#[test]
fn daemon_status_shows_version_and_uptime() {
    let temp = Project::empty();
    temp.rota().args(&["daemon", "start"]).passes();

    temp.rota()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon running")
        .stdout_has(&format!("Version: {}", env!("CARGO_PKG_VERSION")))
        .stdout_has("Uptime:");
}

#[test]
fn daemon_status_json_has_pid() {
    let temp = Project::empty();
    temp.rota().args(&["daemon", "start"]).passes();

    let status = temp.rota().args(&["-o", "json", "daemon", "status"]).passes().json();
    assert_eq!(status["running"], true);
    assert!(status["pid"].as_u64().is_some());
}

#[test]
fn daemon_stop_reports_success() {
    let temp = Project::empty();
    temp.rota().args(&["daemon", "start"]).passes();

    temp.rota()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon stopped");
}

#[test]
fn daemon_stop_without_daemon_is_harmless() {
    let temp = Project::empty();

    temp.rota()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_stop_removes_runtime_files() {
    let temp = Project::empty();
    temp.rota().args(&["daemon", "start"]).passes();
    temp.rota().args(&["daemon", "stop"]).passes();

    let state = temp.state_path();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || {
        !state.join("daemon.pid").exists() && !state.join("daemon.version").exists()
    }));
    assert!(!temp.socket_dir().join("rotad.sock").exists());
}

#[test]
fn daemon_writes_version_file() {
    let temp = Project::empty();
    temp.rota().args(&["daemon", "start"]).passes();

    let version_file = temp.state_path().join("daemon.version");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || version_file.exists()));
    let version = std::fs::read_to_string(version_file).unwrap();
    assert_eq!(version.trim(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn any_command_starts_the_daemon() {
    let temp = Project::empty();

    temp.rota().args(&["settings"]).passes();
    temp.rota()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon running");
}

#[test]
fn invalid_config_fails_startup_with_reason() {
    let temp = Project::empty();
    temp.config("[daemon]\ntick = \"0s\"\n");

    temp.rota()
        .args(&["daemon", "start"])
        .fails()
        .stderr_has("tick");
}
