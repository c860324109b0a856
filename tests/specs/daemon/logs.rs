//! Daemon logs specs

use crate::prelude::*;

#[test]
fn daemon_logs_show_startup_marker() {
    let temp = Project::empty();
    temp.rota().args(&["daemon", "start"]).passes();

    temp.rota()
        .args(&["daemon", "logs", "--lines", "10"])
        .passes()
        .stdout_has("rotad: starting");
}

#[test]
fn daemon_logs_show_ready_line() {
    let temp = Project::empty();
    temp.rota().args(&["daemon", "start"]).passes();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || temp
        .daemon_log()
        .contains("Daemon ready")));
    temp.rota()
        .args(&["daemon", "logs"])
        .passes()
        .stdout_has("Daemon ready");
}

#[test]
fn daemon_logs_without_log_file() {
    let temp = Project::empty();

    temp.rota()
        .args(&["daemon", "logs"])
        .passes()
        .stdout_has("No daemon log");
}
