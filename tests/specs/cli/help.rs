//! Help output specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn help_lists_top_level_commands() {
    let temp = Project::empty();

    let run = temp.rota().args(&["--help"]).passes();
    for command in [
        "daemon", "status", "enable", "disable", "schedule", "sync", "separate", "scaling",
        "assign", "rotate", "preview", "album", "folder",
    ] {
        assert!(
            predicate::str::contains(command).eval(&run.stdout()),
            "help is missing {command}"
        );
    }
}

#[test]
fn album_help_lists_subcommands() {
    let temp = Project::empty();

    temp.rota()
        .args(&["album", "--help"])
        .passes()
        .stdout_has("create")
        .stdout_has("delete")
        .stdout_has("show");
}

#[test]
fn version_flag_prints_version() {
    let temp = Project::empty();

    temp.rota()
        .args(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn binaries_resolve_from_the_target_dir() {
    let rota = binary("rota");
    let rotad = binary("rotad");
    assert!(rota.exists(), "missing {}", rota.display());
    assert!(rotad.exists(), "missing {}", rotad.display());
    assert_eq!(rota.parent(), rotad.parent());
}

#[test]
fn dropping_a_project_without_a_daemon_is_quiet() {
    let temp = Project::empty();
    temp.rota().args(&["--version"]).passes();
    drop(temp);
}
