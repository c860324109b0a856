//! Manual rotation specs
//!
//! The daemon runs without a setter command here, so applying always
//! succeeds without touching the desktop.

use crate::prelude::*;

fn project_with_album(images: &[&str]) -> Project {
    with_album(Project::empty(), images)
}

fn with_album(temp: Project, images: &[&str]) -> Project {
    temp.rota().args(&["album", "create", "beaches"]).passes();
    for name in images {
        let path = temp.image(&format!("pics/{name}"));
        temp.rota().args(&["album", "add", "beaches", &path]).passes();
    }
    temp
}

#[test]
fn rotate_without_album_is_skipped() {
    let temp = Project::empty();

    temp.rota()
        .args(&["rotate"])
        .passes()
        .stdout_has("Skipped home");
}

#[test]
fn rotate_applies_image_from_assigned_album() {
    let temp = project_with_album(&["sand.jpg"]);
    temp.rota().args(&["assign", "home", "beaches"]).passes();

    temp.rota()
        .args(&["rotate", "home"])
        .passes()
        .stdout_has("Applied")
        .stdout_has("sand.jpg")
        .stdout_has("to home");
}

#[test]
fn preview_matches_next_rotation() {
    let temp = project_with_album(&["a.jpg", "b.jpg", "c.jpg"]);
    temp.rota().args(&["assign", "lock", "beaches"]).passes();

    let preview = temp.rota().args(&["-o", "json", "preview", "lock"]).passes().json();
    let image = preview["image"].as_str().unwrap().to_string();

    temp.rota()
        .args(&["rotate", "lock"])
        .passes()
        .stdout_has(&image);
}

#[test]
fn preview_without_album_has_nothing_queued() {
    let temp = Project::empty();

    temp.rota()
        .args(&["preview", "lock"])
        .passes()
        .stdout_has("Nothing queued");
}

#[test]
fn rotation_cycles_through_every_image() {
    let temp = project_with_album(&["a.jpg", "b.jpg", "c.jpg"]);
    temp.rota().args(&["assign", "home", "beaches"]).passes();

    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..3 {
        let outcome = temp.rota().args(&["-o", "json", "rotate"]).passes().json();
        seen.insert(outcome["image"].as_str().unwrap().to_string());
    }
    assert_eq!(seen.len(), 3, "a cycle repeated an image: {seen:?}");
}

#[test]
fn failing_setter_reports_failure() {
    // Config is read at startup, so write it before the daemon starts
    let temp = Project::empty();
    temp.config(&format!("{QUIET_CONFIG}\n[setter]\ncommand = \"exit 3\"\n"));
    let temp = with_album(temp, &["sand.jpg"]);
    temp.rota().args(&["assign", "home", "beaches"]).passes();

    temp.rota()
        .args(&["rotate", "home"])
        .fails()
        .stdout_has("Failed to apply to home")
        .stderr_has("wallpaper not applied");
}
