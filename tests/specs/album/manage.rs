//! Album management specs

use crate::prelude::*;

#[test]
fn album_list_starts_empty() {
    let temp = Project::empty();

    temp.rota()
        .args(&["album", "list"])
        .passes()
        .stdout_eq("No albums\n");
}

#[test]
fn created_album_is_listed() {
    let temp = Project::empty();
    temp.rota()
        .args(&["album", "create", "beaches"])
        .passes()
        .stdout_has("Created album beaches");

    temp.rota()
        .args(&["album", "list"])
        .passes()
        .stdout_has("NAME")
        .stdout_has("beaches");
}

#[test]
fn duplicate_album_is_rejected() {
    let temp = Project::empty();
    temp.rota().args(&["album", "create", "beaches"]).passes();

    temp.rota()
        .args(&["album", "create", "beaches"])
        .fails()
        .stderr_has("album already exists");
}

#[test]
fn added_images_show_up_in_album() {
    let temp = Project::empty();
    let sand = temp.image("pics/sand.jpg");
    let surf = temp.image("pics/surf.png");
    temp.rota().args(&["album", "create", "beaches"]).passes();

    temp.rota()
        .args(&["album", "add", "beaches", &sand, &surf])
        .passes()
        .stdout_has("sand.jpg")
        .stdout_has("surf.png");

    temp.rota()
        .args(&["album", "show", "beaches"])
        .passes()
        .stdout_has("Album: beaches")
        .stdout_has("Images (2):");
}

#[test]
fn relative_image_paths_are_made_absolute() {
    let temp = Project::empty();
    temp.image("sand.jpg");
    temp.rota().args(&["album", "create", "beaches"]).passes();

    let added = temp
        .rota()
        .args(&["-o", "json", "album", "add", "beaches", "sand.jpg"])
        .passes()
        .json();
    let source = added[0]["source"].as_str().unwrap();
    assert!(source.starts_with('/'), "not absolute: {source}");
}

#[test]
fn missing_image_is_rejected() {
    let temp = Project::empty();
    temp.rota().args(&["album", "create", "beaches"]).passes();

    temp.rota()
        .args(&["album", "add", "beaches", "/nonexistent/sand.jpg"])
        .fails()
        .stderr_has("not accessible");
}

#[test]
fn show_unknown_album_fails() {
    let temp = Project::empty();

    temp.rota()
        .args(&["album", "show", "nowhere"])
        .fails()
        .stderr_has("album not found");
}

#[test]
fn removed_image_leaves_album() {
    let temp = Project::empty();
    let sand = temp.image("sand.jpg");
    temp.rota().args(&["album", "create", "beaches"]).passes();
    let added = temp
        .rota()
        .args(&["-o", "json", "album", "add", "beaches", &sand])
        .passes()
        .json();
    let id = added[0]["id"].as_str().unwrap().to_string();

    temp.rota()
        .args(&["album", "remove", &id])
        .passes()
        .stdout_has("from beaches");
    temp.rota()
        .args(&["album", "show", "beaches"])
        .passes()
        .stdout_has("Images (0):");
}

#[test]
fn deleting_album_reports_cascade() {
    let temp = Project::empty();
    let sand = temp.image("sand.jpg");
    temp.rota().args(&["album", "create", "beaches"]).passes();
    temp.rota().args(&["album", "add", "beaches", &sand]).passes();

    temp.rota()
        .args(&["album", "delete", "beaches"])
        .passes()
        .stdout_has("Deleted album beaches")
        .stdout_has("1 image(s)");
    temp.rota()
        .args(&["album", "list"])
        .passes()
        .stdout_has("No albums");
}

#[test]
fn albums_survive_daemon_restart() {
    let temp = Project::empty();
    temp.rota().args(&["album", "create", "beaches"]).passes();
    temp.rota().args(&["daemon", "stop"]).passes();

    temp.rota()
        .args(&["album", "list"])
        .passes()
        .stdout_has("beaches");
}
