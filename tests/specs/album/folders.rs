//! Folder specs

use crate::prelude::*;

fn project_with_folder() -> (Project, String) {
    let temp = Project::empty();
    temp.image("shots/one.jpg");
    temp.image("shots/two.jpeg");
    temp.file("shots/notes.txt", "not an image");
    temp.rota().args(&["album", "create", "trips"]).passes();
    let dir = temp.path().join("shots").display().to_string();
    (temp, dir)
}

#[test]
fn folder_add_imports_images_only() {
    let (temp, dir) = project_with_folder();

    temp.rota()
        .args(&["folder", "add", "trips", &dir])
        .passes()
        .stdout_has("Added folder")
        .stdout_has("2 image(s) added");
}

#[test]
fn folder_refresh_picks_up_new_files() {
    let (temp, dir) = project_with_folder();
    let added = temp
        .rota()
        .args(&["-o", "json", "folder", "add", "trips", &dir])
        .passes()
        .json();
    let id = added["folder"]["id"].as_str().unwrap().to_string();

    temp.image("shots/three.webp");
    std::fs::remove_file(temp.path().join("shots/one.jpg")).unwrap();

    temp.rota()
        .args(&["folder", "refresh", &id])
        .passes()
        .stdout_has("1 image(s) added, 1 removed");
}

#[test]
fn folder_remove_drops_its_images() {
    let (temp, dir) = project_with_folder();
    let added = temp
        .rota()
        .args(&["-o", "json", "folder", "add", "trips", &dir])
        .passes()
        .json();
    let id = added["folder"]["id"].as_str().unwrap().to_string();

    temp.rota()
        .args(&["folder", "remove", &id])
        .passes()
        .stdout_has("Removed 1 folder(s) and 2 image(s)");
    temp.rota()
        .args(&["album", "show", "trips"])
        .passes()
        .stdout_has("Images (0):");
}

#[test]
fn folder_add_to_unknown_album_fails() {
    let (temp, dir) = project_with_folder();

    temp.rota()
        .args(&["folder", "add", "nowhere", &dir])
        .fails()
        .stderr_has("album not found");
}
