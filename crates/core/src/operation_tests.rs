// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::target::Target;

#[test]
fn folder_add_without_cover_parses() {
    let json = r#"{"op":"folder_add","id":"folder-1","album":"Nature","source":"/img/forest"}"#;

    let op: Operation = serde_json::from_str(json).unwrap();

    match op {
        Operation::FolderAdd { cover, album, .. } => {
            assert_eq!(cover, None);
            assert_eq!(album, AlbumName::new("Nature"));
        }
        other => panic!("expected FolderAdd, got {:?}", other),
    }
}

#[test]
fn operations_are_tagged_by_name() {
    let op = Operation::QueueReplace {
        queue: RotationQueue::new(Target::Lock),
    };
    let json = serde_json::to_value(&op).unwrap();
    assert_eq!(json["op"], op.name());
    assert_eq!(json["queue"]["target"], "lock");
}

#[test]
fn settings_replace_survives_json() {
    let mut settings = ScheduleSettings::default();
    settings.enabled = true;
    settings.home.album = Some(AlbumName::new("Nature"));
    let op = Operation::SettingsReplace { settings };

    let json = serde_json::to_string(&op).unwrap();
    let parsed: Operation = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, op);
}
