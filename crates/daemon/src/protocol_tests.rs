// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol unit tests

use super::*;
use chrono::{TimeZone, Utc};
use rota_engine::QueueStatus;

#[test]
fn encode_decode_roundtrip_request() {
    let request = Request::UpdateSchedule {
        target: Target::Lock,
        enabled: Some(true),
        interval_minutes: None,
    };

    let encoded = encode(&request).expect("encode failed");
    let decoded: Request = decode(&encoded).expect("decode failed");

    assert_eq!(request, decoded);
}

#[test]
fn encode_decode_query() {
    let request = Request::Query {
        query: Query::GetAlbum {
            name: AlbumName::new("Nature"),
        },
    };

    let encoded = encode(&request).expect("encode failed");
    let decoded: Request = decode(&encoded).expect("decode failed");

    assert_eq!(request, decoded);
}

#[test]
fn request_wire_format_is_tagged() {
    let encoded = encode(&Request::RotateNow {
        target: Target::Home,
    })
    .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(json["type"], "RotateNow");
    assert_eq!(json["target"], "home");
}

#[test]
fn status_response_roundtrip() {
    let response = Response::Status {
        uptime_secs: 3600,
        status: Box::new(RuntimeStatus {
            enabled: true,
            synchronized: false,
            triggers: Vec::new(),
            queues: vec![QueueStatus {
                target: Target::Home,
                album: Some(AlbumName::new("Nature")),
                size: 3,
                remaining: 2,
                last_drawn: Some(WallpaperId::new("wp-1")),
                next: Some(WallpaperId::new("wp-2")),
            }],
            conflicts: Vec::new(),
            wal_entries: 12,
        }),
    };

    let encoded = encode(&response).expect("encode failed");
    let decoded: Response = decode(&encoded).expect("decode failed");

    assert_eq!(response, decoded);
}

#[test]
fn rotated_response_keeps_outcome_tag() {
    let response = Response::Rotated {
        outcome: RotationOutcome::Skipped {
            target: Target::Lock,
            reason: "no wallpapers available".to_string(),
        },
    };

    let encoded = encode(&response).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(json["type"], "Rotated");
    assert_eq!(json["outcome"]["outcome"], "skipped");

    let decoded: Response = decode(&encoded).unwrap();
    assert_eq!(response, decoded);
}

#[test]
fn album_created_roundtrip() {
    let response = Response::AlbumCreated {
        album: Album {
            name: AlbumName::new("Nature"),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            next_order_key: 0,
        },
    };

    let decoded: Response = decode(&encode(&response).unwrap()).unwrap();
    assert_eq!(response, decoded);
}

#[test]
fn encode_returns_json_without_length_prefix() {
    let response = Response::Ok;
    let encoded = encode(&response).expect("encode failed");

    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert!(
        json_str.starts_with('{'),
        "should be JSON object: {}",
        json_str
    );
}

#[test]
fn decode_rejects_unknown_request() {
    let err = decode::<Request>(br#"{"type":"Explode"}"#).unwrap_err();
    assert!(matches!(err, ProtocolError::Json(_)));
}

#[tokio::test]
async fn read_write_message_roundtrip() {
    let original = b"hello world";

    let mut buffer = Vec::new();
    write_message(&mut buffer, original)
        .await
        .expect("write failed");

    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.expect("read failed");

    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data)
        .await
        .expect("write failed");

    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;

    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn empty_stream_is_connection_closed() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn oversized_prefix_is_rejected() {
    let prefix = ((MAX_MESSAGE_SIZE + 1) as u32).to_be_bytes().to_vec();
    let mut cursor = std::io::Cursor::new(prefix);
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooLarge { .. }));
}

#[tokio::test]
async fn request_roundtrips_through_frames() {
    let request = Request::AddFolder {
        album: AlbumName::new("Nature"),
        source: "/pictures/forest".to_string(),
        cover: None,
    };

    let mut buffer = Vec::new();
    write_message(&mut buffer, &encode(&request).unwrap())
        .await
        .unwrap();

    let mut cursor = std::io::Cursor::new(buffer);
    let decoded = read_request(&mut cursor, DEFAULT_TIMEOUT).await.unwrap();
    assert_eq!(decoded, request);
}
