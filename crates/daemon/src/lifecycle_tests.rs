// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rota_core::{AlbumName, Target, TriggerState};
use rota_daemon::protocol::{self, Request, Response};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::UnixStream;
use tokio::task::JoinHandle;

fn paths() -> (TempDir, DaemonPaths) {
    let dir = tempfile::tempdir().unwrap();
    let paths = DaemonPaths::new(&dir.path().join("state"), &dir.path().join("sock"));
    (dir, paths)
}

/// Serve one request over a socket pair the way the event loop does
fn send(daemon: &DaemonState, request: Request) -> JoinHandle<Response> {
    let ctx = daemon.connection_context();
    tokio::spawn(async move {
        let (client, server) = UnixStream::pair().unwrap();
        let serving = tokio::spawn(crate::server::handle_connection(ctx, server));
        let (mut reader, mut writer) = client.into_split();
        let bytes = protocol::encode(&request).unwrap();
        protocol::write_message(&mut writer, &bytes).await.unwrap();
        let response = protocol::decode(&protocol::read_message(&mut reader).await.unwrap()).unwrap();
        serving.await.unwrap().unwrap();
        response
    })
}

#[tokio::test]
async fn startup_creates_files_and_shutdown_removes_them() {
    let (_dir, paths) = paths();
    let mut daemon = startup(&paths, DaemonConfig::default()).await.unwrap();

    assert!(paths.socket_path.exists());
    assert!(paths.version_path.exists());
    let pid = std::fs::read_to_string(&paths.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());

    daemon.shutdown().await.unwrap();
    assert!(!paths.socket_path.exists());
    assert!(!paths.lock_path.exists());
    assert!(!paths.version_path.exists());
}

#[tokio::test]
async fn second_instance_fails_without_touching_the_first() {
    let (_dir, paths) = paths();
    let _daemon = startup(&paths, DaemonConfig::default()).await.unwrap();

    let err = startup(&paths, DaemonConfig::default()).await.err().unwrap();
    assert!(matches!(err, LifecycleError::LockFailed(_)));
    assert!(paths.socket_path.exists());
    assert!(paths.lock_path.exists());
}

#[tokio::test]
async fn state_survives_restart_and_triggers_are_rearmed() {
    let (_dir, paths) = paths();
    {
        let mut daemon = startup(&paths, DaemonConfig::default()).await.unwrap();
        let runtime = &daemon.runtime;
        let album = runtime.create_album("Nature").await.unwrap().name;
        runtime
            .set_assigned_album(Target::Home, Some(album))
            .await
            .unwrap();
        runtime
            .update_schedule(Target::Home, Some(true), Some(30))
            .await
            .unwrap();
        runtime.set_enabled(true).await.unwrap();
        daemon.shutdown().await.unwrap();
    }

    let daemon = startup(&paths, DaemonConfig::default()).await.unwrap();
    let settings = daemon.runtime.get_settings();
    assert!(settings.enabled);
    assert_eq!(settings.home.album, Some(AlbumName::new("Nature")));
    assert_eq!(settings.home.interval_minutes, 30);

    let status = daemon.runtime.status();
    let armed = status
        .triggers
        .iter()
        .filter(|t| t.state == TriggerState::Armed)
        .count();
    assert_eq!(armed, 1);
    assert!(daemon
        .runtime
        .scheduler()
        .lock()
        .unwrap()
        .next_deadline()
        .is_some());
}

#[tokio::test]
async fn startup_compacts_a_long_wal() {
    let (_dir, paths) = paths();
    {
        let mut daemon = startup(&paths, DaemonConfig::default()).await.unwrap();
        for minutes in 1..=10 {
            daemon
                .runtime
                .update_schedule(Target::Lock, None, Some(minutes))
                .await
                .unwrap();
        }
        daemon.shutdown().await.unwrap();
    }

    let mut config = DaemonConfig::default();
    config.daemon.compact_after = 5;
    let daemon = startup(&paths, config).await.unwrap();
    assert_eq!(daemon.runtime.status().wal_entries, 1);
    assert_eq!(daemon.runtime.get_settings().lock.interval_minutes, 10);
}

#[tokio::test]
async fn invalid_wal_directory_cleans_up() {
    let (_dir, paths) = paths();
    std::fs::create_dir_all(&paths.state_dir).unwrap();
    // A file where the WAL directory should be
    std::fs::write(paths.state_dir.join("wal"), b"not a directory").unwrap();

    assert!(startup(&paths, DaemonConfig::default()).await.is_err());
    assert!(!paths.lock_path.exists());
    assert!(!paths.socket_path.exists());
}

#[tokio::test]
async fn slow_rotation_does_not_hold_up_other_clients() {
    let (dir, paths) = paths();
    let image = dir.path().join("a.jpg");
    std::fs::write(&image, b"jpeg").unwrap();
    let mut config = DaemonConfig::default();
    config.setter.command = Some("sleep 2".to_string());
    config.notify.enabled = false;
    let mut daemon = startup(&paths, config).await.unwrap();

    let album = daemon.runtime.create_album("Nature").await.unwrap().name;
    daemon
        .runtime
        .add_image(&album, &image.display().to_string())
        .await
        .unwrap();
    daemon
        .runtime
        .set_assigned_album(Target::Home, Some(album))
        .await
        .unwrap();

    let rotating = send(
        &daemon,
        Request::RotateNow {
            target: Target::Home,
        },
    );
    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    assert_eq!(send(&daemon, Request::Ping).await.unwrap(), Response::Pong);
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(!rotating.is_finished());

    assert!(matches!(
        rotating.await.unwrap(),
        Response::Rotated { .. }
    ));
    daemon.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_request_reaches_the_event_loop() {
    let (_dir, paths) = paths();
    let mut daemon = startup(&paths, DaemonConfig::default()).await.unwrap();
    assert!(daemon.shutdown_requests.try_recv().is_err());

    let response = send(&daemon, Request::Shutdown).await.unwrap();

    assert_eq!(response, Response::ShuttingDown);
    assert!(daemon.shutdown_requests.try_recv().is_ok());
    daemon.shutdown().await.unwrap();
}
