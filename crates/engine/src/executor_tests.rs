// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rota_adapters::{FakeNotifyAdapter, FakeSetter};
use rota_core::{ApplyTarget, FakeClock, ScalingPolicy, TriggerSlot, WallpaperId};
use std::time::Duration;

struct Harness {
    executor: Executor<FakeSetter, FakeNotifyAdapter, FakeClock>,
    setter: FakeSetter,
    notify: FakeNotifyAdapter,
    clock: FakeClock,
}

fn setup() -> Harness {
    let setter = FakeSetter::new();
    let notify = FakeNotifyAdapter::new();
    let clock = FakeClock::new();
    let executor = Executor::new(
        setter.clone(),
        notify.clone(),
        Arc::new(Mutex::new(Scheduler::new())),
        clock.clone(),
    );
    Harness {
        executor,
        setter,
        notify,
        clock,
    }
}

fn apply_effect() -> Effect {
    Effect::Apply {
        target: ApplyTarget::Both,
        wallpaper: WallpaperId::new("wp-1"),
        image: "/img/a.jpg".to_string(),
        scaling: ScalingPolicy::Fit,
    }
}

#[tokio::test]
async fn executor_timer_effects() {
    let h = setup();
    let id = TriggerSlot::Home.timer_id();

    h.executor
        .execute(Effect::SetTimer {
            id: id.clone(),
            duration: Duration::from_secs(60),
        })
        .await;

    let scheduler = h.executor.scheduler();
    assert_eq!(
        scheduler.lock().unwrap().remaining(&id, h.clock.now()),
        Some(Duration::from_secs(60))
    );

    h.executor
        .execute(Effect::CancelTimer { id: id.clone() })
        .await;
    assert_eq!(scheduler.lock().unwrap().next_deadline(), None);
}

#[tokio::test]
async fn apply_success_reports_applied() {
    let h = setup();

    let event = h.executor.execute(apply_effect()).await;

    assert_eq!(
        event,
        Some(Event::WallpaperApplied {
            target: ApplyTarget::Both,
            wallpaper: WallpaperId::new("wp-1"),
            image: "/img/a.jpg".to_string(),
        })
    );
    let calls = h.setter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].scaling, ScalingPolicy::Fit);
}

#[tokio::test]
async fn apply_failure_is_reported_not_raised() {
    let h = setup();
    h.setter.fail_with("display locked");

    let event = h.executor.execute(apply_effect()).await;

    assert!(matches!(
        event,
        Some(Event::ApplyFailed { ref error, .. }) if error.contains("display locked")
    ));
}

#[tokio::test]
async fn emit_reaches_subscribers() {
    let h = setup();
    let mut rx = h.executor.subscribe();

    h.executor
        .execute(Effect::emit(Event::SettingsChanged))
        .await;

    assert_eq!(rx.recv().await.unwrap(), Event::SettingsChanged);
}

#[tokio::test]
async fn notify_effect_uses_adapter() {
    let h = setup();

    h.executor
        .execute_all(vec![Effect::Notify {
            title: "Rotation skipped".to_string(),
            message: "home has nothing to show".to_string(),
        }])
        .await;

    assert_eq!(h.notify.calls()[0].title, "Rotation skipped");
}
