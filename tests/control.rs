//! Integration tests for cooperative pause/step and the dashboard.

use etlflow::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Dashboard tests share one process-wide singleton slot, so they must
/// not overlap even when the test binary runs them on parallel threads.
static DASHBOARD_GUARD: Mutex<()> = Mutex::new(());

fn lock_dashboard() -> std::sync::MutexGuard<'static, ()> {
    DASHBOARD_GUARD.lock().unwrap_or_else(|e| e.into_inner())
}

#[tokio::test]
async fn pause_halts_emission_and_step_releases_one_element() {
    let ctx = Context::new();
    let buffer = BufferEndpoint::with_records(
        "buffer",
        ctx.clone(),
        (0..5).map(Record::scalar).collect(),
    );

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let flow = buffer
        .read()
        .tap(move |record| sink.lock().unwrap().push(record.clone()));

    ctx.pause_state().pause();
    let driver = tokio::spawn(async move { run(&flow).await });

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(seen.lock().unwrap().is_empty());

    ctx.pause_state().request_step();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(seen.lock().unwrap().len(), 1);

    ctx.pause_state().request_step();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(seen.lock().unwrap().len(), 2);

    ctx.pause_state().resume();
    tokio::time::timeout(Duration::from_millis(500), driver)
        .await
        .expect("resume must let the read finish")
        .unwrap()
        .unwrap();
    assert_eq!(seen.lock().unwrap().len(), 5);
}

#[tokio::test]
async fn toggle_resumes_a_paused_pipeline() {
    let ctx = Context::new();
    let buffer = BufferEndpoint::with_records(
        "buffer",
        ctx.clone(),
        vec![Record::scalar(1), Record::scalar(2)],
    );

    ctx.pause_state().toggle();
    assert!(ctx.is_paused());

    let flow = buffer.read();
    let driver = tokio::spawn(async move { run(&flow).await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    ctx.pause_state().toggle();
    assert!(!ctx.is_paused());
    tokio::time::timeout(Duration::from_millis(500), driver)
        .await
        .expect("toggle must let the read finish")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn step_while_running_is_a_no_op() {
    let ctx = Context::new();
    ctx.pause_state().request_step();

    // A step request outside of a pause must not pre-pause anything.
    assert!(!ctx.is_paused());
    ctx.wait_while_paused().await;
}

#[tokio::test]
async fn dashboard_is_a_process_singleton() {
    let _serial = lock_dashboard();

    let ctx = Context::new();
    let first = Dashboard::new(ctx.clone()).unwrap();

    let err = Dashboard::new(ctx.clone()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));

    drop(first);
    Dashboard::new(ctx).unwrap();
}

#[tokio::test]
async fn dashboard_tracks_read_lifecycle() {
    let _serial = lock_dashboard();

    let ctx = Context::new();
    let dashboard = Dashboard::new(ctx.clone()).unwrap();
    let buffer = BufferEndpoint::with_records(
        "numbers",
        ctx,
        vec![Record::scalar(7), Record::scalar(8)],
    );

    dashboard.register(&buffer);
    assert_eq!(dashboard.status("numbers"), Some(EndpointStatus::Waiting));

    run(&buffer.read()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(dashboard.status("numbers"), Some(EndpointStatus::Finished));
    let rows = dashboard.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].last_value.as_deref(), Some("8"));
}

#[tokio::test]
async fn dashboard_tracks_push_and_clear() {
    let _serial = lock_dashboard();

    let ctx = Context::new();
    let dashboard = Dashboard::new(ctx.clone()).unwrap();
    let buffer = BufferEndpoint::new("buffer", ctx);
    dashboard.register(&buffer);

    buffer.push(Record::scalar(42)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(dashboard.status("buffer"), Some(EndpointStatus::Pushed));

    buffer.clear(Selector::All).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(dashboard.status("buffer"), Some(EndpointStatus::Cleared));
}

#[tokio::test]
async fn dashboard_marks_failed_reads() {
    let _serial = lock_dashboard();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.jsonl");
    std::fs::write(&path, "not json\n").unwrap();

    let ctx = Context::new();
    let dashboard = Dashboard::new(ctx.clone()).unwrap();
    let fs_endpoint = FilesystemEndpoint::new("broken", ctx, &path);
    dashboard.register(&fs_endpoint);

    let err = run(&fs_endpoint.read()).await.unwrap_err();
    assert!(matches!(err, Error::Produce(_)));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(dashboard.status("broken"), Some(EndpointStatus::Error));
}

#[tokio::test]
async fn dashboard_unregister_drops_the_row() {
    let _serial = lock_dashboard();

    let ctx = Context::new();
    let dashboard = Dashboard::new(ctx.clone()).unwrap();
    let buffer = BufferEndpoint::new("buffer", ctx);

    dashboard.register(&buffer);
    assert!(dashboard.status("buffer").is_some());

    dashboard.unregister("buffer");
    assert!(dashboard.status("buffer").is_none());
    assert!(dashboard.rows().is_empty());
}

#[tokio::test]
async fn dashboard_quit_cancels_long_running_reads() {
    let _serial = lock_dashboard();

    let ctx = Context::new();
    let dashboard = Dashboard::new(ctx.clone()).unwrap();
    let timer = TimerEndpoint::new("timer", ctx, Duration::from_millis(5));
    dashboard.register(&timer);

    let flow = timer.read();
    let driver = tokio::spawn(async move { run(&flow).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    dashboard.request_quit();

    tokio::time::timeout(Duration::from_millis(200), driver)
        .await
        .expect("quit must complete the read")
        .unwrap()
        .unwrap();
}
