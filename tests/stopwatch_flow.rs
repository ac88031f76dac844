use std::time::Duration;

use chrono::Utc;
use lapnote::{StopwatchController, StopwatchStatus};
use tokio::time::advance;

#[tokio::test(start_paused = true)]
async fn tap_pause_tap_stop_excludes_paused_time() {
    let stopwatch = StopwatchController::new();

    stopwatch.start().await;
    advance(Duration::from_secs(5)).await;
    assert_eq!(stopwatch.current_formatted().await, "00:00:05:00");

    // Pause for two seconds of wall time.
    stopwatch.toggle().await;
    assert_eq!(stopwatch.snapshot().await.status, StopwatchStatus::Paused);
    advance(Duration::from_secs(2)).await;
    assert_eq!(stopwatch.current_formatted().await, "00:00:05:00");

    stopwatch.toggle().await;
    let duration = stopwatch.stop().await;
    assert_eq!(duration.as_deref(), Some("00:00:05:00"));

    // Back at zero and stopped.
    let snapshot = stopwatch.snapshot().await;
    assert_eq!(snapshot.status, StopwatchStatus::Stopped);
    assert_eq!(snapshot.formatted, "00:00:00:00");
}

#[tokio::test(start_paused = true)]
async fn suspend_resume_credits_backgrounded_time() {
    let stopwatch = StopwatchController::new();

    stopwatch.start().await;
    advance(Duration::from_secs(2)).await;

    let backgrounded_at = Utc::now();
    stopwatch.suspend(backgrounded_at).await;

    // The tick clock keeps moving but the readout is frozen.
    advance(Duration::from_secs(10)).await;
    assert_eq!(stopwatch.current_formatted().await, "00:00:02:00");

    stopwatch
        .resume(backgrounded_at + chrono::Duration::seconds(5))
        .await;
    assert_eq!(stopwatch.current_formatted().await, "00:00:07:00");
    assert_eq!(stopwatch.snapshot().await.status, StopwatchStatus::Running);
}

#[tokio::test(start_paused = true)]
async fn suspend_while_paused_changes_nothing() {
    let stopwatch = StopwatchController::new();

    stopwatch.start().await;
    advance(Duration::from_secs(3)).await;
    stopwatch.toggle().await;

    let backgrounded_at = Utc::now();
    stopwatch.suspend(backgrounded_at).await;
    advance(Duration::from_secs(30)).await;
    stopwatch
        .resume(backgrounded_at + chrono::Duration::seconds(30))
        .await;

    let snapshot = stopwatch.snapshot().await;
    assert_eq!(snapshot.status, StopwatchStatus::Paused);
    assert_eq!(snapshot.formatted, "00:00:03:00");
}

#[tokio::test(start_paused = true)]
async fn commands_while_stopped_are_no_ops() {
    let stopwatch = StopwatchController::new();

    stopwatch.toggle().await;
    assert_eq!(stopwatch.snapshot().await.status, StopwatchStatus::Stopped);

    assert_eq!(stopwatch.stop().await, None);

    stopwatch.resume(Utc::now()).await;
    let snapshot = stopwatch.snapshot().await;
    assert_eq!(snapshot.status, StopwatchStatus::Stopped);
    assert_eq!(snapshot.elapsed_ms, 0);
}

#[tokio::test(start_paused = true)]
async fn ticker_publishes_snapshots_while_running() {
    let stopwatch = StopwatchController::new();
    let mut ticks = stopwatch.subscribe();

    stopwatch.start().await;

    // Wait for the readout to move; the paused clock auto-advances to each
    // pending tick.
    let snapshot = loop {
        ticks.changed().await.expect("tick channel closed");
        let snapshot = ticks.borrow_and_update().clone();
        if snapshot.elapsed_ms >= 30 {
            break snapshot;
        }
    };
    assert_eq!(snapshot.status, StopwatchStatus::Running);

    stopwatch.stop().await;
}

#[tokio::test(start_paused = true)]
async fn restarting_after_stop_begins_from_zero() {
    let stopwatch = StopwatchController::new();

    stopwatch.start().await;
    advance(Duration::from_secs(90)).await;
    assert_eq!(stopwatch.stop().await.as_deref(), Some("00:01:30:00"));

    stopwatch.start().await;
    advance(Duration::from_millis(1_500)).await;
    assert_eq!(stopwatch.stop().await.as_deref(), Some("00:00:01:50"));
}
