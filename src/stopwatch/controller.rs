use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time::{self, Instant},
};

use crate::log_debug;

use super::{format::format_elapsed, StopwatchState, StopwatchStatus};

const ENABLE_LOGS: bool = false;

/// Cadence at which tick snapshots are published while running.
const TICK_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchSnapshot {
    pub status: StopwatchStatus,
    pub elapsed_ms: u64,
    pub formatted: String,
}

impl StopwatchSnapshot {
    fn of(state: &StopwatchState, now: Instant) -> Self {
        let elapsed_ms = state.elapsed_ms(now);
        Self {
            status: state.status,
            elapsed_ms,
            formatted: format_elapsed(elapsed_ms),
        }
    }

    fn idle() -> Self {
        Self {
            status: StopwatchStatus::Stopped,
            elapsed_ms: 0,
            formatted: format_elapsed(0),
        }
    }
}

/// Drives a [`StopwatchState`] from user commands and host lifecycle
/// signals, and publishes a snapshot on every tick for whoever renders the
/// readout. All mutation goes through one async mutex, so commands, ticks,
/// and suspend/resume signals are totally ordered no matter which task they
/// arrive from.
#[derive(Clone)]
pub struct StopwatchController {
    state: Arc<Mutex<StopwatchState>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    snapshot_tx: watch::Sender<StopwatchSnapshot>,
}

impl Default for StopwatchController {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwatchController {
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(StopwatchSnapshot::idle());
        Self {
            state: Arc::new(Mutex::new(StopwatchState::new())),
            ticker: Arc::new(Mutex::new(None)),
            snapshot_tx,
        }
    }

    /// Tick notification channel. Holds the latest snapshot; receivers see
    /// one update per tick while running plus one per state change.
    pub fn subscribe(&self) -> watch::Receiver<StopwatchSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> StopwatchSnapshot {
        let state = self.state.lock().await;
        StopwatchSnapshot::of(&state, Instant::now())
    }

    pub async fn current_formatted(&self) -> String {
        self.snapshot().await.formatted
    }

    /// Stopped -> Running. Ignored in any other state.
    pub async fn start(&self) {
        {
            let mut state = self.state.lock().await;
            if state.status != StopwatchStatus::Stopped {
                return;
            }
            state.start(Instant::now());
        }
        self.spawn_ticker().await;
        self.publish().await;
    }

    /// Pause when running, resume when paused. Ignored when stopped.
    pub async fn toggle(&self) {
        let now_running = {
            let mut state = self.state.lock().await;
            if state.status == StopwatchStatus::Stopped {
                return;
            }
            state.toggle(Instant::now());
            state.status == StopwatchStatus::Running
        };
        if now_running {
            self.spawn_ticker().await;
        } else {
            self.cancel_ticker().await;
        }
        self.publish().await;
    }

    /// Finalize the current run. Returns the formatted duration so the
    /// caller can attach a note and persist the record; the stopwatch is
    /// back at zero when this returns. `None` when already stopped.
    pub async fn stop(&self) -> Option<String> {
        let final_ms = {
            let mut state = self.state.lock().await;
            state.stop(Instant::now())?
        };
        self.cancel_ticker().await;
        self.publish().await;
        Some(format_elapsed(final_ms))
    }

    /// Host is going to the background at `now`. Freezes the tick source;
    /// only meaningful while running.
    pub async fn suspend(&self, now: DateTime<Utc>) {
        let was_running = {
            let mut state = self.state.lock().await;
            let was_running = state.status == StopwatchStatus::Running;
            state.suspend(now, Instant::now());
            was_running
        };
        if was_running {
            self.cancel_ticker().await;
        }
    }

    /// Host returned to the foreground at `now`. Credits the backgrounded
    /// wall-clock time and restarts the tick source if a suspend was
    /// pending.
    pub async fn resume(&self, now: DateTime<Utc>) {
        let resumed = {
            let mut state = self.state.lock().await;
            let had_pending = state.suspended_at.is_some();
            state.resume(now, Instant::now());
            had_pending
        };
        if resumed {
            self.spawn_ticker().await;
            self.publish().await;
        }
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let snapshot_tx = self.snapshot_tx.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(TICK_INTERVAL);
            loop {
                interval.tick().await;

                let snapshot = {
                    let state = state.lock().await;
                    if state.status != StopwatchStatus::Running || state.suspended_at.is_some() {
                        break;
                    }
                    StopwatchSnapshot::of(&state, Instant::now())
                };

                log_debug!("tick: {}", snapshot.formatted);
                snapshot_tx.send_replace(snapshot);
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn publish(&self) {
        let snapshot = self.snapshot().await;
        self.snapshot_tx.send_replace(snapshot);
    }
}
