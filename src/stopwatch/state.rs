use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StopwatchStatus {
    Stopped,
    Running,
    Paused,
}

impl Default for StopwatchStatus {
    fn default() -> Self {
        StopwatchStatus::Stopped
    }
}

/// Core stopwatch state machine. Commands, ticks, and lifecycle signals all
/// take explicit `now` values so the machine never reads a clock itself;
/// whoever drives it decides what "now" means.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchState {
    pub status: StopwatchStatus,
    pub elapsed_ms: u64,
    /// Wall-clock timestamp captured when the host suspended while running;
    /// cleared by the matching resume.
    pub suspended_at: Option<DateTime<Utc>>,
    /// Time accumulated from earlier running windows; combines with
    /// `running_anchor` to compute the true elapsed duration.
    #[serde(skip)]
    pub elapsed_ms_baseline: u64,
    #[serde(skip)]
    pub running_anchor: Option<Instant>,
}

impl Default for StopwatchState {
    fn default() -> Self {
        Self {
            status: StopwatchStatus::Stopped,
            elapsed_ms: 0,
            suspended_at: None,
            elapsed_ms_baseline: 0,
            running_anchor: None,
        }
    }
}

impl StopwatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time as of `now`. Advances only while running with a live
    /// anchor; frozen while paused, stopped, or suspended.
    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        if let (StopwatchStatus::Running, Some(anchor)) = (self.status, self.running_anchor) {
            self.elapsed_ms_baseline
                .saturating_add(now.saturating_duration_since(anchor).as_millis() as u64)
        } else {
            self.elapsed_ms
        }
    }

    pub fn sync_elapsed_from_anchor(&mut self, now: Instant) {
        if let (StopwatchStatus::Running, Some(anchor)) = (self.status, self.running_anchor) {
            self.elapsed_ms = self
                .elapsed_ms_baseline
                .saturating_add(now.saturating_duration_since(anchor).as_millis() as u64);
        }
    }

    /// Stopped -> Running. Elapsed carries over (0 after a reset). No-op in
    /// any other state.
    pub fn start(&mut self, now: Instant) {
        if self.status != StopwatchStatus::Stopped {
            return;
        }
        self.status = StopwatchStatus::Running;
        self.elapsed_ms_baseline = self.elapsed_ms;
        self.running_anchor = Some(now);
    }

    /// Running -> Paused (elapsed frozen) or Paused -> Running. No-op when
    /// stopped.
    pub fn toggle(&mut self, now: Instant) {
        match self.status {
            StopwatchStatus::Running => {
                self.sync_elapsed_from_anchor(now);
                self.status = StopwatchStatus::Paused;
                self.running_anchor = None;
                self.elapsed_ms_baseline = self.elapsed_ms;
            }
            StopwatchStatus::Paused => {
                self.status = StopwatchStatus::Running;
                self.running_anchor = Some(now);
            }
            StopwatchStatus::Stopped => {}
        }
    }

    /// Running|Paused -> Stopped. Returns the final elapsed milliseconds and
    /// resets to the initial state. `None` when already stopped.
    pub fn stop(&mut self, now: Instant) -> Option<u64> {
        if self.status == StopwatchStatus::Stopped {
            return None;
        }
        self.sync_elapsed_from_anchor(now);
        let final_ms = self.elapsed_ms;
        *self = Self::default();
        Some(final_ms)
    }

    /// Host went to the background. Only meaningful while running: freezes
    /// the anchor and records the wall-clock instant so the matching resume
    /// can credit the backgrounded time.
    pub fn suspend(&mut self, wall_now: DateTime<Utc>, now: Instant) {
        if self.status != StopwatchStatus::Running || self.suspended_at.is_some() {
            return;
        }
        self.sync_elapsed_from_anchor(now);
        self.running_anchor = None;
        self.elapsed_ms_baseline = self.elapsed_ms;
        self.suspended_at = Some(wall_now);
    }

    /// Host came back to the foreground. If a suspend is pending, credits the
    /// wall-clock time spent backgrounded and restarts the anchor.
    pub fn resume(&mut self, wall_now: DateTime<Utc>, now: Instant) {
        let Some(suspended_at) = self.suspended_at.take() else {
            return;
        };
        let backgrounded_ms = (wall_now - suspended_at).num_milliseconds().max(0) as u64;
        self.elapsed_ms_baseline = self.elapsed_ms_baseline.saturating_add(backgrounded_ms);
        self.elapsed_ms = self.elapsed_ms_baseline;
        if self.status == StopwatchStatus::Running {
            self.running_anchor = Some(now);
        }
    }
}
