//! Aggregated run state
//!
//! [`SimulatorState`] is written by the consumption task only and published
//! through a `tokio::sync::watch` channel. Observers hold a [`StateWatch`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::watch;
use vahti_core::{AlarmEvent, DispatchLog, Severity};

/// Pipeline lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    /// Reserved; no transition reaches it yet
    Paused,
    Stopped,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Paused => "paused",
            RunStatus::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters and recent windows of one run
///
/// `recent_events` and `recent_logs` are most-recent-first and never longer
/// than `capacity`. Counters only grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorState {
    pub status: RunStatus,
    pub total_events: u64,
    pub critical_count: u64,
    pub warning_count: u64,
    pub info_count: u64,
    /// Every log produced, successful or not
    pub dispatched_count: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub recent_events: VecDeque<AlarmEvent>,
    pub recent_logs: VecDeque<DispatchLog>,
    pub capacity: usize,
}

impl SimulatorState {
    /// Idle state with recent windows of `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            status: RunStatus::Idle,
            total_events: 0,
            critical_count: 0,
            warning_count: 0,
            info_count: 0,
            dispatched_count: 0,
            started_at: None,
            finished_at: None,
            recent_events: VecDeque::with_capacity(capacity),
            recent_logs: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Fold one processed event and its logs into the state
    ///
    /// Logs are prepended in order, so the last log of the batch ends up
    /// first.
    pub fn record(&mut self, event: &AlarmEvent, logs: &[DispatchLog]) {
        self.total_events += 1;
        match event.severity {
            Severity::Critical => self.critical_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Info => self.info_count += 1,
        }
        self.dispatched_count += logs.len() as u64;

        self.recent_events.push_front(event.clone());
        self.recent_events.truncate(self.capacity);

        for log in logs {
            self.recent_logs.push_front(log.clone());
        }
        self.recent_logs.truncate(self.capacity);
    }

    /// Enter `Running`, stamping `started_at`
    pub fn mark_running(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
        self.finished_at = None;
    }

    /// Enter `Stopped`, stamping `finished_at`
    pub fn mark_stopped(&mut self) {
        self.status = RunStatus::Stopped;
        self.finished_at = Some(Utc::now());
    }
}

impl Default for SimulatorState {
    fn default() -> Self {
        Self::new(50)
    }
}

/// Read side of the state channel
///
/// Cloneable; every clone observes the same updates.
#[derive(Debug, Clone)]
pub struct StateWatch {
    rx: watch::Receiver<SimulatorState>,
}

impl StateWatch {
    pub(crate) fn new(rx: watch::Receiver<SimulatorState>) -> Self {
        Self { rx }
    }

    /// Copy of the latest state
    pub fn snapshot(&self) -> SimulatorState {
        self.rx.borrow().clone()
    }

    /// Wait for the next update
    ///
    /// Returns `false` once the pipeline has gone away and no further
    /// updates will arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Status of the latest state, without cloning it
    pub fn status(&self) -> RunStatus {
        self.rx.borrow().status
    }
}
