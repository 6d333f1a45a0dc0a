//! Process-wide monitor state and the read-only snapshot derived from it
//!
//! All mutable shared state lives in one [`MonitorState`] behind an
//! `Arc<RwLock>`. Probe tasks mutate nothing of their own; the scanner's
//! joining side performs every append, and everything the presentation
//! layer sees is a cloned [`StatusSnapshot`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::event_log::{EventLog, LogEntry};
use crate::history::HistoryStore;
use crate::{ProbeOutcome, ScanResult};

/// The scheduler's two phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerPhase {
    Idle,
    Scanning,
}

/// The only mutable shared state in the system
#[derive(Debug)]
pub struct MonitorState {
    /// Most recently completed scan, None until the first one finishes
    pub latest: Option<ScanResult>,

    /// Global health derived from `latest`
    pub health: Option<u8>,

    pub history: HistoryStore,
    pub log: EventLog,

    pub phase: SchedulerPhase,
    pub last_completed: Option<DateTime<Utc>>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self {
            latest: None,
            health: None,
            history: HistoryStore::new(),
            log: EventLog::new(),
            phase: SchedulerPhase::Idle,
            last_completed: None,
        }
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-target view assembled for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetStatus {
    pub id: String,
    pub display_name: String,

    /// Outcome from the latest completed scan, if any
    pub outcome: Option<ProbeOutcome>,

    /// History-derived uptime percentage; None while no history exists
    pub uptime_percent: Option<f64>,
}

/// Read-only copy of the monitor state for external consumers
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub health: Option<u8>,
    pub targets: Vec<TargetStatus>,

    /// Event log contents, oldest first
    pub log: Vec<LogEntry>,

    pub phase: SchedulerPhase,
    pub last_completed: Option<DateTime<Utc>>,
}
