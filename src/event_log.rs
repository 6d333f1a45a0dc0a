//! Bounded rolling event log
//!
//! Human-readable, timestamped record of scan activity, kept strictly
//! chronological with the same FIFO discipline as the history windows.
//! This is a domain artifact consumed by the presentation layer, separate
//! from the tracing output.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProbeStatus;

/// Trim threshold: an append may briefly reach this length, after which the
/// oldest entries are dropped back to one below it
pub const LOG_CAPACITY: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl From<ProbeStatus> for Severity {
    fn from(status: ProbeStatus) -> Self {
        match status {
            ProbeStatus::Up => Severity::Success,
            ProbeStatus::Degraded => Severity::Warning,
            ProbeStatus::Down => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: DateTime<Utc>,
    pub message: String,
    pub severity: Severity,
}

/// Bounded FIFO of log entries, oldest discarded first
#[derive(Debug, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: impl Into<String>, severity: Severity) {
        self.entries.push_back(LogEntry {
            time: Utc::now(),
            message: message.into(),
            severity,
        });

        while self.entries.len() >= LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Entries oldest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
