//! Bounded rolling history per target
//!
//! Each target keeps a FIFO window of its most recent probe samples, used to
//! derive an uptime percentage. The window is append-only with oldest-first
//! eviction: fixed capacity, O(1) append and evict, no dynamic growth.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ProbeOutcome, ProbeStatus};

/// Samples retained per target
pub const HISTORY_WINDOW: usize = 20;

/// One stored observation for a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub observed_at: DateTime<Utc>,
    pub status: ProbeStatus,
    pub latency_ms: u64,
}

impl From<&ProbeOutcome> for HistorySample {
    fn from(outcome: &ProbeOutcome) -> Self {
        Self {
            observed_at: outcome.observed_at,
            status: outcome.status,
            latency_ms: outcome.latency_ms,
        }
    }
}

/// Rolling windows of past samples, keyed by target id
#[derive(Debug, Default)]
pub struct HistoryStore {
    windows: HashMap<String, VecDeque<HistorySample>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the newest sample, evicting the oldest beyond the window size
    pub fn append(&mut self, target_id: &str, sample: HistorySample) {
        let window = self
            .windows
            .entry(target_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(HISTORY_WINDOW + 1));

        window.push_back(sample);
        while window.len() > HISTORY_WINDOW {
            window.pop_front();
        }
    }

    /// Fraction of stored samples that were Up, as a percentage with one
    /// decimal place
    ///
    /// `None` when no samples are stored - zero history is not evidence of
    /// downtime and must not read as 0%.
    pub fn uptime_ratio(&self, target_id: &str) -> Option<f64> {
        let window = self.windows.get(target_id)?;
        if window.is_empty() {
            return None;
        }

        let ups = window
            .iter()
            .filter(|sample| sample.status == ProbeStatus::Up)
            .count();

        Some((ups as f64 / window.len() as f64 * 1000.0).round() / 10.0)
    }

    /// Stored samples for a target, oldest first
    pub fn samples(&self, target_id: &str) -> Vec<HistorySample> {
        self.windows
            .get(target_id)
            .map(|window| window.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, target_id: &str) -> usize {
        self.windows.get(target_id).map_or(0, VecDeque::len)
    }
}
