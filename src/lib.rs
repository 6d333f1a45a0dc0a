pub mod config;
pub mod event_log;
pub mod health;
pub mod history;
pub mod prober;
pub mod scanner;
pub mod scheduler;
pub mod state;
pub mod transport;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One monitored endpoint. Defined once at startup, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Unique key identifying this target across history and scan results
    pub id: String,

    /// Human-readable name for logs and snapshots
    pub display: Option<String>,

    /// Address probed each cycle
    pub address: String,
}

impl Target {
    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.id)
    }
}

/// Classification of a single probe attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Up,
    Degraded,
    Down,
}

/// Result of one liveness check against one target
///
/// Built fresh each cycle and immutable afterwards. `latency_ms` is 0 when
/// the target was unreachable and clamped to 9999 otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub status: ProbeStatus,
    pub latency_ms: u64,
    pub observed_at: DateTime<Utc>,

    /// Present only for Down or a degraded case with a specific cause
    pub error_detail: Option<String>,
}

/// The complete set of probe outcomes for one scheduling cycle
///
/// Invariant: every registry target has an entry. A scan result is only
/// assembled once all probes have settled; partial results never escape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub outcomes: HashMap<String, ProbeOutcome>,
    pub completed_at: DateTime<Utc>,
}
