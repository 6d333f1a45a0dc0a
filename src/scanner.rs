//! Scan orchestrator
//!
//! Fans one probe task out per target, lets each completion append its own
//! history sample and log event, then joins all of them before assembling
//! the scan result and recomputing global health. A scan is all-or-nothing:
//! partial results are never published.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, error, instrument, trace};

use crate::event_log::Severity;
use crate::health::compute_health;
use crate::history::HistorySample;
use crate::prober::probe;
use crate::state::{MonitorState, SchedulerPhase, StatusSnapshot, TargetStatus};
use crate::transport::Transport;
use crate::{ProbeOutcome, ProbeStatus, ScanResult, Target};

/// A scan summary below this health is logged at Error severity
const UNHEALTHY_SUMMARY_BELOW: u8 = 80;

/// Orchestrates concurrent probes over the target registry
///
/// Shared behind an `Arc` between the scheduler and any manual trigger.
/// The `scanning` flag is the single-flight guard: whoever wins the
/// compare-exchange runs the scan, everyone else gets an immediate no-op.
pub struct Scanner {
    targets: Vec<Target>,
    timeout: Duration,
    transport: Arc<dyn Transport>,
    state: Arc<RwLock<MonitorState>>,
    scanning: AtomicBool,
}

impl Scanner {
    pub fn new(targets: Vec<Target>, timeout: Duration, transport: Arc<dyn Transport>) -> Self {
        Self {
            targets,
            timeout,
            transport,
            state: Arc::new(RwLock::new(MonitorState::new())),
            scanning: AtomicBool::new(false),
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Run one full scan cycle
    ///
    /// Returns `None` without doing anything when a scan is already in
    /// progress. Otherwise probes every target concurrently, waits for all
    /// of them to settle (a failing probe never cancels its siblings), and
    /// returns the completed result after publishing it.
    #[instrument(skip(self))]
    pub async fn run_scan(&self) -> Option<ScanResult> {
        if self
            .scanning
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("scan already in progress, ignoring trigger");
            return None;
        }

        debug!("starting scan of {} targets", self.targets.len());

        {
            let mut state = self.state.write().await;
            state.phase = SchedulerPhase::Scanning;
            state.log.append(
                format!("Scan started for {} targets", self.targets.len()),
                Severity::Info,
            );
        }

        let mut tasks = Vec::with_capacity(self.targets.len());
        for target in self.targets.iter().cloned() {
            let transport = Arc::clone(&self.transport);
            let state = Arc::clone(&self.state);
            let timeout = self.timeout;

            tasks.push(tokio::spawn(async move {
                let outcome = probe(transport.as_ref(), &target, timeout).await;

                // Each completion appends independently, without waiting for
                // sibling probes. Ordering between targets is unspecified;
                // all appends land before the scan result is assembled.
                let mut state = state.write().await;
                state
                    .history
                    .append(&target.id, HistorySample::from(&outcome));
                state
                    .log
                    .append(describe(&target, &outcome), Severity::from(outcome.status));
                drop(state);

                (target.id, outcome)
            }));
        }

        let mut outcomes = HashMap::with_capacity(self.targets.len());
        for (target, joined) in self.targets.iter().zip(join_all(tasks).await) {
            match joined {
                Ok((id, outcome)) => {
                    outcomes.insert(id, outcome);
                }
                Err(e) => {
                    // Unreachable in practice: probes are total. Synthesize
                    // a Down outcome so the scan stays complete regardless.
                    error!("probe task for {} failed: {e}", target.id);
                    outcomes.insert(
                        target.id.clone(),
                        ProbeOutcome {
                            status: ProbeStatus::Down,
                            latency_ms: 0,
                            observed_at: Utc::now(),
                            error_detail: Some("Probe task failed".to_string()),
                        },
                    );
                }
            }
        }

        let scan = ScanResult {
            outcomes,
            completed_at: Utc::now(),
        };
        let health = compute_health(&scan);

        {
            let mut state = self.state.write().await;
            let severity = if health < UNHEALTHY_SUMMARY_BELOW {
                Severity::Error
            } else {
                Severity::Success
            };
            state
                .log
                .append(format!("Scan complete: global health {health}%"), severity);
            state.latest = Some(scan.clone());
            state.health = Some(health);
            state.last_completed = Some(scan.completed_at);
            state.phase = SchedulerPhase::Idle;
        }

        self.scanning.store(false, Ordering::SeqCst);

        trace!("scan finished with health {health}");
        Some(scan)
    }

    /// Read-only snapshot of the current monitor state
    pub async fn snapshot(&self) -> StatusSnapshot {
        let state = self.state.read().await;

        let targets = self
            .targets
            .iter()
            .map(|target| TargetStatus {
                id: target.id.clone(),
                display_name: target.display_name().to_string(),
                outcome: state
                    .latest
                    .as_ref()
                    .and_then(|scan| scan.outcomes.get(&target.id).cloned()),
                uptime_percent: state.history.uptime_ratio(&target.id),
            })
            .collect();

        StatusSnapshot {
            health: state.health,
            targets,
            log: state.log.entries().cloned().collect(),
            phase: state.phase,
            last_completed: state.last_completed,
        }
    }
}

fn describe(target: &Target, outcome: &ProbeOutcome) -> String {
    match outcome.status {
        ProbeStatus::Up => format!(
            "{}: responding ({}ms)",
            target.display_name(),
            outcome.latency_ms
        ),
        ProbeStatus::Degraded => format!(
            "{}: degraded ({}ms){}",
            target.display_name(),
            outcome.latency_ms,
            outcome
                .error_detail
                .as_deref()
                .map(|detail| format!(" - {detail}"))
                .unwrap_or_default()
        ),
        ProbeStatus::Down => format!(
            "{}: down ({})",
            target.display_name(),
            outcome.error_detail.as_deref().unwrap_or("unreachable")
        ),
    }
}
