//! Single-target probe and its classification policy
//!
//! A probe never fails: every code path, including timeouts and opaque
//! transport errors, resolves to a [`ProbeOutcome`]. Retry cadence is the
//! scheduler's concern; one cycle gets exactly one timeout-bounded attempt.

use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::trace;

use crate::transport::{Transport, TransportError};
use crate::{ProbeOutcome, ProbeStatus, Target};

/// Hard bound on one probe attempt
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(10_000);

/// At or above this latency a clean response is no longer Up
const DEGRADED_FLOOR_MS: u64 = 5_000;

/// At or above this latency a degraded response carries an explicit cause
const HIGH_LATENCY_FLOOR_MS: u64 = 15_000;

/// An errored attempt slower than this is treated as a timeout
const ERROR_TIMEOUT_FLOOR_MS: u64 = 8_000;

/// Below this, an opaque transport error is inferred to be a live endpoint
const OPAQUE_UP_CEILING_MS: u64 = 3_000;

/// Latencies are clamped here before being stored or published
const MAX_REPORTED_LATENCY_MS: u64 = 9_999;

/// Classify one settled probe attempt
///
/// Two independent failure models are encoded here:
///
/// 1. A clean completion classifies purely by latency: Up below 5000 ms
///    (5000 exactly is already Degraded), Degraded otherwise, with an
///    explicit "High latency detected" cause from 15000 ms up.
/// 2. An errored attempt is Down only when the error was an explicit
///    timeout or the attempt dragged past 8000 ms. Anything else surfaced
///    fast and opaquely - some probing techniques cannot observe the real
///    status and must infer liveness from timing alone: Up under 3000 ms,
///    Degraded above, no error detail either way.
///
/// Reported latency is clamped to 9999 ms, and forced to 0 for Down.
pub fn classify(
    elapsed_ms: u64,
    error: Option<&TransportError>,
) -> (ProbeStatus, u64, Option<String>) {
    let latency = elapsed_ms.min(MAX_REPORTED_LATENCY_MS);

    match error {
        None => {
            if elapsed_ms < DEGRADED_FLOOR_MS {
                (ProbeStatus::Up, latency, None)
            } else if elapsed_ms >= HIGH_LATENCY_FLOOR_MS {
                (
                    ProbeStatus::Degraded,
                    latency,
                    Some("High latency detected".to_string()),
                )
            } else {
                (ProbeStatus::Degraded, latency, None)
            }
        }
        Some(err) => {
            if err.is_timeout() || elapsed_ms > ERROR_TIMEOUT_FLOOR_MS {
                (ProbeStatus::Down, 0, Some("Connection timeout".to_string()))
            } else if elapsed_ms < OPAQUE_UP_CEILING_MS {
                (ProbeStatus::Up, latency, None)
            } else {
                (ProbeStatus::Degraded, latency, None)
            }
        }
    }
}

/// Execute one bounded-latency check against a single target
pub async fn probe(transport: &dyn Transport, target: &Target, timeout: Duration) -> ProbeOutcome {
    trace!("probing {} at {}", target.display_name(), target.address);

    let start = Instant::now();
    let result = transport.check(&target.address, timeout).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let (status, latency_ms, error_detail) = classify(elapsed_ms, result.err().as_ref());

    trace!(
        "{}: {:?} after {elapsed_ms}ms",
        target.display_name(),
        status
    );

    ProbeOutcome {
        status,
        latency_ms,
        observed_at: Utc::now(),
        error_detail,
    }
}
