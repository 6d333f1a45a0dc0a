//! Global health aggregation

use crate::{ProbeStatus, ScanResult};

/// Reduce a complete scan into a single health percentage
///
/// Up counts full, Degraded half, Down nothing; the sum over all targets is
/// divided by the target count and rounded to the nearest integer. Pure and
/// deterministic. Config validation guarantees a non-empty registry; an
/// empty result only exists in code that bypassed validation and scores 0.
pub fn compute_health(scan: &ScanResult) -> u8 {
    let total = scan.outcomes.len();
    if total == 0 {
        return 0;
    }

    let score: f64 = scan
        .outcomes
        .values()
        .map(|outcome| match outcome.status {
            ProbeStatus::Up => 1.0,
            ProbeStatus::Degraded => 0.5,
            ProbeStatus::Down => 0.0,
        })
        .sum();

    ((score / total as f64) * 100.0).round() as u8
}
