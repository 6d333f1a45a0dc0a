//! Shared test helpers
//!
//! Provides a scripted transport so integration tests can drive the full
//! scan pipeline with exact latencies and failure modes, without touching
//! the network. Tests run under `start_paused` tokio time, so scripted
//! delays advance the virtual clock instantly.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pulsewatch::Target;
use pulsewatch::transport::{Transport, TransportError, TransportResult};

/// Scripted behavior for one probed address
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Complete cleanly after the given delay
    RespondAfter(Duration),

    /// Sleep the full timeout bound, then report an explicit timeout
    TimeoutAtBound,

    /// Surface an opaque transport error after the given delay
    FailAfter(Duration, &'static str),
}

/// Transport whose responses are scripted per address
///
/// Also tracks how many checks ran and how many were in flight at once,
/// which is what the single-flight tests assert on.
pub struct ScriptedTransport {
    scripts: HashMap<String, Behavior>,
    total_checks: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new(scripts: HashMap<String, Behavior>) -> Self {
        Self {
            scripts,
            total_checks: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every address responds the same way
    pub fn uniform(behavior: Behavior, targets: &[Target]) -> Self {
        let scripts = targets
            .iter()
            .map(|target| (target.address.clone(), behavior.clone()))
            .collect();
        Self::new(scripts)
    }

    pub fn total_checks(&self) -> usize {
        self.total_checks.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn check(&self, address: &str, timeout: Duration) -> TransportResult {
        self.total_checks.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let behavior = self
            .scripts
            .get(address)
            .cloned()
            .unwrap_or(Behavior::FailAfter(Duration::from_millis(1), "unscripted"));

        let result = match behavior {
            Behavior::RespondAfter(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Behavior::TimeoutAtBound => {
                tokio::time::sleep(timeout).await;
                Err(TransportError::Timeout)
            }
            Behavior::FailAfter(delay, message) => {
                tokio::time::sleep(delay).await;
                Err(TransportError::Other(message.to_string()))
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn make_target(id: &str) -> Target {
    Target {
        id: id.to_string(),
        display: Some(format!("{id} display")),
        address: format!("https://{id}.example.com"),
    }
}

pub fn make_targets(ids: &[&str]) -> Vec<Target> {
    ids.iter().map(|id| make_target(id)).collect()
}
