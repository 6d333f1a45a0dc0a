//! Transport seam for issuing probe requests
//!
//! The prober only needs three things from a transport: issue a request,
//! cancel it hard after a timeout, and report whether a failure was an
//! explicit timeout or something opaque. Putting that behind a trait keeps
//! the classification logic testable without a network.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// Result type alias for transport operations
pub type TransportResult = Result<(), TransportError>;

/// Failure modes a probe attempt can surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request was aborted by its timeout
    Timeout,

    /// Any other network-layer failure. The true cause may be
    /// indistinguishable from a healthy endpoint (e.g. a policy rejection),
    /// so callers classify these by elapsed time instead.
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout => write!(f, "request aborted by timeout"),
            TransportError::Other(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Issues one existence check against an address
///
/// Implementations must report success, explicit timeout, or other error,
/// and must return once the timeout bound has elapsed at the latest.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn check(&self, address: &str, timeout: Duration) -> TransportResult;
}

/// reqwest-backed transport
///
/// A single client is reused across all probes. The existence check is a
/// HEAD request with no body read; any HTTP status counts as reachable.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn check(&self, address: &str, timeout: Duration) -> TransportResult {
        let response = self.client.head(address).timeout(timeout).send().await;

        match response {
            Ok(_) => Ok(()),
            Err(e) if e.is_timeout() => Err(TransportError::Timeout),
            Err(e) => Err(TransportError::Other(e.to_string())),
        }
    }
}
