//! Discovery observer port

use apihawk_domain::{DiscoveredEndpoint, DomainError, ProbeFailure};

/// Sink for events raised while a discovery run progresses.
///
/// Callbacks run synchronously on the engine task, in the order results are
/// received; keep them cheap. Every method has a no-op default.
pub trait DiscoveryObserver: Send + Sync {
    /// An interesting response was classified and recorded.
    fn on_finding(&self, _endpoint: &DiscoveredEndpoint) {}

    /// A payload produced a URL that is not absolute; it was skipped.
    fn on_invalid_url(&self, _payload: &str, _error: &DomainError) {}

    /// A request failed at the transport level.
    fn on_failure(&self, _url: &str, _failure: &ProbeFailure) {}

    /// A response arrived with a status that is not interesting.
    fn on_discarded(&self, _url: &str, _status: u16) {}

    /// The run stopped early; `completed` results had been received.
    fn on_cancelled(&self, _completed: usize) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DiscoveryObserver for NoopObserver {}
