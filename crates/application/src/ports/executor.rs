//! Probe executor port

use std::future::Future;

use apihawk_domain::{ProbeOutcome, RequestSpec};

/// Port for sending one probe request.
///
/// This trait abstracts the HTTP client implementation, allowing the
/// discovery engine to be independent of specific HTTP libraries and to be
/// driven by deterministic mocks in tests.
///
/// Implementations never fail: every transport problem is folded into
/// [`ProbeOutcome::Failure`], and any received response, whatever its
/// status, is a [`ProbeOutcome::Success`]. Implementations must be safe to
/// call concurrently.
pub trait ProbeExecutor: Send + Sync {
    /// Sends the request described by `request` and reports what happened.
    fn execute(&self, request: &RequestSpec) -> impl Future<Output = ProbeOutcome> + Send;
}
