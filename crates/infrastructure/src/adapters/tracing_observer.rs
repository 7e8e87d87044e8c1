//! Discovery observer that reports progress through `tracing`.

use apihawk_application::DiscoveryObserver;
use apihawk_domain::{DiscoveredEndpoint, DomainError, ProbeFailure};

/// Emits one event per discovery result.
///
/// Findings are logged at `info`; skipped payloads, transport failures and
/// discarded statuses at `debug`, so they only show up in verbose runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DiscoveryObserver for TracingObserver {
    fn on_finding(&self, endpoint: &DiscoveredEndpoint) {
        tracing::info!(
            url = %endpoint.url,
            api_type = %endpoint.api_type,
            status = endpoint.status_code,
            content_length = endpoint.content_length,
            "endpoint found"
        );
    }

    fn on_invalid_url(&self, payload: &str, error: &DomainError) {
        tracing::debug!(payload, %error, "payload skipped");
    }

    fn on_failure(&self, url: &str, failure: &ProbeFailure) {
        tracing::debug!(url, reason = %failure.reason, message = %failure.message, "probe failed");
    }

    fn on_discarded(&self, url: &str, status: u16) {
        tracing::debug!(url, status, "status not interesting");
    }

    fn on_cancelled(&self, completed: usize) {
        tracing::warn!(completed, "discovery stopped early");
    }
}
