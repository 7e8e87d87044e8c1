//! Discovery results.

use serde::{Deserialize, Serialize};

use crate::classify::ApiType;

/// One live endpoint found during a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscoveredEndpoint {
    /// Absolute URL the payload produced
    pub url: String,
    /// Classification of the response
    pub api_type: ApiType,
    /// HTTP status code
    pub status_code: u16,
    /// Response body size in bytes
    pub content_length: usize,
}

/// Counters describing what happened to each payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryStats {
    /// Requests that completed, with a response or a failure
    pub probed: usize,
    /// Payloads that produced an invalid URL
    pub invalid_urls: usize,
    /// Requests that failed at the transport level
    pub failures: usize,
    /// Responses with a status that is not interesting
    pub discarded: usize,
}

/// Everything one discovery run produced.
///
/// Endpoints are in the order the payload source yielded their payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// The URL template the run was started with
    pub target_url: String,
    /// Endpoints in payload order
    pub endpoints: Vec<DiscoveredEndpoint>,
    /// True if the run stopped early on cancellation or deadline
    #[serde(default)]
    pub cancelled: bool,
    /// Per-payload counters
    #[serde(default)]
    pub stats: DiscoveryStats,
}

impl DiscoveryReport {
    /// Creates an empty report for `target_url`.
    #[must_use]
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            endpoints: Vec::new(),
            cancelled: false,
            stats: DiscoveryStats::default(),
        }
    }

    /// Returns true if nothing was discovered.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Endpoints of one API type, in payload order.
    pub fn of_type(&self, api_type: ApiType) -> impl Iterator<Item = &DiscoveredEndpoint> {
        self.endpoints.iter().filter(move |e| e.api_type == api_type)
    }

    /// Endpoints handed on to GraphQL-specific probing.
    pub fn graphql_endpoints(&self) -> impl Iterator<Item = &DiscoveredEndpoint> {
        self.of_type(ApiType::GraphQl)
    }
}
