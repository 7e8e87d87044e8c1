//! Scan settings
//!
//! Tunables for a discovery run. Every field has a default so a settings
//! file only needs the values it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classify::RestPathPolicy;
use crate::error::{DomainError, DomainResult};

/// Settings for one discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Maximum number of requests in flight.
    pub concurrency: usize,

    /// Pause after each completed request, in milliseconds.
    pub delay_ms: u64,

    /// Random extra pause added to `delay_ms`, up to this many milliseconds.
    pub jitter_ms: u64,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Wall-clock budget for the whole run, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration_secs: Option<u64>,

    /// How strictly a path must look RESTful.
    pub rest_policy: RestPathPolicy,

    /// `User-Agent` sent with every probe.
    pub user_agent: String,

    /// Redirects followed per request; 0 reports the redirect itself.
    pub max_redirects: usize,

    /// Whether TLS certificates are verified.
    pub verify_tls: bool,

    /// Speak HTTP/2 without negotiation, for cleartext gRPC targets.
    pub http2_prior_knowledge: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            concurrency: 20,
            delay_ms: 100,
            jitter_ms: 0,
            timeout_secs: 5,
            max_duration_secs: None,
            rest_policy: RestPathPolicy::default(),
            user_agent: concat!("apihawk/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 0,
            verify_tls: true,
            http2_prior_knowledge: false,
        }
    }
}

impl ScanSettings {
    /// Checks that the values can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSetting`] for a zero concurrency or
    /// timeout.
    pub fn validate(&self) -> DomainResult<()> {
        if self.concurrency == 0 {
            return Err(DomainError::InvalidSetting {
                name: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(DomainError::InvalidSetting {
                name: "timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fixed part of the inter-request pause.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Upper bound of the random part of the pause.
    #[must_use]
    pub const fn jitter(&self) -> Duration {
        Duration::from_millis(self.jitter_ms)
    }

    /// Wall-clock budget for the run, if any.
    #[must_use]
    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_settings() {
        let settings = ScanSettings::default();
        assert_eq!(settings.concurrency, 20);
        assert_eq!(settings.delay(), Duration::from_millis(100));
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.max_duration(), None);
        assert_eq!(settings.max_redirects, 0);
        assert!(settings.verify_tls);
        assert!(settings.user_agent.starts_with("apihawk/"));
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let settings: ScanSettings =
            serde_json::from_str(r#"{"concurrency": 4, "rest_policy": "require_api_prefix"}"#)
                .unwrap_or_default();
        assert_eq!(settings.concurrency, 4);
        assert_eq!(settings.rest_policy, RestPathPolicy::RequireApiPrefix);
        assert_eq!(settings.timeout_secs, 5);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let settings = ScanSettings {
            concurrency: 0,
            ..ScanSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(DomainError::InvalidSetting { name: "concurrency", .. })
        ));
    }
}
