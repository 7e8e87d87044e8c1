//! Application error types

use std::path::PathBuf;

use apihawk_domain::DomainError;
use thiserror::Error;

/// Errors that abort a discovery run before any request is sent.
///
/// Per-payload problems (bad substitutions, transport failures) never
/// surface here; the engine absorbs them and keeps going.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The wordlist does not exist or cannot be read.
    #[error("wordlist not found: {}: {source}", path.display())]
    WordlistNotFound {
        /// Path that was tried.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The base URL template is not an absolute URL.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The method is not one of the seven supported HTTP methods.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Any other domain validation error (settings, headers).
    #[error("domain error: {0}")]
    Domain(DomainError),
}

impl From<DomainError> for DiscoveryError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidTarget(message) => Self::InvalidTarget(message),
            DomainError::UnsupportedMethod(method) => Self::UnsupportedMethod(method),
            other => Self::Domain(other),
        }
    }
}

/// Result type alias for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_preflight_variants() {
        let error = DiscoveryError::from(DomainError::UnsupportedMethod("TRACE".into()));
        assert!(matches!(error, DiscoveryError::UnsupportedMethod(m) if m == "TRACE"));

        let error = DiscoveryError::from(DomainError::InvalidTarget("nope".into()));
        assert!(matches!(error, DiscoveryError::InvalidTarget(_)));

        let error = DiscoveryError::from(DomainError::InvalidHeaderName("x".into()));
        assert!(matches!(error, DiscoveryError::Domain(_)));
    }

    #[test]
    fn test_wordlist_error_names_the_path() {
        let error = DiscoveryError::WordlistNotFound {
            path: PathBuf::from("/tmp/missing.txt"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(error.to_string().contains("/tmp/missing.txt"));
    }
}
