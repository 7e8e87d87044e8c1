//! Result of a single probe attempt.

use std::fmt;
use std::time::Duration;

use crate::request::Headers;

/// Status codes that signal an endpoint exists or is access-controlled.
pub const INTERESTING_STATUS_CODES: [u16; 4] = [200, 201, 400, 403];

/// Protocol version the transport reports for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpVersion {
    /// HTTP/0.9
    Http09,
    /// HTTP/1.0
    Http10,
    /// HTTP/1.1
    #[default]
    Http11,
    /// HTTP/2
    Http2,
    /// HTTP/3
    Http3,
}

impl HttpVersion {
    /// Returns the version as it appears on a status line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http09 => "HTTP/0.9",
            Self::Http10 => "HTTP/1.0",
            Self::Http11 => "HTTP/1.1",
            Self::Http2 => "HTTP/2",
            Self::Http3 => "HTTP/3",
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response received from the target, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Raw response body
    pub body: Vec<u8>,
    /// Protocol version negotiated with the target
    pub version: HttpVersion,
    /// Time from send to full body
    pub duration: Duration,
}

impl ProbeResponse {
    /// Creates a response with an HTTP/1.1 version and zero duration.
    #[must_use]
    pub fn new(status: u16, headers: Headers, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            version: HttpVersion::Http11,
            duration: Duration::ZERO,
        }
    }

    /// Sets the protocol version.
    #[must_use]
    pub const fn with_version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    /// Sets the elapsed time.
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Returns the `Content-Type` header, or an empty string.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.headers.get("content-type").unwrap_or_default()
    }

    /// Size of the received body in bytes.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Returns true if the status code is one of [`INTERESTING_STATUS_CODES`].
    #[must_use]
    pub fn is_interesting(&self) -> bool {
        INTERESTING_STATUS_CODES.contains(&self.status)
    }
}

/// Why a probe produced no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// DNS, connect, TLS, reset or body read failure.
    NetworkError,
    /// The request exceeded its timeout.
    Timeout,
    /// The transport rejected the URL.
    InvalidUrl,
}

impl FailureReason {
    /// Returns the reason in snake case.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::InvalidUrl => "invalid_url",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport-level failure, with a message for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    /// Failure category
    pub reason: FailureReason,
    /// Underlying error message
    pub message: String,
}

impl ProbeFailure {
    /// Creates a network error failure.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::NetworkError,
            message: message.into(),
        }
    }

    /// Creates a timeout failure.
    #[must_use]
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            reason: FailureReason::Timeout,
            message: format!("request timed out after {}ms", timeout.as_millis()),
        }
    }

    /// Creates an invalid URL failure.
    #[must_use]
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::InvalidUrl,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.message)
    }
}

/// Outcome of one HTTP attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A response was received.
    Success(ProbeResponse),
    /// No response was received.
    Failure(ProbeFailure),
}

impl ProbeOutcome {
    /// Returns the response if one was received.
    #[must_use]
    pub const fn response(&self) -> Option<&ProbeResponse> {
        match self {
            Self::Success(response) => Some(response),
            Self::Failure(_) => None,
        }
    }

    /// Returns true if a response was received.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<ProbeResponse> for ProbeOutcome {
    fn from(response: ProbeResponse) -> Self {
        Self::Success(response)
    }
}

impl From<ProbeFailure> for ProbeOutcome {
    fn from(failure: ProbeFailure) -> Self {
        Self::Failure(failure)
    }
}
