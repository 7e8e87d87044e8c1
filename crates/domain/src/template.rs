//! URL templating.
//!
//! A template is an absolute URL that may contain the [`FUZZ_MARKER`]. Each
//! payload produces one candidate URL: every marker is replaced by the
//! payload, or, without a marker, the payload is appended as a path segment.

use std::borrow::Cow;
use std::fmt;

use url::Url;

use crate::error::{DomainError, DomainResult};

/// Literal token marking the substitution point in a template.
pub const FUZZ_MARKER: &str = "FUZZ";

/// A validated URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
}

impl UrlTemplate {
    /// Validates a base template.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTarget`] if the template is not an
    /// absolute URL with a scheme and a host.
    pub fn parse(template: impl Into<String>) -> DomainResult<Self> {
        let raw = template.into();
        ensure_absolute(&raw).map_err(DomainError::InvalidTarget)?;
        Ok(Self { raw })
    }

    /// Returns true if the template contains the marker.
    #[must_use]
    pub fn has_marker(&self) -> bool {
        self.raw.contains(FUZZ_MARKER)
    }

    /// The template as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Builds the candidate URL for one payload.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the substituted string is not
    /// an absolute URL.
    pub fn expand(&self, payload: &str) -> DomainResult<String> {
        let payload = escape_payload(payload);
        let candidate = if self.has_marker() {
            self.raw.replace(FUZZ_MARKER, &payload)
        } else {
            format!(
                "{}/{}",
                self.raw.trim_end_matches('/'),
                payload.trim_start_matches('/')
            )
        };
        ensure_absolute(&candidate).map_err(DomainError::InvalidUrl)?;
        Ok(candidate)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses `candidate` and requires a scheme and a non-empty host.
fn ensure_absolute(candidate: &str) -> Result<Url, String> {
    let url = Url::parse(candidate).map_err(|e| format!("{e}: {candidate}"))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(format!("missing host: {candidate}"));
    }
    Ok(url)
}

/// Characters that may appear unescaped in a path. `/` is kept so
/// multi-segment payloads such as `api/v1/users` survive.
const fn is_path_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'.'
                | b'_'
                | b'~'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'@'
                | b'/'
        )
}

fn needs_escaping(payload: &str) -> bool {
    let bytes = payload.as_bytes();
    bytes.iter().enumerate().any(|(i, &byte)| {
        if byte == b'%' {
            let hex = |offset| bytes.get(i + offset).is_some_and(u8::is_ascii_hexdigit);
            !(hex(1) && hex(2))
        } else {
            !is_path_safe(byte)
        }
    })
}

/// Percent-encodes the payload per segment, only when it holds unsafe
/// characters. Payloads made of safe characters and well-formed `%XX`
/// escapes are used verbatim.
fn escape_payload(payload: &str) -> Cow<'_, str> {
    if !needs_escaping(payload) {
        return Cow::Borrowed(payload);
    }
    Cow::Owned(
        payload
            .split('/')
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/"),
    )
}
