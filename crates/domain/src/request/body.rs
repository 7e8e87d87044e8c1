//! HTTP Request body types

use serde::{Deserialize, Serialize};

/// GraphQL meta-query asking an endpoint for its own type names.
pub const INTROSPECTION_QUERY: &str = "{__schema{types{name}}}";

/// Body formats a caller may attach to every probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    /// `application/json`
    #[default]
    Json,
    /// `application/xml`
    Xml,
    /// `text/html`
    Html,
}

impl BodyFormat {
    /// Returns the MIME type sent as `Content-Type`.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Html => "text/html",
        }
    }
}

/// HTTP request body with its content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    /// The content type (e.g., "application/json", "text/plain")
    pub content_type: String,
    /// The body content as a string
    #[serde(default)]
    pub content: String,
}

impl RequestBody {
    /// Creates a body of the given format.
    #[must_use]
    pub fn new(format: BodyFormat, content: impl Into<String>) -> Self {
        Self {
            content_type: format.content_type().to_string(),
            content: content.into(),
        }
    }

    /// Creates a JSON body.
    #[must_use]
    pub fn json(content: impl Into<String>) -> Self {
        Self::new(BodyFormat::Json, content)
    }

    /// The JSON envelope carrying [`INTROSPECTION_QUERY`].
    #[must_use]
    pub fn introspection() -> Self {
        Self::json(serde_json::json!({ "query": INTROSPECTION_QUERY }).to_string())
    }

    /// Returns whether the body has no content.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // String::is_empty is not const
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
