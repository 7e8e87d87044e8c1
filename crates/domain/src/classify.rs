//! Heuristic API classification.
//!
//! Classification looks only at a response that was already fetched: the
//! protocol version, the headers, the body and the URL path. Tests run in
//! priority order gRPC, GraphQL, REST and the first match wins.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::response::{HttpVersion, ProbeResponse};

/// Kind of API an endpoint appears to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiType {
    /// JSON or XML resources on a REST-shaped path.
    #[serde(rename = "REST")]
    Rest,
    /// A GraphQL response envelope.
    #[serde(rename = "GraphQL")]
    GraphQl,
    /// gRPC over HTTP/2.
    #[serde(rename = "gRPC")]
    Grpc,
    /// Interesting status, but no recognised API traits.
    #[serde(rename = "Unknown")]
    Unknown,
}

impl ApiType {
    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rest => "REST",
            Self::GraphQl => "GraphQL",
            Self::Grpc => "gRPC",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strictly a path must look RESTful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RestPathPolicy {
    /// Any `/segment(/segment)*` path, optionally led by `api/` or `vN/`.
    #[default]
    Permissive,
    /// The path must start with `/api`, then an optional version, then at
    /// least one segment.
    RequireApiPrefix,
}

static PERMISSIVE_REST_PATH: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^(?:/api)?(?:/v\d+)?(?:/[\w-]+)+/?$").unwrap()
});

static STRICT_REST_PATH: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^/api/?(?:v\d+)?/?[\w-]+(?:/[\w-]+)*/?$").unwrap()
});

impl RestPathPolicy {
    /// Returns true if `path` has a RESTful shape under this policy.
    #[must_use]
    pub fn matches(self, path: &str) -> bool {
        match self {
            Self::Permissive => PERMISSIVE_REST_PATH.is_match(path),
            Self::RequireApiPrefix => STRICT_REST_PATH.is_match(path),
        }
    }
}

/// Classifies already-fetched responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    rest_policy: RestPathPolicy,
}

impl Classifier {
    /// Creates a classifier with the given REST path policy.
    #[must_use]
    pub const fn new(rest_policy: RestPathPolicy) -> Self {
        Self { rest_policy }
    }

    /// Decides the API type of `response`, fetched from a URL with `path`.
    #[must_use]
    pub fn classify(&self, path: &str, response: &ProbeResponse) -> ApiType {
        if is_grpc(response) {
            ApiType::Grpc
        } else if is_graphql(response) {
            ApiType::GraphQl
        } else if is_rest(path, response, self.rest_policy) {
            ApiType::Rest
        } else {
            ApiType::Unknown
        }
    }

    /// Like [`Classifier::classify`], taking the path from an absolute URL.
    #[must_use]
    pub fn classify_url(&self, url: &str, response: &ProbeResponse) -> ApiType {
        let path = Url::parse(url).map(|u| u.path().to_string()).unwrap_or_default();
        self.classify(&path, response)
    }
}

/// HTTP/2 and either a gRPC content type or a `grpc-` header.
#[must_use]
pub fn is_grpc(response: &ProbeResponse) -> bool {
    if response.version != HttpVersion::Http2 {
        return false;
    }
    response.content_type().contains("application/grpc")
        || response.headers.iter().any(|h| {
            h.name
                .get(..5)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("grpc-"))
        })
}

/// JSON content type and a body object with top-level `data` or `errors`.
#[must_use]
pub fn is_graphql(response: &ProbeResponse) -> bool {
    if !response.content_type().contains("application/json") {
        return false;
    }
    match serde_json::from_slice::<serde_json::Value>(&response.body) {
        Ok(serde_json::Value::Object(map)) => map.contains_key("data") || map.contains_key("errors"),
        _ => false,
    }
}

/// JSON or XML content type on a REST-shaped path.
#[must_use]
pub fn is_rest(path: &str, response: &ProbeResponse, policy: RestPathPolicy) -> bool {
    let content_type = response.content_type();
    (content_type.contains("application/json") || content_type.contains("application/xml"))
        && policy.matches(path)
}
