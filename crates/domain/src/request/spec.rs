//! Request specification type

use std::time::Duration;

use url::Url;

use super::{Header, Headers, HttpMethod, RequestBody};
use crate::proxy::ProxyConfig;

/// Timeout applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Complete, immutable specification for one probe request.
///
/// A discovery run builds one spec from its options and derives a new
/// value per payload with [`RequestSpec::with_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    method: HttpMethod,
    url: String,
    headers: Headers,
    cookie: Option<String>,
    body: Option<RequestBody>,
    timeout: Duration,
    proxy: Option<ProxyConfig>,
}

impl RequestSpec {
    /// Creates a request specification with default options.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            cookie: None,
            body: None,
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
        }
    }

    /// Creates a GET request with the given URL.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Returns a copy of this spec aimed at another URL.
    #[must_use]
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }

    /// Sets a header (case-insensitive, last write wins).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(Header::new(name, value));
        self
    }

    /// Replaces the whole header map.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the raw cookie string.
    #[must_use]
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Sets an explicit request body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Routes the request through a proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Caller-supplied headers, without the cookie.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Raw cookie string.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Proxy to route through, if any.
    #[must_use]
    pub const fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    /// Headers as they go on the wire: caller headers with the cookie
    /// string applied last as `Cookie`.
    #[must_use]
    pub fn effective_headers(&self) -> Headers {
        let mut headers = self.headers.clone();
        if let Some(cookie) = &self.cookie {
            headers.set(Header::new("Cookie", cookie.clone()));
        }
        headers
    }

    /// Body as it goes on the wire.
    ///
    /// A POST to a GraphQL-looking URL without an explicit body carries the
    /// introspection query so the first response already shows GraphQL
    /// semantics.
    #[must_use]
    pub fn effective_body(&self) -> Option<RequestBody> {
        if let Some(body) = &self.body {
            return Some(body.clone());
        }
        (self.method == HttpMethod::Post && self.targets_graphql())
            .then(RequestBody::introspection)
    }

    /// Returns true if the URL mentions `graphql` in any case.
    #[must_use]
    pub fn targets_graphql(&self) -> bool {
        self.url.to_ascii_lowercase().contains("graphql")
    }

    /// Validates the URL and returns parsed version if valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn parse_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::INTROSPECTION_QUERY;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_with_url_leaves_original_untouched() {
        let base = RequestSpec::new(HttpMethod::Put, "http://x/FUZZ")
            .with_header("X-Trace", "1")
            .with_timeout(Duration::from_secs(2));
        let derived = base.with_url("http://x/users");

        assert_eq!(base.url(), "http://x/FUZZ");
        assert_eq!(derived.url(), "http://x/users");
        assert_eq!(derived.method(), HttpMethod::Put);
        assert_eq!(derived.headers().get("x-trace"), Some("1"));
        assert_eq!(derived.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_cookie_is_applied_last() {
        let spec = RequestSpec::get("http://x/")
            .with_header("cookie", "from=header")
            .with_cookie("session=abc");
        let headers = spec.effective_headers();
        assert_eq!(headers.get("Cookie"), Some("session=abc"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_post_to_graphql_gets_introspection_body() {
        let spec = RequestSpec::new(HttpMethod::Post, "https://api.example.com/GraphQL");
        let body = spec.effective_body().expect("introspection body");
        assert!(body.content.contains(INTROSPECTION_QUERY));
    }

    #[test]
    fn test_explicit_body_wins_over_introspection() {
        let spec = RequestSpec::new(HttpMethod::Post, "https://api.example.com/graphql")
            .with_body(RequestBody::json("{}"));
        assert_eq!(spec.effective_body(), Some(RequestBody::json("{}")));
    }

    #[test]
    fn test_no_body_for_get_or_non_graphql_post() {
        assert_eq!(RequestSpec::get("https://x/graphql").effective_body(), None);
        assert_eq!(
            RequestSpec::new(HttpMethod::Post, "https://x/users").effective_body(),
            None
        );
    }
}
