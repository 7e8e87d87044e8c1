//! Probe executor implementation using reqwest.
//!
//! This adapter implements the `ProbeExecutor` port using the reqwest
//! library. Every transport problem is folded into a `ProbeFailure`; any
//! response that arrives, whatever its status, is a success.

use std::collections::HashMap;
use std::time::Instant;

use apihawk_application::ProbeExecutor;
use apihawk_domain::{
    Headers, HttpMethod, HttpVersion, ProbeFailure, ProbeOutcome, ProbeResponse, ProxyConfig,
    RequestSpec, ScanSettings,
};
use reqwest::{Client, ClientBuilder, Method, Version};

/// Errors raised while building the underlying clients.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The proxy URL was rejected by reqwest.
    #[error("invalid proxy {proxy}: {source}")]
    Proxy {
        /// Proxy URL as configured.
        proxy: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
}

/// Probe executor backed by `reqwest::Client`.
///
/// Clients are built once, up front: one direct client plus one per proxy
/// passed to [`ReqwestProbeExecutor::new`]. The table is never mutated after
/// construction, so concurrent probes share it without locking.
pub struct ReqwestProbeExecutor {
    client: Client,
    proxied: HashMap<ProxyConfig, Client>,
    settings: ScanSettings,
}

impl ReqwestProbeExecutor {
    /// Creates an executor configured from `settings`.
    ///
    /// Configuration taken from the settings:
    /// - User-Agent
    /// - Redirects: none when `max_redirects` is 0, otherwise limited
    /// - TLS verification toggle
    /// - HTTP/2 prior knowledge
    ///
    /// # Errors
    ///
    /// Returns an error if a client cannot be created or a proxy URL is
    /// rejected.
    pub fn new(settings: &ScanSettings, proxies: &[ProxyConfig]) -> Result<Self, ExecutorError> {
        let client = Self::builder(settings)
            .build()
            .map_err(ExecutorError::ClientBuild)?;
        let mut proxied = HashMap::new();
        for proxy in proxies {
            proxied.insert(proxy.clone(), Self::proxied_client(settings, proxy)?);
        }

        Ok(Self {
            client,
            proxied,
            settings: settings.clone(),
        })
    }

    /// Creates an executor around a custom reqwest client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            proxied: HashMap::new(),
            settings: ScanSettings::default(),
        }
    }

    fn builder(settings: &ScanSettings) -> ClientBuilder {
        let redirect = if settings.max_redirects == 0 {
            reqwest::redirect::Policy::none()
        } else {
            reqwest::redirect::Policy::limited(settings.max_redirects)
        };
        let mut builder = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .redirect(redirect)
            .danger_accept_invalid_certs(!settings.verify_tls);
        if settings.http2_prior_knowledge {
            builder = builder.http2_prior_knowledge();
        }
        builder
    }

    fn proxied_client(settings: &ScanSettings, proxy: &ProxyConfig) -> Result<Client, ExecutorError> {
        let reqwest_proxy =
            reqwest::Proxy::all(proxy.url_with_auth()).map_err(|source| ExecutorError::Proxy {
                proxy: proxy.url.clone(),
                source,
            })?;
        Self::builder(settings)
            .proxy(reqwest_proxy)
            .build()
            .map_err(ExecutorError::ClientBuild)
    }

    /// Picks the client for `request`'s proxy.
    ///
    /// A proxy that was not known at construction gets a one-off client.
    fn client_for(&self, request: &RequestSpec) -> Result<Client, ExecutorError> {
        match request.proxy() {
            None => Ok(self.client.clone()),
            Some(proxy) => match self.proxied.get(proxy) {
                Some(client) => Ok(client.clone()),
                None => Self::proxied_client(&self.settings, proxy),
            },
        }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    fn to_http_version(version: Version) -> HttpVersion {
        if version == Version::HTTP_09 {
            HttpVersion::Http09
        } else if version == Version::HTTP_10 {
            HttpVersion::Http10
        } else if version == Version::HTTP_2 {
            HttpVersion::Http2
        } else if version == Version::HTTP_3 {
            HttpVersion::Http3
        } else {
            HttpVersion::Http11
        }
    }

    /// Maps reqwest errors to a probe failure.
    fn map_error(error: &reqwest::Error, request: &RequestSpec) -> ProbeFailure {
        if error.is_timeout() {
            return ProbeFailure::timeout(request.timeout());
        }
        ProbeFailure::network(error.to_string())
    }

    async fn probe(&self, request: &RequestSpec) -> Result<ProbeResponse, ProbeFailure> {
        let url = request
            .parse_url()
            .map_err(|e| ProbeFailure::invalid_url(format!("{e}: {}", request.url())))?;
        let client = self
            .client_for(request)
            .map_err(|e| ProbeFailure::network(e.to_string()))?;

        let start = Instant::now();
        let mut builder = client
            .request(Self::to_reqwest_method(request.method()), url)
            .timeout(request.timeout());

        let headers = request.effective_headers();
        for header in &headers {
            builder = builder.header(&header.name, &header.value);
        }

        if let Some(body) = request.effective_body() {
            if !headers.contains("content-type") {
                builder = builder.header("Content-Type", body.content_type.as_str());
            }
            builder = builder.body(body.content);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, request))?;

        let status = response.status().as_u16();
        let version = Self::to_http_version(response.version());
        let response_headers: Headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                apihawk_domain::Header::new(k.as_str(), String::from_utf8_lossy(v.as_bytes()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, request))?;

        Ok(ProbeResponse::new(status, response_headers, body.to_vec())
            .with_version(version)
            .with_duration(start.elapsed()))
    }
}

impl ProbeExecutor for ReqwestProbeExecutor {
    async fn execute(&self, request: &RequestSpec) -> ProbeOutcome {
        match self.probe(request).await {
            Ok(response) => ProbeOutcome::Success(response),
            Err(failure) => ProbeOutcome::Failure(failure),
        }
    }
}
