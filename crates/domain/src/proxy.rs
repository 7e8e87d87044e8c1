//! HTTP proxy configuration.
//!
//! This module provides types for routing probes through a proxy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Proxy configuration for HTTP requests.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub struct ProxyConfig {
    /// Proxy server URL (e.g., "<http://proxy.example.com:8080>").
    pub url: String,
    /// Proxy authentication username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Proxy authentication password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Create a proxy configuration with URL.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set authentication credentials.
    #[must_use]
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Get the proxy URL with authentication if present.
    ///
    /// Credentials are percent-encoded so reserved characters stay inside
    /// the userinfo part.
    #[must_use]
    pub fn url_with_auth(&self) -> String {
        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            if let Some((scheme, rest)) = self.url.split_once("://") {
                let user = urlencoding::encode(user);
                let pass = urlencoding::encode(pass);
                return format!("{scheme}://{user}:{pass}@{rest}");
            }
        }
        self.url.clone()
    }

    /// Validate the proxy configuration.
    #[allow(clippy::missing_errors_doc)]
    pub fn validate(&self) -> Result<(), ProxyError> {
        if self.url.is_empty() {
            return Err(ProxyError::MissingUrl);
        }

        if !self.url.starts_with("http://")
            && !self.url.starts_with("https://")
            && !self.url.starts_with("socks5://")
        {
            return Err(ProxyError::InvalidUrl(
                "URL must start with http://, https://, or socks5://".to_string(),
            ));
        }

        if self.username.is_some() != self.password.is_some() {
            return Err(ProxyError::IncompleteAuth);
        }

        Ok(())
    }
}

/// Proxy configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProxyError {
    /// Proxy URL is missing.
    #[error("proxy URL is required")]
    MissingUrl,
    /// Proxy URL is malformed.
    #[error("invalid proxy URL: {0}")]
    InvalidUrl(String),
    /// Only one of username and password is set.
    #[error("proxy authentication needs both username and password")]
    IncompleteAuth,
}
