//! APIHawk Domain - Core discovery types
//!
//! This crate defines the domain model for the APIHawk endpoint discovery
//! engine: request and response values, URL templating, the classifier and
//! the discovery report. All types here are pure Rust with no I/O
//! dependencies.

pub mod classify;
pub mod discovery;
pub mod error;
pub mod proxy;
pub mod request;
pub mod response;
pub mod settings;
pub mod template;

pub use classify::{ApiType, Classifier, RestPathPolicy};
pub use discovery::{DiscoveredEndpoint, DiscoveryReport, DiscoveryStats};
pub use error::{DomainError, DomainResult};
pub use proxy::{ProxyConfig, ProxyError};
pub use request::{BodyFormat, Header, Headers, HttpMethod, RequestBody, RequestSpec};
pub use response::{FailureReason, HttpVersion, ProbeFailure, ProbeOutcome, ProbeResponse};
pub use settings::ScanSettings;
pub use template::{FUZZ_MARKER, UrlTemplate};
