//! APIHawk Application - Discovery engine and ports
//!
//! This crate defines the application layer with:
//! - Port traits (probe executor, payload source, observer, cancellation)
//! - The discovery engine use case
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{DiscoveryError, DiscoveryResult};
pub use ports::{
    CancellationReceiver, CancellationToken, DiscoveryObserver, InlinePayloads, NoopObserver,
    PayloadSource, Payloads, ProbeExecutor, normalize_line,
};
pub use use_cases::{DiscoverEndpoints, DiscoverEndpointsInput};
