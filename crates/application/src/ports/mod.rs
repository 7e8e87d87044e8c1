//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the discovery engine and external
//! systems. Each port is a trait that can be implemented by adapters in the
//! infrastructure layer or by test doubles.

mod cancellation;
mod executor;
mod observer;
mod payload_source;

pub use cancellation::{CancellationReceiver, CancellationToken};
pub use executor::ProbeExecutor;
pub use observer::{DiscoveryObserver, NoopObserver};
pub use payload_source::{InlinePayloads, PayloadSource, Payloads, normalize_line};
