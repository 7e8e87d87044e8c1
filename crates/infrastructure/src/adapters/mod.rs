//! Adapters implementing application ports.

mod reqwest_executor;
mod tracing_observer;

pub use reqwest_executor::{ExecutorError, ReqwestProbeExecutor};
pub use tracing_observer::TracingObserver;
