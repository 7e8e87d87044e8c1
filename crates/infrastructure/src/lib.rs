//! APIHawk Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod persistence;
pub mod serialization;
pub mod wordlist;

pub use adapters::{ExecutorError, ReqwestProbeExecutor, TracingObserver};
pub use persistence::{SettingsError, SettingsFile};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable};
pub use wordlist::FileWordlist;
