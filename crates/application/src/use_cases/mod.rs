//! Application use cases (business logic orchestration).

mod discover_endpoints;

pub use discover_endpoints::*;
