//! HTTP Request domain types

mod body;
mod header;
mod method;
mod spec;

pub use body::{BodyFormat, INTROSPECTION_QUERY, RequestBody};
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use spec::{DEFAULT_TIMEOUT, RequestSpec};
