//! Deterministic JSON serialization for reports and settings.
//!
//! Reports serialize the same way on every run:
//! - Fields in declaration order, endpoints in payload order
//! - 2-space indentation
//! - Trailing newline

mod json;

pub use json::*;
