//! HTTP Response domain types

mod outcome;

pub use outcome::{
    FailureReason, HttpVersion, INTERESTING_STATUS_CODES, ProbeFailure, ProbeOutcome,
    ProbeResponse,
};
