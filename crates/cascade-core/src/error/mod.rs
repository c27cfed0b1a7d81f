//! Error types for the cascade resolver
//!
//! Every fallible operation in this crate returns [`CascadeResult`]. The
//! variants of [`CascadeError`] map onto a small taxonomy ([`ErrorKind`]):
//! - `NotFound`: drives cascade fallthrough, fatal only at the last level
//! - `InvalidConfiguration`: parse, schema or identifier format failure
//! - `SecurityViolation`: dangerous characters or a path escaping the root
//! - `Unavailable`: shared tier degradation, never surfaced to callers
//! - `Initialization`: missing base fallback or use before `init()`

mod constructors;
mod conversions;
mod types;

pub use types::{CascadeError, CascadeResult, ErrorKind};
