//! Coordinate segment validation
//!
//! Pure checks applied to every segment of a [`Coordinate`] before it is
//! used to build a path or a cache key.
//!
//! - `scope`, `module`, `profile` raise on failure. Dangerous characters
//!   produce a [`CascadeError::SecurityViolation`], anything else an
//!   [`CascadeError::InvalidIdentifier`].
//! - `user_id` only reports validity; callers substitute [`NO_USER`].
//!
//! [`Coordinate`]: crate::coordinate::Coordinate
//! [`NO_USER`]: crate::coordinate::NO_USER
//! [`CascadeError::SecurityViolation`]: crate::error::CascadeError::SecurityViolation
//! [`CascadeError::InvalidIdentifier`]: crate::error::CascadeError::InvalidIdentifier

mod identifier;

pub use identifier::{
    DANGEROUS_SEQUENCES, MAX_SEGMENT_LENGTH, MAX_VERSION, MIN_VERSION, contains_dangerous,
    is_valid_user_id, validate_coordinate, validate_module, validate_profile, validate_scope,
    validate_version,
};
