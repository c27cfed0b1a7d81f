//! Identifier rules for coordinate segments

use crate::coordinate::{Coordinate, NO_USER};
use crate::error::{CascadeError, CascadeResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::error;

/// Maximum length of any coordinate segment
pub const MAX_SEGMENT_LENGTH: usize = 64;

/// Smallest accepted version
pub const MIN_VERSION: u32 = 1;

/// Largest accepted version
pub const MAX_VERSION: u32 = 9999;

/// Sequences that must never reach a filesystem path
pub const DANGEROUS_SEQUENCES: &[&str] = &["/", "\\", "..", "~", "$", "`"];

static MODULE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(_default|[a-z][a-z0-9_]*)$").expect("valid module pattern"));

static SCOPE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(_default|[a-z][a-z0-9_-]*)$").expect("valid scope pattern"));

static PROFILE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(_base(_[a-z0-9_]+)?|[a-z][a-z0-9_]*)$").expect("valid profile pattern")
});

static USER_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_@.-]*$").expect("valid user pattern"));

/// Whether the value contains any of [`DANGEROUS_SEQUENCES`]
pub fn contains_dangerous(value: &str) -> bool {
    DANGEROUS_SEQUENCES.iter().any(|seq| value.contains(seq))
}

fn validate_segment(
    field: &str,
    value: &str,
    pattern: &Regex,
    expected: &str,
) -> CascadeResult<()> {
    if value.is_empty() {
        return Err(CascadeError::invalid_identifier(
            field,
            value,
            "must not be empty",
        ));
    }

    if contains_dangerous(value) {
        error!(
            target: "cascade::audit",
            field,
            value,
            "rejected identifier containing dangerous characters"
        );
        return Err(CascadeError::security_violation_in(
            field,
            format!("{} '{}' contains disallowed characters", field, value),
        ));
    }

    if value.len() > MAX_SEGMENT_LENGTH {
        return Err(CascadeError::invalid_identifier(
            field,
            value,
            format!(
                "must be at most {} characters, got {}",
                MAX_SEGMENT_LENGTH,
                value.len()
            ),
        ));
    }

    if !pattern.is_match(value) {
        return Err(CascadeError::invalid_identifier(
            field,
            value,
            format!("'{}' must match {}", value, expected),
        ));
    }

    Ok(())
}

/// Validate a module name: `_default` or `[a-z][a-z0-9_]*`
pub fn validate_module(module: &str) -> CascadeResult<()> {
    validate_segment("module", module, &MODULE_PATTERN, "_default or [a-z][a-z0-9_]*")
}

/// Validate a scope name: `_default` or `[a-z][a-z0-9_-]*`
pub fn validate_scope(scope: &str) -> CascadeResult<()> {
    validate_segment("scope", scope, &SCOPE_PATTERN, "_default or [a-z][a-z0-9_-]*")
}

/// Validate a profile name: `_base[_suffix]` or `[a-z][a-z0-9_]*`
pub fn validate_profile(profile: &str) -> CascadeResult<()> {
    validate_segment(
        "profile",
        profile,
        &PROFILE_PATTERN,
        "_base[_suffix] or [a-z][a-z0-9_]*",
    )
}

/// Check a per-user identifier without raising.
///
/// The sentinel `_` is valid.
pub fn is_valid_user_id(user_id: &str) -> bool {
    if user_id == NO_USER {
        return true;
    }
    !user_id.is_empty()
        && user_id.len() <= MAX_SEGMENT_LENGTH
        && !contains_dangerous(user_id)
        && USER_ID_PATTERN.is_match(user_id)
}

/// Validate a version number against [`MIN_VERSION`]..=[`MAX_VERSION`]
pub fn validate_version(version: u32) -> CascadeResult<()> {
    if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
        return Err(CascadeError::invalid_identifier(
            "version",
            version.to_string(),
            format!(
                "must be between {} and {}, got {}",
                MIN_VERSION, MAX_VERSION, version
            ),
        ));
    }
    Ok(())
}

/// Validate every raising segment of a coordinate.
///
/// The user id is checked too, but since callers are expected to have
/// substituted the sentinel already an invalid one is a format error here.
pub fn validate_coordinate(coord: &Coordinate) -> CascadeResult<()> {
    validate_scope(&coord.scope)?;
    validate_module(&coord.module)?;
    validate_profile(&coord.profile)?;
    validate_version(coord.version)?;
    if !is_valid_user_id(&coord.user_id) {
        return Err(CascadeError::invalid_identifier(
            "userId",
            coord.user_id.as_str(),
            "contains disallowed characters or is too long",
        ));
    }
    Ok(())
}
