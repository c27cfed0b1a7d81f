//! Coordinates: the five-part key identifying a configuration
//!
//! A [`Coordinate`] renders to the canonical identifier
//! `scope:module:userId:profile:vVERSION`, which is used both as the local
//! cache key and as the log token for a request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved segment for the module/scope-wide fallback
pub const DEFAULT_SEGMENT: &str = "_default";

/// Reserved profile of the universal base fallback
pub const BASE_PROFILE: &str = "_base";

/// Sentinel user id meaning "no per-user override"
pub const NO_USER: &str = "_";

/// Version of the universal base fallback
pub const BASE_VERSION: u32 = 1;

/// Five-part configuration key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub scope: String,
    pub module: String,
    pub user_id: String,
    pub profile: String,
    pub version: u32,
}

impl Coordinate {
    pub fn new(
        scope: impl Into<String>,
        module: impl Into<String>,
        user_id: impl Into<String>,
        profile: impl Into<String>,
        version: u32,
    ) -> Self {
        Self {
            scope: scope.into(),
            module: module.into(),
            user_id: user_id.into(),
            profile: profile.into(),
            version,
        }
    }

    /// The universal base fallback `(_default, _default, _, _base, 1)`
    pub fn base() -> Self {
        Self::new(
            DEFAULT_SEGMENT,
            DEFAULT_SEGMENT,
            NO_USER,
            BASE_PROFILE,
            BASE_VERSION,
        )
    }

    /// Canonical identifier, e.g. `default:hrkg:_:extraction:v1`
    pub fn canonical_id(&self) -> String {
        format!(
            "{}:{}:{}:{}:v{}",
            self.scope, self.module, self.user_id, self.profile, self.version
        )
    }

    /// Key under which the resolved document is mirrored in the shared tier
    pub fn shared_key(&self, prefix: &str) -> String {
        format!("{}:{}", prefix, self.canonical_id())
    }

    pub fn has_user(&self) -> bool {
        self.user_id != NO_USER
    }

    /// Whether this is exactly [`Coordinate::base`]
    pub fn is_base(&self) -> bool {
        *self == Self::base()
    }

    /// Copy of this coordinate with a different version
    pub fn with_version(&self, version: u32) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_id() {
        let coord = Coordinate::new("default", "hrkg", NO_USER, "extraction", 3);
        assert_eq!(coord.canonical_id(), "default:hrkg:_:extraction:v3");
        assert_eq!(coord.to_string(), coord.canonical_id());
    }

    #[test]
    fn test_shared_key() {
        let coord = Coordinate::new("prod", "hrkg", "u42", "summary", 1);
        assert_eq!(coord.shared_key("cfg"), "cfg:prod:hrkg:u42:summary:v1");
    }

    #[test]
    fn test_base_coordinate() {
        let base = Coordinate::base();
        assert_eq!(base.canonical_id(), "_default:_default:_:_base:v1");
        assert!(base.is_base());
        assert!(!base.has_user());
    }

    #[test]
    fn test_base_profile_elsewhere_is_not_base() {
        assert!(!Coordinate::new("prod", "hrkg", NO_USER, BASE_PROFILE, BASE_VERSION).is_base());
        assert!(!Coordinate::new("_default", "hrkg", NO_USER, BASE_PROFILE, 1).is_base());
        assert!(!Coordinate::new("_default", "_default", "alice", BASE_PROFILE, 1).is_base());
        assert!(!Coordinate::base().with_version(2).is_base());
    }

    #[test]
    fn test_equality_follows_canonical_id() {
        let a = Coordinate::new("s", "m", "_", "p", 1);
        let b = Coordinate::new("s", "m", "_", "p", 1);
        assert_eq!(a, b);
        assert_eq!(a.canonical_id(), b.canonical_id());
        assert_ne!(a, b.with_version(2));
    }
}
