//! Caller-facing configuration requests

use crate::coordinate::{Coordinate, NO_USER};
use crate::error::{CascadeError, CascadeResult};
use crate::validation::{is_valid_user_id, validate_coordinate};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// A request for a configuration by logical name.
///
/// Built from `"module:profile"`; scope, user and version are optional and
/// default to the engine's default scope, `_` and 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRequest {
    pub module: String,
    pub profile: String,
    pub scope: Option<String>,
    pub user_id: Option<String>,
    pub version: u32,
}

impl ConfigRequest {
    pub fn new(module: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            profile: profile.into(),
            scope: None,
            user_id: None,
            version: 1,
        }
    }

    /// Parse a logical name of the form `module:profile`
    pub fn parse(name: &str) -> CascadeResult<Self> {
        match name.split_once(':') {
            Some((module, profile))
                if !module.is_empty() && !profile.is_empty() && !profile.contains(':') =>
            {
                Ok(Self::new(module, profile))
            }
            _ => Err(CascadeError::invalid_identifier(
                "logical name",
                name,
                "expected 'module:profile'",
            )),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Turn the request into a validated coordinate.
    ///
    /// An invalid user id is not an error: it is replaced with `_` and the
    /// request proceeds without a per-user override.
    pub fn to_coordinate(&self, default_scope: &str) -> CascadeResult<Coordinate> {
        let scope = self.scope.as_deref().unwrap_or(default_scope);
        let user_id = match self.user_id.as_deref() {
            None => NO_USER,
            Some(user) if is_valid_user_id(user) => user,
            Some(user) => {
                warn!(
                    user_id = %user,
                    module = %self.module,
                    profile = %self.profile,
                    "invalid user id, ignoring per-user override"
                );
                NO_USER
            }
        };

        let coordinate = Coordinate::new(scope, &self.module, user_id, &self.profile, self.version);
        validate_coordinate(&coordinate)?;
        Ok(coordinate)
    }
}

impl FromStr for ConfigRequest {
    type Err = CascadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConfigRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.profile)
    }
}
