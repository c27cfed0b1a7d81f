//! Runtime experiment directives read from the shared tier

use crate::shared::SharedCacheAdapter;
use crate::validation::{MAX_VERSION, MIN_VERSION};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Prefix of directive keys: `experiment:cfg:{module}:{profile}`
pub const EXPERIMENT_KEY_PREFIX: &str = "experiment:cfg";

/// Shape of a directive as stored in the shared tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExperimentDirective {
    pub enabled: bool,
    pub version: u32,
    pub enabled_at: DateTime<Utc>,
}

impl ExperimentDirective {
    pub fn new(version: u32, enabled_at: DateTime<Utc>) -> Self {
        Self {
            enabled: true,
            version,
            enabled_at,
        }
    }
}

/// Outcome of an active directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperimentOverrideResult {
    pub version: u32,
    /// Always true: an override skips both cache tiers
    pub force_refresh: bool,
}

pub fn experiment_key(module: &str, profile: &str) -> String {
    format!("{}:{}:{}", EXPERIMENT_KEY_PREFIX, module, profile)
}

/// Parse a raw directive body. Anything malformed is `None`.
pub fn parse_directive(raw: &str) -> Option<ExperimentDirective> {
    let directive: ExperimentDirective = match serde_json::from_str(raw) {
        Ok(d) => d,
        Err(e) => {
            warn!(error = %e, "ignoring malformed experiment directive");
            return None;
        }
    };
    if !(MIN_VERSION..=MAX_VERSION).contains(&directive.version) {
        warn!(
            version = directive.version,
            "ignoring experiment directive with out-of-range version"
        );
        return None;
    }
    Some(directive)
}

/// Looks up experiment directives for `(module, profile)` pairs
#[derive(Debug, Clone)]
pub struct ExperimentOverride {
    shared: SharedCacheAdapter,
}

impl ExperimentOverride {
    pub fn new(shared: SharedCacheAdapter) -> Self {
        Self { shared }
    }

    pub async fn check(&self, module: &str, profile: &str) -> Option<ExperimentOverrideResult> {
        let key = experiment_key(module, profile);
        let raw = self.shared.get(&key).await?;
        let directive = parse_directive(&raw)?;
        if !directive.enabled {
            debug!(key = %key, "experiment directive present but disabled");
            return None;
        }
        info!(
            key = %key,
            version = directive.version,
            enabled_at = %directive.enabled_at,
            "experiment override active"
        );
        Some(ExperimentOverrideResult {
            version: directive.version,
            force_refresh: true,
        })
    }

    /// Write a directive (used by operators and tests); returns whether it was stored
    pub async fn publish(
        &self,
        module: &str,
        profile: &str,
        directive: &ExperimentDirective,
    ) -> bool {
        match serde_json::to_string(directive) {
            Ok(body) => self.shared.set(&experiment_key(module, profile), &body).await,
            Err(e) => {
                warn!(error = %e, "failed to serialize experiment directive");
                false
            }
        }
    }
}
