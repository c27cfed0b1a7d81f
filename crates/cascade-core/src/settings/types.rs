//! Settings types

use crate::cache::{DEFAULT_LOCAL_CAPACITY, DEFAULT_LOCAL_TTL};
use crate::cascade::DEFAULT_WARNED_CAPACITY;
use crate::shared::SharedTierOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Root directory of the configuration tree
    pub config_root: PathBuf,
    /// Scope used when a request names none
    pub default_scope: String,
    /// Bound of the fallback-warning set
    pub warned_capacity: usize,
    pub local: LocalCacheSettings,
    pub shared: SharedTierSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            config_root: PathBuf::from("./config"),
            default_scope: "default".to_string(),
            warned_capacity: DEFAULT_WARNED_CAPACITY,
            local: LocalCacheSettings::default(),
            shared: SharedTierSettings::default(),
        }
    }
}

impl EngineSettings {
    /// Settings rooted at `config_root`, defaults elsewhere
    pub fn with_root(config_root: impl Into<PathBuf>) -> Self {
        Self {
            config_root: config_root.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalCacheSettings {
    pub max_size: usize,
    pub ttl_secs: u64,
}

impl Default for LocalCacheSettings {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_LOCAL_CAPACITY,
            ttl_secs: DEFAULT_LOCAL_TTL.as_secs(),
        }
    }
}

impl LocalCacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Shared tier connection and retry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedTierSettings {
    /// Whether the host should inject a real store
    pub enabled: bool,
    pub ttl_secs: u64,
    pub connect_timeout_ms: u64,
    pub command_timeout_ms: u64,
    pub max_retries: u32,
    pub retry_increment_ms: u64,
    pub retry_max_delay_ms: u64,
    /// Prefix of resolved-document keys
    pub key_prefix: String,
    /// Pub/sub channel carrying invalidation patterns
    pub invalidation_channel: String,
}

impl Default for SharedTierSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_secs: 3600,
            connect_timeout_ms: 2000,
            command_timeout_ms: 1000,
            max_retries: 3,
            retry_increment_ms: 50,
            retry_max_delay_ms: 2000,
            key_prefix: "cfg".to_string(),
            invalidation_channel: "cfg:invalidate".to_string(),
        }
    }
}

impl SharedTierSettings {
    pub fn to_options(&self) -> SharedTierOptions {
        SharedTierOptions {
            ttl: Duration::from_secs(self.ttl_secs),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            command_timeout: Duration::from_millis(self.command_timeout_ms),
            max_retries: self.max_retries,
            retry_increment: Duration::from_millis(self.retry_increment_ms),
            retry_max_delay: Duration::from_millis(self.retry_max_delay_ms),
        }
    }
}
