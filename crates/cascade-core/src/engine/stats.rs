use crate::cache::LocalCacheStats;
use serde::{Deserialize, Serialize};

/// Point-in-time view of an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub local: LocalCacheStats,
    pub shared_tier_available: bool,
    /// Distinct requested identifiers that produced a fallback warning
    pub warned_count: usize,
    pub initialized: bool,
}
