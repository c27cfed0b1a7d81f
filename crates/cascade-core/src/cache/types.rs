//! Cache types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cached value with its insertion time
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, inserted_at: DateTime<Utc>) -> Self {
        Self { value, inserted_at }
    }

    /// Age of the entry at `now`; zero if the clock moved backwards
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.inserted_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Whether the entry is older than `ttl` at `now`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) > ttl
    }
}

/// Local cache statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalCacheStats {
    /// Number of entries currently held
    pub size: usize,
    /// Capacity
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    /// Hit rate in percent; 0 before any lookup
    pub hit_rate: f64,
    /// Entries dropped to make room
    pub evictions: u64,
}

impl LocalCacheStats {
    /// Percentage of lookups that hit; 0 when nothing was looked up yet
    pub fn compute_hit_rate(hits: u64, misses: u64) -> f64 {
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64 * 100.0
        }
    }
}
