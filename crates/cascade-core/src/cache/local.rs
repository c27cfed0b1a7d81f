//! Size- and time-bounded LRU cache

use super::clock::{Clock, SystemClock};
use super::pattern::matches_pattern;
use super::types::{CacheEntry, LocalCacheStats};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

/// Default number of entries
pub const DEFAULT_LOCAL_CAPACITY: usize = 100;

/// Default time-to-live (6 hours)
pub const DEFAULT_LOCAL_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// In-process LRU cache with a fixed TTL.
///
/// Every successful `get` and every `set` moves the key to the most recently
/// used position. An insertion that overflows capacity evicts exactly one
/// entry, the least recently used.
#[derive(Debug)]
pub struct LocalCache<V> {
    entries: LruCache<String, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V: Clone> LocalCache<V> {
    /// Create a cache using the wall clock
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source
    pub fn with_clock(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
            clock,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up `key`. Expired entries are removed and count as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let expired = match self.entries.peek(key) {
            Some(entry) => entry.is_expired(now, self.ttl),
            None => {
                self.misses += 1;
                return None;
            }
        };

        if expired {
            self.entries.pop(key);
            self.misses += 1;
            return None;
        }

        self.hits += 1;
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or replace `key` at the most recently used position.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let entry = CacheEntry::new(value, self.clock.now());
        if let Some((displaced, _)) = self.entries.push(key.clone(), entry) {
            if displaced != key {
                self.evictions += 1;
            }
        }
    }

    /// Whether a live entry exists. Does not touch recency or counters.
    pub fn has(&mut self, key: &str) -> bool {
        let now = self.clock.now();
        match self.entries.peek(key) {
            Some(entry) if entry.is_expired(now, self.ttl) => {
                self.entries.pop(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Remove `key`; returns whether it was present
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.pop(key).is_some()
    }

    /// Drop every entry and reset counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    /// Remove entries whose key matches `pattern`; returns the count removed.
    pub fn invalidate(&mut self, pattern: &str) -> usize {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| matches_pattern(key, pattern))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.entries.pop(key);
        }
        doomed.len()
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> LocalCacheStats {
        LocalCacheStats {
            size: self.entries.len(),
            max_size: self.capacity(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: LocalCacheStats::compute_hit_rate(self.hits, self.misses),
            evictions: self.evictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;

    fn cache_with_clock(capacity: usize, ttl: Duration) -> (LocalCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = LocalCache::with_clock(capacity, ttl, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_basic_operations() {
        let mut cache = LocalCache::new(10, Duration::from_secs(60));
        cache.set("k1", "v1".to_string());
        assert!(cache.has("k1"));
        assert_eq!(cache.get("k1"), Some("v1".to_string()));
        assert!(cache.delete("k1"));
        assert!(!cache.delete("k1"));
        assert_eq!(cache.get("k1"), None);
    }

    #[test]
    fn test_lru_eviction_keeps_most_recent() {
        let mut cache = LocalCache::new(3, Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);
        // touch "a" so "b" becomes least recently used
        assert_eq!(cache.get("a"), Some(1));
        cache.set("d", 4);

        assert_eq!(cache.len(), 3);
        assert!(!cache.has("b"));
        assert!(cache.has("a"));
        assert!(cache.has("c"));
        assert!(cache.has("d"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_overflow_by_one_evicts_exactly_one() {
        let mut cache = LocalCache::new(5, Duration::from_secs(60));
        for i in 0..6 {
            cache.set(format!("k{}", i), i);
        }
        assert_eq!(cache.len(), 5);
        assert!(!cache.has("k0"));
        for i in 1..6 {
            assert!(cache.has(&format!("k{}", i)));
        }
    }

    #[test]
    fn test_duplicate_set_moves_to_front_without_growth() {
        let mut cache = LocalCache::new(3, Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get("a"), Some(10));
    }

    #[test]
    fn test_ttl_expiry_boundaries() {
        let ttl = Duration::from_secs(60);
        let (mut cache, clock) = cache_with_clock(10, ttl);
        cache.set("k", "v".to_string());

        clock.advance(ttl - Duration::from_millis(1));
        assert_eq!(cache.get("k"), Some("v".to_string()));

        clock.advance(Duration::from_millis(2));
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_has_removes_expired_entry() {
        let ttl = Duration::from_secs(1);
        let (mut cache, clock) = cache_with_clock(10, ttl);
        cache.set("k", "v".to_string());
        clock.advance(Duration::from_millis(1001));
        assert!(!cache.has("k"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_pattern_invalidation() {
        let mut cache = LocalCache::new(10, Duration::from_secs(60));
        for key in ["a:b:c", "a:x:c", "d:b:c"] {
            cache.set(key, key.to_string());
        }

        assert_eq!(cache.invalidate("a:b"), 0);
        assert_eq!(cache.invalidate("a:*:c"), 2);
        assert!(cache.has("d:b:c"));
        assert_eq!(cache.len(), 1);

        for key in ["a:b:c", "a:x:c"] {
            cache.set(key, key.to_string());
        }
        assert_eq!(cache.invalidate("*"), 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats_hit_rate() {
        let mut cache = LocalCache::new(10, Duration::from_secs(60));
        assert_eq!(cache.stats().hit_rate, 0.0);
        cache.set("k", 1);
        cache.get("k");
        cache.get("k");
        cache.get("k");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.max_size, 10);
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_clear_resets() {
        let mut cache = LocalCache::new(10, Duration::from_secs(60));
        cache.set("k", 1);
        cache.get("k");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), LocalCacheStats {
            size: 0,
            max_size: 10,
            ..Default::default()
        });
    }
}
