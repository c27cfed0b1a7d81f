//! In-process caching
//!
//! [`LocalCache`] is the first tier: size-bounded, time-bounded, least
//! recently used eviction. It is synchronous; the engine guards it with a
//! mutex that is never held across an `.await`.

pub mod clock;
pub mod local;
pub mod pattern;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use local::{DEFAULT_LOCAL_CAPACITY, DEFAULT_LOCAL_TTL, LocalCache};
pub use pattern::{WILDCARD, matches_pattern};
pub use types::{CacheEntry, LocalCacheStats};
