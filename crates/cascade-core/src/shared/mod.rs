//! Shared (cross-process) cache tier
//!
//! The tier is reached through the [`SharedStore`] capability trait so the
//! engine never depends on a particular client library. Implementations:
//! - [`MemorySharedStore`]: in-process store, `Arc`-shared to model a
//!   store shared by several engines
//! - [`NoopSharedStore`]: stand-in when no shared tier is configured
//!
//! [`SharedCacheAdapter`] wraps a store with timeouts, bounded connection
//! retries and the degradation policy: no shared-tier failure is ever fatal.

mod adapter;
mod backoff;
mod memory;
mod noop;

pub use adapter::{SharedCacheAdapter, SharedTierOptions};
pub use backoff::{BackoffStrategy, LinearBackoff};
pub use memory::MemorySharedStore;
pub use noop::NoopSharedStore;

use crate::error::CascadeResult;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use tokio::sync::broadcast;

/// Connection lifecycle notifications emitted by a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Connected,
    Closed,
    Error(String),
}

/// Minimal capability interface of an external key/value store
#[async_trait]
pub trait SharedStore: Send + Sync + Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// False for stand-ins that should never be connected
    fn is_enabled(&self) -> bool {
        true
    }

    async fn connect(&self) -> CascadeResult<()>;

    async fn ping(&self) -> CascadeResult<()>;

    async fn get(&self, key: &str) -> CascadeResult<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CascadeResult<()>;

    /// Remove `key`; returns whether it existed
    async fn delete(&self, key: &str) -> CascadeResult<bool>;

    /// Broadcast `message`; returns the number of subscribers reached
    async fn publish(&self, channel: &str, message: &str) -> CascadeResult<usize>;

    async fn subscribe(&self, channel: &str) -> CascadeResult<broadcast::Receiver<String>>;

    async fn close(&self) -> CascadeResult<()>;

    /// Stream of lifecycle events
    fn events(&self) -> broadcast::Receiver<StoreEvent>;
}
