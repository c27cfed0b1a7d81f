//! Stand-in store used when no shared tier is configured

use super::{SharedStore, StoreEvent};
use crate::error::{CascadeError, CascadeResult};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::broadcast;

/// Store that is never enabled; every operation reports unavailability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSharedStore;

fn not_configured<T>() -> CascadeResult<T> {
    Err(CascadeError::unavailable("shared tier not configured"))
}

#[async_trait]
impl SharedStore for NoopSharedStore {
    fn name(&self) -> &str {
        "noop"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn connect(&self) -> CascadeResult<()> {
        not_configured()
    }

    async fn ping(&self) -> CascadeResult<()> {
        not_configured()
    }

    async fn get(&self, _key: &str) -> CascadeResult<Option<String>> {
        not_configured()
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CascadeResult<()> {
        not_configured()
    }

    async fn delete(&self, _key: &str) -> CascadeResult<bool> {
        not_configured()
    }

    async fn publish(&self, _channel: &str, _message: &str) -> CascadeResult<usize> {
        not_configured()
    }

    async fn subscribe(&self, _channel: &str) -> CascadeResult<broadcast::Receiver<String>> {
        not_configured()
    }

    async fn close(&self) -> CascadeResult<()> {
        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<StoreEvent> {
        broadcast::channel(1).1
    }
}
