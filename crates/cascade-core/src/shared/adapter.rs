//! Degrading wrapper around a shared store

use super::backoff::{BackoffStrategy, LinearBackoff};
use super::{SharedStore, StoreEvent};
use crate::error::{CascadeError, CascadeResult};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Timeouts, TTL and retry policy of the shared tier
#[derive(Debug, Clone)]
pub struct SharedTierOptions {
    /// Expiry of mirrored documents
    pub ttl: Duration,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
    /// Retries after the first failed connection attempt
    pub max_retries: u32,
    pub retry_increment: Duration,
    pub retry_max_delay: Duration,
}

impl Default for SharedTierOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            connect_timeout: Duration::from_millis(2000),
            command_timeout: Duration::from_millis(1000),
            max_retries: 3,
            retry_increment: Duration::from_millis(50),
            retry_max_delay: Duration::from_millis(2000),
        }
    }
}

/// Shared tier access that never fails the caller.
///
/// Every command is bounded by a timeout; errors and timeouts are logged at
/// `warn` and reported as "absent". The `available` flag follows the store's
/// lifecycle events once connected.
#[derive(Debug, Clone)]
pub struct SharedCacheAdapter {
    store: Arc<dyn SharedStore>,
    options: SharedTierOptions,
    available: Arc<AtomicBool>,
    watcher: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SharedCacheAdapter {
    pub fn new(store: Arc<dyn SharedStore>, options: SharedTierOptions) -> Self {
        Self {
            store,
            options,
            available: Arc::new(AtomicBool::new(false)),
            watcher: Arc::new(Mutex::new(None)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_enabled()
    }

    pub fn ttl(&self) -> Duration {
        self.options.ttl
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Connect with bounded, linearly increasing retries.
    ///
    /// Returns whether the tier is available afterwards. After the retry
    /// ceiling is reached the tier stays unavailable until `connect` is
    /// called again.
    pub async fn connect(&self) -> bool {
        if !self.store.is_enabled() {
            debug!(store = self.store.name(), "shared tier disabled");
            return false;
        }
        if self.is_available() {
            return true;
        }

        let backoff = LinearBackoff::stepped(
            self.options.retry_increment,
            self.options.retry_max_delay,
        );
        let attempts = self.options.max_retries.saturating_add(1);

        for attempt in 0..attempts {
            match self.try_connect().await {
                Ok(()) => {
                    self.available.store(true, Ordering::SeqCst);
                    self.watch_events();
                    info!(
                        store = self.store.name(),
                        attempt = attempt + 1,
                        "shared tier connected"
                    );
                    return true;
                }
                Err(e) => {
                    warn!(
                        store = self.store.name(),
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        error = %e,
                        "shared tier connection attempt failed"
                    );
                    if attempt + 1 < attempts {
                        tokio::time::sleep(backoff.delay_for_attempt(attempt)).await;
                    }
                }
            }
        }

        warn!(
            store = self.store.name(),
            "shared tier unavailable after {} attempts; continuing with file and local cache only",
            attempts
        );
        false
    }

    async fn try_connect(&self) -> CascadeResult<()> {
        bounded(self.options.connect_timeout, "connect", self.store.connect()).await?;
        bounded(self.options.command_timeout, "ping", self.store.ping()).await
    }

    fn watch_events(&self) {
        let mut events = self.store.events();
        let available = Arc::clone(&self.available);
        let store = self.store.name().to_string();
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(StoreEvent::Connected) => {
                        available.store(true, Ordering::SeqCst);
                        debug!(store = %store, "shared tier connected event");
                    }
                    Ok(StoreEvent::Closed) => {
                        available.store(false, Ordering::SeqCst);
                        warn!(store = %store, "shared tier connection closed");
                    }
                    Ok(StoreEvent::Error(message)) => {
                        available.store(false, Ordering::SeqCst);
                        warn!(store = %store, error = %message, "shared tier connection error");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(store = %store, skipped, "lifecycle events lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        if let Some(previous) = self.watcher.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Fetch a serialized value; `None` on miss or any failure.
    pub async fn get(&self, key: &str) -> Option<String> {
        if !self.is_available() {
            return None;
        }
        match bounded(self.options.command_timeout, "get", self.store.get(key)).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "shared tier get failed");
                None
            }
        }
    }

    /// Store a serialized value with the tier TTL; returns whether it was written.
    pub async fn set(&self, key: &str, value: &str) -> bool {
        if !self.is_available() {
            return false;
        }
        match bounded(
            self.options.command_timeout,
            "set",
            self.store.set(key, value, self.options.ttl),
        )
        .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "shared tier set failed");
                false
            }
        }
    }

    pub async fn delete(&self, key: &str) -> bool {
        if !self.is_available() {
            return false;
        }
        match bounded(self.options.command_timeout, "delete", self.store.delete(key)).await {
            Ok(existed) => existed,
            Err(e) => {
                warn!(key, error = %e, "shared tier delete failed");
                false
            }
        }
    }

    /// Publish on a channel; returns subscribers reached (0 on failure).
    pub async fn publish(&self, channel: &str, message: &str) -> usize {
        if !self.is_available() {
            return 0;
        }
        match bounded(
            self.options.command_timeout,
            "publish",
            self.store.publish(channel, message),
        )
        .await
        {
            Ok(reached) => reached,
            Err(e) => {
                warn!(channel, error = %e, "shared tier publish failed");
                0
            }
        }
    }

    pub async fn subscribe(&self, channel: &str) -> Option<broadcast::Receiver<String>> {
        if !self.is_available() {
            return None;
        }
        match bounded(
            self.options.command_timeout,
            "subscribe",
            self.store.subscribe(channel),
        )
        .await
        {
            Ok(receiver) => Some(receiver),
            Err(e) => {
                warn!(channel, error = %e, "shared tier subscribe failed");
                None
            }
        }
    }

    /// Release the connection. Safe to call repeatedly.
    pub async fn close(&self) {
        if let Some(handle) = self.watcher.lock().take() {
            handle.abort();
        }
        let was_available = self.available.swap(false, Ordering::SeqCst);
        if was_available {
            if let Err(e) = bounded(self.options.command_timeout, "close", self.store.close()).await
            {
                warn!(store = self.store.name(), error = %e, "shared tier close failed");
            }
        }
    }
}

/// Run a store command under a timeout, folding expiry into `Unavailable`.
async fn bounded<T, F>(limit: Duration, op: &str, fut: F) -> CascadeResult<T>
where
    F: Future<Output = CascadeResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(CascadeError::unavailable(format!(
            "{} timed out after {}ms",
            op,
            limit.as_millis()
        ))),
    }
}
