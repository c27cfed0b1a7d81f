//! In-process shared store

use super::{SharedStore, StoreEvent};
use crate::cache::{Clock, SystemClock};
use crate::error::{CascadeError, CascadeResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

const EVENT_BUFFER: usize = 64;
const CHANNEL_BUFFER: usize = 256;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Key/value store with TTLs and broadcast pub/sub held in memory.
///
/// Share one instance between several engines (via `Arc`) to model a store
/// reached by multiple processes. `set_reachable(false)` simulates an outage.
#[derive(Debug)]
pub struct MemorySharedStore {
    entries: Mutex<HashMap<String, StoredValue>>,
    channels: Mutex<HashMap<String, broadcast::Sender<String>>>,
    events: broadcast::Sender<StoreEvent>,
    reachable: AtomicBool,
    connected: AtomicBool,
    connect_attempts: AtomicU32,
    clock: Arc<dyn Clock>,
}

impl MemorySharedStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            entries: Mutex::new(HashMap::new()),
            channels: Mutex::new(HashMap::new()),
            events,
            reachable: AtomicBool::new(true),
            connected: AtomicBool::new(false),
            connect_attempts: AtomicU32::new(0),
            clock,
        }
    }

    /// Toggle reachability. Going unreachable drops the connection.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
        if !reachable && self.connected.swap(false, Ordering::SeqCst) {
            let _ = self.events.send(StoreEvent::Error("connection lost".to_string()));
        }
    }

    /// Write a value directly, bypassing the connection state.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.lock().insert(
            key.into(),
            StoredValue {
                value: value.into(),
                expires_at: None,
            },
        );
    }

    /// Read a live value directly, bypassing the connection state.
    pub fn peek(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        self.entries
            .lock()
            .get(key)
            .filter(|stored| stored.expires_at.is_none_or(|at| at > now))
            .map(|stored| stored.value.clone())
    }

    pub fn connect_attempts(&self) -> u32 {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn ensure_ready(&self) -> CascadeResult<()> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(CascadeError::unavailable("memory store unreachable"));
        }
        if !self.connected.load(Ordering::SeqCst) {
            return Err(CascadeError::unavailable("memory store not connected"));
        }
        Ok(())
    }
}

impl Default for MemorySharedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SharedStore for MemorySharedStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn connect(&self) -> CascadeResult<()> {
        self.connect_attempts.fetch_add(1, Ordering::SeqCst);
        if !self.reachable.load(Ordering::SeqCst) {
            let _ = self
                .events
                .send(StoreEvent::Error("connection refused".to_string()));
            return Err(CascadeError::unavailable("memory store unreachable"));
        }
        self.connected.store(true, Ordering::SeqCst);
        let _ = self.events.send(StoreEvent::Connected);
        Ok(())
    }

    async fn ping(&self) -> CascadeResult<()> {
        self.ensure_ready()
    }

    async fn get(&self, key: &str) -> CascadeResult<Option<String>> {
        self.ensure_ready()?;
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(stored) if stored.expires_at.is_some_and(|at| at <= now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CascadeResult<()> {
        self.ensure_ready()?;
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .map(|ttl| self.clock.now() + ttl);
        self.entries.lock().insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CascadeResult<bool> {
        self.ensure_ready()?;
        Ok(self.entries.lock().remove(key).is_some())
    }

    async fn publish(&self, channel: &str, message: &str) -> CascadeResult<usize> {
        self.ensure_ready()?;
        let channels = self.channels.lock();
        Ok(channels
            .get(channel)
            .and_then(|sender| sender.send(message.to_string()).ok())
            .unwrap_or(0))
    }

    async fn subscribe(&self, channel: &str) -> CascadeResult<broadcast::Receiver<String>> {
        self.ensure_ready()?;
        let mut channels = self.channels.lock();
        let sender = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_BUFFER).0);
        Ok(sender.subscribe())
    }

    async fn close(&self) -> CascadeResult<()> {
        if self.connected.swap(false, Ordering::SeqCst) {
            let _ = self.events.send(StoreEvent::Closed);
        }
        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
