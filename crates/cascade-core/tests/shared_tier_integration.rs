//! Engines sharing one store: cross-instance reads, invalidation, outages.

use async_trait::async_trait;
use cascade_core::shared::StoreEvent;
use cascade_core::{
    CascadeResult, ConfigRequest, ConfigResolutionEngine, EngineSettings, MemorySharedStore,
    SharedStore,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::broadcast;

/// Store that accepts connections but never answers a command
#[derive(Debug)]
struct StalledStore {
    events: broadcast::Sender<StoreEvent>,
}

impl StalledStore {
    fn new() -> Self {
        Self {
            events: broadcast::channel(4).0,
        }
    }
}

#[async_trait]
impl SharedStore for StalledStore {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn connect(&self) -> CascadeResult<()> {
        Ok(())
    }

    async fn ping(&self) -> CascadeResult<()> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> CascadeResult<Option<String>> {
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CascadeResult<()> {
        std::future::pending().await
    }

    async fn delete(&self, _key: &str) -> CascadeResult<bool> {
        std::future::pending().await
    }

    async fn publish(&self, _channel: &str, _message: &str) -> CascadeResult<usize> {
        std::future::pending().await
    }

    async fn subscribe(&self, _channel: &str) -> CascadeResult<broadcast::Receiver<String>> {
        std::future::pending().await
    }

    async fn close(&self) -> CascadeResult<()> {
        std::future::pending().await
    }

    fn events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

fn write(root: &Path, module: &str, file: &str, content: &str) {
    let dir = root.join(module);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

fn tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "_default", "_base.v1.yaml", "provider: x\nmodel: y\n");
    write(dir.path(), "hrkg", "extraction.v1.yaml", "provider: anthropic\nmodel: claude\n");
    dir
}

fn settings(root: &Path) -> EngineSettings {
    let mut settings = EngineSettings::with_root(root);
    settings.shared.enabled = true;
    settings.shared.max_retries = 1;
    settings.shared.retry_increment_ms = 1;
    settings.shared.connect_timeout_ms = 200;
    settings.shared.command_timeout_ms = 200;
    settings
}

async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

#[tokio::test]
async fn test_second_engine_reads_from_shared_tier() {
    let dir = tree();
    let store = Arc::new(MemorySharedStore::new());

    let first = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store.clone());
    first.init().await.unwrap();
    let request = ConfigRequest::new("hrkg", "extraction");
    let from_file = first.load_config(&request, false).await.unwrap();
    assert!(store.peek("cfg:default:hrkg:_:extraction:v1").is_some());

    // the file is gone; only the shared tier can answer now
    fs::remove_file(dir.path().join("hrkg/extraction.v1.yaml")).unwrap();

    let second = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store.clone());
    second.init().await.unwrap();
    let from_shared = second.load_config(&request, false).await.unwrap();
    assert_eq!(
        serde_json::to_string(&from_file).unwrap(),
        serde_json::to_string(&from_shared).unwrap()
    );
    assert_eq!(second.stats().local.size, 1);
}

#[tokio::test]
async fn test_invalidation_reaches_other_engines() {
    let dir = tree();
    let store = Arc::new(MemorySharedStore::new());
    let request = ConfigRequest::new("hrkg", "extraction");

    let a = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store.clone());
    let b = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store.clone());
    a.init().await.unwrap();
    b.init().await.unwrap();
    a.load_config(&request, false).await.unwrap();
    b.load_config(&request, false).await.unwrap();
    assert_eq!(b.stats().local.size, 1);

    let removed = a.invalidate("default:hrkg:_:extraction:v1").await.unwrap();
    assert_eq!(removed, 1);
    assert!(store.peek("cfg:default:hrkg:_:extraction:v1").is_none());
    assert!(wait_until(|| b.stats().local.size == 0).await);

    a.close().await;
    b.close().await;
}

#[tokio::test]
async fn test_wildcard_invalidation_keeps_shared_entries() {
    let dir = tree();
    let store = Arc::new(MemorySharedStore::new());
    let engine = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store.clone());
    engine.init().await.unwrap();

    engine
        .load_config(&ConfigRequest::new("hrkg", "extraction"), false)
        .await
        .unwrap();
    let removed = engine.invalidate("default:hrkg:*:*:*").await.unwrap();
    assert_eq!(removed, 1);
    // wildcards only purge local caches; shared entries age out by TTL
    assert!(store.peek("cfg:default:hrkg:_:extraction:v1").is_some());
}

#[tokio::test]
async fn test_unreachable_store_degrades_to_files() {
    let dir = tree();
    let store = Arc::new(MemorySharedStore::new());
    store.set_reachable(false);

    let engine = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store.clone());
    engine.init().await.unwrap();
    assert!(!engine.stats().shared_tier_available);
    assert_eq!(store.connect_attempts(), 2);

    let resolved = engine
        .load_config(&ConfigRequest::new("hrkg", "extraction"), false)
        .await
        .unwrap();
    assert_eq!(resolved.model(), "claude");
}

#[tokio::test]
async fn test_outage_after_connect_is_not_fatal() {
    let dir = tree();
    let store = Arc::new(MemorySharedStore::new());
    let engine = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store.clone());
    engine.init().await.unwrap();
    assert!(engine.stats().shared_tier_available);

    store.set_reachable(false);
    assert!(wait_until(|| !engine.stats().shared_tier_available).await);

    let resolved = engine
        .load_config(&ConfigRequest::new("hrkg", "extraction"), true)
        .await
        .unwrap();
    assert_eq!(resolved.model(), "claude");
    assert_eq!(engine.invalidate("default:hrkg:*:*:*").await.unwrap(), 1);
}

#[tokio::test]
async fn test_close_releases_shared_connection() {
    let dir = tree();
    let store = Arc::new(MemorySharedStore::new());
    let engine = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store.clone());
    engine.init().await.unwrap();
    assert!(store.is_connected());

    engine.close().await;
    engine.close().await;
    assert!(!store.is_connected());
    assert!(!engine.stats().shared_tier_available);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_store_resolves_from_files() {
    let dir = tree();
    let store = Arc::new(StalledStore::new());
    let engine = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store);
    engine.init().await.unwrap();
    assert!(engine.stats().shared_tier_available);

    let request = ConfigRequest::new("hrkg", "extraction");
    let resolved = engine.load_config(&request, false).await.unwrap();
    assert_eq!(resolved.model(), "claude");
    assert_eq!(engine.stats().local.size, 1);

    let cached = engine.load_config(&request, false).await.unwrap();
    assert_eq!(cached.model(), "claude");
    assert_eq!(engine.invalidate("default:hrkg:_:extraction:v1").await.unwrap(), 1);
    engine.close().await;
}

#[tokio::test]
async fn test_invalid_shared_entries_are_discarded() {
    let dir = tree();
    let store = Arc::new(MemorySharedStore::new());
    let key = "cfg:default:hrkg:_:extraction:v1";
    let request = ConfigRequest::new("hrkg", "extraction");

    let writer = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store.clone());
    writer.init().await.unwrap();
    writer.load_config(&request, false).await.unwrap();
    let mirrored: serde_json::Value = serde_json::from_str(&store.peek(key).unwrap()).unwrap();

    let mut empty_model = mirrored.clone();
    empty_model["document"]["model"] = serde_json::json!("");
    let mut unsafe_module = mirrored.clone();
    unsafe_module["coordinate"]["module"] = serde_json::json!("../etc");

    for poisoned in [empty_model, unsafe_module] {
        store.insert_raw(key, poisoned.to_string());
        let reader = ConfigResolutionEngine::with_shared_store(settings(dir.path()), store.clone());
        reader.init().await.unwrap();

        let resolved = reader.load_config(&request, false).await.unwrap();
        assert_eq!(resolved.model(), "claude");
        assert_eq!(resolved.coordinate.module, "hrkg");
        reader.close().await;
    }
}
