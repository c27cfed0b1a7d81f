//! Configuration resolution engine
//!
//! Composes the tiers into the per-request pipeline:
//!
//! ```text
//! ExperimentCheck -> LocalCacheCheck -> SharedCacheCheck -> CascadeResolve -> WriteBack
//! ```
//!
//! An engine owns its local cache and warning set; only the shared store is
//! shared between instances. Two concurrent misses for the same key may both
//! reach the file system and both write back. The value is idempotent, so
//! this costs a redundant read, never correctness.

mod request;
mod stats;

pub use request::ConfigRequest;
pub use stats::EngineStats;

use crate::cache::{Clock, LocalCache, SystemClock, WILDCARD};
use crate::cascade::{CascadeResolver, CascadeStep, cascade_candidates};
use crate::coordinate::Coordinate;
use crate::document::{ResolvedConfig, validate_document};
use crate::error::{CascadeError, CascadeResult};
use crate::experiment::ExperimentOverride;
use crate::loader::FileLoader;
use crate::settings::EngineSettings;
use crate::shared::{NoopSharedStore, SharedCacheAdapter, SharedStore};
use crate::validation::validate_coordinate;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

type SharedLocalCache = Arc<Mutex<LocalCache<ResolvedConfig>>>;

/// Layered configuration resolver
#[derive(Debug)]
pub struct ConfigResolutionEngine {
    settings: EngineSettings,
    resolver: CascadeResolver,
    local: SharedLocalCache,
    shared: SharedCacheAdapter,
    experiment: ExperimentOverride,
    initialized: AtomicBool,
    lifecycle: tokio::sync::Mutex<()>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl ConfigResolutionEngine {
    /// Engine without a shared tier, using the wall clock
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_parts(settings, Arc::new(NoopSharedStore), Arc::new(SystemClock))
    }

    /// Engine backed by `store` as its shared tier
    pub fn with_shared_store(settings: EngineSettings, store: Arc<dyn SharedStore>) -> Self {
        Self::with_parts(settings, store, Arc::new(SystemClock))
    }

    /// Engine from explicit parts.
    ///
    /// When `settings.shared.enabled` is false the given store is replaced
    /// by [`NoopSharedStore`] and the engine runs without a shared tier.
    pub fn with_parts(
        settings: EngineSettings,
        store: Arc<dyn SharedStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store: Arc<dyn SharedStore> = if !settings.shared.enabled && store.is_enabled() {
            warn!(
                store = store.name(),
                "shared tier disabled in settings, ignoring the configured store"
            );
            Arc::new(NoopSharedStore)
        } else {
            store
        };

        let loader = FileLoader::new(settings.config_root.clone());
        let resolver = CascadeResolver::new(loader, settings.warned_capacity);
        let local = LocalCache::with_clock(settings.local.max_size, settings.local.ttl(), clock);
        let shared = SharedCacheAdapter::new(store, settings.shared.to_options());
        let experiment = ExperimentOverride::new(shared.clone());

        Self {
            settings,
            resolver,
            local: Arc::new(Mutex::new(local)),
            shared,
            experiment,
            initialized: AtomicBool::new(false),
            lifecycle: tokio::sync::Mutex::new(()),
            listener: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn loader(&self) -> &FileLoader {
        self.resolver.loader()
    }

    pub fn shared(&self) -> &SharedCacheAdapter {
        &self.shared
    }

    pub fn experiment(&self) -> &ExperimentOverride {
        &self.experiment
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Verify the universal base fallback and connect the shared tier.
    ///
    /// A missing or invalid base file is fatal. Shared tier failures are
    /// not: the engine then runs on files and the local cache only. Calling
    /// `init` again is a no-op.
    pub async fn init(&self) -> CascadeResult<()> {
        let _guard = self.lifecycle.lock().await;
        if self.is_initialized() {
            warn!("engine already initialized, ignoring repeated init()");
            return Ok(());
        }

        let base = Coordinate::base();
        self.resolver
            .loader()
            .load(&base.module, &base.profile, base.version)
            .await
            .map_err(|e| {
                CascadeError::initialization_caused_by(
                    format!(
                        "universal base fallback {} is missing or invalid under '{}'",
                        base.canonical_id(),
                        self.resolver.loader().root().display()
                    ),
                    e,
                )
            })?;

        if self.shared.connect().await {
            self.spawn_invalidation_listener().await;
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!(
            root = %self.resolver.loader().root().display(),
            shared_tier = self.shared.is_available(),
            "configuration engine initialized"
        );
        Ok(())
    }

    async fn spawn_invalidation_listener(&self) {
        let channel = self.settings.shared.invalidation_channel.clone();
        let Some(mut receiver) = self.shared.subscribe(&channel).await else {
            warn!(channel = %channel, "could not subscribe to invalidation channel");
            return;
        };

        let local = Arc::clone(&self.local);
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(pattern) => {
                        let removed = local.lock().invalidate(&pattern);
                        debug!(pattern = %pattern, removed, "applied remote invalidation");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "invalidation listener lagged, some purges were missed");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        if let Some(previous) = self.listener.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Resolve a request through every tier.
    ///
    /// With `force_refresh` both cache tiers are skipped on the way in but
    /// still written on the way out.
    #[instrument(skip(self, request), fields(request = %request))]
    pub async fn load_config(
        &self,
        request: &ConfigRequest,
        force_refresh: bool,
    ) -> CascadeResult<ResolvedConfig> {
        if !self.is_initialized() {
            return Err(CascadeError::initialization(
                "load_config called before init()",
            ));
        }

        let mut coordinate = request.to_coordinate(&self.settings.default_scope)?;
        let mut bypass_caches = force_refresh;

        if let Some(experiment) = self
            .experiment
            .check(&coordinate.module, &coordinate.profile)
            .await
        {
            coordinate = coordinate.with_version(experiment.version);
            bypass_caches |= experiment.force_refresh;
        }

        let key = coordinate.canonical_id();
        let shared_key = coordinate.shared_key(&self.settings.shared.key_prefix);

        if !bypass_caches {
            let cached = self.local.lock().get(&key);
            if let Some(config) = cached {
                debug!(id = %key, "local cache hit");
                return Ok(config);
            }

            if let Some(config) = self.shared_lookup(&shared_key).await {
                debug!(id = %key, "shared tier hit");
                self.local.lock().set(key, config.clone());
                return Ok(config);
            }
        }

        let config = self.resolver.resolve(&coordinate).await?;
        self.write_back(key, &shared_key, &config).await;
        Ok(config)
    }

    async fn shared_lookup(&self, shared_key: &str) -> Option<ResolvedConfig> {
        let raw = self.shared.get(shared_key).await?;
        let config: ResolvedConfig = match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(key = %shared_key, error = %e, "discarding unreadable shared tier entry");
                return None;
            }
        };

        let checked = validate_coordinate(&config.coordinate)
            .and_then(|()| validate_document(&config.document));
        match checked {
            Ok(()) => Some(config),
            Err(e) => {
                warn!(key = %shared_key, error = %e, "discarding invalid shared tier entry");
                None
            }
        }
    }

    async fn write_back(&self, key: String, shared_key: &str, config: &ResolvedConfig) {
        self.local.lock().set(key, config.clone());

        if !self.shared.is_available() {
            return;
        }
        match serde_json::to_string(config) {
            Ok(body) => {
                self.shared.set(shared_key, &body).await;
            }
            Err(e) => warn!(key = %shared_key, error = %e, "failed to serialize resolved config"),
        }
    }

    /// Cascade plan for a request, most specific first
    pub fn candidates(&self, request: &ConfigRequest) -> CascadeResult<Vec<CascadeStep>> {
        let coordinate = request.to_coordinate(&self.settings.default_scope)?;
        Ok(cascade_candidates(&coordinate))
    }

    /// Purge entries matching `pattern` here and, through the shared tier,
    /// in every subscribed engine. Returns the local entries removed.
    pub async fn invalidate(&self, pattern: &str) -> CascadeResult<usize> {
        if pattern.is_empty() {
            return Err(CascadeError::invalid_identifier(
                "pattern",
                pattern,
                "must not be empty",
            ));
        }

        let removed = self.local.lock().invalidate(pattern);

        if self.shared.is_available() {
            if !pattern.split(':').any(|segment| segment == WILDCARD) {
                let shared_key = format!("{}:{}", self.settings.shared.key_prefix, pattern);
                self.shared.delete(&shared_key).await;
            }
            let reached = self
                .shared
                .publish(&self.settings.shared.invalidation_channel, pattern)
                .await;
            debug!(pattern = %pattern, reached, "published invalidation");
        }

        info!(pattern = %pattern, removed, "invalidated local cache entries");
        Ok(removed)
    }

    /// Forget which identifiers have already produced a fallback warning
    pub fn clear_warnings(&self) {
        self.resolver.clear_warnings();
    }

    /// Whether a fallback warning was emitted for the canonical id `id`
    pub fn has_warned(&self, id: &str) -> bool {
        self.resolver.has_warned(id)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            local: self.local.lock().stats(),
            shared_tier_available: self.shared.is_available(),
            warned_count: self.resolver.warned_count(),
            initialized: self.is_initialized(),
        }
    }

    /// Release the shared tier and drop all local state. Safe to call repeatedly.
    pub async fn close(&self) {
        let _guard = self.lifecycle.lock().await;
        if let Some(handle) = self.listener.lock().take() {
            handle.abort();
        }
        self.shared.close().await;
        self.local.lock().clear();
        self.resolver.clear_warnings();
        if self.initialized.swap(false, Ordering::SeqCst) {
            info!("configuration engine closed");
        }
    }
}
