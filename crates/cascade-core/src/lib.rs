//! Cascade Core Library
//!
//! Resolves a logical configuration name (`module:profile`) into a validated
//! configuration document through three tiers: an in-process LRU cache, an
//! optional shared cache, and a file hierarchy with multi-level fallback.
//!
//! ```rust,ignore
//! use cascade_core::{ConfigRequest, ConfigResolutionEngine, EngineSettings};
//!
//! let engine = ConfigResolutionEngine::new(EngineSettings::with_root("./config"));
//! engine.init().await?;
//! let config = engine
//!     .load_config(&"hrkg:extraction".parse::<ConfigRequest>()?, false)
//!     .await?;
//! println!("{} / {}", config.provider(), config.model());
//! ```

pub mod cache;
pub mod cascade;
pub mod coordinate;
pub mod document;
pub mod engine;
pub mod error;
pub mod experiment;
pub mod loader;
pub mod path_security;
pub mod settings;
pub mod shared;
pub mod validation;

// Re-export commonly used types
pub use cache::{Clock, LocalCache, LocalCacheStats, ManualClock, SystemClock};
pub use cascade::{CascadeLevel, CascadeResolver, CascadeStep, cascade_candidates};
pub use coordinate::Coordinate;
pub use document::{ConfigDocument, ResolvedConfig};
pub use engine::{ConfigRequest, ConfigResolutionEngine, EngineStats};
pub use error::{CascadeError, CascadeResult, ErrorKind};
pub use experiment::{ExperimentDirective, ExperimentOverride, ExperimentOverrideResult};
pub use loader::{FileLoader, LoadOutcome};
pub use settings::EngineSettings;
pub use shared::{MemorySharedStore, NoopSharedStore, SharedCacheAdapter, SharedStore};
