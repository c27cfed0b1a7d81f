//! Engine settings
//!
//! Settings are resolved in the following order (lowest to highest priority):
//!
//! 1. **Built-in defaults** - [`EngineSettings::default`]
//! 2. **Settings file** - TOML, YAML or JSON, chosen by extension
//! 3. **Environment variables** - `CASCADE_*`
//!
//! Hosts may override individual fields afterwards (the CLI does this for
//! `--root`), then call [`EngineSettings::validate`].

mod loader;
mod types;
mod validation;

pub use loader::{ENV_PREFIX, load_from_file};
pub use types::{EngineSettings, LocalCacheSettings, SharedTierSettings};
