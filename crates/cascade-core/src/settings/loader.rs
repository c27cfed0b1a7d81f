//! Settings loading from files and the environment

use super::types::EngineSettings;
use crate::error::{CascadeError, CascadeResult};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "CASCADE_";

/// Load settings from a file
///
/// Supports JSON, TOML, and YAML formats based on file extension. Unlike the
/// environment layer, a missing file is an error: the caller named it.
pub fn load_from_file(path: &Path) -> CascadeResult<EngineSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CascadeError::settings_with_context(
            format!("Failed to read settings file: {}", e),
            format!("Reading settings from '{}'", path.display()),
        )
    })?;

    let settings = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            CascadeError::settings_with_context(
                format!("Failed to parse TOML settings: {}", e),
                format!("Deserializing TOML settings from '{}'", path.display()),
            )
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            CascadeError::settings_with_context(
                format!("Failed to parse YAML settings: {}", e),
                format!("Deserializing YAML settings from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            CascadeError::settings_with_context(
                format!("Failed to parse JSON settings: {}", e),
                format!("Deserializing JSON settings from '{}'", path.display()),
            )
        })?,
    };

    debug!(path = %path.display(), "loaded engine settings");
    Ok(settings)
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> CascadeResult<T> {
    raw.trim().parse().map_err(|_| {
        CascadeError::settings_with_context(
            format!("Invalid {} value", name),
            format!("Parsing '{}' from the environment", raw),
        )
    })
}

fn parse_bool(name: &str, raw: &str) -> CascadeResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CascadeError::settings_with_context(
            format!("Invalid {} value", name),
            format!("Expected a boolean, got '{}'", raw),
        )),
    }
}

impl EngineSettings {
    /// Defaults, then the file at `path`
    pub fn from_file(path: impl AsRef<Path>) -> CascadeResult<Self> {
        load_from_file(path.as_ref())
    }

    /// Apply `CASCADE_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> CascadeResult<()> {
        self.apply_overrides_from(|name| env::var(name).ok())
    }

    /// Apply `CASCADE_*` overrides read through `lookup`
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> CascadeResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            let name = format!("{}{}", ENV_PREFIX, suffix);
            lookup(&name).map(|value| (name, value))
        };

        if let Some((_, root)) = var("CONFIG_ROOT") {
            self.config_root = PathBuf::from(root);
        }
        if let Some((_, scope)) = var("DEFAULT_SCOPE") {
            self.default_scope = scope;
        }
        if let Some((name, raw)) = var("LOCAL_CACHE_SIZE") {
            self.local.max_size = parse_var(&name, &raw)?;
        }
        if let Some((name, raw)) = var("LOCAL_CACHE_TTL_SECS") {
            self.local.ttl_secs = parse_var(&name, &raw)?;
        }
        if let Some((name, raw)) = var("SHARED_ENABLED") {
            self.shared.enabled = parse_bool(&name, &raw)?;
        }
        if let Some((name, raw)) = var("SHARED_TTL_SECS") {
            self.shared.ttl_secs = parse_var(&name, &raw)?;
        }
        if let Some((name, raw)) = var("SHARED_MAX_RETRIES") {
            self.shared.max_retries = parse_var(&name, &raw)?;
        }
        Ok(())
    }

    /// Load the file if given, then apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> CascadeResult<Self> {
        let mut settings = match path {
            Some(p) => load_from_file(p)?,
            None => Self::default(),
        };
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }
}
