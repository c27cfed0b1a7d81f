//! Single-file configuration loading
//!
//! The loader validates identifiers, checks root containment, reads the
//! file and parses it against the strict schema. Per-level attempts return a
//! [`LoadOutcome`] so the cascade can fall through on `NotFound` without
//! treating the common case as an error.

use crate::document::{ConfigDocument, validate_document};
use crate::error::{CascadeError, CascadeResult, ErrorKind};
use crate::path_security::{build_path, verify_containment};
use crate::validation::{validate_module, validate_profile, validate_version};
use serde_yaml::Value;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Result of one load attempt
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The file exists and passed validation
    Found(ConfigDocument),
    /// The file is absent or unreadable
    NotFound { path: PathBuf },
    /// Parse, schema or identifier failure
    Invalid(CascadeError),
    /// Dangerous characters or a path outside the root
    SecurityViolation(CascadeError),
}

impl LoadOutcome {
    fn from_error(error: CascadeError) -> Self {
        match error.kind() {
            ErrorKind::SecurityViolation => Self::SecurityViolation(error),
            _ => Self::Invalid(error),
        }
    }

    /// Convert into a result, turning `NotFound` into an error.
    pub fn into_result(self) -> CascadeResult<ConfigDocument> {
        match self {
            Self::Found(doc) => Ok(doc),
            Self::NotFound { path } => Err(CascadeError::not_found(
                format!("no configuration file at '{}'", path.display()),
                Vec::new(),
            )),
            Self::Invalid(error) | Self::SecurityViolation(error) => Err(error),
        }
    }
}

/// Loads configuration documents from a root directory
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a `(module, profile, version)` triple maps to
    pub fn path_for(&self, module: &str, profile: &str, version: u32) -> PathBuf {
        build_path(&self.root, module, profile, version)
    }

    /// Attempt to load one document.
    pub async fn try_load(&self, module: &str, profile: &str, version: u32) -> LoadOutcome {
        if let Err(e) = validate_module(module)
            .and_then(|_| validate_profile(profile))
            .and_then(|_| validate_version(version))
        {
            return LoadOutcome::from_error(e);
        }

        let path = self.path_for(module, profile, version);
        let resolved = match verify_containment(&path, &self.root).await {
            Ok(resolved) => resolved,
            Err(e) => return LoadOutcome::from_error(e),
        };

        let content = match fs::read_to_string(&resolved).await {
            Ok(content) => content,
            Err(e) if matches!(e.kind(), IoErrorKind::NotFound | IoErrorKind::PermissionDenied) => {
                debug!(path = %path.display(), reason = %e, "config file not available");
                return LoadOutcome::NotFound { path };
            }
            Err(e) => {
                return LoadOutcome::Invalid(CascadeError::invalid_configuration_at(
                    format!("failed to read config file: {}", e),
                    path.display().to_string(),
                ));
            }
        };

        match parse_document(&content, &path) {
            Ok(doc) => {
                if doc.metadata.deprecated {
                    warn!(path = %path.display(), "loaded a deprecated configuration");
                }
                LoadOutcome::Found(doc)
            }
            Err(e) => LoadOutcome::Invalid(e),
        }
    }

    /// Load one document, failing with `NotFound` when it does not exist.
    pub async fn load(
        &self,
        module: &str,
        profile: &str,
        version: u32,
    ) -> CascadeResult<ConfigDocument> {
        self.try_load(module, profile, version).await.into_result()
    }
}

/// Parse and validate document text.
///
/// Only plain scalars, sequences and mappings are accepted; any YAML tag is
/// rejected before deserialization.
pub fn parse_document(content: &str, path: &Path) -> CascadeResult<ConfigDocument> {
    let location = path.display().to_string();

    let value: Value = serde_yaml::from_str(content).map_err(|e| {
        CascadeError::invalid_configuration_at(
            format!("failed to parse YAML: {}", e),
            location.clone(),
        )
    })?;

    if let Some(tag) = find_tag(&value) {
        return Err(CascadeError::invalid_configuration_at(
            format!("YAML tags are not allowed (found '{}')", tag),
            location,
        ));
    }

    let doc: ConfigDocument = serde_yaml::from_value(value).map_err(|e| {
        CascadeError::invalid_configuration_at(
            format!("schema validation failed: {}", e),
            location.clone(),
        )
    })?;

    validate_document(&doc).map_err(|e| match e {
        CascadeError::InvalidConfiguration { message, .. } => {
            CascadeError::invalid_configuration_at(message, location)
        }
        other => other,
    })?;

    Ok(doc)
}

fn find_tag(value: &Value) -> Option<String> {
    match value {
        Value::Tagged(tagged) => Some(tagged.tag.to_string()),
        Value::Sequence(items) => items.iter().find_map(find_tag),
        Value::Mapping(map) => map
            .iter()
            .find_map(|(k, v)| find_tag(k).or_else(|| find_tag(v))),
        _ => None,
    }
}
