//! Cascade resolution
//!
//! Tries the candidates produced by [`cascade_candidates`] in order and
//! returns the first document found. `NotFound` falls through to the next
//! level; any other failure aborts the cascade immediately.

mod candidates;
mod warned;

pub use candidates::{CascadeLevel, CascadeStep, cascade_candidates};
pub use warned::{DEFAULT_WARNED_CAPACITY, WarnedSet};

use crate::coordinate::Coordinate;
use crate::document::ResolvedConfig;
use crate::error::{CascadeError, CascadeResult};
use crate::loader::{FileLoader, LoadOutcome};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};

/// File-backed resolver with fallback
#[derive(Debug)]
pub struct CascadeResolver {
    loader: FileLoader,
    warned: Mutex<WarnedSet>,
}

impl CascadeResolver {
    pub fn new(loader: FileLoader, warned_capacity: usize) -> Self {
        Self {
            loader,
            warned: Mutex::new(WarnedSet::new(warned_capacity)),
        }
    }

    pub fn loader(&self) -> &FileLoader {
        &self.loader
    }

    /// Resolve `requested` against the file hierarchy.
    ///
    /// The returned config carries the coordinate that was actually found,
    /// which is less specific than `requested` when a fallback level won.
    pub async fn resolve(&self, requested: &Coordinate) -> CascadeResult<ResolvedConfig> {
        let requested_id = requested.canonical_id();
        let steps = cascade_candidates(requested);
        let mut attempted = Vec::with_capacity(steps.len());
        let mut tried_paths: HashSet<PathBuf> = HashSet::with_capacity(steps.len());

        for (index, step) in steps.iter().enumerate() {
            let coord = &step.coordinate;
            let candidate_id = coord.canonical_id();
            attempted.push(candidate_id.clone());

            let path = self
                .loader
                .path_for(&coord.module, &coord.profile, coord.version);
            if !tried_paths.insert(path) {
                continue;
            }

            match self
                .loader
                .try_load(&coord.module, &coord.profile, coord.version)
                .await
            {
                LoadOutcome::Found(document) => {
                    if index > 0 {
                        self.warn_fallback(&requested_id, &candidate_id, step.level);
                    }
                    debug!(
                        requested = %requested_id,
                        resolved = %candidate_id,
                        level = ?step.level,
                        "resolved configuration from file"
                    );
                    return Ok(ResolvedConfig::new(coord.clone(), document));
                }
                LoadOutcome::NotFound { .. } => continue,
                LoadOutcome::Invalid(error) | LoadOutcome::SecurityViolation(error) => {
                    return Err(error);
                }
            }
        }

        Err(CascadeError::not_found(
            format!(
                "no configuration for '{}'; tried: {}",
                requested_id,
                attempted.join(", ")
            ),
            attempted,
        ))
    }

    fn warn_fallback(&self, requested_id: &str, fallback_id: &str, level: CascadeLevel) {
        if self.warned.lock().insert(requested_id) {
            warn!(
                requested = %requested_id,
                fallback = %fallback_id,
                level = ?level,
                "configuration fell back to a less specific level"
            );
        }
    }

    /// Whether a fallback warning has already been emitted for `id`
    pub fn has_warned(&self, id: &str) -> bool {
        self.warned.lock().contains(id)
    }

    pub fn warned_count(&self) -> usize {
        self.warned.lock().len()
    }

    pub fn clear_warnings(&self) {
        self.warned.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::NO_USER;
    use crate::error::ErrorKind;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, module: &str, file: &str, content: &str) {
        let dir = root.join(module);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), content).unwrap();
    }

    fn resolver(root: &Path) -> CascadeResolver {
        CascadeResolver::new(FileLoader::new(root), 16)
    }

    #[tokio::test]
    async fn test_exact_match_wins_without_warning() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "_default", "_base.v1.yaml", "provider: x\nmodel: y\n");
        write(temp_dir.path(), "hrkg", "extraction.v1.yaml", "provider: a\nmodel: b\n");

        let resolver = resolver(temp_dir.path());
        let requested = Coordinate::new("default", "hrkg", NO_USER, "extraction", 1);
        let resolved = resolver.resolve(&requested).await.unwrap();
        assert_eq!(resolved.coordinate, requested);
        assert_eq!(resolved.provider(), "a");
        assert_eq!(resolver.warned_count(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_to_base_and_warns_once() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "_default", "_base.v1.yaml", "provider: x\nmodel: y\n");

        let resolver = resolver(temp_dir.path());
        let requested = Coordinate::new("default", "hrkg", NO_USER, "extraction", 1);
        let resolved = resolver.resolve(&requested).await.unwrap();
        assert_eq!(resolved.coordinate, Coordinate::base());
        assert_eq!(resolved.model(), "y");
        assert!(resolver.has_warned(&requested.canonical_id()));

        resolver.resolve(&requested).await.unwrap();
        assert_eq!(resolver.warned_count(), 1);
    }

    #[tokio::test]
    async fn test_scope_default_module_level() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "_default", "_base.v1.yaml", "provider: x\nmodel: y\n");
        write(temp_dir.path(), "_default", "summary.v1.yaml", "provider: s\nmodel: t\n");

        let resolver = resolver(temp_dir.path());
        let resolved = resolver
            .resolve(&Coordinate::new("prod", "hrkg", NO_USER, "summary", 1))
            .await
            .unwrap();
        assert_eq!(resolved.coordinate.canonical_id(), "prod:_default:_:summary:v1");
        assert_eq!(resolved.provider(), "s");
    }

    #[tokio::test]
    async fn test_invalid_level_aborts_cascade() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "_default", "_base.v1.yaml", "provider: x\nmodel: y\n");
        write(temp_dir.path(), "hrkg", "extraction.v1.yaml", "provider: a\nbogus: 1\n");

        let resolver = resolver(temp_dir.path());
        let err = resolver
            .resolve(&Coordinate::new("default", "hrkg", NO_USER, "extraction", 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[tokio::test]
    async fn test_all_levels_missing_lists_attempts() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = resolver(temp_dir.path());
        let err = resolver
            .resolve(&Coordinate::new("prod", "hrkg", "u1", "extraction", 1))
            .await
            .unwrap_err();
        match err {
            CascadeError::NotFound { attempted, .. } => {
                assert_eq!(attempted.len(), 5);
                assert_eq!(attempted[0], "prod:hrkg:u1:extraction:v1");
                assert_eq!(attempted[4], "_default:_default:_:_base:v1");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_clear_warnings_allows_rewarn() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "_default", "_base.v1.yaml", "provider: x\nmodel: y\n");
        let resolver = resolver(temp_dir.path());
        let requested = Coordinate::new("default", "hrkg", NO_USER, "extraction", 1);
        resolver.resolve(&requested).await.unwrap();
        resolver.clear_warnings();
        assert!(!resolver.has_warned(&requested.canonical_id()));
    }
}
