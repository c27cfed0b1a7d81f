//! Deterministic config paths and root containment checks
//!
//! Paths are built as `root/module/profile.vVERSION.yaml`. Before a file is
//! read, both the candidate and the root are resolved through symlinks and
//! the candidate must still sit under the root. This catches literal `..`
//! traversal as well as a symlink inside the root that points elsewhere.

use crate::error::{CascadeError, CascadeResult};
use std::ffi::OsString;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::error;

/// Extension of configuration documents
pub const CONFIG_EXTENSION: &str = "yaml";

/// Build the path of a configuration document. Pure and deterministic.
pub fn build_path(root: &Path, module: &str, profile: &str, version: u32) -> PathBuf {
    root.join(module)
        .join(format!("{}.v{}.{}", profile, version, CONFIG_EXTENSION))
}

/// Verify that `candidate` stays inside `root` once symlinks are resolved.
///
/// Either path may not exist yet; the deepest existing ancestor is resolved
/// and the remainder appended. Returns the resolved candidate path.
pub async fn verify_containment(candidate: &Path, root: &Path) -> CascadeResult<PathBuf> {
    let resolved_root = resolve_lenient(root).await?;
    let resolved_candidate = resolve_lenient(candidate).await?;

    let contained = match resolved_candidate.strip_prefix(&resolved_root) {
        Ok(relative) => {
            !relative.is_absolute()
                && !matches!(relative.components().next(), Some(Component::ParentDir))
        }
        Err(_) => false,
    };

    if !contained {
        error!(
            target: "cascade::audit",
            candidate = %candidate.display(),
            resolved = %resolved_candidate.display(),
            root = %resolved_root.display(),
            "config path escapes the configuration root"
        );
        return Err(CascadeError::security_violation(format!(
            "path '{}' resolves outside the configuration root '{}'",
            candidate.display(),
            root.display()
        )));
    }

    Ok(resolved_candidate)
}

/// Canonicalize a path, tolerating missing trailing components.
async fn resolve_lenient(path: &Path) -> CascadeResult<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let normalized = normalize_lexically(&absolute);

    let mut existing = normalized.as_path();
    let mut missing: Vec<OsString> = Vec::new();
    loop {
        match fs::canonicalize(existing).await {
            Ok(mut resolved) => {
                for component in missing.iter().rev() {
                    resolved.push(component);
                }
                return Ok(resolved);
            }
            Err(e) if matches!(e.kind(), IoErrorKind::NotFound | IoErrorKind::PermissionDenied) => {
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        missing.push(name.to_os_string());
                        existing = parent;
                    }
                    _ => return Ok(normalized),
                }
            }
            Err(e) => {
                return Err(CascadeError::Io {
                    message: e.to_string(),
                    path: Some(existing.display().to_string()),
                });
            }
        }
    }
}

/// Collapse `.` and `..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
