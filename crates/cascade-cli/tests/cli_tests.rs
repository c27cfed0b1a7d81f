//! Integration tests for the cascade CLI
//!
//! These tests spawn the actual cascade binary against temporary
//! configuration trees and check exit status and output.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn cascade(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cascade"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("CASCADE_SETTINGS")
        .env_remove("CASCADE_CONFIG_ROOT")
        .env_remove("CASCADE_DEFAULT_SCOPE")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run cascade binary")
}

fn tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("_default")).unwrap();
    fs::write(
        dir.path().join("_default/_base.v1.yaml"),
        "provider: x\nmodel: y\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_resolve_prints_json() {
    let dir = tree();
    let output = cascade(dir.path(), &["resolve", "hrkg:extraction", "--format", "json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["document"]["provider"], "x");
    assert_eq!(value["coordinate"]["profile"], "_base");
}

#[test]
fn test_resolve_rejects_bad_name() {
    let dir = tree();
    let output = cascade(dir.path(), &["resolve", "no-profile"]);
    assert!(!output.status.success());
}

#[test]
fn test_check_fails_without_base() {
    let dir = TempDir::new().unwrap();
    let output = cascade(dir.path(), &["check"]);
    assert!(!output.status.success());

    let dir = tree();
    let output = cascade(dir.path(), &["check"]);
    assert!(output.status.success());
}

#[test]
fn test_candidates_lists_every_level() {
    let dir = tree();
    let output = cascade(
        dir.path(),
        &["candidates", "hrkg:extraction", "--user", "alice"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("default:hrkg:alice:extraction:v1"));
    assert!(stdout.contains("_default:_default:_:_base:v1"));
}

#[test]
fn test_validate_reports_schema_errors() {
    let dir = tree();
    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "provider: x\nmodel: y\nunknown: 1\n").unwrap();
    let output = cascade(dir.path(), &["validate", bad.to_str().unwrap()]);
    assert!(!output.status.success());

    let good = dir.path().join("_default/_base.v1.yaml");
    let output = cascade(dir.path(), &["validate", good.to_str().unwrap()]);
    assert!(output.status.success());
}

#[test]
fn test_validate_does_not_read_engine_settings() {
    let dir = tree();
    let missing = dir.path().join("missing-settings.toml");
    let good = dir.path().join("_default/_base.v1.yaml");

    let output = cascade(
        dir.path(),
        &["--settings", missing.to_str().unwrap(), "validate", good.to_str().unwrap()],
    );
    assert!(output.status.success());

    let output = cascade(dir.path(), &["--settings", missing.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
}
