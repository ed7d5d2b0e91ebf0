//! Error handling integration tests for spcp CLI.
//!
//! These tests verify proper error handling behaviors:
//! - An existing destination is never modified
//! - Source validation
//! - Stable error codes and exit statuses

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use predicates::prelude::*;
use std::fs;

/// The destination is created exclusively, so an existing file must
/// survive untouched.
#[test]
fn test_existing_destination_is_not_modified() {
    let fx = TestFixture::new();
    fs::write(fx.src(), "new content").unwrap();
    fs::write(fx.dst(), "old content").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("-q")
        .arg(fx.src())
        .arg(fx.dst())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error[already_exists]"));

    assert_eq!(fs::read_to_string(fx.dst()).unwrap(), "old content");
}

#[test]
fn test_missing_source() {
    let fx = TestFixture::new();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("-q")
        .arg(fx.src())
        .arg(fx.dst())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error[source_not_found]"));

    assert!(!fx.dst().exists());
}

#[test]
fn test_directory_source_is_rejected() {
    let fx = TestFixture::new();
    fs::create_dir(fx.src()).unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("-q")
        .arg(fx.src())
        .arg(fx.dst())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[invalid_input]"))
        .stderr(predicate::str::contains("is a directory"));

    assert!(!fx.dst().exists());
}

#[test]
fn test_missing_destination_parent() {
    let fx = TestFixture::new();
    fs::write(fx.src(), "data").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("-q")
        .arg(fx.src())
        .arg(fx.dir.path().join("no/such/dir/dst"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to open"));
}

#[test]
fn test_failure_as_json() {
    let fx = TestFixture::new();
    fs::write(fx.src(), "x").unwrap();
    fs::write(fx.dst(), "y").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    let output = cmd
        .args(["--output", "json"])
        .arg(fx.src())
        .arg(fx.dst())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "failed");
    assert_eq!(value["error_code"], "already_exists");
}

#[test]
fn test_invalid_mode_is_usage_error() {
    let fx = TestFixture::new();
    fs::write(fx.src(), "x").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.args(["--mode", "999"])
        .arg(fx.src())
        .arg(fx.dst())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid octal mode"));

    assert!(!fx.dst().exists());
}

#[test]
fn test_requires_two_operands() {
    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("only-one").assert().failure();
}
