//! Basic functionality integration tests for spcp CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;

#[test]
fn test_basic_file_copy() {
    let fx = TestFixture::new();
    fs::write(fx.src(), "hello world").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("-q")
        .arg(fx.src())
        .arg(fx.dst())
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied"));

    assert_eq!(fs::read_to_string(fx.dst()).unwrap(), "hello world");
}

#[test]
fn test_empty_file_copy() {
    let fx = TestFixture::new();
    fs::write(fx.src(), "").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("-q").arg(fx.src()).arg(fx.dst()).assert().success();

    assert_eq!(fs::metadata(fx.dst()).unwrap().len(), 0);
}

#[rstest]
#[case::auto("auto")]
#[case::dense("dense")]
fn test_strategies_produce_identical_content(#[case] strategy: &str) {
    let fx = TestFixture::new();
    fx.create_sparse_source(4 << 20, &[(0, 0x11, 4096), (2 << 20, 0x22, 10_000)]);

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.args(["-q", "--no-sync", "--strategy", strategy])
        .arg(fx.src())
        .arg(fx.dst())
        .assert()
        .success();

    fx.assert_identical();
}

#[test]
fn test_json_output() {
    let fx = TestFixture::new();
    fx.create_sparse_source(1 << 20, &[(0, 0x33, 100)]);

    let mut cmd = cargo_bin_cmd!("spcp");
    let output = cmd
        .args(["--output", "json"])
        .arg(fx.src())
        .arg(fx.dst())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "copied");
    assert_eq!(value["logical_size"], 1 << 20);
}

#[test]
fn test_dense_json_reports_every_byte() {
    let fx = TestFixture::new();
    fx.create_sparse_source(256 * 1024, &[]);

    let mut cmd = cargo_bin_cmd!("spcp");
    let output = cmd
        .args(["--output", "json", "--strategy", "dense"])
        .arg(fx.src())
        .arg(fx.dst())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mode"], "dense");
    assert_eq!(value["bytes_copied"], 256 * 1024);
}

#[cfg(unix)]
#[test]
fn test_mode_flag() {
    use std::os::unix::fs::PermissionsExt;

    let fx = TestFixture::new();
    fs::write(fx.src(), "secret").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.args(["-q", "--mode", "600"])
        .arg(fx.src())
        .arg(fx.dst())
        .assert()
        .success();

    let mode = fs::metadata(fx.dst()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_verbose_output() {
    let fx = TestFixture::new();
    fs::write(fx.src(), "abc").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.args(["-v", "--no-sync"])
        .arg(fx.src())
        .arg(fx.dst())
        .assert()
        .success()
        .stdout(predicate::str::contains("Data extents"))
        .stderr(predicate::str::contains("Effective configuration"));
}
