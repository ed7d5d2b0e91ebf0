//! Sparse layout integration tests for spcp CLI.
//!
//! These tests build real sparse files and check that the copy keeps
//! length, content and (where the filesystem tracks holes) allocation.

#![cfg(target_os = "linux")]

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, allocated_bytes, assert_files_identical};
use rstest::rstest;
use std::fs;

const MB: u64 = 1 << 20;

fn spcp(fx: &TestFixture) {
    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.args(["-q", "--no-sync"])
        .arg(fx.src())
        .arg(fx.dst())
        .assert()
        .success();
}

#[rstest]
#[case::fully_sparse(64 * MB, vec![])]
#[case::trailing_hole(64 * MB, vec![(0, 0xAA, 64 * 1024)])]
#[case::leading_hole(64 * MB, vec![(64 * MB - 4096, 0xBB, 4096)])]
#[case::scattered(64 * MB, vec![(MB, 0x01, 4096), (17 * MB, 0x02, 100_000), (40 * MB, 0x03, 1)])]
#[case::dense(2 * MB, vec![(0, 0x7F, 2 * 1024 * 1024)])]
fn test_layout_is_preserved(#[case] len: u64, #[case] chunks: Vec<(u64, u8, usize)>) {
    let fx = TestFixture::new();
    fx.create_sparse_source(len, &chunks);

    spcp(&fx);

    assert_eq!(fs::metadata(fx.dst()).unwrap().len(), len);
    fx.assert_identical();
}

#[test]
fn test_trailing_hole_reads_as_zero() {
    let fx = TestFixture::new();
    fx.create_sparse_source(8 * MB, &[(0, 0xEE, 8192)]);

    spcp(&fx);

    let out = fs::read(fx.dst()).unwrap();
    assert_eq!(out.len() as u64, 8 * MB);
    assert!(out[..8192].iter().all(|&b| b == 0xEE));
    assert!(out[8192..].iter().all(|&b| b == 0));
}

#[test]
fn test_destination_is_not_more_allocated_than_source() {
    let fx = TestFixture::new();
    fx.create_sparse_source(128 * MB, &[(MB, 0x42, 4096), (100 * MB, 0x43, 4096)]);

    let mut cmd = cargo_bin_cmd!("spcp");
    let output = cmd
        .args(["--no-sync", "--output", "json"])
        .arg(fx.src())
        .arg(fx.dst())
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    // Filesystems without hole tracking report the whole file as data
    if report["bytes_skipped"].as_u64().unwrap_or(0) > 0 {
        let src_alloc = allocated_bytes(&fx.src());
        let dst_alloc = allocated_bytes(&fx.dst());
        assert!(
            dst_alloc <= src_alloc,
            "destination uses {dst_alloc} bytes, source {src_alloc}"
        );
    }
}

#[test]
fn test_two_copies_are_identical() {
    let fx = TestFixture::new();
    fx.create_sparse_source(16 * MB, &[(3 * MB, 0x99, 12_345)]);
    let second = fx.dir.path().join("second.img");

    spcp(&fx);
    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.args(["-q", "--no-sync"])
        .arg(fx.src())
        .arg(&second)
        .assert()
        .success();

    assert_files_identical(&fx.dst(), &second);
    assert_files_identical(&fx.src(), &second);
}
