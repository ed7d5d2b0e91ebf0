//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory holding one source file and a destination path.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    /// Create a new fixture with a fresh directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn src(&self) -> PathBuf {
        self.dir.path().join("src.img")
    }

    pub fn dst(&self) -> PathBuf {
        self.dir.path().join("dst.img")
    }

    /// Create the source with `len` logical bytes and data written at each
    /// `(offset, byte, count)`; everything else is left as a hole.
    pub fn create_sparse_source(&self, len: u64, chunks: &[(u64, u8, usize)]) {
        let mut file = File::create(self.src()).expect("Failed to create source");
        for &(offset, byte, count) in chunks {
            file.seek(SeekFrom::Start(offset)).expect("Failed to seek");
            file.write_all(&vec![byte; count]).expect("Failed to write");
        }
        file.set_len(len).expect("Failed to set length");
    }

    /// Assert that the destination has exactly the bytes of the source.
    pub fn assert_identical(&self) {
        assert_files_identical(&self.src(), &self.dst());
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two files byte-for-byte.
pub fn assert_files_identical(a: &Path, b: &Path) {
    let a_bytes = fs::read(a).expect("Failed to read first file");
    let b_bytes = fs::read(b).expect("Failed to read second file");
    assert_eq!(a_bytes.len(), b_bytes.len(), "File length mismatch");
    assert!(a_bytes == b_bytes, "File content mismatch");
}

/// Physical size in bytes, as reported by `st_blocks`.
#[cfg(unix)]
pub fn allocated_bytes(path: &Path) -> u64 {
    use std::os::unix::fs::MetadataExt;
    fs::metadata(path).expect("Failed to stat").blocks() * 512
}
