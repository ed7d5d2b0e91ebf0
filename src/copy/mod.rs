//! Core copy operations.
//!
//! This module provides the sparse-aware copy between open handles, the
//! dense byte-for-byte baseline, and the path-level [`copy_file`] that
//! wires them to the filesystem.

mod dense;
mod file;
mod sparse;
mod stats;

// Re-export public API
pub use dense::{copy_dense, copy_dense_with_progress};
pub use file::{copy_file, copy_file_dense};
pub use sparse::{copy_sparse, copy_sparse_with_progress};
pub use stats::{CopyMode, CopyStats};
