//! # sparsecopy
//!
//! Sparse-aware file copying for Rust.
//!
//! Virtual-machine disk images and similar files are often mostly holes:
//! ranges with no allocated storage that read back as zeros. A plain copy
//! reads and writes every one of those zeros. sparsecopy asks the
//! filesystem where the data is (`lseek` with `SEEK_DATA` / `SEEK_HOLE`),
//! copies only those extents to the same offsets in the destination, and
//! sets the final length with a single truncate. Holes stay holes.
//!
//! ## Core Features
//!
//! - **Sparse copy**: only data extents are read and written
//! - **Exact layout**: every extent lands at the same offset, length preserved
//! - **Handle-level API**: [`copy_sparse`] works on any [`SparseSeek`] source
//! - **Dense fallback**: [`copy_dense`] where extent queries are unavailable
//! - **Exclusive create**: [`copy_file`] never overwrites an existing file
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use sparsecopy::CopyBuilder;
//!
//! let stats = CopyBuilder::new("disk.img", "disk-copy.img").run()?;
//! println!(
//!     "{} bytes logical, {} bytes of data in {} extents",
//!     stats.logical_size, stats.bytes_copied, stats.data_extents
//! );
//! # Ok::<(), sparsecopy::Error>(())
//! ```
//!
//! ## Function API
//!
//! ```no_run
//! use sparsecopy::{copy_file, CopyOptions, CopyStrategy};
//! use std::path::Path;
//!
//! let options = CopyOptions::default()
//!     .with_strategy(CopyStrategy::Sparse) // Never degrade to a dense copy
//!     .with_mode(0o600)
//!     .without_fsync();
//!
//! copy_file(Path::new("disk.img"), Path::new("disk-copy.img"), &options)?;
//! # Ok::<(), sparsecopy::Error>(())
//! ```
//!
//! ## Partial Destinations
//!
//! A failed copy leaves the destination as it was at the moment of failure:
//! partially written and not truncated to the source length. Nothing is
//! rolled back or deleted, so the partial output can be inspected. Remove it
//! yourself if you don't need it.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `progress` | Progress bar support with indicatif |
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`CopyOptions`] and [`CopyStats`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod copy;
mod error;
mod extent;
mod options;

#[cfg(feature = "progress")]
mod progress;

pub use builder::CopyBuilder;
pub use copy::{
    CopyMode, CopyStats, copy_dense, copy_dense_with_progress, copy_file, copy_file_dense,
    copy_sparse, copy_sparse_with_progress,
};
pub use error::{Error, ErrorCode, Result, is_no_space_error};
pub use extent::{DataQuery, SPARSE_SEEK_SUPPORTED, SetLen, SparseSeek};
pub use options::{CopyOptions, CopyStrategy, ProgressCallback};

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::create_progress_bar;
