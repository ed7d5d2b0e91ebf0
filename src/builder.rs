//! Builder API for ergonomic copying operations.
//!
//! The builder pattern provides a fluent interface for configuring and executing
//! a file copy. This is often more convenient than manually constructing
//! [`CopyOptions`].
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use sparsecopy::CopyBuilder;
//!
//! // Sparse where supported, 0o644, fsync
//! let stats = CopyBuilder::new("disk.img", "disk-copy.img").run()?;
//! println!("Copied {} data bytes", stats.bytes_copied);
//! # Ok::<(), sparsecopy::Error>(())
//! ```
//!
//! ## With Options
//!
//! ```no_run
//! use sparsecopy::CopyBuilder;
//!
//! let stats = CopyBuilder::new("disk.img", "disk-copy.img")
//!     .sparse()          // Fail instead of degrading to a dense copy
//!     .mode(0o600)       // Private image
//!     .no_fsync()        // Skip fsync for speed
//!     .run()?;
//! # Ok::<(), sparsecopy::Error>(())
//! ```

use crate::copy::{CopyStats, copy_file};
use crate::error::Result;
use crate::options::{CopyOptions, CopyStrategy};
use std::path::{Path, PathBuf};

/// A builder for configuring and executing a file copy.
///
/// # Example
///
/// ```no_run
/// use sparsecopy::CopyBuilder;
///
/// let stats = CopyBuilder::new("/var/lib/vm/base.raw", "/var/lib/vm/clone.raw")
///     .mode(0o600)
///     .run()?;
/// # Ok::<(), sparsecopy::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    src: PathBuf,
    dst: PathBuf,
    options: CopyOptions,
}

impl CopyBuilder {
    /// Create a new `CopyBuilder` with the given source and destination paths.
    ///
    /// Uses default options (automatic strategy, mode 0o644, fsync).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: CopyOptions::default(),
        }
    }

    /// Replace all options at once.
    #[must_use]
    pub fn options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the copy strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: CopyStrategy) -> Self {
        self.options = self.options.with_strategy(strategy);
        self
    }

    /// Require a sparse copy.
    ///
    /// [`run`](Self::run) fails with [`Error::Unsupported`](crate::Error::Unsupported)
    /// on platforms without extent queries instead of copying every byte.
    #[must_use]
    pub fn sparse(self) -> Self {
        self.strategy(CopyStrategy::Sparse)
    }

    /// Copy every byte, ignoring holes.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sparsecopy::CopyBuilder;
    ///
    /// // Baseline to compare a sparse copy against
    /// let stats = CopyBuilder::new("disk.img", "disk-dense.img")
    ///     .dense()
    ///     .run()?;
    /// assert_eq!(stats.bytes_copied, stats.logical_size);
    /// # Ok::<(), sparsecopy::Error>(())
    /// ```
    #[must_use]
    pub fn dense(self) -> Self {
        self.strategy(CopyStrategy::Dense)
    }

    /// Set the permission bits of the created file (Unix only, umask applies).
    #[must_use]
    pub fn mode(mut self, mode: u32) -> Self {
        self.options = self.options.with_mode(mode);
        self
    }

    /// Disable fsync after writing.
    ///
    /// This improves performance but reduces durability guarantees.
    /// Data may be lost if the system crashes before the OS flushes buffers.
    #[must_use]
    pub fn no_fsync(mut self) -> Self {
        self.options = self.options.without_fsync();
        self
    }

    /// Report progress through `callback(bytes_done, total_bytes)`.
    #[must_use]
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(u64, u64) + Send + Sync + 'static,
    {
        self.options = self.options.with_progress(callback);
        self
    }

    /// Execute the copy.
    ///
    /// # Errors
    ///
    /// Same as [`copy_file`].
    pub fn run(self) -> Result<CopyStats> {
        copy_file(&self.src, &self.dst, &self.options)
    }
}
