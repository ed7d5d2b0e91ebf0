//! Configuration options for copy operations.
//!
//! This module provides [`CopyOptions`] for configuring [`copy_file`](crate::copy_file)
//! and [`CopyStrategy`] for choosing between sparse and dense copying.
//!
//! # Example
//!
//! ```
//! use sparsecopy::{CopyOptions, CopyStrategy};
//!
//! let options = CopyOptions::default()
//!     .with_strategy(CopyStrategy::Sparse)
//!     .with_mode(0o600)
//!     .without_fsync();
//! ```

use std::fmt;
use std::sync::Arc;

/// Callback for progress updates: `(bytes_done, total_bytes)`.
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Which copy routine [`copy_file`](crate::copy_file) uses.
///
/// # Default
///
/// The default is [`CopyStrategy::Auto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CopyStrategy {
    /// Sparse copy where the platform supports extent queries, dense otherwise.
    ///
    /// Falling back to dense is logged as a warning, and the returned
    /// [`CopyStats::mode`](crate::CopyStats::mode) is [`CopyMode::Dense`](crate::CopyMode::Dense).
    #[default]
    Auto,
    /// Always copy sparsely; fail with [`Error::Unsupported`](crate::Error::Unsupported)
    /// on platforms without extent queries.
    Sparse,
    /// Always read and write every byte.
    Dense,
}

/// Options for [`copy_file`](crate::copy_file).
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `strategy` | `Auto` | Sparse where supported |
/// | `mode` | `0o644` | Permission bits of the new file (before umask) |
/// | `fsync` | `true` | Sync destination to disk after writing |
/// | `on_progress` | `None` | No progress reporting |
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyOptions {
    /// Sparse, dense, or pick automatically
    pub strategy: CopyStrategy,

    /// Permission bits used when creating the destination (Unix only)
    ///
    /// The process umask still applies.
    pub mode: u32,

    /// Whether to sync the destination to disk after writing (default: true)
    pub fsync: bool,

    /// Progress callback (optional)
    #[cfg_attr(feature = "serde", serde(skip))]
    pub on_progress: Option<ProgressCallback>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            strategy: CopyStrategy::Auto,
            mode: 0o644,
            fsync: true,
            on_progress: None,
        }
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("strategy", &self.strategy)
            .field("mode", &format_args!("{:#o}", self.mode))
            .field("fsync", &self.fsync)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl CopyOptions {
    /// Set the copy strategy
    #[must_use]
    pub fn with_strategy(mut self, strategy: CopyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the permission bits of the created destination
    ///
    /// Only the lower 12 bits (`0o7777`) are kept.
    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode & 0o7777;
        self
    }

    /// Disable fsync for faster (but less durable) copies
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }

    /// Report progress through `callback(bytes_done, total_bytes)`
    #[must_use]
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(u64, u64) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub(crate) fn report_progress(&self, done: u64, total: u64) {
        if let Some(callback) = &self.on_progress {
            callback(done, total);
        }
    }

    pub(crate) fn warn(&self, msg: &str) {
        #[cfg(feature = "tracing")]
        tracing::warn!("{}", msg);
        #[cfg(not(feature = "tracing"))]
        let _ = msg;
    }
}
