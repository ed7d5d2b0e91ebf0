//! Error types for sparsecopy.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during copy operations, the [`Result`] type alias, and
//! the stable [`ErrorCode`] used by the `spcp` command.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Extent query | [`Error::LocateData`], [`Error::LocateHole`], [`Error::InvalidExtent`] |
//! | IO | [`Error::Io`], [`Error::SourceLength`], [`Error::SeekSource`], [`Error::SeekDestination`], [`Error::CopyExtent`], [`Error::ShortRead`], [`Error::Truncate`], [`Error::Sync`] |
//! | Precondition | [`Error::SourceNotFound`], [`Error::IsADirectory`], [`Error::NotARegularFile`], [`Error::AlreadyExists`], [`Error::Open`], [`Error::Unsupported`] |
//!
//! "No more data after this offset" is not an error: it is reported as
//! [`DataQuery::NoMoreData`](crate::DataQuery::NoMoreData) and ends the scan.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sparsecopy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// This helper function detects storage-full conditions across platforms.
///
/// # Platform Support
///
/// | Platform | Error Detection |
/// |----------|-----------------|
/// | Unix | `ENOSPC` |
/// | Windows | `ERROR_DISK_FULL` (0x70) |
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use sparsecopy::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// assert!(is_no_space_error(&error));
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    #[cfg(unix)]
    {
        // The raw OS error might be available even if kind() isn't StorageFull
        if let Some(raw_error) = error.raw_os_error() {
            return raw_error == libc::ENOSPC;
        }
    }

    #[cfg(windows)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            const ERROR_DISK_FULL: i32 = 112;
            return raw_error == ERROR_DISK_FULL;
        }
    }

    false
}

/// Stable, machine-readable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The source path does not exist
    SourceNotFound,
    /// The destination path already exists
    AlreadyExists,
    /// The request cannot be satisfied with the given paths or options
    InvalidInput,
    /// The destination ran out of space
    NoSpace,
    /// Sparse copy was requested on a platform without extent queries
    Unsupported,
    /// Any other IO failure
    Io,
}

impl ErrorCode {
    /// The snake_case name of this code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceNotFound => "source_not_found",
            Self::AlreadyExists => "already_exists",
            Self::InvalidInput => "invalid_input",
            Self::NoSpace => "no_space",
            Self::Unsupported => "unsupported",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during copy operations.
///
/// Errors raised inside the copy loop carry the offset at which they
/// occurred; errors raised while opening files carry the path.
/// Use the [`std::error::Error`] trait methods to access underlying
/// causes where applicable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error outside of any specific copy phase
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The data-extent query failed for a reason other than "no more data"
    #[error("failed to find data after {offset}: {source}")]
    LocateData {
        /// Scan offset passed to the query
        offset: u64,
        /// Underlying error
        source: io::Error,
    },

    /// The hole-extent query failed
    #[error("failed to find a hole after {offset}: {source}")]
    LocateHole {
        /// Start of the data extent passed to the query
        offset: u64,
        /// Underlying error
        source: io::Error,
    },

    /// An extent query returned offsets that go backwards
    #[error("invalid extent at offset {offset}: data at {data_start}, hole at {hole_start}")]
    InvalidExtent {
        /// Scan offset of the iteration
        offset: u64,
        /// Reported start of data
        data_start: u64,
        /// Reported start of the following hole
        hole_start: u64,
    },

    /// Seeking to the end of the source to learn its length failed
    #[error("failed to determine source length: {source}")]
    SourceLength {
        /// Underlying error
        source: io::Error,
    },

    /// Repositioning the source failed
    #[error("failed to seek source to {offset}: {source}")]
    SeekSource {
        /// Target offset
        offset: u64,
        /// Underlying error
        source: io::Error,
    },

    /// Repositioning the destination failed
    #[error("failed to seek destination to {offset}: {source}")]
    SeekDestination {
        /// Target offset
        offset: u64,
        /// Underlying error
        source: io::Error,
    },

    /// Reading or writing a data extent failed
    #[error("failed to copy {len} bytes at offset {offset}: {source}")]
    CopyExtent {
        /// Start of the data extent
        offset: u64,
        /// Length of the data extent
        len: u64,
        /// Underlying error
        source: io::Error,
    },

    /// The source ended before a data extent was fully read
    #[error("short read at offset {offset}: expected {expected} bytes, got {copied}")]
    ShortRead {
        /// Start of the data extent
        offset: u64,
        /// Length of the data extent
        expected: u64,
        /// Bytes actually copied
        copied: u64,
    },

    /// Setting the final destination length failed
    #[error("failed to truncate destination to {len} bytes: {source}")]
    Truncate {
        /// Requested logical length
        len: u64,
        /// Underlying error
        source: io::Error,
    },

    /// Flushing the destination to disk failed
    #[error("failed to sync {path}: {source}")]
    Sync {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Source path does not exist
    #[error("Source path does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// Source is a directory
    #[error("Source is a directory: {0}")]
    IsADirectory(PathBuf),

    /// Source exists but is not a regular file (a FIFO or a device node, for example)
    #[error("Source is not a regular file: {0}")]
    NotARegularFile(PathBuf),

    /// Destination already exists
    #[error("Destination already exists: {0}")]
    AlreadyExists(PathBuf),

    /// Opening the source or creating the destination failed
    #[error("failed to open {path}: {source}")]
    Open {
        /// Path being opened
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Sparse copy was requested but this platform has no extent queries
    #[error("sparse copy is not supported on this platform")]
    Unsupported,
}

impl Error {
    /// The underlying IO error, if any.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Io(source)
            | Self::LocateData { source, .. }
            | Self::LocateHole { source, .. }
            | Self::SourceLength { source }
            | Self::SeekSource { source, .. }
            | Self::SeekDestination { source, .. }
            | Self::CopyExtent { source, .. }
            | Self::Truncate { source, .. }
            | Self::Sync { source, .. }
            | Self::Open { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Classify this error for reporting.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SourceNotFound(_) => ErrorCode::SourceNotFound,
            Self::AlreadyExists(_) => ErrorCode::AlreadyExists,
            Self::IsADirectory(_) | Self::NotARegularFile(_) => ErrorCode::InvalidInput,
            Self::Unsupported => ErrorCode::Unsupported,
            _ => match self.io_error() {
                Some(e) if is_no_space_error(e) => ErrorCode::NoSpace,
                _ => ErrorCode::Io,
            },
        }
    }
}
