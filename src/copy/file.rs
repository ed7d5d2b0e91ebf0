//! Path-level file copy.
//!
//! This module owns the caller side of the copy: validating the source,
//! opening it read-only, creating the destination exclusively with an
//! explicit mode, dispatching to the sparse or dense routine, and syncing.

use crate::error::{Error, Result};
use crate::options::{CopyOptions, CopyStrategy};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use super::dense::copy_dense_with_progress;
use super::stats::CopyStats;

/// Copy the regular file at `src` to a new file at `dst`.
///
/// The destination is created exclusively (`O_CREAT | O_EXCL`) with
/// [`CopyOptions::mode`]; an existing destination is never touched. Only
/// the permission bits from `mode` are applied; timestamps, ownership and
/// extended attributes of the source are not carried over.
///
/// # Returns
///
/// Statistics for the copy. [`CopyStats::mode`] tells whether holes were
/// preserved ([`CopyMode::Sparse`](crate::CopyMode::Sparse)) or the file
/// was copied byte-for-byte ([`CopyMode::Dense`](crate::CopyMode::Dense)).
///
/// # Errors
///
/// Returns an error if:
/// - Source does not exist ([`Error::SourceNotFound`])
/// - Source is a directory ([`Error::IsADirectory`]) or not a regular file ([`Error::NotARegularFile`])
/// - Destination exists ([`Error::AlreadyExists`])
/// - Either file can't be opened ([`Error::Open`])
/// - Sparse copy is forced on an unsupported platform ([`Error::Unsupported`])
/// - The copy itself fails (see [`copy_sparse`](crate::copy_sparse))
///
/// If the copy fails after the destination was created, the partial
/// destination is left on disk for inspection.
///
/// # Example
///
/// ```no_run
/// use sparsecopy::{copy_file, CopyOptions};
/// use std::path::Path;
///
/// let stats = copy_file(
///     Path::new("vm.qcow2"),
///     Path::new("vm-backup.qcow2"),
///     &CopyOptions::default().with_mode(0o600),
/// )?;
/// println!("{} bytes of data, {} skipped", stats.bytes_copied, stats.bytes_skipped());
/// # Ok::<(), sparsecopy::Error>(())
/// ```
pub fn copy_file(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyStats> {
    let src_meta = match fs::metadata(src) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::SourceNotFound(src.to_path_buf()));
        }
        Err(source) => {
            return Err(Error::Open {
                path: src.to_path_buf(),
                source,
            });
        }
    };

    if src_meta.is_dir() {
        return Err(Error::IsADirectory(src.to_path_buf()));
    }
    if !src_meta.is_file() {
        return Err(Error::NotARegularFile(src.to_path_buf()));
    }

    // Decide before creating anything so an unsupported request leaves no file behind
    let use_sparse = match options.strategy {
        CopyStrategy::Dense => false,
        CopyStrategy::Sparse if !crate::SPARSE_SEEK_SUPPORTED => return Err(Error::Unsupported),
        CopyStrategy::Sparse => true,
        CopyStrategy::Auto => {
            if !crate::SPARSE_SEEK_SUPPORTED {
                options.warn(&format!(
                    "extent queries unavailable, copying {} without preserving holes",
                    src.display()
                ));
            }
            crate::SPARSE_SEEK_SUPPORTED
        }
    };

    let mut src_file = File::open(src).map_err(|source| Error::Open {
        path: src.to_path_buf(),
        source,
    })?;
    let mut dst_file = create_new(dst, options.mode)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        len = src_meta.len(),
        sparse = use_sparse,
        "copying file"
    );

    let progress = |done, total| options.report_progress(done, total);
    let stats = if use_sparse {
        sparse_copy(&mut dst_file, &mut src_file, progress)?
    } else {
        copy_dense_with_progress(&mut dst_file, &mut src_file, progress)?
    };

    if options.fsync {
        dst_file.sync_all().map_err(|source| Error::Sync {
            path: dst.to_path_buf(),
            source,
        })?;
    }

    Ok(stats)
}

/// Copy `src` to `dst` byte-for-byte, without extent queries.
///
/// Same contract as [`copy_file`] with [`CopyStrategy::Dense`].
pub fn copy_file_dense(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyStats> {
    let options = options.clone().with_strategy(CopyStrategy::Dense);
    copy_file(src, dst, &options)
}

/// Exclusively create `path`, mapping "exists" to [`Error::AlreadyExists`].
fn create_new(path: &Path, mode: u32) -> Result<File> {
    let mut open_options = OpenOptions::new();
    open_options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        open_options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    open_options.open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            Error::AlreadyExists(path.to_path_buf())
        } else {
            Error::Open {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "illumos",
    target_os = "solaris",
))]
fn sparse_copy<F: FnMut(u64, u64)>(dst: &mut File, src: &mut File, progress: F) -> Result<CopyStats> {
    super::sparse::copy_sparse_with_progress(dst, src, progress)
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "illumos",
    target_os = "solaris",
)))]
fn sparse_copy<F: FnMut(u64, u64)>(_dst: &mut File, _src: &mut File, _progress: F) -> Result<CopyStats> {
    Err(Error::Unsupported)
}

// =============================================================================
// Tests
// =============================================================================
