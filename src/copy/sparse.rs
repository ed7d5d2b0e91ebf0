//! Sparse-aware copy between two open handles.
//!
//! The copy alternates between two states until the source runs out of
//! data:
//!
//! ```text
//!            seek_data(offset)            copy [data_start, hole_start)
//! SCANNING ───────────────────► COPYING ──────────────────────────────┐
//!    ▲                                                                │
//!    └──────────────────── offset = hole_start ◄──────────────────────┘
//!    │
//!    │ NoMoreData or offset >= len
//!    ▼
//! FINALIZE: set_len(len)
//! ```
//!
//! Holes are never read and never written. The destination gets its final
//! logical length from the single truncation at the end, which is also what
//! materializes a trailing hole.

use crate::error::{Error, Result};
use crate::extent::{DataQuery, SetLen, SparseSeek};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::time::Instant;

use super::stats::{CopyMode, CopyStats};

/// Size of the buffer each data extent is streamed through.
pub(crate) const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Copy `src` into `dst`, reproducing the source's data/hole layout.
///
/// Both handles stay owned by the caller and are not closed. `dst` should
/// be newly created: only the data extents of `src` are written into it,
/// at the same offsets, and it is finally truncated to the length of `src`.
///
/// # Errors
///
/// Any failure other than the source reporting "no more data" aborts the
/// copy immediately:
/// - [`Error::SourceLength`] if the length of `src` can't be measured
/// - [`Error::LocateData`] / [`Error::LocateHole`] if an extent query fails
/// - [`Error::InvalidExtent`] if a query reports offsets that go backwards
/// - [`Error::SeekSource`] / [`Error::SeekDestination`] if repositioning fails
/// - [`Error::CopyExtent`] / [`Error::ShortRead`] if an extent can't be copied
/// - [`Error::Truncate`] if the final length can't be set
///
/// On error the destination is left as it is: partially written and not
/// truncated. Cleaning it up is up to the caller.
///
/// # Example
///
/// ```no_run
/// # #[cfg(target_os = "linux")]
/// # fn main() -> Result<(), sparsecopy::Error> {
/// use std::fs::{File, OpenOptions};
///
/// let mut src = File::open("disk.img")?;
/// let mut dst = OpenOptions::new()
///     .write(true)
///     .create_new(true)
///     .open("disk-copy.img")?;
///
/// let stats = sparsecopy::copy_sparse(&mut dst, &mut src)?;
/// println!("{} of {} bytes were data", stats.bytes_copied, stats.logical_size);
/// # Ok(())
/// # }
/// # #[cfg(not(target_os = "linux"))]
/// # fn main() {}
/// ```
pub fn copy_sparse<D, S>(dst: &mut D, src: &mut S) -> Result<CopyStats>
where
    D: Write + Seek + SetLen + ?Sized,
    S: SparseSeek + ?Sized,
{
    copy_sparse_with_progress(dst, src, |_, _| {})
}

/// Like [`copy_sparse`], reporting progress after every data extent.
///
/// `on_progress(offset, total)` receives the scan offset reached so far and
/// the logical length of the source. It is called one last time with
/// `offset == total` after the destination has been truncated.
pub fn copy_sparse_with_progress<D, S, F>(
    dst: &mut D,
    src: &mut S,
    mut on_progress: F,
) -> Result<CopyStats>
where
    D: Write + Seek + SetLen + ?Sized,
    S: SparseSeek + ?Sized,
    F: FnMut(u64, u64),
{
    let start_time = Instant::now();

    let source_len = src
        .seek(SeekFrom::End(0))
        .map_err(|source| Error::SourceLength { source })?;
    src.seek(SeekFrom::Start(0))
        .map_err(|source| Error::SeekSource { offset: 0, source })?;

    let mut stats = CopyStats::new(CopyMode::Sparse, source_len);
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut offset = 0u64;

    while offset < source_len {
        let data_start = match src
            .seek_data(offset)
            .map_err(|source| Error::LocateData { offset, source })?
        {
            DataQuery::Found(pos) => pos,
            DataQuery::NoMoreData => {
                #[cfg(feature = "tracing")]
                tracing::debug!(offset, "no data left, remainder is a hole");
                break;
            }
        };

        // The source grew after we measured it
        if data_start >= source_len {
            break;
        }

        let hole_start = src.seek_hole(data_start).map_err(|source| Error::LocateHole {
            offset: data_start,
            source,
        })?;

        if data_start < offset || hole_start <= data_start {
            return Err(Error::InvalidExtent {
                offset,
                data_start,
                hole_start,
            });
        }
        let hole_start = hole_start.min(source_len);

        src.seek(SeekFrom::Start(data_start))
            .map_err(|source| Error::SeekSource {
                offset: data_start,
                source,
            })?;
        dst.seek(SeekFrom::Start(data_start))
            .map_err(|source| Error::SeekDestination {
                offset: data_start,
                source,
            })?;

        let len = hole_start - data_start;

        #[cfg(feature = "tracing")]
        tracing::debug!(data_start, hole_start, len, "copying data extent");

        copy_extent(dst, src, data_start, len, &mut buf)?;

        stats.bytes_copied += len;
        stats.data_extents += 1;
        offset = hole_start;
        on_progress(offset, source_len);
    }

    dst.set_len(source_len).map_err(|source| Error::Truncate {
        len: source_len,
        source,
    })?;
    on_progress(source_len, source_len);

    stats.duration = start_time.elapsed();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        logical_size = stats.logical_size,
        bytes_copied = stats.bytes_copied,
        data_extents = stats.data_extents,
        "sparse copy finished"
    );

    Ok(stats)
}

/// Copy exactly `len` bytes from the current position of `src` to the
/// current position of `dst`.
fn copy_extent<D, S>(dst: &mut D, src: &mut S, offset: u64, len: u64, buf: &mut [u8]) -> Result<()>
where
    D: Write + ?Sized,
    S: Read + ?Sized,
{
    let mut copied = 0u64;

    while copied < len {
        let want = (len - copied).min(buf.len() as u64) as usize;
        let n = match src.read(&mut buf[..want]) {
            Ok(0) => {
                return Err(Error::ShortRead {
                    offset,
                    expected: len,
                    copied,
                });
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(Error::CopyExtent {
                    offset,
                    len,
                    source,
                });
            }
        };

        dst.write_all(&buf[..n]).map_err(|source| Error::CopyExtent {
            offset,
            len,
            source,
        })?;
        copied += n as u64;
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
