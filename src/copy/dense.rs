//! Byte-for-byte copy, used where extent queries are unavailable.

use crate::error::{Error, Result};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::time::Instant;

use super::sparse::COPY_BUFFER_SIZE;
use super::stats::{CopyMode, CopyStats};

/// Copy every byte of `src` into `dst`, holes included.
///
/// This reads and writes the full logical length, so zero regions of the
/// source become allocated zero regions in the destination. It exists as
/// a fallback for platforms without `SEEK_DATA`/`SEEK_HOLE` and as a
/// baseline to compare [`copy_sparse`](crate::copy_sparse) against.
///
/// # Errors
///
/// Returns [`Error::SourceLength`] if the length of `src` can't be
/// measured, [`Error::SeekSource`] / [`Error::SeekDestination`] if either
/// handle can't be rewound, and [`Error::CopyExtent`] if reading or
/// writing fails.
pub fn copy_dense<D, S>(dst: &mut D, src: &mut S) -> Result<CopyStats>
where
    D: Write + Seek + ?Sized,
    S: Read + Seek + ?Sized,
{
    copy_dense_with_progress(dst, src, |_, _| {})
}

/// Like [`copy_dense`], reporting `(bytes_done, total)` after every chunk.
pub fn copy_dense_with_progress<D, S, F>(
    dst: &mut D,
    src: &mut S,
    mut on_progress: F,
) -> Result<CopyStats>
where
    D: Write + Seek + ?Sized,
    S: Read + Seek + ?Sized,
    F: FnMut(u64, u64),
{
    let start_time = Instant::now();

    let source_len = src
        .seek(SeekFrom::End(0))
        .map_err(|source| Error::SourceLength { source })?;
    src.seek(SeekFrom::Start(0))
        .map_err(|source| Error::SeekSource { offset: 0, source })?;
    dst.seek(SeekFrom::Start(0))
        .map_err(|source| Error::SeekDestination { offset: 0, source })?;

    let mut stats = CopyStats::new(CopyMode::Dense, source_len);
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];

    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(Error::CopyExtent {
                    offset: stats.bytes_copied,
                    len: source_len,
                    source,
                });
            }
        };
        dst.write_all(&buf[..n]).map_err(|source| Error::CopyExtent {
            offset: stats.bytes_copied,
            len: source_len,
            source,
        })?;
        stats.bytes_copied += n as u64;
        on_progress(stats.bytes_copied, source_len);
    }

    if stats.bytes_copied > 0 {
        stats.data_extents = 1;
    }
    stats.duration = start_time.elapsed();

    #[cfg(feature = "tracing")]
    tracing::debug!(bytes_copied = stats.bytes_copied, "dense copy finished");

    Ok(stats)
}
