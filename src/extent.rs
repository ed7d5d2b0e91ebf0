//! Extent queries: finding where data and holes begin.
//!
//! Filesystems that track unallocated regions expose them through
//! `lseek(2)` with `SEEK_DATA` and `SEEK_HOLE`. This module wraps those two
//! queries behind the [`SparseSeek`] trait so the copy loop never touches a
//! raw `whence` constant or errno.
//!
//! # Platform Support
//!
//! | Platform | `File: SparseSeek` |
//! |----------|--------------------|
//! | Linux, Android | `lseek64` |
//! | FreeBSD, illumos, Solaris | `lseek` |
//! | Other | not implemented, see [`SPARSE_SEEK_SUPPORTED`] |

use std::fs::File;
use std::io::{self, Cursor, Read, Seek};

/// Whether `std::fs::File` implements [`SparseSeek`] on this platform.
///
/// When this is `false`, [`CopyStrategy::Auto`](crate::CopyStrategy::Auto)
/// degrades to a dense copy.
pub const SPARSE_SEEK_SUPPORTED: bool = cfg!(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "illumos",
    target_os = "solaris",
));

/// Outcome of a data-extent query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataQuery {
    /// Data starts at this offset (at or after the queried one)
    Found(u64),
    /// Everything from the queried offset to end-of-file is a hole
    NoMoreData,
}

/// A readable, seekable handle that can locate data and hole extents.
pub trait SparseSeek: Read + Seek {
    /// Find the first byte of data at or after `offset`.
    ///
    /// Returns [`DataQuery::NoMoreData`] if only holes remain before
    /// end-of-file. The handle's cursor position afterwards is unspecified.
    fn seek_data(&mut self, offset: u64) -> io::Result<DataQuery>;

    /// Find the first hole at or after `offset`.
    ///
    /// Every file has an implicit hole at end-of-file, so for any
    /// `offset` inside the file this returns at most the file length.
    /// The handle's cursor position afterwards is unspecified.
    fn seek_hole(&mut self, offset: u64) -> io::Result<u64>;
}

/// A destination whose logical length can be set.
pub trait SetLen {
    /// Truncate or extend to exactly `len` bytes.
    fn set_len(&mut self, len: u64) -> io::Result<()>;
}

impl SetLen for File {
    #[inline]
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }
}

impl SetLen for Cursor<Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "length exceeds addressable memory")
        })?;
        self.get_mut().resize(len, 0);
        Ok(())
    }
}

impl<T: SetLen + ?Sized> SetLen for &mut T {
    #[inline]
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        (**self).set_len(len)
    }
}

impl<T: SparseSeek + ?Sized> SparseSeek for &mut T {
    #[inline]
    fn seek_data(&mut self, offset: u64) -> io::Result<DataQuery> {
        (**self).seek_data(offset)
    }

    #[inline]
    fn seek_hole(&mut self, offset: u64) -> io::Result<u64> {
        (**self).seek_hole(offset)
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "illumos",
    target_os = "solaris",
))]
mod platform {
    use super::DataQuery;
    use std::fs::File;
    use std::io;
    use std::os::unix::io::AsRawFd;

    fn lseek(file: &File, offset: u64, whence: libc::c_int) -> io::Result<u64> {
        #[cfg(any(target_os = "linux", target_os = "android"))]
        let lseek = libc::lseek64;
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        let lseek = libc::lseek;

        let offset: i64 = offset.try_into().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek offset exceeds i64::MAX")
        })?;

        // SAFETY: the descriptor is owned by `file` and stays open for the call
        let result = unsafe { lseek(file.as_raw_fd(), offset as _, whence) };
        if result < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(result as u64)
    }

    pub(super) fn seek_data(file: &File, offset: u64) -> io::Result<DataQuery> {
        match lseek(file, offset, libc::SEEK_DATA) {
            Ok(pos) => Ok(DataQuery::Found(pos)),
            Err(e) if e.raw_os_error() == Some(libc::ENXIO) => Ok(DataQuery::NoMoreData),
            Err(e) => Err(e),
        }
    }

    pub(super) fn seek_hole(file: &File, offset: u64) -> io::Result<u64> {
        lseek(file, offset, libc::SEEK_HOLE)
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "illumos",
    target_os = "solaris",
))]
impl SparseSeek for File {
    fn seek_data(&mut self, offset: u64) -> io::Result<DataQuery> {
        platform::seek_data(self, offset)
    }

    fn seek_hole(&mut self, offset: u64) -> io::Result<u64> {
        platform::seek_hole(self, offset)
    }
}
