//! Statistics returned by every copy routine.

use std::time::Duration;

/// How the bytes of a file were transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CopyMode {
    /// Only data extents were read and written; holes were skipped
    #[default]
    Sparse,
    /// Every byte was read and written (no extent queries)
    Dense,
}

impl CopyMode {
    /// Lowercase name of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sparse => "sparse",
            Self::Dense => "dense",
        }
    }
}

/// Statistics from a single file copy.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyStats {
    /// Logical length of the source (and of the destination afterwards)
    pub logical_size: u64,
    /// Bytes physically read from the source and written to the destination
    pub bytes_copied: u64,
    /// Number of contiguous data runs replayed
    pub data_extents: u64,
    /// Which copy routine produced this result
    pub mode: CopyMode,
    /// Wall-clock time spent copying
    pub duration: Duration,
}

impl CopyStats {
    pub(crate) fn new(mode: CopyMode, logical_size: u64) -> Self {
        Self {
            logical_size,
            mode,
            ..Self::default()
        }
    }

    /// Bytes of the logical size that were never read or written.
    #[must_use]
    pub fn bytes_skipped(&self) -> u64 {
        self.logical_size.saturating_sub(self.bytes_copied)
    }
}
