//! Packaging operation reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of a finished packaging run.
///
/// # Examples
///
/// ```
/// use fnpack_core::PackReport;
///
/// let mut report = PackReport::default();
/// report.files_added = 10;
/// report.bytes_read = 1024;
/// report.archive_size = 512;
///
/// assert_eq!(report.compression_ratio(), 2.0);
/// assert_eq!(report.compression_percentage(), 50.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackReport {
    /// Path of the produced archive.
    pub archive_path: PathBuf,

    /// Number of regular files written.
    pub files_added: usize,

    /// Number of directory entries written.
    pub directories_added: usize,

    /// Number of symlink entries written.
    pub symlinks_added: usize,

    /// Number of nodes excluded by ignore rules (a pruned directory counts once).
    pub entries_ignored: usize,

    /// Number of ignore rule lines loaded.
    pub ignore_rules: usize,

    /// Total bytes read from source files (uncompressed).
    pub bytes_read: u64,

    /// Size of the finished archive in bytes.
    pub archive_size: u64,

    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl PackReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries written.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added + self.symlinks_added
    }

    /// Returns the compression ratio (uncompressed / archive size).
    ///
    /// Returns 0.0 if either side is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.archive_size as f64
    }

    /// Returns the space saved, in percent of the uncompressed size.
    ///
    /// Returns 0.0 if nothing was read. Archive overhead can exceed the
    /// input for tiny trees, in which case the result is clamped to 0.0.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_read == 0 {
            return 0.0;
        }
        let saved = self.bytes_read.saturating_sub(self.archive_size);
        (saved as f64 / self.bytes_read as f64) * 100.0
    }
}
