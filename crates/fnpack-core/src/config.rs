//! Configuration for packaging operations.

use crate::PackError;
use crate::Result;

/// Name of the ignore file looked up at the source root.
pub const DEFAULT_IGNORE_FILE: &str = ".gcloudignore";

/// Deflate level used when none is configured.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 7;

/// Configuration for packaging a directory into a zip archive.
///
/// # Examples
///
/// ```
/// use fnpack_core::PackConfig;
///
/// let config = PackConfig::default();
/// assert_eq!(config.compression_level, 7);
///
/// let custom = PackConfig::default()
///     .with_compression_level(9)
///     .with_sort_entries(true);
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Deflate compression level (1-9).
    ///
    /// Default: `7`, favoring speed over the last few percent of ratio.
    pub compression_level: u8,

    /// File name of the ignore file at the source root.
    ///
    /// Default: `.gcloudignore`.
    pub ignore_file_name: String,

    /// Expand `#!include:<file>` directives in the ignore file.
    ///
    /// Default: `true`.
    pub expand_includes: bool,

    /// Follow symlinks and archive their targets.
    ///
    /// Default: `false` (symlinks are stored as zip symlink entries).
    pub follow_symlinks: bool,

    /// Store unix permission bits in the archive.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,

    /// Sort sibling entries by file name during traversal.
    ///
    /// Default: `false` (filesystem order).
    pub sort_entries: bool,

    /// Delete the partially written archive when packaging fails.
    ///
    /// Default: `false`.
    pub remove_partial_on_failure: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            ignore_file_name: DEFAULT_IGNORE_FILE.to_string(),
            expand_includes: true,
            follow_symlinks: false,
            preserve_permissions: true,
            sort_entries: false,
            remove_partial_on_failure: false,
        }
    }
}

impl PackConfig {
    /// Creates a new `PackConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    ///
    /// Out-of-range values are rejected later by [`PackConfig::validate`].
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets the ignore file name.
    #[must_use]
    pub fn with_ignore_file_name(mut self, name: impl Into<String>) -> Self {
        self.ignore_file_name = name.into();
        self
    }

    /// Sets whether `#!include:` directives are expanded.
    #[must_use]
    pub fn with_expand_includes(mut self, expand: bool) -> Self {
        self.expand_includes = expand;
        self
    }

    /// Sets whether to follow symlinks.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets whether to preserve permissions.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets whether sibling entries are sorted by name.
    #[must_use]
    pub fn with_sort_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    /// Sets whether a partial archive is deleted on failure.
    #[must_use]
    pub fn with_remove_partial_on_failure(mut self, remove: bool) -> Self {
        self.remove_partial_on_failure = remove;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level is not in range 1-9
    /// - Ignore file name is empty or contains a path separator
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.compression_level) {
            return Err(PackError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }
        if self.ignore_file_name.is_empty()
            || self.ignore_file_name.contains('/')
            || self.ignore_file_name.contains('\\')
        {
            return Err(PackError::InvalidIgnoreFile {
                path: self.ignore_file_name.clone().into(),
                reason: "ignore file name must be a plain file name".to_string(),
            });
        }
        Ok(())
    }
}
