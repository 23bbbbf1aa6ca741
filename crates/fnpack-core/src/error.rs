//! Error types for packaging operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur while packaging a directory.
///
/// Every variant is terminal: a packaging call that produces one of these
/// has not written a complete archive.
#[derive(Error, Debug)]
pub enum PackError {
    /// Source directory does not exist.
    #[error("directory not found: {path}")]
    DirectoryNotFound {
        /// The missing source directory.
        path: PathBuf,
    },

    /// Ignore file exists but could not be read.
    #[error("cannot read ignore file {path}: {source}")]
    IgnoreFileRead {
        /// Path of the ignore file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Ignore file contains a directive that cannot be honored.
    #[error("invalid ignore file {path}: {reason}")]
    InvalidIgnoreFile {
        /// Path of the offending ignore file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// Ignore rules could not be compiled into a matcher.
    #[error("cannot compile ignore rules: {0}")]
    IgnoreRules(#[source] ::ignore::Error),

    /// Non-fatal fault reported while walking or reading an entry.
    ///
    /// Warnings are not tolerated: they abort the operation the same way
    /// archive errors do.
    #[error("archive warning for {path}: {message}")]
    ArchiveWarning {
        /// Filesystem path the warning refers to.
        path: PathBuf,
        /// Description of the fault.
        message: String,
    },

    /// The zip writer failed.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Compression level outside 1-9.
    #[error("invalid compression level {level}, expected 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// The background packaging task did not run to completion.
    #[error("packaging task failed: {0}")]
    TaskFailed(String),
}

impl PackError {
    /// Returns `true` if the error was raised before any output was written.
    ///
    /// # Examples
    ///
    /// ```
    /// use fnpack_core::PackError;
    /// use std::path::PathBuf;
    ///
    /// let err = PackError::DirectoryNotFound {
    ///     path: PathBuf::from("/missing"),
    /// };
    /// assert!(err.is_precondition());
    ///
    /// let err = PackError::TaskFailed("cancelled".to_string());
    /// assert!(!err.is_precondition());
    /// ```
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound { .. }
                | Self::IgnoreFileRead { .. }
                | Self::InvalidIgnoreFile { .. }
                | Self::IgnoreRules(_)
                | Self::InvalidCompressionLevel { .. }
        )
    }

    /// Returns the filesystem path this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::DirectoryNotFound { path }
            | Self::IgnoreFileRead { path, .. }
            | Self::InvalidIgnoreFile { path, .. }
            | Self::ArchiveWarning { path, .. } => Some(path),
            _ => None,
        }
    }
}
