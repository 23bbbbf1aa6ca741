//! Error conversion utilities for CLI.
//!
//! Converts fnpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use fnpack_core::PackError;
use std::path::Path;

/// Converts `PackError` to user-friendly anyhow error with context
pub fn convert_pack_error(err: PackError, source: &Path) -> anyhow::Error {
    match err {
        PackError::DirectoryNotFound { path } => {
            anyhow!(
                "Source directory not found: {}\n\
                 HINT: Pass the directory that contains your function code.",
                path.display()
            )
        }
        PackError::IgnoreFileRead { path, source: io_err } => {
            anyhow!(
                "Cannot read ignore file '{}': {}\n\
                 HINT: Check the file permissions, or remove the file to package everything.",
                path.display(),
                io_err
            )
        }
        PackError::InvalidIgnoreFile { path, reason } => {
            anyhow!(
                "Invalid ignore file '{}': {}\n\
                 HINT: Use --no-includes to treat #!include: lines as comments.",
                path.display(),
                reason
            )
        }
        PackError::IgnoreRules(rules_err) => {
            anyhow!(
                "Cannot compile ignore rules for '{}': {}\n\
                 HINT: Split very long ignore files or simplify the patterns.",
                source.display(),
                rules_err
            )
        }
        PackError::ArchiveWarning { path, message } => {
            anyhow!(
                "Packaging '{}' aborted at '{}': {}\n\
                 HINT: Fix the permissions or exclude the path in the ignore file.",
                source.display(),
                path.display(),
                message
            )
        }
        PackError::InvalidCompressionLevel { level } => {
            anyhow!(
                "Invalid compression level {level}\n\
                 HINT: Use a level between 1 (fastest) and 9 (smallest)."
            )
        }
        PackError::Io(io_err) => {
            anyhow!(
                "I/O error while packaging '{}': {}",
                source.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error packaging '{}'", source.display())),
    }
}

/// Adds context to a packaging result
pub fn add_pack_context<T>(
    result: Result<T, PackError>,
    source: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_pack_error(e, source))
}
