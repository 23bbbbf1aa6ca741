//! High-level public API for directory packaging.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use crate::PackConfig;
use crate::Result;
use crate::packaging::DirectoryPackager;
use crate::packaging::EntryObserver;

/// Options for [`pack`] and [`pack_blocking`].
///
/// # Examples
///
/// ```
/// use fnpack_core::ArchiveEntry;
/// use fnpack_core::PackConfig;
/// use fnpack_core::PackOptions;
///
/// let options = PackOptions::new()
///     .with_config(PackConfig::default().with_compression_level(9))
///     .with_on_entry(|entry: &ArchiveEntry| eprintln!("{entry}"));
/// assert_eq!(options.config.compression_level, 9);
/// ```
#[derive(Default)]
pub struct PackOptions {
    /// Packaging configuration.
    pub config: PackConfig,

    /// Observer notified once per written entry.
    pub on_entry: Option<Box<dyn EntryObserver>>,
}

impl PackOptions {
    /// Creates options with the default configuration and no observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the packaging configuration.
    #[must_use]
    pub fn with_config(mut self, config: PackConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the per-entry observer.
    #[must_use]
    pub fn with_on_entry(mut self, observer: impl EntryObserver + 'static) -> Self {
        self.on_entry = Some(Box::new(observer));
        self
    }
}

impl fmt::Debug for PackOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackOptions")
            .field("config", &self.config)
            .field("on_entry", &self.on_entry.is_some())
            .finish()
    }
}

/// Packages `source_dir` into a zip archive at `destination`.
///
/// Entries matched by the source root's `.gcloudignore` are left out. The
/// work runs on tokio's blocking pool; the returned future resolves once
/// the archive is finalized and synced to disk.
///
/// # Errors
///
/// Returns an error if:
/// - `source_dir` is not a directory (checked before the destination is
///   created)
/// - The ignore file exists but cannot be read
/// - Any entry cannot be walked, read or written
///
/// # Examples
///
/// ```no_run
/// use fnpack_core::PackOptions;
/// use fnpack_core::pack;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let archive = pack("./function", "function.zip", PackOptions::default()).await?;
/// println!("Wrote {}", archive.display());
/// # Ok(())
/// # }
/// ```
pub async fn pack<P: AsRef<Path>, Q: AsRef<Path>>(
    source_dir: P,
    destination: Q,
    options: PackOptions,
) -> Result<PathBuf> {
    let report = packager(source_dir.as_ref(), destination.as_ref(), options)
        .pack()
        .await?;
    Ok(report.archive_path)
}

/// Synchronous variant of [`pack`].
///
/// # Errors
///
/// Same as [`pack`], minus task failures.
///
/// # Examples
///
/// ```no_run
/// use fnpack_core::PackOptions;
/// use fnpack_core::pack_blocking;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let archive = pack_blocking("./function", "function.zip", PackOptions::default())?;
/// println!("Wrote {}", archive.display());
/// # Ok(())
/// # }
/// ```
pub fn pack_blocking<P: AsRef<Path>, Q: AsRef<Path>>(
    source_dir: P,
    destination: Q,
    options: PackOptions,
) -> Result<PathBuf> {
    let report = packager(source_dir.as_ref(), destination.as_ref(), options).pack_blocking()?;
    Ok(report.archive_path)
}

fn packager(source_dir: &Path, destination: &Path, options: PackOptions) -> DirectoryPackager {
    DirectoryPackager::new(source_dir, destination)
        .config(options.config)
        .boxed_observer(options.on_entry)
}
