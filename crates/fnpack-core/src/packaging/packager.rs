//! High-level builder for packaging a directory into a zip archive.

use crate::PackConfig;
use crate::PackError;
use crate::Result;
use crate::ignore::IgnoreMatcher;
use crate::ignore::IgnoreRuleSet;
use crate::ignore::load_ignore_rules_with;
use crate::ignore::matcher::to_slash_path;
use crate::packaging::archive::ArchiveWriter;
use crate::packaging::observer::EntryObserver;
use crate::packaging::report::PackReport;
use crate::packaging::walker::PackWalker;
use crate::packaging::walker::WalkedEntry;
use crate::packaging::walker::WalkedType;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Builder for packaging a source directory into a zip archive.
///
/// The source root's `.gcloudignore` decides what is left out. Everything
/// else under the root is written with paths relative to the root.
///
/// # Examples
///
/// ```no_run
/// use fnpack_core::DirectoryPackager;
///
/// let report = DirectoryPackager::new("./function", "function.zip")
///     .compression_level(9)
///     .sort_entries(true)
///     .observer(|entry: &fnpack_core::ArchiveEntry| println!("{entry}"))
///     .pack_blocking()?;
///
/// println!("Added {} files", report.files_added);
/// # Ok::<(), fnpack_core::PackError>(())
/// ```
pub struct DirectoryPackager {
    source: PathBuf,
    destination: PathBuf,
    config: PackConfig,
    observer: Option<Box<dyn EntryObserver>>,
}

impl DirectoryPackager {
    /// Creates a packager for `source` writing to `destination`.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            config: PackConfig::default(),
            observer: None,
        }
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: PackConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the Deflate level (1-9).
    #[must_use]
    pub const fn compression_level(mut self, level: u8) -> Self {
        self.config.compression_level = level;
        self
    }

    /// Sets the name of the ignore file looked up at the source root.
    #[must_use]
    pub fn ignore_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.ignore_file_name = name.into();
        self
    }

    /// Archives link targets instead of the links themselves.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.follow_symlinks = follow;
        self
    }

    /// Writes entries in file-name order within each directory.
    #[must_use]
    pub const fn sort_entries(mut self, sort: bool) -> Self {
        self.config.sort_entries = sort;
        self
    }

    /// Deletes the destination if packaging fails after it was created.
    #[must_use]
    pub const fn remove_partial_on_failure(mut self, remove: bool) -> Self {
        self.config.remove_partial_on_failure = remove;
        self
    }

    /// Registers an observer notified once per written entry.
    #[must_use]
    pub fn observer(mut self, observer: impl EntryObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Registers an already boxed observer, or clears it with `None`.
    #[must_use]
    pub fn boxed_observer(mut self, observer: Option<Box<dyn EntryObserver>>) -> Self {
        self.observer = observer;
        self
    }

    /// The source directory.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// The destination archive path.
    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.destination
    }

    /// The active configuration.
    #[must_use]
    pub const fn pack_config(&self) -> &PackConfig {
        &self.config
    }

    /// Packages the source directory on a blocking-pool thread.
    ///
    /// The source directory is checked before the task is spawned, so a
    /// missing source fails without touching the destination.
    ///
    /// # Errors
    ///
    /// See [`DirectoryPackager::pack_blocking`]. A task that panics or is
    /// cancelled yields [`PackError::TaskFailed`].
    pub async fn pack(self) -> Result<PackReport> {
        ensure_source_dir(&self.source)?;
        tokio::task::spawn_blocking(move || self.pack_blocking())
            .await
            .map_err(|e| PackError::TaskFailed(e.to_string()))?
    }

    /// Packages the source directory on the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::DirectoryNotFound`] if the source is not a
    /// directory, an ignore-file error if the rules cannot be loaded, and
    /// an archive or I/O error if any entry cannot be walked or written.
    /// Walk and read warnings are fatal.
    pub fn pack_blocking(mut self) -> Result<PackReport> {
        ensure_source_dir(&self.source)?;
        self.config.validate()?;

        let start = Instant::now();
        let rules = load_ignore_rules_with(&self.source, &self.config)?;

        tracing::debug!(
            source = %self.source.display(),
            destination = %self.destination.display(),
            rules = rules.len(),
            "packaging directory"
        );

        let result = self.write_archive(&rules, start);
        if let Err(err) = &result {
            self.discard_partial(err);
        }
        result
    }

    fn write_archive(&mut self, rules: &IgnoreRuleSet, start: Instant) -> Result<PackReport> {
        let matcher = IgnoreMatcher::from_rules(rules)?;
        let mut writer = ArchiveWriter::create(&self.destination, &self.config)?;
        let own_name = self_entry_name(&self.source, &self.destination);

        let mut report = PackReport {
            archive_path: std::path::absolute(&self.destination)?,
            ignore_rules: rules.len(),
            ..PackReport::new()
        };

        let walker = PackWalker::new(&self.source, &matcher, &self.config);
        for entry in walker.walk() {
            let entry = entry?;

            // the archive being written lives inside the source tree
            if own_name.as_deref() == Some(entry.archive_name.as_str()) {
                tracing::debug!(name = %entry.archive_name, "skipping destination archive");
                continue;
            }

            if let Some(observer) = self.observer.as_mut() {
                observer.on_entry(&entry.to_archive_entry());
            }
            tracing::debug!(name = %entry.archive_name, kind = %entry.entry_type.kind(), "adding entry");

            report.bytes_read += writer.add(&entry)?;
            match entry.entry_type {
                WalkedType::File => report.files_added += 1,
                WalkedType::Directory => report.directories_added += 1,
                WalkedType::Symlink { .. } => report.symlinks_added += 1,
            }
        }

        report.entries_ignored = walker.ignored_count();
        report.archive_size = writer.finish()?;
        report.duration = start.elapsed();

        tracing::info!(
            archive = %report.archive_path.display(),
            files = report.files_added,
            directories = report.directories_added,
            symlinks = report.symlinks_added,
            ignored = report.entries_ignored,
            bytes = report.archive_size,
            "archive written"
        );

        Ok(report)
    }

    fn discard_partial(&self, err: &PackError) {
        if !self.config.remove_partial_on_failure || err.is_precondition() {
            return;
        }
        match std::fs::remove_file(&self.destination) {
            Ok(()) => {
                tracing::debug!(path = %self.destination.display(), "removed partial archive");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.destination.display(),
                    error = %e,
                    "cannot remove partial archive"
                );
            }
        }
    }
}

impl fmt::Debug for DirectoryPackager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryPackager")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("config", &self.config)
            .field("observer", &self.observer.as_ref().map(|_| "<observer>"))
            .finish()
    }
}

/// What a packaging run would write, computed without writing anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackPlan {
    /// Entries that pass the ignore rules, in walk order.
    pub entries: Vec<WalkedEntry>,
    /// Number of nodes excluded by the ignore rules.
    pub entries_ignored: usize,
    /// The loaded ignore rules.
    pub rules: IgnoreRuleSet,
}

/// Lists the entries packaging `source` would produce.
///
/// # Errors
///
/// Same preconditions as [`DirectoryPackager::pack_blocking`], plus the
/// first traversal fault.
///
/// # Examples
///
/// ```no_run
/// use fnpack_core::PackConfig;
/// use fnpack_core::packaging::plan;
/// use std::path::Path;
///
/// let plan = plan(Path::new("./function"), &PackConfig::default())?;
/// for entry in &plan.entries {
///     println!("{}", entry.archive_name);
/// }
/// # Ok::<(), fnpack_core::PackError>(())
/// ```
pub fn plan(source: &Path, config: &PackConfig) -> Result<PackPlan> {
    ensure_source_dir(source)?;
    config.validate()?;

    let rules = load_ignore_rules_with(source, config)?;
    let matcher = IgnoreMatcher::from_rules(&rules)?;
    let walker = PackWalker::new(source, &matcher, config);
    let entries = walker.walk().collect::<Result<Vec<_>>>()?;
    let entries_ignored = walker.ignored_count();

    Ok(PackPlan {
        entries,
        entries_ignored,
        rules,
    })
}

fn ensure_source_dir(source: &Path) -> Result<()> {
    if source.is_dir() {
        Ok(())
    } else {
        Err(PackError::DirectoryNotFound {
            path: source.to_path_buf(),
        })
    }
}

/// Archive name of `destination` when it lies inside `source`.
fn self_entry_name(source: &Path, destination: &Path) -> Option<String> {
    let source = source.canonicalize().ok()?;
    let destination = destination.canonicalize().ok()?;
    destination
        .strip_prefix(&source)
        .ok()
        .and_then(to_slash_path)
}
