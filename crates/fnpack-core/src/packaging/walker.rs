//! Directory tree walking with ignore-rule filtering.
//!
//! Ignored directories are pruned, so nothing below them is visited. The
//! root directory itself is never yielded.

use crate::PackConfig;
use crate::PackError;
use crate::Result;
use crate::ignore::IgnoreMatcher;
use crate::ignore::matcher::to_slash_path;
use crate::packaging::entry::ArchiveEntry;
use crate::packaging::entry::EntryKind;
use std::cell::Cell;
use std::fs::Metadata;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Walks a source directory, skipping what the ignore rules exclude.
///
/// # Examples
///
/// ```no_run
/// use fnpack_core::PackConfig;
/// use fnpack_core::ignore::IgnoreMatcher;
/// use fnpack_core::packaging::walker::PackWalker;
/// use std::path::Path;
///
/// let config = PackConfig::default();
/// let matcher = IgnoreMatcher::new(&["node_modules/"])?;
/// let walker = PackWalker::new(Path::new("./function"), &matcher, &config);
///
/// for entry in walker.walk() {
///     let entry = entry?;
///     println!("would add: {}", entry.archive_name);
/// }
/// # Ok::<(), fnpack_core::PackError>(())
/// ```
pub struct PackWalker<'a> {
    root: &'a Path,
    matcher: &'a IgnoreMatcher,
    config: &'a PackConfig,
    ignored: Cell<usize>,
}

impl<'a> PackWalker<'a> {
    /// Creates a walker over `root`.
    #[must_use]
    pub fn new(root: &'a Path, matcher: &'a IgnoreMatcher, config: &'a PackConfig) -> Self {
        Self {
            root,
            matcher,
            config,
            ignored: Cell::new(0),
        }
    }

    /// Number of nodes excluded by the ignore rules so far.
    ///
    /// A pruned directory counts once; its contents are never visited.
    #[must_use]
    pub fn ignored_count(&self) -> usize {
        self.ignored.get()
    }

    /// Returns an iterator over the entries to archive.
    ///
    /// Traversal faults (unreadable directory, vanished file, symlink loop)
    /// are yielded as [`PackError::ArchiveWarning`].
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkedEntry>> + '_ {
        let mut walker = WalkDir::new(self.root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks);
        if self.config.sort_entries {
            walker = walker.sort_by_file_name();
        }

        walker
            .into_iter()
            .filter_entry(move |entry| {
                let Ok(relative) = entry.path().strip_prefix(self.root) else {
                    return true;
                };
                let ignored = self
                    .matcher
                    .is_path_ignored(relative, entry.file_type().is_dir());
                if ignored {
                    tracing::trace!(path = %relative.display(), "ignored");
                    self.ignored.set(self.ignored.get() + 1);
                }
                !ignored
            })
            .map(move |entry| match entry {
                Ok(entry) => self.build_entry(&entry),
                Err(e) => Err(walk_warning(self.root, &e)),
            })
    }

    fn build_entry(&self, entry: &walkdir::DirEntry) -> Result<WalkedEntry> {
        let path = entry.path().to_path_buf();
        let metadata = entry.metadata().map_err(|e| PackError::ArchiveWarning {
            path: path.clone(),
            message: format!("cannot read metadata: {e}"),
        })?;

        let relative = path
            .strip_prefix(self.root)
            .map_err(|_| PackError::ArchiveWarning {
                path: path.clone(),
                message: format!("not under source directory {}", self.root.display()),
            })?;
        let archive_name = to_slash_path(relative).ok_or_else(|| PackError::ArchiveWarning {
            path: path.clone(),
            message: "file name is not valid UTF-8".to_string(),
        })?;

        let entry_type = if metadata.file_type().is_symlink() {
            let target = std::fs::read_link(&path).map_err(|e| PackError::ArchiveWarning {
                path: path.clone(),
                message: format!("cannot read symlink target: {e}"),
            })?;
            WalkedType::Symlink { target }
        } else if metadata.is_dir() {
            WalkedType::Directory
        } else {
            WalkedType::File
        };

        let size = if entry_type == WalkedType::File {
            metadata.len()
        } else {
            0
        };

        Ok(WalkedEntry {
            mode: permission_bits(&metadata, &entry_type),
            path,
            archive_name,
            entry_type,
            size,
        })
    }
}

/// An entry that passed the ignore rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedEntry {
    /// Absolute (or root-joined) filesystem path.
    pub path: PathBuf,
    /// `/`-separated name relative to the source root, without trailing `/`.
    pub archive_name: String,
    /// Node type.
    pub entry_type: WalkedType,
    /// Permission bits (`0o7777` mask).
    pub mode: u32,
    /// File size in bytes (0 for directories and symlinks).
    pub size: u64,
}

impl WalkedEntry {
    /// Describes this entry for observers.
    #[must_use]
    pub fn to_archive_entry(&self) -> ArchiveEntry {
        let name = if self.entry_type == WalkedType::Directory {
            format!("{}/", self.archive_name)
        } else {
            self.archive_name.clone()
        };
        ArchiveEntry::named(name)
            .with_mode(self.mode)
            .with_source_path(self.path.clone())
            .with_kind(self.entry_type.kind())
    }
}

/// Type of a walked node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkedType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link, not followed.
    Symlink {
        /// Target of the link as stored on disk.
        target: PathBuf,
    },
}

impl WalkedType {
    /// The matching [`EntryKind`].
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        match self {
            Self::File => EntryKind::File,
            Self::Directory => EntryKind::Directory,
            Self::Symlink { .. } => EntryKind::Symlink,
        }
    }
}

fn walk_warning(root: &Path, err: &walkdir::Error) -> PackError {
    PackError::ArchiveWarning {
        path: err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
        message: err.to_string(),
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata, _entry_type: &WalkedType) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(_metadata: &Metadata, entry_type: &WalkedType) -> u32 {
    match entry_type {
        WalkedType::File => 0o644,
        WalkedType::Directory | WalkedType::Symlink { .. } => 0o755,
    }
}
