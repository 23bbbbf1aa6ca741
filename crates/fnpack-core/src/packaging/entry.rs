//! Archive entry metadata and its one-line rendering.

use std::fmt;
use std::path::PathBuf;

/// Kind of filesystem node added to the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link stored as a link.
    Symlink,
}

impl EntryKind {
    /// Lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file, directory or symlink being added to an archive.
///
/// Only `name` is always known. The other fields are optional so that
/// callers can describe entries they did not obtain from a filesystem walk;
/// [`format_entry`] renders placeholders for missing values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// `/`-separated path inside the archive, relative to the source root.
    pub name: String,
    /// Unix permission bits.
    pub mode: Option<u32>,
    /// Absolute path of the node on disk.
    pub source_path: Option<PathBuf>,
    /// Kind of node.
    pub kind: Option<EntryKind>,
}

impl ArchiveEntry {
    /// Creates an entry carrying only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: None,
            source_path: None,
            kind: None,
        }
    }

    /// Sets the permission bits.
    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the source path.
    #[must_use]
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Sets the entry kind.
    #[must_use]
    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl fmt::Display for ArchiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_entry(self))
    }
}

/// Renders an entry as `[<K>] (<mode>) <name> => <source path>`.
///
/// `K` is the uppercased first letter of the kind (`U` for unknown), the
/// mode is printed in octal with at least three digits (`000` when absent)
/// and a missing source path prints as `unknown`.
///
/// # Examples
///
/// ```
/// use fnpack_core::packaging::entry::ArchiveEntry;
/// use fnpack_core::packaging::entry::EntryKind;
/// use fnpack_core::packaging::entry::format_entry;
///
/// let bare = ArchiveEntry::named("index.js");
/// assert_eq!(format_entry(&bare), "[U] (000) index.js => unknown");
///
/// let full = ArchiveEntry::named("lib/util.js")
///     .with_kind(EntryKind::File)
///     .with_mode(0o644)
///     .with_source_path("/srv/fn/lib/util.js");
/// assert_eq!(format_entry(&full), "[F] (644) lib/util.js => /srv/fn/lib/util.js");
/// ```
#[must_use]
pub fn format_entry(entry: &ArchiveEntry) -> String {
    let kind = entry.kind.map_or("unknown", EntryKind::as_str);
    let initial: String = kind.chars().take(1).flat_map(char::to_uppercase).collect();
    let mode = entry
        .mode
        .map_or_else(|| "000".to_string(), |m| format!("{:03o}", m & 0o7777));
    let source = entry
        .source_path
        .as_ref()
        .map_or_else(|| "unknown".to_string(), |p| p.display().to_string());

    format!("[{initial}] ({mode}) {} => {source}", entry.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry_name_only() {
        let entry = ArchiveEntry::named("index.js");
        assert_eq!(format_entry(&entry), "[U] (000) index.js => unknown");
    }

    #[test]
    fn test_format_entry_kinds() {
        let dir = ArchiveEntry::named("lib/").with_kind(EntryKind::Directory);
        assert!(format_entry(&dir).starts_with("[D] "));

        let link = ArchiveEntry::named("current").with_kind(EntryKind::Symlink);
        assert!(format_entry(&link).starts_with("[S] "));

        let file = ArchiveEntry::named("a.txt").with_kind(EntryKind::File);
        assert!(format_entry(&file).starts_with("[F] "));
    }

    #[test]
    fn test_format_entry_masks_file_type_bits() {
        let entry = ArchiveEntry::named("run.sh")
            .with_kind(EntryKind::File)
            .with_mode(0o100_755);
        assert_eq!(format_entry(&entry), "[F] (755) run.sh => unknown");
    }

    #[test]
    fn test_format_entry_pads_small_modes() {
        let entry = ArchiveEntry::named("locked").with_mode(0o7);
        assert_eq!(format_entry(&entry), "[U] (007) locked => unknown");
    }

    #[test]
    fn test_format_entry_source_path() {
        let entry = ArchiveEntry::named("a.js").with_source_path("/tmp/fn/a.js");
        assert_eq!(format_entry(&entry), "[U] (000) a.js => /tmp/fn/a.js");
    }

    #[test]
    fn test_display_matches_format_entry() {
        let entry = ArchiveEntry::named("x")
            .with_kind(EntryKind::File)
            .with_mode(0o600);
        assert_eq!(entry.to_string(), format_entry(&entry));
    }

    #[test]
    fn test_entry_kind_display() {
        assert_eq!(EntryKind::File.to_string(), "file");
        assert_eq!(EntryKind::Directory.to_string(), "directory");
        assert_eq!(EntryKind::Symlink.to_string(), "symlink");
    }
}
