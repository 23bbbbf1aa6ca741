//! Per-entry observation hooks.
//!
//! An observer is told about every entry written to the archive. It cannot
//! influence what gets written: inclusion is decided by the ignore rules
//! alone.

use crate::packaging::entry::ArchiveEntry;

/// Receives a notification for each entry written to the archive.
///
/// Observers run synchronously on the packaging thread, between the ignore
/// decision and the write of the entry. Any `FnMut(&ArchiveEntry) + Send`
/// closure is an observer.
///
/// # Examples
///
/// ```
/// use fnpack_core::packaging::entry::ArchiveEntry;
/// use fnpack_core::packaging::observer::EntryObserver;
///
/// struct Counter(usize);
///
/// impl EntryObserver for Counter {
///     fn on_entry(&mut self, _entry: &ArchiveEntry) {
///         self.0 += 1;
///     }
/// }
///
/// let mut counter = Counter(0);
/// counter.on_entry(&ArchiveEntry::named("a.txt"));
/// assert_eq!(counter.0, 1);
/// ```
pub trait EntryObserver: Send {
    /// Called once per entry, before its data is written.
    fn on_entry(&mut self, entry: &ArchiveEntry);
}

impl<F> EntryObserver for F
where
    F: FnMut(&ArchiveEntry) + Send,
{
    fn on_entry(&mut self, entry: &ArchiveEntry) {
        self(entry);
    }
}

/// Observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EntryObserver for NoopObserver {
    fn on_entry(&mut self, _entry: &ArchiveEntry) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_observer() {
        let mut names = Vec::new();
        {
            let mut observer = |entry: &ArchiveEntry| names.push(entry.name.clone());
            observer.on_entry(&ArchiveEntry::named("a"));
            observer.on_entry(&ArchiveEntry::named("b"));
        }
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_boxed_observer() {
        let mut observer: Box<dyn EntryObserver> = Box::new(NoopObserver);
        observer.on_entry(&ArchiveEntry::named("a"));
    }
}
