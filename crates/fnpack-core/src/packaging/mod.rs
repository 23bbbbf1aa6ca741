//! Directory packaging into zip archives.
//!
//! This module provides:
//! - [`DirectoryPackager`] builder and [`plan`] for dry runs
//! - [`walker`] traversal with ignore-rule pruning
//! - [`archive`] Deflate zip output
//! - [`entry`] entry metadata and [`format_entry`]
//! - [`observer`] per-entry notification hooks
//! - [`report`] run statistics

pub mod archive;
pub mod entry;
pub mod observer;
pub mod packager;
pub mod report;
pub mod walker;

pub use entry::ArchiveEntry;
pub use entry::EntryKind;
pub use entry::format_entry;
pub use observer::EntryObserver;
pub use observer::NoopObserver;
pub use packager::DirectoryPackager;
pub use packager::PackPlan;
pub use packager::plan;
pub use report::PackReport;
pub use walker::WalkedEntry;
pub use walker::WalkedType;
