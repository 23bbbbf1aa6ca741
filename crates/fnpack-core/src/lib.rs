//! Directory-to-zip packaging with `.gcloudignore` filtering.
//!
//! `fnpack-core` bundles a function source directory into a Deflate zip
//! archive. Paths matched by the gitignore-style rules in the directory's
//! `.gcloudignore` are left out; everything else is stored with paths
//! relative to the directory.
//!
//! # Examples
//!
//! ```no_run
//! use fnpack_core::PackOptions;
//! use fnpack_core::pack;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = pack("./function", "function.zip", PackOptions::default()).await?;
//! println!("Wrote {}", archive.display());
//! # Ok(())
//! # }
//! ```
//!
//! The matcher is usable on its own:
//!
//! ```
//! use fnpack_core::IgnoreMatcher;
//!
//! let matcher = IgnoreMatcher::new(&["*.log", "!keep.log", "node_modules/"])?;
//! assert!(matcher.is_ignored("logs/debug.log", false));
//! assert!(!matcher.is_ignored("keep.log", false));
//! assert!(matcher.is_ignored("node_modules/dep/index.js", false));
//! # Ok::<(), fnpack_core::PackError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod ignore;
pub mod packaging;

// Re-export main API types
pub use api::PackOptions;
pub use api::pack;
pub use api::pack_blocking;
pub use config::PackConfig;
pub use error::PackError;
pub use error::Result;
pub use crate::ignore::IgnoreMatcher;
pub use crate::ignore::IgnoreRuleSet;
pub use crate::ignore::load_ignore_rules;
pub use crate::ignore::matches;
pub use packaging::ArchiveEntry;
pub use packaging::DirectoryPackager;
pub use packaging::EntryKind;
pub use packaging::EntryObserver;
pub use packaging::PackReport;
pub use packaging::format_entry;
pub use packaging::plan;
