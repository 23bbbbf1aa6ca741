//! Subcommand implementations.

pub mod completion;
pub mod list_files;
pub mod pack;
