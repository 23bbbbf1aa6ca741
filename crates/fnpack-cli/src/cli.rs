//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use fnpack_core::PackConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fnpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package a function source directory into a zip archive
    Pack(PackArgs),
    /// List the files that would be packaged
    ListFiles(ListFilesArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct PackArgs {
    /// Function source directory
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Archive symlink targets instead of the links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Write entries in name order for reproducible archives
    #[arg(long)]
    pub sort: bool,

    /// Do not store unix permission bits
    #[arg(long)]
    pub no_permissions: bool,

    #[command(flatten)]
    pub ignore: IgnoreArgs,

    /// Delete the output file if packaging fails
    #[arg(long)]
    pub remove_partial: bool,

    /// Overwrite output file if exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

impl PackArgs {
    /// Maps the flags onto a packaging configuration.
    pub fn to_config(&self) -> PackConfig {
        let mut config = self
            .ignore
            .to_config()
            .with_follow_symlinks(self.follow_symlinks)
            .with_sort_entries(self.sort)
            .with_preserve_permissions(!self.no_permissions)
            .with_remove_partial_on_failure(self.remove_partial);
        if let Some(level) = self.compression_level {
            config = config.with_compression_level(level);
        }
        config
    }
}

#[derive(clap::Args)]
pub struct ListFilesArgs {
    /// Function source directory
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    #[command(flatten)]
    pub ignore: IgnoreArgs,
}

impl ListFilesArgs {
    /// Maps the flags onto a packaging configuration.
    ///
    /// Entries are always listed in name order.
    pub fn to_config(&self) -> PackConfig {
        self.ignore.to_config().with_sort_entries(true)
    }
}

/// Flags controlling how ignore rules are loaded.
#[derive(clap::Args)]
pub struct IgnoreArgs {
    /// Name of the ignore file at the source root
    #[arg(long, value_name = "NAME", default_value = fnpack_core::config::DEFAULT_IGNORE_FILE)]
    pub ignore_file: String,

    /// Do not expand `#!include:` directives
    #[arg(long)]
    pub no_includes: bool,
}

impl IgnoreArgs {
    fn to_config(&self) -> PackConfig {
        PackConfig::default()
            .with_ignore_file_name(self.ignore_file.clone())
            .with_expand_includes(!self.no_includes)
    }
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum, value_name = "SHELL")]
    pub shell: Shell,
}
