//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use fnpack_core::EntryObserver;
use fnpack_core::PackReport;
use fnpack_core::packaging::PackPlan;
use fnpack_core::packaging::WalkedEntry;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct PackOutput {
    archive_path: String,
    files_added: usize,
    directories_added: usize,
    symlinks_added: usize,
    entries_ignored: usize,
    ignore_rules: usize,
    bytes_read: u64,
    archive_size: u64,
    compression_ratio: f64,
    compression_percentage: f64,
    duration_ms: u128,
}

impl From<&PackReport> for PackOutput {
    fn from(report: &PackReport) -> Self {
        Self {
            archive_path: report.archive_path.display().to_string(),
            files_added: report.files_added,
            directories_added: report.directories_added,
            symlinks_added: report.symlinks_added,
            entries_ignored: report.entries_ignored,
            ignore_rules: report.ignore_rules,
            bytes_read: report.bytes_read,
            archive_size: report.archive_size,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            duration_ms: report.duration.as_millis(),
        }
    }
}

#[derive(Serialize)]
struct FileListOutput {
    entries: Vec<EntryOutput>,
    entries_ignored: usize,
    ignore_rules: usize,
}

#[derive(Serialize)]
struct EntryOutput {
    name: String,
    kind: &'static str,
    mode: String,
    size: u64,
    source_path: String,
}

impl From<&WalkedEntry> for EntryOutput {
    fn from(entry: &WalkedEntry) -> Self {
        Self {
            name: entry.to_archive_entry().name,
            kind: entry.entry_type.kind().as_str(),
            mode: format!("{:03o}", entry.mode),
            size: entry.size,
            source_path: entry.path.display().to_string(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn entry_observer(&self) -> Option<Box<dyn EntryObserver>> {
        // entries would interleave with the single JSON document
        None
    }

    fn format_pack_result(&self, report: &PackReport) -> Result<()> {
        let output = JsonOutput::success("pack", PackOutput::from(report));
        Self::output(&output)
    }

    fn format_file_list(&self, plan: &PackPlan) -> Result<()> {
        let data = FileListOutput {
            entries: plan.entries.iter().map(EntryOutput::from).collect(),
            entries_ignored: plan.entries_ignored,
            ignore_rules: plan.rules.len(),
        };
        let output = JsonOutput::success("list-files", data);
        Self::output(&output)
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
