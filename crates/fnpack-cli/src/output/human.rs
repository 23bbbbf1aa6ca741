//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use fnpack_core::ArchiveEntry;
use fnpack_core::EntryObserver;
use fnpack_core::PackReport;
use fnpack_core::packaging::PackPlan;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let digits = n.to_string();
        let mut result = String::with_capacity(digits.len() + digits.len() / 3);

        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

impl OutputFormatter for HumanFormatter {
    fn entry_observer(&self) -> Option<Box<dyn EntryObserver>> {
        if !self.verbose {
            return None;
        }
        let term = self.term.clone();
        Some(Box::new(move |entry: &ArchiveEntry| {
            let _ = term.write_line(&format!("  {entry}"));
        }))
    }

    fn format_pack_result(&self, report: &PackReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            self.line(&format!(
                "{} Archive created: {}",
                style("✓").green().bold(),
                report.archive_path.display()
            ));
        } else {
            self.line(&format!("Archive created: {}", report.archive_path.display()));
        }

        self.line("");
        self.line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        self.line(&format!(
            "  Directories:      {}",
            Self::format_number(report.directories_added)
        ));
        if report.symlinks_added > 0 {
            self.line(&format!(
                "  Symlinks:         {}",
                Self::format_number(report.symlinks_added)
            ));
        }
        self.line(&format!(
            "  Ignored:          {}",
            Self::format_number(report.entries_ignored)
        ));
        self.line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_read)
        ));
        self.line(&format!(
            "  Archive size:     {}",
            Self::format_size(report.archive_size)
        ));

        if report.bytes_read > 0 {
            self.line(&format!(
                "  Compression:      {:.1}%",
                report.compression_percentage()
            ));
        }

        if self.verbose {
            self.line(&format!("  Ignore rules:     {}", report.ignore_rules));
            self.line(&format!("  Duration:         {:?}", report.duration));
        }

        Ok(())
    }

    fn format_file_list(&self, plan: &PackPlan) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &plan.entries {
            let entry = entry.to_archive_entry();
            if self.verbose {
                self.line(&entry.to_string());
            } else {
                self.line(&entry.name);
            }
        }

        if self.verbose {
            self.line("");
            self.line(&format!(
                "Total: {} entries, {} ignored",
                Self::format_number(plan.entries.len()),
                Self::format_number(plan.entries_ignored)
            ));
        }

        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}
