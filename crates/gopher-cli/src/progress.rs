//! Progress spinner for installs.

use crate::output::humanize_bytes;
use console::Term;
use gopher_core::ExtractionReport;
use gopher_core::InstallProgress;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use std::time::Duration;

/// CLI spinner implementing `InstallProgress`.
///
/// Shows the current install step on stderr when it is a TTY. Cleans up on
/// drop, so a failed install leaves no spinner behind.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Creates a new spinner.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { bar }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl InstallProgress for CliProgress {
    fn on_extraction_start(&mut self, version: &str, archive: &Path) {
        let name = archive
            .file_name()
            .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.bar
            .set_message(format!("Extracting {name} for {version}"));
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn on_extraction_complete(&mut self, _version: &str, report: &ExtractionReport) {
        self.bar.set_message(format!(
            "Extracted {} files ({})",
            report.files_extracted,
            humanize_bytes(report.bytes_written)
        ));
    }

    fn on_metadata_start(&mut self, version: &str) {
        self.bar.set_message(format!("Finalizing {version}"));
    }

    fn on_metadata_complete(&mut self, _version: &str) {
        self.bar.finish_and_clear();
    }
}
