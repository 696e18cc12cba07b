//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use super::formatter::VersionInfo;
use super::humanize_bytes;
use anyhow::Result;
use console::Term;
use console::style;
use gopher_core::InstallReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn success_line(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_install_result(&self, report: &InstallReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.success_line(&format!("Installed {}", report.version));

        let extraction = &report.extraction;
        let _ = self
            .term
            .write_line(&format!("  Location: {}", report.install_dir.display()));
        let _ = self.term.write_line(&format!(
            "  Files extracted: {}",
            Self::format_number(extraction.files_extracted)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            humanize_bytes(extraction.bytes_written)
        ));

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Directories: {}",
                Self::format_number(extraction.directories_created)
            ));
            let _ = self
                .term
                .write_line(&format!("  Metadata: {}", report.metadata_path.display()));
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", extraction.duration));
        }

        Ok(())
    }

    fn format_uninstall_result(&self, version: &str) -> Result<()> {
        if !self.quiet {
            self.success_line(&format!("Uninstalled {version}"));
        }
        Ok(())
    }

    fn format_versions(&self, versions: &[String]) -> Result<()> {
        if versions.is_empty() {
            if !self.quiet {
                let _ = self.term.write_line("No versions installed");
            }
            return Ok(());
        }

        // Versions are data, so they are printed even in quiet mode.
        for version in versions {
            let _ = self.term.write_line(version);
        }
        Ok(())
    }

    fn format_version_info(&self, info: &VersionInfo) -> Result<()> {
        let binary = info
            .go_binary
            .as_ref()
            .map_or_else(|| "missing".to_string(), |path| path.display().to_string());

        let _ = self.term.write_line(&format!("Version: {}", info.version));
        let _ = self
            .term
            .write_line(&format!("  Location: {}", info.install_dir.display()));
        let _ = self.term.write_line(&format!("  Go binary: {binary}"));
        let _ = self.term.write_line(&format!(
            "  Disk usage: {}",
            humanize_bytes(info.disk_usage)
        ));

        for (key, value) in &info.metadata {
            if key == "version" || (key == "install_dir" && !self.verbose) {
                continue;
            }
            let _ = self.term.write_line(&format!("  {key}: {value}"));
        }

        Ok(())
    }

    fn format_binary_path(&self, _version: &str, path: &Path) -> Result<()> {
        let _ = self.term.write_line(&path.display().to_string());
        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}
