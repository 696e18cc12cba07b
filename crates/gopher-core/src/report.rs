//! Install operation reporting and progress callbacks.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Report of an archive extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Number of files extracted.
    pub files_extracted: usize,

    /// Number of directories created.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns total number of entries written.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }
}

/// Report of a successful installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// The installed version.
    pub version: String,

    /// Final installation directory.
    pub install_dir: PathBuf,

    /// Path of the metadata sidecar.
    pub metadata_path: PathBuf,

    /// Whether a previous installation of the same version was replaced.
    pub replaced: bool,

    /// Extraction statistics.
    pub extraction: ExtractionReport,
}

/// Callback trait for progress reporting during installation.
///
/// The trait requires `Send` to allow use in multi-threaded contexts.
///
/// # Examples
///
/// ```
/// use gopher_core::InstallProgress;
/// use gopher_core::ExtractionReport;
/// use std::path::Path;
///
/// struct PrintProgress;
///
/// impl InstallProgress for PrintProgress {
///     fn on_extraction_start(&mut self, version: &str, archive: &Path) {
///         println!("extracting {} for {version}", archive.display());
///     }
///
///     fn on_extraction_complete(&mut self, _version: &str, report: &ExtractionReport) {
///         println!("{} files", report.files_extracted);
///     }
///
///     fn on_metadata_start(&mut self, _version: &str) {}
///
///     fn on_metadata_complete(&mut self, version: &str) {
///         println!("{version} installed");
///     }
/// }
/// ```
pub trait InstallProgress: Send {
    /// Called before the archive is opened.
    fn on_extraction_start(&mut self, version: &str, archive: &Path);

    /// Called once the staged tree has passed structural validation.
    fn on_extraction_complete(&mut self, version: &str, report: &ExtractionReport);

    /// Called before the metadata sidecar is written.
    fn on_metadata_start(&mut self, version: &str);

    /// Called after the metadata sidecar is written.
    fn on_metadata_complete(&mut self, version: &str);
}

/// No-op implementation of `InstallProgress`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl InstallProgress for NoopProgress {
    fn on_extraction_start(&mut self, _version: &str, _archive: &Path) {}

    fn on_extraction_complete(&mut self, _version: &str, _report: &ExtractionReport) {}

    fn on_metadata_start(&mut self, _version: &str) {}

    fn on_metadata_complete(&mut self, _version: &str) {}
}
