//! Core extraction engine.

use std::path::Path;

use tracing::debug;

use crate::InstallConfig;
use crate::InstallError;
use crate::Result;
use crate::extraction::ExtractionOutcome;
use crate::formats::ArchiveFormat;
use crate::formats::ArchiveType;
use crate::formats::TarGzArchive;
use crate::formats::ZipArchive;

/// Main extraction engine.
///
/// Dispatches on [`ArchiveType`] and runs the matching format handler.
/// Installer packages are recognized and refused without being opened.
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    config: InstallConfig,
}

impl ExtractionEngine {
    /// Creates a new extraction engine with the given configuration.
    #[must_use]
    pub fn new(config: InstallConfig) -> Self {
        Self { config }
    }

    /// Extracts `archive` into `target` without verifying the layout.
    ///
    /// # Errors
    ///
    /// - `InstallError::UnsupportedFormat` if the format is not recognized
    /// - `InstallError::NotImplemented` for installer packages
    /// - any error raised while writing entries
    pub fn extract(&self, archive: &Path, target: &Path) -> Result<ExtractionOutcome> {
        let kind = ArchiveType::detect(archive)?;
        debug!(archive = %archive.display(), format = %kind, "extracting archive");

        match kind {
            ArchiveType::TarGz => TarGzArchive::open(archive)?.extract(target, &self.config),
            ArchiveType::Zip => ZipArchive::open(archive)?.extract(target, &self.config),
            ArchiveType::Installer(installer) => Err(InstallError::NotImplemented {
                format: installer.name(),
                path: archive.to_path_buf(),
            }),
        }
    }

    /// Extracts `archive` into `target` and verifies the toolchain layout.
    ///
    /// # Errors
    ///
    /// Everything [`extract`](Self::extract) returns, plus
    /// `InstallError::MissingPrefix` and `InstallError::MissingBinary`.
    pub fn extract_verified(&self, archive: &Path, target: &Path) -> Result<ExtractionOutcome> {
        let outcome = self.extract(archive, target)?;
        outcome.layout.verify(&self.config)?;
        Ok(outcome)
    }
}

/// Extracts and verifies `archive` into `target` with `config`.
///
/// # Errors
///
/// See [`ExtractionEngine::extract_verified`].
///
/// # Examples
///
/// ```no_run
/// use gopher_core::InstallConfig;
/// use gopher_core::extraction::extract_archive;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = extract_archive(
///     Path::new("go1.22.1.linux-amd64.tar.gz"),
///     Path::new("/tmp/go1.22.1"),
///     &InstallConfig::default(),
/// )?;
/// println!("{} files", outcome.report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive(
    archive: &Path,
    target: &Path,
    config: &InstallConfig,
) -> Result<ExtractionOutcome> {
    ExtractionEngine::new(config.clone()).extract_verified(archive, target)
}
