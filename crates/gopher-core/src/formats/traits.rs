//! Common trait for archive format handlers.

use std::path::Path;

use crate::InstallConfig;
use crate::Result;
use crate::extraction::ExtractionOutcome;

/// Trait for archive format handlers.
pub trait ArchiveFormat {
    /// Extracts the archive into `target`.
    ///
    /// `target` is created if missing. The returned layout facts are not
    /// verified here.
    ///
    /// # Errors
    ///
    /// Returns an error on the first entry that fails a security check,
    /// exceeds a quota, or cannot be written.
    fn extract(&mut self, target: &Path, config: &InstallConfig) -> Result<ExtractionOutcome>;

    /// Returns the archive format name.
    fn format_name(&self) -> &'static str;
}
