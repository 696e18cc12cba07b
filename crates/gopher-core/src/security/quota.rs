//! Extraction quota tracking and validation.

use std::path::Path;

use crate::InstallConfig;
use crate::InstallError;
use crate::QuotaResource;
use crate::Result;

/// Tracks resource usage during extraction.
///
/// Sizes are the ones the archive declares; they are checked before the
/// entry's content is opened, so an oversized entry is rejected without a
/// single byte of it being copied.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    entries: usize,
    declared_bytes: u64,
}

impl QuotaTracker {
    /// Creates a new quota tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a directory entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry count quota is exceeded.
    pub fn record_directory(&mut self, path: &Path, config: &InstallConfig) -> Result<()> {
        self.bump_entries(path, config)
    }

    /// Records a file entry about to be written with `declared_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the single-file, total-size, or entry-count quota
    /// would be exceeded.
    pub fn record_file(
        &mut self,
        path: &Path,
        declared_size: u64,
        config: &InstallConfig,
    ) -> Result<()> {
        if declared_size > config.max_file_size {
            return Err(exceeded(
                path,
                QuotaResource::FileSize {
                    size: declared_size,
                    max: config.max_file_size,
                },
            ));
        }

        let total = self
            .declared_bytes
            .checked_add(declared_size)
            .ok_or_else(|| exceeded(path, QuotaResource::IntegerOverflow))?;
        if total > config.max_total_size {
            return Err(exceeded(
                path,
                QuotaResource::TotalSize {
                    current: total,
                    max: config.max_total_size,
                },
            ));
        }

        self.bump_entries(path, config)?;
        self.declared_bytes = total;
        Ok(())
    }

    /// Returns the number of entries recorded.
    #[must_use]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Returns the total declared bytes recorded.
    #[must_use]
    pub fn declared_bytes(&self) -> u64 {
        self.declared_bytes
    }

    fn bump_entries(&mut self, path: &Path, config: &InstallConfig) -> Result<()> {
        let entries = self.entries + 1;
        if entries > config.max_file_count {
            return Err(exceeded(
                path,
                QuotaResource::FileCount {
                    current: entries,
                    max: config.max_file_count,
                },
            ));
        }
        self.entries = entries;
        Ok(())
    }
}

fn exceeded(path: &Path, resource: QuotaResource) -> InstallError {
    InstallError::QuotaExceeded {
        path: path.to_path_buf(),
        resource,
    }
}
