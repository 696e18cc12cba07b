//! Entry writing shared by the tar and zip handlers.
//!
//! Format handlers translate their native entries into calls on
//! [`EntryWriter`], which owns every filesystem write of an extraction:
//!
//! 1. the wrapper prefix is stripped from the entry name,
//! 2. the remainder is joined onto the target and proven to stay inside it,
//! 3. quotas are checked against the declared size before any content is
//!    read,
//! 4. content is copied through a bounded reader and the handle is closed
//!    before permission bits are applied.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;
use tracing::warn;

use crate::InstallConfig;
use crate::InstallError;
use crate::QuotaResource;
use crate::Result;
use crate::SecurityError;
use crate::copy::CopyBuffer;
use crate::copy::copy_bounded;
use crate::extraction::ExtractionOutcome;
use crate::security::QuotaTracker;
use crate::security::permissions::apply_mode;
use crate::security::permissions::dir_mode;
use crate::security::permissions::file_mode;
use crate::security::sanitize_path;
use crate::security::validate_path_within_root;
use crate::types::ContainedPath;
use crate::types::EntryKind;

/// A file entry that passed every check that does not need its content.
#[derive(Debug)]
pub(crate) struct PlannedFile {
    dest: ContainedPath,
    name: PathBuf,
    size: u64,
}

/// Writes validated entries below a target directory.
pub(crate) struct EntryWriter<'a> {
    target: &'a Path,
    config: &'a InstallConfig,
    binary: PathBuf,
    quota: QuotaTracker,
    buffer: CopyBuffer,
    outcome: ExtractionOutcome,
    started: Instant,
}

impl<'a> EntryWriter<'a> {
    /// Creates a writer for `target`, creating the directory if needed.
    pub(crate) fn new(target: &'a Path, config: &'a InstallConfig) -> Result<Self> {
        config.validate()?;
        create_dir_all(target).map_err(|e| InstallError::io("create directory", target, e))?;
        // Staging directories start out as 0o700.
        apply_mode(target, dir_mode(None))
            .map_err(|e| InstallError::io("set permissions on", target, e))?;

        Ok(Self {
            target,
            config,
            binary: config.platform.go_binary(),
            quota: QuotaTracker::new(),
            buffer: CopyBuffer::new(),
            outcome: ExtractionOutcome::default(),
            started: Instant::now(),
        })
    }

    /// Creates a directory entry and its ancestors.
    pub(crate) fn write_directory(&mut self, name: &str, mode: Option<u32>) -> Result<()> {
        let Some(dest) = self.resolve(name)? else {
            return Ok(());
        };
        if dest.is_root() {
            return Ok(());
        }

        self.quota.record_directory(Path::new(name), self.config)?;

        let path = dest.as_path();
        create_dir_all(path).map_err(|e| InstallError::io("create directory", path, e))?;
        apply_mode(path, dir_mode(mode))
            .map_err(|e| InstallError::io("set permissions on", path, e))?;

        self.outcome.report.directories_created += 1;
        Ok(())
    }

    /// Validates a file entry and reserves its declared size.
    ///
    /// Returns `None` for entries that are skipped. Nothing is read from the
    /// archive and nothing is written to disk.
    pub(crate) fn plan_file(&mut self, name: &str, size: u64) -> Result<Option<PlannedFile>> {
        if self.is_wrapper(name) {
            warn!(
                entry = %sanitize_path(name).display(),
                "file entry shadows the wrapper directory"
            );
            return Err(SecurityError::InvalidPath {
                path: PathBuf::from(name),
                reason: "file entry shadows the wrapper directory",
            }
            .into());
        }

        let Some(dest) = self.resolve(name)? else {
            return Ok(None);
        };
        if dest.is_root() {
            return Err(SecurityError::InvalidPath {
                path: PathBuf::from(name),
                reason: "file entry resolves to the extraction root",
            }
            .into());
        }

        if let Err(err) = self.quota.record_file(Path::new(name), size, self.config) {
            warn!(
                entry = %sanitize_path(name).display(),
                declared = size,
                "archive entry exceeds quota"
            );
            return Err(err);
        }

        Ok(Some(PlannedFile {
            dest,
            name: PathBuf::from(name),
            size,
        }))
    }

    /// Writes the content of a planned file.
    pub(crate) fn write_file<R: Read + ?Sized>(
        &mut self,
        plan: PlannedFile,
        mode: Option<u32>,
        reader: &mut R,
    ) -> Result<()> {
        let path = plan.dest.as_path();
        if let Some(parent) = path.parent() {
            create_dir_all(parent).map_err(|e| InstallError::io("create directory", parent, e))?;
        }

        let written = {
            let file = File::create(path).map_err(|e| InstallError::io("create", path, e))?;
            let mut writer = BufWriter::with_capacity(64 * 1024, file);
            let written = copy_bounded(reader, &mut writer, plan.size, &mut self.buffer, &plan.name)?;
            writer
                .flush()
                .map_err(|e| InstallError::io("write", path, e))?;
            written
        };

        apply_mode(path, file_mode(mode))
            .map_err(|e| InstallError::io("set permissions on", path, e))?;

        if plan.dest.relative() == self.binary {
            debug!(entry = %plan.name.display(), "found runnable binary");
            self.outcome.layout.saw_binary = true;
        }

        let report = &mut self.outcome.report;
        report.files_extracted += 1;
        report.bytes_written = report.bytes_written.checked_add(written).ok_or_else(|| {
            InstallError::QuotaExceeded {
                path: plan.name.clone(),
                resource: QuotaResource::IntegerOverflow,
            }
        })?;
        Ok(())
    }

    /// Builds the error for an entry kind that is never extracted.
    pub(crate) fn reject(&self, name: &str, kind: EntryKind) -> InstallError {
        warn!(
            entry = %sanitize_path(name).display(),
            kind = kind.as_str(),
            "rejected archive entry"
        );
        InstallError::UnsupportedEntry {
            path: PathBuf::from(name),
            kind: kind.as_str(),
        }
    }

    /// Finishes the extraction.
    pub(crate) fn finish(mut self) -> ExtractionOutcome {
        self.outcome.report.duration = self.started.elapsed();
        debug!(
            entries = self.quota.entries(),
            declared_bytes = self.quota.declared_bytes(),
            "extraction finished"
        );
        self.outcome
    }

    /// Strips the wrapper prefix and proves the remainder stays inside the
    /// target. `None` means the entry is the wrapper directory itself.
    fn resolve(&mut self, name: &str) -> Result<Option<ContainedPath>> {
        let Some(stripped) = self.strip_prefix(name) else {
            return Ok(None);
        };

        let joined = self.target.join(stripped);
        match validate_path_within_root(&joined, self.target) {
            Ok(dest) => Ok(Some(dest)),
            Err(err) => {
                warn!(
                    entry = %sanitize_path(name).display(),
                    error = %err,
                    "rejected archive entry"
                );
                Err(err.with_path(PathBuf::from(name)).into())
            }
        }
    }

    /// Whether `name` is the wrapper directory itself.
    fn is_wrapper(&self, name: &str) -> bool {
        let prefix = self.config.wrapper_prefix.as_str();
        !prefix.is_empty() && name.trim_end_matches('/') == prefix
    }

    /// Only reached by directory entries for the wrapper itself; file entries
    /// with that name are refused in `plan_file`.
    fn strip_prefix<'n>(&mut self, name: &'n str) -> Option<&'n str> {
        let prefix = self.config.wrapper_prefix.as_str();
        if prefix.is_empty() {
            self.outcome.layout.saw_prefix = true;
            return Some(name);
        }

        if self.is_wrapper(name) {
            self.outcome.layout.saw_prefix = true;
            return None;
        }

        match name.strip_prefix(prefix).and_then(|rest| rest.strip_prefix('/')) {
            Some(rest) => {
                self.outcome.layout.saw_prefix = true;
                Some(rest)
            }
            None => Some(name),
        }
    }
}
