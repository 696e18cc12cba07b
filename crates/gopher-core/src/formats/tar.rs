//! Gzip-compressed tar handler.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use super::common::EntryWriter;
use super::traits::ArchiveFormat;
use crate::InstallConfig;
use crate::InstallError;
use crate::Result;
use crate::extraction::ExtractionOutcome;
use crate::types::EntryKind;

/// Tar+gzip archive handler.
pub struct TarGzArchive<R: Read> {
    archive: tar::Archive<GzDecoder<R>>,
}

impl TarGzArchive<BufReader<File>> {
    /// Opens the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| InstallError::io("open", path, e))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> TarGzArchive<R> {
    /// Wraps a reader positioned at the start of a gzip stream.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            archive: tar::Archive::new(GzDecoder::new(reader)),
        }
    }
}

impl<R: Read> ArchiveFormat for TarGzArchive<R> {
    fn extract(&mut self, target: &Path, config: &InstallConfig) -> Result<ExtractionOutcome> {
        let mut writer = EntryWriter::new(target, config)?;

        let entries = self
            .archive
            .entries()
            .map_err(|e| InstallError::InvalidArchive(format!("failed to read tar entries: {e}")))?;

        for entry_result in entries {
            let mut entry = entry_result.map_err(|e| {
                InstallError::InvalidArchive(format!("failed to read tar entry: {e}"))
            })?;

            let entry_type = entry.header().entry_type();
            if entry_type == tar::EntryType::XGlobalHeader {
                debug!("skipping pax global header");
                continue;
            }

            let name = entry_name(&entry)?;
            let mode = entry.header().mode().map_err(|e| {
                InstallError::InvalidArchive(format!("invalid mode for tar entry {name}: {e}"))
            })?;

            match convert_tar_entry_type(entry_type) {
                EntryKind::Directory => writer.write_directory(&name, Some(mode))?,
                EntryKind::File => {
                    if let Some(plan) = writer.plan_file(&name, entry.size())? {
                        writer.write_file(plan, Some(mode), &mut entry)?;
                    }
                }
                other => return Err(writer.reject(&name, other)),
            }
        }

        Ok(writer.finish())
    }

    fn format_name(&self) -> &'static str {
        "tar.gz"
    }
}

fn entry_name<R: Read>(entry: &tar::Entry<'_, R>) -> Result<String> {
    let bytes = entry.path_bytes();
    std::str::from_utf8(&bytes)
        .map(str::to_owned)
        .map_err(|_| {
            InstallError::InvalidArchive(format!(
                "entry name is not valid UTF-8: {}",
                String::from_utf8_lossy(&bytes)
            ))
        })
}

fn convert_tar_entry_type(entry_type: tar::EntryType) -> EntryKind {
    match entry_type {
        tar::EntryType::Regular | tar::EntryType::Continuous => EntryKind::File,
        tar::EntryType::Directory => EntryKind::Directory,
        tar::EntryType::Symlink => EntryKind::Symlink,
        tar::EntryType::Link => EntryKind::Hardlink,
        tar::EntryType::Char => EntryKind::Other("character device"),
        tar::EntryType::Block => EntryKind::Other("block device"),
        tar::EntryType::Fifo => EntryKind::Other("fifo"),
        tar::EntryType::GNUSparse => EntryKind::Other("sparse file"),
        _ => EntryKind::Other("unknown"),
    }
}
