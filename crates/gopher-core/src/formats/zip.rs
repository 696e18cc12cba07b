//! ZIP archive handler.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

use super::common::EntryWriter;
use super::traits::ArchiveFormat;
use crate::InstallConfig;
use crate::InstallError;
use crate::Result;
use crate::extraction::ExtractionOutcome;
use crate::types::EntryKind;

const S_IFMT: u32 = 0o170_000;
const S_IFREG: u32 = 0o100_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFLNK: u32 = 0o120_000;

/// ZIP archive handler.
///
/// Entry metadata is read through raw access to the central directory, so
/// the declared size is checked before any compressed stream is opened.
pub struct ZipArchive<R: Read + Seek> {
    archive: ::zip::ZipArchive<R>,
}

impl ZipArchive<BufReader<File>> {
    /// Opens the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or has no valid
    /// central directory.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| InstallError::io("open", path, e))?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipArchive<R> {
    /// Reads the central directory from `reader`.
    ///
    /// # Errors
    ///
    /// Returns `InstallError::InvalidArchive` if the central directory is
    /// missing or corrupt.
    pub fn new(reader: R) -> Result<Self> {
        let archive = ::zip::ZipArchive::new(reader).map_err(|e| {
            InstallError::InvalidArchive(format!("failed to open ZIP archive: {e}"))
        })?;
        Ok(Self { archive })
    }
}

impl<R: Read + Seek> ArchiveFormat for ZipArchive<R> {
    fn extract(&mut self, target: &Path, config: &InstallConfig) -> Result<ExtractionOutcome> {
        let mut writer = EntryWriter::new(target, config)?;

        for index in 0..self.archive.len() {
            let (name, size, mode, kind) = {
                let raw = self.archive.by_index_raw(index).map_err(|e| {
                    InstallError::InvalidArchive(format!("failed to read ZIP entry {index}: {e}"))
                })?;
                let mode = raw.unix_mode();
                (
                    raw.name().to_owned(),
                    raw.size(),
                    mode,
                    convert_zip_entry_type(raw.is_dir(), mode),
                )
            };

            match kind {
                EntryKind::Directory => writer.write_directory(&name, mode)?,
                EntryKind::File => {
                    if let Some(plan) = writer.plan_file(&name, size)? {
                        let mut file = self.archive.by_index(index).map_err(|e| {
                            InstallError::InvalidArchive(format!(
                                "failed to read ZIP entry {name}: {e}"
                            ))
                        })?;
                        writer.write_file(plan, mode, &mut file)?;
                    }
                }
                other => return Err(writer.reject(&name, other)),
            }
        }

        Ok(writer.finish())
    }

    fn format_name(&self) -> &'static str {
        "zip"
    }
}

fn convert_zip_entry_type(is_dir: bool, mode: Option<u32>) -> EntryKind {
    if is_dir {
        return EntryKind::Directory;
    }
    match mode.map(|m| m & S_IFMT) {
        None | Some(0 | S_IFREG) => EntryKind::File,
        Some(S_IFDIR) => EntryKind::Directory,
        Some(S_IFLNK) => EntryKind::Symlink,
        Some(_) => EntryKind::Other("special file"),
    }
}
