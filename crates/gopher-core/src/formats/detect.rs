//! Archive format detection.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::InstallError;
use crate::Result;

/// Gzip stream magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Zip local file header signature.
const ZIP_MAGIC: [u8; 4] = *b"PK\x03\x04";

/// Zip end-of-central-directory signature (empty archive).
const ZIP_EMPTY_MAGIC: [u8; 4] = *b"PK\x05\x06";

/// OLE compound document signature used by Windows Installer packages.
const MSI_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Xar signature used by macOS installer packages.
const PKG_MAGIC: [u8; 4] = *b"xar!";

/// Platform installer packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallerKind {
    /// Windows Installer package (`.msi`).
    Msi,
    /// macOS installer package (`.pkg`).
    Pkg,
}

impl InstallerKind {
    /// Human-readable format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Msi => "MSI",
            Self::Pkg => "macOS pkg",
        }
    }
}

/// Archive formats a toolchain may be distributed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    /// Gzip-compressed tar archive.
    TarGz,
    /// ZIP archive.
    Zip,
    /// Platform installer package; recognized but never extracted.
    Installer(InstallerKind),
}

impl ArchiveType {
    /// Detects the archive type of the file at `path`.
    ///
    /// The file name is consulted first (`.tar.gz`, `.tgz`, `.zip`, `.msi`,
    /// `.pkg`, case-insensitive). If it is inconclusive, the leading bytes
    /// of the file are matched against known container signatures.
    ///
    /// # Errors
    ///
    /// Returns `InstallError::UnsupportedFormat` if neither the name nor the
    /// content identify a known format, or an I/O error if the content has to
    /// be read and cannot be.
    pub fn detect(path: &Path) -> Result<Self> {
        if let Some(kind) = Self::from_file_name(path) {
            return Ok(kind);
        }

        let mut file = File::open(path).map_err(|e| InstallError::io("open", path, e))?;
        let mut head = [0u8; 8];
        let len = read_head(&mut file, &mut head).map_err(|e| InstallError::io("read", path, e))?;

        Self::from_magic(&head[..len]).ok_or_else(|| InstallError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }

    /// Detects the archive type from the file name alone.
    #[must_use]
    pub fn from_file_name(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".msi") {
            Some(Self::Installer(InstallerKind::Msi))
        } else if name.ends_with(".pkg") {
            Some(Self::Installer(InstallerKind::Pkg))
        } else {
            None
        }
    }

    /// Detects the archive type from the leading bytes of its content.
    #[must_use]
    pub fn from_magic(head: &[u8]) -> Option<Self> {
        if head.starts_with(&GZIP_MAGIC) {
            Some(Self::TarGz)
        } else if head.starts_with(&ZIP_MAGIC) || head.starts_with(&ZIP_EMPTY_MAGIC) {
            Some(Self::Zip)
        } else if head.starts_with(&MSI_MAGIC) {
            Some(Self::Installer(InstallerKind::Msi))
        } else if head.starts_with(&PKG_MAGIC) {
            Some(Self::Installer(InstallerKind::Pkg))
        } else {
            None
        }
    }
}

impl fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TarGz => f.write_str("tar.gz"),
            Self::Zip => f.write_str("zip"),
            Self::Installer(kind) => f.write_str(kind.name()),
        }
    }
}

/// Reads up to `buf.len()` bytes, stopping early only at end of file.
fn read_head<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_tar_gz() {
        let path = PathBuf::from("go1.22.1.linux-amd64.tar.gz");
        assert_eq!(ArchiveType::from_file_name(&path), Some(ArchiveType::TarGz));

        let path2 = PathBuf::from("archive.TGZ");
        assert_eq!(ArchiveType::from_file_name(&path2), Some(ArchiveType::TarGz));
    }

    #[test]
    fn test_detect_zip() {
        let path = PathBuf::from("go1.22.1.windows-amd64.zip");
        assert_eq!(ArchiveType::from_file_name(&path), Some(ArchiveType::Zip));
    }

    #[test]
    fn test_detect_installers() {
        assert_eq!(
            ArchiveType::from_file_name(Path::new("go1.21.0.windows-amd64.msi")),
            Some(ArchiveType::Installer(InstallerKind::Msi))
        );
        assert_eq!(
            ArchiveType::from_file_name(Path::new("go1.21.0.darwin-arm64.pkg")),
            Some(ArchiveType::Installer(InstallerKind::Pkg))
        );
    }

    #[test]
    fn test_plain_gz_is_not_tar() {
        assert_eq!(ArchiveType::from_file_name(Path::new("notes.gz")), None);
    }

    #[test]
    fn test_magic_bytes() {
        assert_eq!(
            ArchiveType::from_magic(&[0x1F, 0x8B, 0x08, 0x00]),
            Some(ArchiveType::TarGz)
        );
        assert_eq!(ArchiveType::from_magic(b"PK\x03\x04rest"), Some(ArchiveType::Zip));
        assert_eq!(ArchiveType::from_magic(b"PK\x05\x06"), Some(ArchiveType::Zip));
        assert_eq!(
            ArchiveType::from_magic(&MSI_MAGIC),
            Some(ArchiveType::Installer(InstallerKind::Msi))
        );
        assert_eq!(
            ArchiveType::from_magic(b"xar!\x00\x1c"),
            Some(ArchiveType::Installer(InstallerKind::Pkg))
        );
        assert_eq!(ArchiveType::from_magic(b"Rar!"), None);
        assert_eq!(ArchiveType::from_magic(&[]), None);
    }

    #[test]
    fn test_detect_falls_back_to_content() {
        let mut file = NamedTempFile::with_suffix(".download").unwrap();
        file.write_all(&[0x1F, 0x8B, 0x08, 0x00, 0x00]).unwrap();
        file.flush().unwrap();

        assert_eq!(ArchiveType::detect(file.path()).unwrap(), ArchiveType::TarGz);
    }

    #[test]
    fn test_detect_unsupported() {
        let mut file = NamedTempFile::with_suffix(".rar").unwrap();
        file.write_all(b"Rar!\x1a\x07\x00").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            ArchiveType::detect(file.path()),
            Err(InstallError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ArchiveType::TarGz.to_string(), "tar.gz");
        assert_eq!(ArchiveType::Installer(InstallerKind::Msi).to_string(), "MSI");
    }
}
