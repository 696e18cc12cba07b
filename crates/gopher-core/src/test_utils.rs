//! Test utilities for building toolchain archives in memory.
//!
//! The builders write headers directly, so they can produce archives that
//! well-behaved writers refuse to: entry names with `..`, absolute names,
//! and tar headers whose declared size disagrees with the stored content.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::platform::TargetPlatform;

#[derive(Debug, Clone)]
enum Item {
    Directory { name: String, mode: u32 },
    File { name: String, data: Vec<u8>, mode: u32 },
    Raw { name: String, declared: u64, data: Vec<u8> },
    Symlink { name: String, target: String },
    Hardlink { name: String, target: String },
}

/// Builder for Go-style toolchain archives.
///
/// The same entry list can be rendered as tar+gzip or zip.
///
/// # Examples
///
/// ```
/// use gopher_core::platform::TargetPlatform;
/// use gopher_core::test_utils::GoArchiveBuilder;
///
/// let tar_gz = GoArchiveBuilder::new()
///     .add_directory("go/")
///     .add_file("go/VERSION", b"go1.22.1")
///     .add_go_binary(&TargetPlatform::current())
///     .build_tar_gz();
/// assert!(!tar_gz.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GoArchiveBuilder {
    entries: Vec<Item>,
}

impl GoArchiveBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder holding a minimal valid toolchain for `platform`.
    #[must_use]
    pub fn minimal(platform: &TargetPlatform, version: &str) -> Self {
        Self::new()
            .add_directory("go/")
            .add_directory("go/bin/")
            .add_file("go/VERSION", version.as_bytes())
            .add_go_binary(platform)
    }

    /// Adds a directory with mode 0o755.
    #[must_use]
    pub fn add_directory(self, name: &str) -> Self {
        self.add_directory_with_mode(name, 0o755)
    }

    /// Adds a directory with a custom mode.
    #[must_use]
    pub fn add_directory_with_mode(mut self, name: &str, mode: u32) -> Self {
        self.entries.push(Item::Directory {
            name: name.to_string(),
            mode,
        });
        self
    }

    /// Adds a regular file with mode 0o644.
    #[must_use]
    pub fn add_file(self, name: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(name, data, 0o644)
    }

    /// Adds a regular file with a custom mode.
    #[must_use]
    pub fn add_file_with_mode(mut self, name: &str, data: &[u8], mode: u32) -> Self {
        self.entries.push(Item::File {
            name: name.to_string(),
            data: data.to_vec(),
            mode,
        });
        self
    }

    /// Adds the runnable `go` binary for `platform` under the `go/` prefix.
    #[must_use]
    pub fn add_go_binary(self, platform: &TargetPlatform) -> Self {
        let name = format!("go/{}", platform.go_binary_entry());
        self.add_file_with_mode(&name, b"\x7fELF go toolchain", 0o755)
    }

    /// Adds a tar file entry whose header declares `declared` bytes while
    /// `data` is stored. Zip output stores `data` with its real size.
    #[must_use]
    pub fn add_raw_file(mut self, name: &str, declared: u64, data: &[u8]) -> Self {
        self.entries.push(Item::Raw {
            name: name.to_string(),
            declared,
            data: data.to_vec(),
        });
        self
    }

    /// Adds a symbolic link.
    #[must_use]
    pub fn add_symlink(mut self, name: &str, target: &str) -> Self {
        self.entries.push(Item::Symlink {
            name: name.to_string(),
            target: target.to_string(),
        });
        self
    }

    /// Adds a hard link (tar output only).
    #[must_use]
    pub fn add_hardlink(mut self, name: &str, target: &str) -> Self {
        self.entries.push(Item::Hardlink {
            name: name.to_string(),
            target: target.to_string(),
        });
        self
    }

    /// Renders the entries as an uncompressed tar stream.
    #[must_use]
    pub fn build_tar(&self) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());

        for item in &self.entries {
            let mut header = tar::Header::new_gnu();
            match item {
                Item::Directory { name, mode } => {
                    set_raw_name(&mut header, name);
                    header.set_entry_type(tar::EntryType::Directory);
                    header.set_size(0);
                    header.set_mode(*mode);
                    header.set_cksum();
                    builder.append(&header, std::io::empty()).unwrap();
                }
                Item::File { name, data, mode } => {
                    set_raw_name(&mut header, name);
                    header.set_size(data.len() as u64);
                    header.set_mode(*mode);
                    header.set_cksum();
                    builder.append(&header, data.as_slice()).unwrap();
                }
                Item::Raw {
                    name,
                    declared,
                    data,
                } => {
                    set_raw_name(&mut header, name);
                    header.set_size(*declared);
                    header.set_mode(0o644);
                    header.set_cksum();
                    builder.append(&header, data.as_slice()).unwrap();
                }
                Item::Symlink { name, target } | Item::Hardlink { name, target } => {
                    let kind = if matches!(item, Item::Symlink { .. }) {
                        tar::EntryType::Symlink
                    } else {
                        tar::EntryType::Link
                    };
                    set_raw_name(&mut header, name);
                    header.set_entry_type(kind);
                    header.set_size(0);
                    header.set_mode(0o777);
                    header.set_link_name(target).unwrap();
                    header.set_cksum();
                    builder.append(&header, std::io::empty()).unwrap();
                }
            }
        }

        builder.into_inner().unwrap()
    }

    /// Renders the entries as a tar+gzip stream.
    #[must_use]
    pub fn build_tar_gz(&self) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.build_tar()).unwrap();
        encoder.finish().unwrap()
    }

    /// Renders the entries as a zip archive.
    ///
    /// Hard links have no zip representation and are skipped.
    #[must_use]
    pub fn build_zip(&self) -> Vec<u8> {
        use zip::write::SimpleFileOptions;

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let deflated =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for item in &self.entries {
            match item {
                Item::Directory { name, mode } => {
                    zip.add_directory(name.as_str(), deflated.unix_permissions(*mode))
                        .unwrap();
                }
                Item::File { name, data, mode } => {
                    zip.start_file(name.as_str(), deflated.unix_permissions(*mode))
                        .unwrap();
                    zip.write_all(data).unwrap();
                }
                Item::Raw { name, data, .. } => {
                    zip.start_file(name.as_str(), deflated.unix_permissions(0o644))
                        .unwrap();
                    zip.write_all(data).unwrap();
                }
                Item::Symlink { name, target } => {
                    zip.add_symlink(name.as_str(), target.as_str(), deflated)
                        .unwrap();
                }
                Item::Hardlink { .. } => {}
            }
        }

        zip.finish().unwrap().into_inner()
    }
}

/// Writes `name` into the header without the validation `set_path` does.
fn set_raw_name(header: &mut tar::Header, name: &str) {
    let bytes = name.as_bytes();
    let field = &mut header.as_old_mut().name;
    assert!(bytes.len() <= field.len(), "test entry name too long: {name}");
    field.fill(0);
    field[..bytes.len()].copy_from_slice(bytes);
}
