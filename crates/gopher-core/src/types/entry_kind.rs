//! Archive entry kind classification.

/// Kind of an entry in a toolchain archive.
///
/// Only [`EntryKind::File`] and [`EntryKind::Directory`] are ever written to
/// disk. Every other kind is classified so that the rejection can name it.
///
/// # Examples
///
/// ```
/// use gopher_core::types::EntryKind;
///
/// assert_eq!(EntryKind::Symlink.as_str(), "symlink");
/// assert_eq!(EntryKind::Hardlink.as_str(), "hardlink");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file entry.
    File,

    /// Directory entry.
    Directory,

    /// Symbolic link entry.
    Symlink,

    /// Hard link entry.
    Hardlink,

    /// Any other kind (device node, fifo, socket, ...).
    Other(&'static str),
}

impl EntryKind {
    /// Short description used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Hardlink => "hardlink",
            Self::Other(kind) => kind,
        }
    }
}
