//! Archive format implementations.

pub(crate) mod common;
pub mod detect;
pub mod tar;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use detect::ArchiveType;
pub use detect::InstallerKind;
pub use tar::TarGzArchive;
pub use traits::ArchiveFormat;
pub use zip::ZipArchive;
