//! Secure extraction and installation of Go toolchain archives.
//!
//! `gopher-core` installs downloaded toolchain archives (tar.gz, zip) into
//! per-version directories below an install root. Archive contents and
//! entry names are treated as untrusted:
//!
//! - every path derived from an entry name is proven to stay inside the
//!   extraction target before anything is written,
//! - declared entry sizes are checked against configurable ceilings before
//!   any content is decompressed,
//! - symlinks, hardlinks, and device entries are refused,
//! - extraction happens in a hidden staging directory that is renamed into
//!   place only after the tree has been verified.
//!
//! # Examples
//!
//! ```no_run
//! use gopher_core::InstallConfig;
//! use gopher_core::Installer;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let installer = Installer::new("/opt/gopher", InstallConfig::default())?;
//! let report = installer.install("1.22.1", Path::new("go1.22.1.linux-amd64.tar.gz"))?;
//! println!(
//!     "Installed {} files into {}",
//!     report.extraction.files_extracted,
//!     report.install_dir.display()
//! );
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod installer;
pub mod metadata;
pub mod platform;
pub mod report;
pub mod security;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use config::InstallConfig;
pub use error::InstallError;
pub use error::InstallStep;
pub use error::QuotaResource;
pub use error::Result;
pub use error::SecurityError;
pub use installer::Installer;
pub use platform::TargetPlatform;
pub use report::ExtractionReport;
pub use report::InstallProgress;
pub use report::InstallReport;
pub use report::NoopProgress;

// Re-export types module for easier access
pub use types::ContainedPath;
pub use types::EntryKind;
