//! Type-safe wrappers for installation paths and archive entries.
//!
//! [`ContainedPath`] cannot be created from raw types without going through
//! the containment check; no `From<PathBuf>` implementation exists.

pub mod contained_path;
pub mod entry_kind;

pub use contained_path::ContainedPath;
pub use entry_kind::EntryKind;
