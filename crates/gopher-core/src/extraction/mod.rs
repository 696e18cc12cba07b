//! Archive extraction into staging directories.

pub mod atomic;
pub mod engine;
pub mod layout;

pub use atomic::StagingDir;
pub use engine::ExtractionEngine;
pub use engine::extract_archive;
pub use layout::ExtractionOutcome;
pub use layout::LayoutCheck;
