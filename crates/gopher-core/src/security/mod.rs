//! Security validation modules.

pub mod path;
pub mod permissions;
pub mod quota;

// Re-export public types and functions
pub use path::clean_path;
pub use path::sanitize_path;
pub use path::validate_directory_path;
pub use path::validate_path;
pub use path::validate_path_within_root;
pub use permissions::mask_mode;
pub use quota::QuotaTracker;
