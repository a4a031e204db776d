//! Remote path handling for pod directory uploads.
//!
//! Every path handed to the remote directory API is built here, so malformed
//! input is caught before anything leaves the process.

mod checksum;
pub mod path;
mod planner;
mod validation;

pub use checksum::checksum_bytes;
pub use path::{
    PathInfo, ROOT, assert_non_root_parts, base_name, combine, extract_path_info,
    get_path_from_parts, get_path_parts, split_path,
};
pub use planner::{DirectoryPlan, compute_plan};
pub use validation::{MAX_DIRECTORY_NAME_LENGTH, validate_directory_name, validate_relative_path};

/// Errors produced while parsing or validating remote paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("operation not allowed on the root directory")]
    RootOperation,

    #[error("invalid name: {0}")]
    InvalidName(String),
}
