//! Directory operation error types.

use podsync_protocol::ServiceError;
use podsync_transfer::PathError;

/// Errors produced by pod directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("environment mismatch: {0}")]
    EnvironmentMismatch(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not authorized: {0}")]
    Authorization(String),

    #[error("failed to create directory {path}: {source}")]
    DirectoryCreation { path: String, source: ServiceError },

    #[error("failed to upload {path}: {source}")]
    Upload { path: String, source: ServiceError },

    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
