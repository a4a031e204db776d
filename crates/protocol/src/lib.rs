//! Types shared between the directory sync engine and the remote pod services.
//!
//! Nothing in here talks to the network. The remote directory and content
//! services are implemented elsewhere; these are the values that cross that
//! boundary.

mod error;
mod types;

pub use error::ServiceError;
pub use types::{
    ALREADY_LISTED_MESSAGE, CreateOutcome, DirectoryItem, FileItem, PodContext, UploadOptions,
};
