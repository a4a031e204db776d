//! Remote collaborator traits.
//!
//! The host implements these on top of its storage network client. Using
//! traits keeps upload logic decoupled from transport and testable with mocks.
//!
//! Returned futures may only borrow `self`; implementations copy whatever
//! they need from the other arguments before boxing the future.

use std::future::Future;
use std::pin::Pin;

use podsync_protocol::{CreateOutcome, DirectoryItem, PodContext, ServiceError, UploadOptions};

use crate::error::DirectoryError;

/// Boxed `Send` future, the return type of every collaborator call.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The logged-in account.
pub trait AccountSession: Send + Sync {
    /// Fails with [`DirectoryError::Authorization`] if the account cannot write.
    fn assert_writable(&self) -> Result<(), DirectoryError>;

    /// Opens the named pod and returns what directory calls need to access it.
    fn open_pod(&self, pod_name: &str) -> BoxFuture<'_, Result<PodContext, ServiceError>>;
}

/// Remote directory lifecycle.
pub trait DirectoryService: Send + Sync {
    /// Creates one directory. An existing directory is reported as
    /// [`CreateOutcome::AlreadyExists`], not as an error.
    fn create_directory(
        &self,
        path: &str,
        pod: &PodContext,
    ) -> BoxFuture<'_, Result<CreateOutcome, ServiceError>>;

    /// Removes one directory.
    fn remove_directory(&self, path: &str, pod: &PodContext)
    -> BoxFuture<'_, Result<(), ServiceError>>;

    /// Lists a directory, descending into children when `recursive` is set.
    fn list_directory(
        &self,
        path: &str,
        pod: &PodContext,
        recursive: bool,
    ) -> BoxFuture<'_, Result<DirectoryItem, ServiceError>>;
}

/// Remote file content storage.
pub trait ContentService: Send + Sync {
    /// Stores `data` at the absolute pod path `path`, replacing any previous content.
    fn upload_content(
        &self,
        path: &str,
        data: Vec<u8>,
        pod: &PodContext,
        options: &UploadOptions,
    ) -> BoxFuture<'_, Result<(), ServiceError>>;
}
