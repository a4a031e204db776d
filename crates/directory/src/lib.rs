//! Pod directory upload: enumerate, plan, create, upload.
//!
//! This crate holds the **business logic** for mirroring a local file tree
//! into a pod. It has no transport dependencies: the host provides
//! [`AccountSession`], [`DirectoryService`] and [`ContentService`]
//! implementations that bridge to the actual storage network client.
//!
//! # Pipeline
//!
//! 1. **Authorize**: the session must be able to write
//! 2. **Enumerate**: walk a native directory or read a browser selection
//! 3. **Plan**: collect every intermediate remote directory
//! 4. **Create**: create planned directories, parents first, tolerating existing ones
//! 5. **Upload**: read each file lazily and send its bytes

pub mod browser;
pub mod client;
pub mod error;
pub mod files;
pub mod scanner;
pub mod service;
pub mod types;

// Re-export primary types for convenience.
pub use browser::{BrowserFile, MemoryFile, browser_files_to_entries, filter_nested_files};
pub use client::DirectoryClient;
pub use error::DirectoryError;
pub use files::{enumerate_files, filter_dot_files, read_content};
pub use scanner::scan_native_files;
pub use service::{AccountSession, BoxFuture, ContentService, DirectoryService};
pub use types::{
    ContentHandle, Environment, FileEntry, FileOrigin, FileSource, UploadDirectoryOptions,
    UploadEvent, UploadSummary,
};
