//! Data types for the directory upload flow.

use std::path::PathBuf;
use std::sync::Arc;

use podsync_protocol::UploadOptions;
use serde::{Deserialize, Serialize};

use crate::browser::BrowserFile;

/// Where a file to upload comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOrigin {
    Native,
    Browser,
}

/// Capability of the runtime the client is embedded in.
///
/// Injected at construction so either runtime can be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Native filesystem access, no browser file selection.
    Native,
    /// Browser file selection, no native filesystem.
    Browser,
}

impl Environment {
    /// The environment this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Browser
        } else {
            Self::Native
        }
    }

    /// Whether files of `origin` can be read here.
    pub fn supports(self, origin: FileOrigin) -> bool {
        matches!(
            (self, origin),
            (Self::Native, FileOrigin::Native) | (Self::Browser, FileOrigin::Browser)
        )
    }
}

/// The tree to upload.
#[derive(Clone)]
pub enum FileSource {
    /// Root directory on the native filesystem.
    Native(PathBuf),
    /// Flat browser selection; every file carries `base/...` as relative path.
    Browser(Vec<Arc<dyn BrowserFile>>),
}

impl FileSource {
    pub fn native(root: impl Into<PathBuf>) -> Self {
        Self::Native(root.into())
    }

    pub fn browser(files: Vec<Arc<dyn BrowserFile>>) -> Self {
        Self::Browser(files)
    }

    pub fn origin(&self) -> FileOrigin {
        match self {
            Self::Native(_) => FileOrigin::Native,
            Self::Browser(_) => FileOrigin::Browser,
        }
    }
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native(root) => f.debug_tuple("Native").field(root).finish(),
            Self::Browser(files) => f
                .debug_struct("Browser")
                .field("files", &files.len())
                .finish(),
        }
    }
}

/// Lazy read handle for one file's bytes.
#[derive(Clone)]
pub enum ContentHandle {
    Native(PathBuf),
    Browser(Arc<dyn BrowserFile>),
}

impl std::fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native(path) => f.debug_tuple("Native").field(path).finish(),
            Self::Browser(file) => f.debug_tuple("Browser").field(&file.name()).finish(),
        }
    }
}

/// One file to upload, independent of where it came from.
///
/// `relative_path_with_base` is always `<base>/<relative_path>`, where
/// `<base>` is the name of the uploaded root directory.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Absolute local path. Empty for browser files.
    pub full_path: String,
    /// Path below the upload root, e.g. `sub/file.txt`.
    pub relative_path: String,
    /// Same path with the root's own name first, e.g. `photos/sub/file.txt`.
    pub relative_path_with_base: String,
    pub handle: ContentHandle,
}

impl FileEntry {
    pub fn origin(&self) -> FileOrigin {
        match self.handle {
            ContentHandle::Native(_) => FileOrigin::Native,
            ContentHandle::Browser(_) => FileOrigin::Browser,
        }
    }

    /// The relative path used for planning and uploading.
    pub fn relative_path_for(&self, include_directory_name: bool) -> &str {
        if include_directory_name {
            &self.relative_path_with_base
        } else {
            &self.relative_path
        }
    }

    /// Absolute remote path the file is uploaded to.
    pub fn upload_path(&self, include_directory_name: bool) -> String {
        format!("/{}", self.relative_path_for(include_directory_name))
    }
}

/// Options for uploading a directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadDirectoryOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Skip files whose name starts with `.`.
    pub exclude_dot_files: bool,
    /// Keep the root directory's own name as the first remote segment.
    pub include_directory_name: bool,
    /// Forwarded to the content service for every file.
    pub upload_options: UploadOptions,
}

impl Default for UploadDirectoryOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            exclude_dot_files: false,
            include_directory_name: true,
            upload_options: UploadOptions::default(),
        }
    }
}

/// Counters for one finished upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub directories_created: usize,
    pub directories_existing: usize,
    pub files_uploaded: usize,
    pub bytes_uploaded: u64,
}

/// Progress event emitted during an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    DirectoryCreated { path: String },
    /// The directory was already present and was left untouched.
    DirectoryExists { path: String },
    FileUploaded {
        path: String,
        size: u64,
        /// SHA-256 hex digest of the uploaded bytes.
        checksum: String,
    },
    Completed(UploadSummary),
    /// The upload stopped; nothing after the failing step was attempted.
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(relative: &str, with_base: &str) -> FileEntry {
        FileEntry {
            full_path: String::new(),
            relative_path: relative.into(),
            relative_path_with_base: with_base.into(),
            handle: ContentHandle::Native(PathBuf::from("/tmp/x")),
        }
    }

    #[test]
    fn upload_path_follows_root_name_inclusion() {
        let e = entry("sub/file.txt", "photos/sub/file.txt");
        assert_eq!(e.upload_path(true), "/photos/sub/file.txt");
        assert_eq!(e.upload_path(false), "/sub/file.txt");
    }

    #[test]
    fn options_defaults() {
        let opts = UploadDirectoryOptions::default();
        assert!(opts.recursive);
        assert!(!opts.exclude_dot_files);
        assert!(opts.include_directory_name);
    }

    #[test]
    fn options_partial_json_keeps_defaults() {
        let opts: UploadDirectoryOptions =
            serde_json::from_str(r#"{"excludeDotFiles":true}"#).unwrap();
        assert!(opts.recursive);
        assert!(opts.exclude_dot_files);
        assert!(opts.include_directory_name);
    }

    #[test]
    fn environment_capabilities() {
        assert!(Environment::Native.supports(FileOrigin::Native));
        assert!(!Environment::Native.supports(FileOrigin::Browser));
        assert!(Environment::Browser.supports(FileOrigin::Browser));
        assert!(!Environment::Browser.supports(FileOrigin::Native));
    }
}
