//! Uniform file listing over both sources, and lazy content reads.

use std::io::ErrorKind;

use podsync_transfer::base_name;

use crate::browser::{browser_files_to_entries, filter_nested_files};
use crate::error::DirectoryError;
use crate::scanner::scan_native_files;
use crate::types::{ContentHandle, FileEntry, FileSource, UploadDirectoryOptions};

/// Lists the files of `source`, applying the recursion and dotfile options.
///
/// Fails as a whole: no partial list is ever returned.
pub fn enumerate_files(
    source: &FileSource,
    options: &UploadDirectoryOptions,
) -> Result<Vec<FileEntry>, DirectoryError> {
    let mut files = match source {
        FileSource::Native(root) => scan_native_files(root, options.recursive)?,
        FileSource::Browser(selection) => {
            let files = browser_files_to_entries(selection)?;
            if options.recursive {
                files
            } else {
                filter_nested_files(files)
            }
        }
    };

    if options.exclude_dot_files {
        files = filter_dot_files(files);
    }

    Ok(files)
}

/// Drops entries whose file name starts with `.`.
pub fn filter_dot_files(files: Vec<FileEntry>) -> Vec<FileEntry> {
    files
        .into_iter()
        .filter(|f| !base_name(&f.relative_path).starts_with('.'))
        .collect()
}

/// Reads the bytes behind an entry.
///
/// A native file that disappeared since enumeration is reported as
/// [`DirectoryError::PathNotFound`].
pub async fn read_content(entry: &FileEntry) -> Result<Vec<u8>, DirectoryError> {
    match &entry.handle {
        ContentHandle::Native(path) => tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                DirectoryError::PathNotFound(format!("file does not exist: {}", path.display()))
            } else {
                DirectoryError::Io(e)
            }
        }),
        ContentHandle::Browser(file) => file.read_bytes().await,
    }
}
