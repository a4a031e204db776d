//! Browser file selection.
//!
//! A directory picked in a browser arrives as a flat list of files, each
//! carrying a vendor relative path that starts with the picked directory's
//! name (`photos/2024/beach.jpg`). The list is always recursive.

use std::sync::Arc;

use podsync_transfer::{base_name, validate_relative_path};

use crate::error::DirectoryError;
use crate::service::BoxFuture;
use crate::types::{ContentHandle, FileEntry};

/// A file handle from a browser selection.
pub trait BrowserFile: Send + Sync {
    /// File name without any directory.
    fn name(&self) -> &str;

    /// Relative path including the selected root's name, if the browser provided one.
    fn relative_path(&self) -> Option<&str>;

    /// Reads the whole file.
    fn read_bytes(&self) -> BoxFuture<'_, Result<Vec<u8>, DirectoryError>>;
}

/// A browser file held in memory.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    relative_path: Option<String>,
    data: Vec<u8>,
}

impl MemoryFile {
    /// Creates a file whose name is the last segment of `relative_path`.
    pub fn new(relative_path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let relative_path = relative_path.into();
        Self {
            name: base_name(&relative_path).to_string(),
            relative_path: Some(relative_path),
            data: data.into(),
        }
    }

    /// Creates a file picked on its own, without a relative path.
    pub fn detached(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            relative_path: None,
            data: data.into(),
        }
    }
}

impl BrowserFile for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref()
    }

    fn read_bytes(&self) -> BoxFuture<'_, Result<Vec<u8>, DirectoryError>> {
        Box::pin(async move { Ok(self.data.clone()) })
    }
}

/// Converts a browser selection into file entries.
///
/// Every file must carry a relative path of the form `<base>/<path>` and
/// all files must share the same `<base>`. Anything else fails the whole
/// selection.
pub fn browser_files_to_entries(
    files: &[Arc<dyn BrowserFile>],
) -> Result<Vec<FileEntry>, DirectoryError> {
    let mut entries = Vec::with_capacity(files.len());
    let mut selection_base: Option<String> = None;

    for file in files {
        let with_base = file.relative_path().ok_or_else(|| {
            DirectoryError::InvalidInput(format!("{} has no relative path", file.name()))
        })?;

        let (base, relative_path) = match with_base.split_once('/') {
            Some((base, rest)) if !base.is_empty() => (base, rest),
            _ => {
                return Err(DirectoryError::InvalidInput(format!(
                    "relative path has no base directory: {with_base:?}"
                )));
            }
        };

        let expected = selection_base.get_or_insert_with(|| base.to_string());
        if expected.as_str() != base {
            return Err(DirectoryError::InvalidInput(format!(
                "{with_base:?} is outside the selected directory {expected:?}"
            )));
        }

        validate_relative_path(relative_path)
            .map_err(|e| DirectoryError::InvalidInput(e.to_string()))?;

        entries.push(FileEntry {
            full_path: String::new(),
            relative_path: relative_path.to_string(),
            relative_path_with_base: with_base.to_string(),
            handle: ContentHandle::Browser(Arc::clone(file)),
        });
    }

    Ok(entries)
}

/// Drops entries nested below the selected directory's first level.
///
/// Browsers always return the full recursive listing, so a non-recursive
/// upload is emulated by filtering afterwards.
pub fn filter_nested_files(files: Vec<FileEntry>) -> Vec<FileEntry> {
    files
        .into_iter()
        .filter(|f| !f.relative_path.contains('/'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(paths: &[&str]) -> Vec<Arc<dyn BrowserFile>> {
        paths
            .iter()
            .map(|p| Arc::new(MemoryFile::new(*p, p.as_bytes())) as Arc<dyn BrowserFile>)
            .collect()
    }

    #[test]
    fn strips_base_from_relative_path() {
        let entries = browser_files_to_entries(&selection(&["base/x.txt", "base/sub/y.txt"]))
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].relative_path, "x.txt");
        assert_eq!(entries[0].relative_path_with_base, "base/x.txt");
        assert_eq!(entries[1].relative_path, "sub/y.txt");
        assert!(entries.iter().all(|e| e.full_path.is_empty()));
    }

    #[test]
    fn empty_selection_is_empty() {
        assert!(browser_files_to_entries(&[]).unwrap().is_empty());
    }

    #[test]
    fn missing_relative_path_rejected() {
        let files: Vec<Arc<dyn BrowserFile>> = vec![
            Arc::new(MemoryFile::new("base/a.txt", "a")),
            Arc::new(MemoryFile::detached("b.txt", "b")),
        ];
        assert!(matches!(
            browser_files_to_entries(&files),
            Err(DirectoryError::InvalidInput(_))
        ));
    }

    #[test]
    fn path_without_base_rejected() {
        for bad in ["file.txt", "/file.txt"] {
            assert!(matches!(
                browser_files_to_entries(&selection(&[bad])),
                Err(DirectoryError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn mixed_bases_rejected() {
        let result = browser_files_to_entries(&selection(&["one/a.txt", "two/b.txt"]));
        assert!(matches!(result, Err(DirectoryError::InvalidInput(_))));
    }

    #[test]
    fn traversal_segments_rejected() {
        let result = browser_files_to_entries(&selection(&["base/../escape.txt"]));
        assert!(matches!(result, Err(DirectoryError::InvalidInput(_))));
    }

    #[test]
    fn nested_filter_keeps_first_level_only() {
        let entries = browser_files_to_entries(&selection(&[
            "base/x.txt",
            "base/sub/y.txt",
            "base/z.txt",
        ]))
        .unwrap();
        let kept = filter_nested_files(entries);

        let paths: Vec<&str> = kept.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(paths, ["x.txt", "z.txt"]);
    }

    #[tokio::test]
    async fn memory_file_reads_bytes() {
        let file = MemoryFile::new("base/a.txt", b"hello".to_vec());
        assert_eq!(file.name(), "a.txt");
        assert_eq!(file.read_bytes().await.unwrap(), b"hello");
    }
}
