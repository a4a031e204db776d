//! Native filesystem enumeration.
//!
//! Walks a directory and produces file entries with relative paths
//! normalized to forward slashes.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::DirectoryError;
use crate::types::{ContentHandle, FileEntry};

/// Lists the files under `root` for upload.
///
/// With `recursive == false` only the immediate file children of `root` are
/// returned; subdirectories are ignored. Entries of each directory are
/// visited in file-name order. Symlinks are neither followed nor listed.
pub fn scan_native_files(root: &Path, recursive: bool) -> Result<Vec<FileEntry>, DirectoryError> {
    if !root.exists() {
        return Err(DirectoryError::PathNotFound(format!(
            "directory does not exist: {}",
            root.display()
        )));
    }

    if !root.is_dir() {
        return Err(DirectoryError::InvalidInput(format!(
            "not a directory: {}",
            root.display()
        )));
    }

    let root = std::path::absolute(root)?;
    let base = root_base_name(&root)?;

    let mut paths = Vec::new();
    walk_dir(&root, recursive, &mut paths)?;

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let rel_path = path.strip_prefix(&root).map_err(std::io::Error::other)?;
        let relative_path = join_components(rel_path)?;

        files.push(FileEntry {
            full_path: path.to_string_lossy().into_owned(),
            relative_path_with_base: format!("{base}/{relative_path}"),
            relative_path,
            handle: ContentHandle::Native(path),
        });
    }

    debug!(root = %root.display(), files = files.len(), recursive, "scan complete");

    Ok(files)
}

fn walk_dir(current: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> Result<(), DirectoryError> {
    let mut entries = std::fs::read_dir(current)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if recursive {
                walk_dir(&path, true, files)?;
            }
        } else if file_type.is_file() {
            files.push(path);
        }
    }

    Ok(())
}

/// Joins the components of `rel_path` with `/`.
///
/// Names are kept verbatim: on Unix a `\` inside a file name stays part of
/// that name. Names that are not valid UTF-8 are rejected.
fn join_components(rel_path: &Path) -> Result<String, DirectoryError> {
    let mut segments = Vec::new();

    for component in rel_path.components() {
        let Component::Normal(name) = component else {
            return Err(DirectoryError::InvalidInput(format!(
                "unexpected path component in {}",
                rel_path.display()
            )));
        };
        let name = name.to_str().ok_or_else(|| {
            DirectoryError::InvalidInput(format!(
                "file name is not valid UTF-8: {}",
                rel_path.display()
            ))
        })?;
        segments.push(name);
    }

    Ok(segments.join("/"))
}

/// Name of the upload root, falling back to the canonical path for `..`.
fn root_base_name(root: &Path) -> Result<String, DirectoryError> {
    let name = match root.file_name() {
        Some(name) => Some(name.to_owned()),
        None => std::fs::canonicalize(root)?.file_name().map(|n| n.to_owned()),
    };

    name.and_then(|n| n.to_str().map(str::to_owned))
        .ok_or_else(|| {
            DirectoryError::InvalidInput(format!(
                "cannot determine directory name of {}",
                root.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("photos");

        fs::create_dir_all(root.join("2024").join("summer")).unwrap();
        fs::write(root.join("cover.jpg"), b"COVER").unwrap();
        fs::write(root.join(".index"), b"IDX").unwrap();
        fs::write(root.join("2024").join("notes.txt"), b"NOTES").unwrap();
        fs::write(root.join("2024").join("summer").join("beach.jpg"), b"BEACH").unwrap();

        (dir, root)
    }

    #[test]
    fn scan_finds_all_files() {
        let (_dir, root) = create_test_tree();
        let files = scan_native_files(&root, true).unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(
            paths,
            [".index", "2024/notes.txt", "2024/summer/beach.jpg", "cover.jpg"]
        );
    }

    #[test]
    fn relative_path_with_base_prefixes_root_name() {
        let (_dir, root) = create_test_tree();
        let files = scan_native_files(&root, true).unwrap();

        for file in &files {
            assert_eq!(
                file.relative_path_with_base,
                format!("photos/{}", file.relative_path)
            );
        }
    }

    #[test]
    fn full_path_is_absolute() {
        let (_dir, root) = create_test_tree();
        let files = scan_native_files(&root, true).unwrap();

        for file in &files {
            let full = Path::new(&file.full_path);
            assert!(full.is_absolute());
            assert!(full.is_file());
        }
    }

    #[test]
    fn non_recursive_ignores_subdirectories() {
        let (_dir, root) = create_test_tree();
        let files = scan_native_files(&root, false).unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, [".index", "cover.jpg"]);
    }

    #[test]
    fn scan_empty_dir() {
        let dir = TempDir::new().unwrap();
        let files = scan_native_files(dir.path(), true).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn scan_nonexistent_dir() {
        let result = scan_native_files(Path::new("/nonexistent/path/that/does/not/exist"), true);
        assert!(matches!(result, Err(DirectoryError::PathNotFound(_))));
    }

    #[test]
    fn scan_file_instead_of_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        let result = scan_native_files(&file, true);
        assert!(matches!(result, Err(DirectoryError::InvalidInput(_))));
    }

    #[cfg(unix)]
    #[test]
    fn backslash_stays_inside_file_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a\\b.txt"), b"x").unwrap();

        let files = scan_native_files(&root, true).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "a\\b.txt");
        assert_eq!(files[0].relative_path_with_base, "root/a\\b.txt");

        let plan = podsync_transfer::compute_plan([files[0].relative_path_with_base.as_str()]);
        assert_eq!(plan.directories(), ["/root"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_file_name_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(OsStr::from_bytes(b"bad\xff.txt")), b"x").unwrap();

        let result = scan_native_files(&root, true);
        assert!(matches!(result, Err(DirectoryError::InvalidInput(_))));
    }

    #[test]
    fn trailing_slash_root_keeps_name() {
        let (_dir, root) = create_test_tree();
        let with_slash = PathBuf::from(format!("{}/", root.display()));
        let files = scan_native_files(&with_slash, false).unwrap();
        assert_eq!(files[0].relative_path_with_base, "photos/.index");
    }
}
