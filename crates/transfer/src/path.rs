//! Absolute `/`-separated remote paths.
//!
//! A path is split into *parts* whose first element is always the root
//! sentinel `/`. The root itself is `["/"]`; anything shorter than two parts
//! cannot name an entry.

use crate::PathError;

/// The root sentinel, also the root path itself.
pub const ROOT: &str = "/";

/// Parent directory and entry name of a non-root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    pub parent: String,
    pub name: String,
}

/// Splits a path on `/` without any validation.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').collect()
}

/// Last `/`-separated segment of `path`. Empty for `/` or a trailing slash.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Joins path fragments into an absolute path.
///
/// Empty fragments are dropped and fragments longer than one character lose
/// any embedded `/`, so `combine(&["/a/", "b", "/c/"])` is `/a/b/c`.
pub fn combine<S: AsRef<str>>(parts: &[S]) -> String {
    let mut normalized: Vec<String> = parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if part.len() > 1 {
                part.replace('/', "")
            } else {
                part.to_string()
            }
        })
        .collect();

    if normalized.first().map(String::as_str) != Some(ROOT) {
        normalized.insert(0, ROOT.to_string());
    }

    join_parts(&normalized, 0)
}

/// Splits an absolute path into parts prefixed with the root sentinel.
pub fn get_path_parts(path: &str) -> Result<Vec<String>, PathError> {
    if path.is_empty() {
        return Err(PathError::InvalidPath("path is empty".into()));
    }

    if !path.starts_with('/') {
        return Err(PathError::InvalidPath(format!("path is not absolute: {path}")));
    }

    if path == ROOT {
        return Ok(vec![ROOT.to_string()]);
    }

    Ok(std::iter::once(ROOT)
        .chain(path.split('/').skip(1))
        .map(str::to_string)
        .collect())
}

/// Rebuilds a path from parts, leaving out the last `minus_parts` segments.
pub fn get_path_from_parts<S: AsRef<str>>(
    parts: &[S],
    minus_parts: usize,
) -> Result<String, PathError> {
    let Some(first) = parts.first() else {
        return Err(PathError::InvalidPath("parts list is empty".into()));
    };

    if first.as_ref() != ROOT {
        return Err(PathError::InvalidPath(
            "path parts must start with \"/\"".into(),
        ));
    }

    if parts.len() <= minus_parts {
        return Err(PathError::InvalidPath(format!(
            "cannot remove {minus_parts} parts from {}",
            parts.len()
        )));
    }

    Ok(join_parts(parts, minus_parts))
}

/// Rejects parts that denote the root.
pub fn assert_non_root_parts<S: AsRef<str>>(parts: &[S]) -> Result<(), PathError> {
    if parts.len() < 2 {
        return Err(PathError::RootOperation);
    }
    Ok(())
}

/// Splits a non-root absolute path into its parent and final name.
pub fn extract_path_info(path: &str) -> Result<PathInfo, PathError> {
    let parts = get_path_parts(path)?;
    assert_non_root_parts(&parts)?;

    let parent = get_path_from_parts(&parts, 1)?;
    let name = parts[parts.len() - 1].clone();

    Ok(PathInfo { parent, name })
}

// Callers guarantee parts[0] is the sentinel and minus_parts < parts.len().
fn join_parts<S: AsRef<str>>(parts: &[S], minus_parts: usize) -> String {
    let segments: Vec<&str> = parts[1..parts.len() - minus_parts]
        .iter()
        .map(AsRef::as_ref)
        .collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_roundtrip_for_absolute_paths() {
        for path in ["/", "/a", "/a/b", "/dir1/dir2/file.txt", "/with space/x"] {
            let parts = get_path_parts(path).unwrap();
            assert_eq!(get_path_from_parts(&parts, 0).unwrap(), path);
        }
    }

    #[test]
    fn root_has_single_part() {
        assert_eq!(get_path_parts("/").unwrap(), vec!["/"]);
    }

    #[test]
    fn parts_start_with_sentinel() {
        assert_eq!(get_path_parts("/a/b").unwrap(), vec!["/", "a", "b"]);
    }

    #[test]
    fn empty_and_relative_paths_rejected() {
        assert!(matches!(get_path_parts(""), Err(PathError::InvalidPath(_))));
        assert!(matches!(
            get_path_parts("relative/path"),
            Err(PathError::InvalidPath(_))
        ));
    }

    #[test]
    fn from_parts_drops_trailing_segments() {
        let parts = ["/", "a", "b", "c"];
        assert_eq!(get_path_from_parts(&parts, 1).unwrap(), "/a/b");
        assert_eq!(get_path_from_parts(&parts, 3).unwrap(), "/");
    }

    #[test]
    fn from_parts_validation() {
        let empty: [&str; 0] = [];
        assert!(get_path_from_parts(&empty, 0).is_err());
        assert!(get_path_from_parts(&["a", "b"], 0).is_err());
        assert!(get_path_from_parts(&["/", "a"], 2).is_err());
    }

    #[test]
    fn combine_strips_embedded_slashes() {
        assert_eq!(combine(&["/a/", "b", "/c/"]), "/a/b/c");
    }

    #[test]
    fn combine_skips_empty_parts() {
        assert_eq!(combine(&["", "a", "", "b"]), "/a/b");
        let none: [&str; 0] = [];
        assert_eq!(combine(&none), "/");
    }

    #[test]
    fn combine_keeps_leading_root() {
        assert_eq!(combine(&["/", "docs", "notes"]), "/docs/notes");
    }

    #[test]
    fn root_parts_rejected_for_named_operations() {
        assert_eq!(assert_non_root_parts(&["/"]), Err(PathError::RootOperation));
        assert!(assert_non_root_parts(&["/", "a"]).is_ok());
    }

    #[test]
    fn path_info_splits_parent_and_name() {
        let info = extract_path_info("/docs/notes/today").unwrap();
        assert_eq!(info.parent, "/docs/notes");
        assert_eq!(info.name, "today");

        let top = extract_path_info("/docs").unwrap();
        assert_eq!(top.parent, "/");
        assert_eq!(top.name, "docs");
    }

    #[test]
    fn path_info_rejects_root() {
        assert_eq!(extract_path_info("/"), Err(PathError::RootOperation));
    }

    #[test]
    fn base_name_is_last_segment() {
        assert_eq!(base_name("sub/file.txt"), "file.txt");
        assert_eq!(base_name("file.txt"), "file.txt");
        assert_eq!(base_name("/"), "");
    }
}
