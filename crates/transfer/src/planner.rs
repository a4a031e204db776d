//! Directories that must exist before a set of files can be uploaded.

use std::collections::HashSet;

use crate::path::combine;

/// Deduplicated remote directories, in first-discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryPlan {
    directories: Vec<String>,
}

impl DirectoryPlan {
    /// Directories in the order they were discovered.
    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    /// Directories ordered so every parent comes before its children.
    ///
    /// Sorting is stable: directories at the same depth keep discovery order.
    pub fn creation_order(&self) -> Vec<&str> {
        let mut ordered: Vec<&str> = self.directories.iter().map(String::as_str).collect();
        ordered.sort_by_key(|dir| depth(dir));
        ordered
    }

    pub fn contains(&self, directory: &str) -> bool {
        self.directories.iter().any(|d| d == directory)
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}

/// Computes every intermediate directory of the given file paths.
///
/// The last segment of each path is the file name and is never planned.
/// Empty segments are ignored, so `a/b/f` and `/a/b/f` plan the same
/// directories: `/a` and `/a/b`.
pub fn compute_plan<I, S>(relative_paths: I) -> DirectoryPlan
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut directories = Vec::new();

    for path in relative_paths {
        let segments: Vec<&str> = path
            .as_ref()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        let Some((_file, parents)) = segments.split_last() else {
            continue;
        };

        for len in 1..=parents.len() {
            let directory = combine(&parents[..len]);
            if seen.insert(directory.clone()) {
                directories.push(directory);
            }
        }
    }

    DirectoryPlan { directories }
}

fn depth(path: &str) -> usize {
    path.matches('/').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_every_prefix_level() {
        let plan = compute_plan(["/dir1/dir2/file.txt"]);
        assert_eq!(plan.directories(), ["/dir1", "/dir1/dir2"]);
    }

    #[test]
    fn relative_and_absolute_inputs_agree() {
        assert_eq!(
            compute_plan(["dir1/dir2/file.txt"]),
            compute_plan(["/dir1/dir2/file.txt"])
        );
    }

    #[test]
    fn top_level_files_need_no_directories() {
        let plan = compute_plan(["a.txt", "b.txt"]);
        assert!(plan.is_empty());
    }

    #[test]
    fn directories_are_deduplicated() {
        let plan = compute_plan(["root/a.txt", "root/sub/b.txt", "root/sub/c.txt"]);
        assert_eq!(plan.directories(), ["/root", "/root/sub"]);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn discovery_order_is_preserved() {
        let plan = compute_plan(["x/y/z/deep.txt", "a/top.txt"]);
        assert_eq!(plan.directories(), ["/x", "/x/y", "/x/y/z", "/a"]);
    }

    #[test]
    fn creation_order_puts_parents_first() {
        let plan = compute_plan(["x/y/z/deep.txt", "a/top.txt", "a/b/mid.txt"]);
        assert_eq!(
            plan.creation_order(),
            ["/x", "/a", "/x/y", "/a/b", "/x/y/z"]
        );
        for (i, dir) in plan.creation_order().iter().enumerate() {
            let parent = &dir[..dir.rfind('/').unwrap()];
            if !parent.is_empty() {
                assert!(plan.creation_order()[..i].contains(&parent));
            }
        }
    }

    #[test]
    fn contains_reports_planned_directories() {
        let plan = compute_plan(["docs/notes/today.md"]);
        assert!(plan.contains("/docs/notes"));
        assert!(!plan.contains("/docs/notes/today.md"));
    }
}
