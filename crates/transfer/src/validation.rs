use crate::PathError;

/// Longest directory name the remote directory API accepts, in bytes.
pub const MAX_DIRECTORY_NAME_LENGTH: usize = 100;

/// Validates a single directory name.
///
/// Rejects:
/// - Empty names
/// - Names containing `/`
/// - Names longer than [`MAX_DIRECTORY_NAME_LENGTH`] bytes
pub fn validate_directory_name(name: &str) -> Result<(), PathError> {
    if name.is_empty() {
        return Err(PathError::InvalidName("name is empty".into()));
    }

    if name.contains('/') {
        return Err(PathError::InvalidName(format!(
            "name contains \"/\": {name}"
        )));
    }

    if name.len() > MAX_DIRECTORY_NAME_LENGTH {
        return Err(PathError::InvalidName(format!(
            "name is longer than {MAX_DIRECTORY_NAME_LENGTH} bytes: {name}"
        )));
    }

    Ok(())
}

/// Validates that a relative file path stays inside the upload root.
///
/// Rejects:
/// - Empty paths
/// - Absolute paths
/// - Empty segments (`a//b`, trailing `/`)
/// - `.` and `..` segments
pub fn validate_relative_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::InvalidPath("empty path".into()));
    }

    if path.starts_with('/') {
        return Err(PathError::InvalidPath(format!(
            "absolute path not allowed: {path}"
        )));
    }

    for segment in path.split('/') {
        match segment {
            "" => {
                return Err(PathError::InvalidPath(format!(
                    "empty segment in path: {path}"
                )));
            }
            "." | ".." => {
                return Err(PathError::InvalidPath(format!(
                    "relative segment not allowed: {path}"
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
