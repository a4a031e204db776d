use serde::{Deserialize, Serialize};

/// Error text the legacy directory API returns when the entry already exists.
pub const ALREADY_LISTED_MESSAGE: &str = "already listed in the parent directory list";

/// A pod opened for the current account.
///
/// Every directory and content call carries this so the service can sign
/// and encrypt on behalf of the pod owner.
#[derive(Clone, PartialEq, Eq)]
pub struct PodContext {
    pub name: String,
    /// Hex address of the pod owner.
    pub owner: String,
    pub password: Vec<u8>,
}

impl std::fmt::Debug for PodContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodContext")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Options forwarded untouched to the content service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
}

/// Result of a successful directory creation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

impl CreateOutcome {
    /// Classifies an error message from a message-based directory API.
    ///
    /// Returns `Some(AlreadyExists)` when the message reports that the entry
    /// is already listed in its parent, `None` for every other failure.
    pub fn from_error_message(message: &str) -> Option<Self> {
        message
            .contains(ALREADY_LISTED_MESSAGE)
            .then_some(Self::AlreadyExists)
    }
}

/// A file inside a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    pub name: String,
    pub size: u64,
}

/// A directory listing, optionally nested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directories: Vec<DirectoryItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileItem>,
}

impl DirectoryItem {
    /// Creates an empty listing for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Looks up a direct child directory by name.
    pub fn directory(&self, name: &str) -> Option<&DirectoryItem> {
        self.directories.iter().find(|d| d.name == name)
    }

    /// Looks up a direct child file by name.
    pub fn file(&self, name: &str) -> Option<&FileItem> {
        self.files.iter().find(|f| f.name == name)
    }
}
