//! CLI configuration management.
//!
//! Reads `~/.config/podsync/config.json`. Every field is optional; a file
//! that fails to parse is logged and ignored.

use std::path::{Path, PathBuf};

use podsync_directory::UploadDirectoryOptions;
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CliConfig {
    /// Directory holding the mirror store's pods.
    pub mirror_root: PathBuf,

    /// Refuse every write operation.
    pub read_only: bool,

    /// Defaults for `upload` and `plan`; command-line flags override them.
    pub upload: UploadDirectoryOptions,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            mirror_root: config_base_dir().join("podsync").join("mirror"),
            read_only: false,
            upload: UploadDirectoryOptions::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from `path`, or from the default location.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        match serde_json::from_str::<CliConfig>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Ok(Self::default())
            }
        }
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    config_base_dir().join("podsync").join("config.json")
}

fn config_base_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata)
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config")
    }
}
