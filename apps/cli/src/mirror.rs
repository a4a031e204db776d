//! Local mirror store.
//!
//! Stands in for the remote pod services: every pod is a directory under
//! `<root>/data/`, and its metadata (owner and pod password) is kept
//! encrypted with the account password in `<root>/pods/<name>.meta`.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use podsync_directory::{AccountSession, BoxFuture, ContentService, DirectoryError, DirectoryService};
use podsync_protocol::{CreateOutcome, DirectoryItem, FileItem, PodContext, ServiceError, UploadOptions};
use podsync_transfer::{checksum_bytes, validate_relative_path};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Pod password length in bytes.
const POD_PASSWORD_LENGTH: usize = 32;

/// Pods and their contents on the local filesystem.
#[derive(Debug, Clone)]
pub struct MirrorStore {
    root: PathBuf,
}

impl MirrorStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn pod_dir(&self, pod_name: &str) -> PathBuf {
        self.root.join("data").join(pod_name)
    }

    fn meta_path(&self, pod_name: &str) -> PathBuf {
        self.root.join("pods").join(format!("{pod_name}.meta"))
    }

    /// Maps an absolute pod path onto the local filesystem.
    fn local_path(&self, pod: &PodContext, path: &str) -> Result<PathBuf, ServiceError> {
        let Some(relative) = path.strip_prefix('/') else {
            return Err(ServiceError::Rejected(format!("path is not absolute: {path}")));
        };

        let pod_dir = self.pod_dir(&pod.name);
        if relative.is_empty() {
            return Ok(pod_dir);
        }

        validate_relative_path(relative).map_err(rejected)?;
        Ok(pod_dir.join(relative))
    }
}

impl DirectoryService for MirrorStore {
    fn create_directory(
        &self,
        path: &str,
        pod: &PodContext,
    ) -> BoxFuture<'_, Result<CreateOutcome, ServiceError>> {
        let target = self.local_path(pod, path);
        let path = path.to_string();

        Box::pin(async move {
            let target = target?;

            if tokio::fs::metadata(&target)
                .await
                .is_ok_and(|m| m.is_dir())
            {
                return Ok(CreateOutcome::AlreadyExists);
            }

            ensure_parent_dir(&target, &path).await?;
            tokio::fs::create_dir(&target).await.map_err(rejected)?;
            Ok(CreateOutcome::Created)
        })
    }

    fn remove_directory(
        &self,
        path: &str,
        pod: &PodContext,
    ) -> BoxFuture<'_, Result<(), ServiceError>> {
        let target = self.local_path(pod, path);

        Box::pin(async move {
            let target = target?;
            tokio::fs::remove_dir(&target).await.map_err(rejected)
        })
    }

    fn list_directory(
        &self,
        path: &str,
        pod: &PodContext,
        recursive: bool,
    ) -> BoxFuture<'_, Result<DirectoryItem, ServiceError>> {
        let target = self.local_path(pod, path);
        let name = podsync_transfer::base_name(path).to_string();

        Box::pin(async move {
            let target = target?;
            list_local(target, name, recursive).await.map_err(rejected)
        })
    }
}

impl ContentService for MirrorStore {
    fn upload_content(
        &self,
        path: &str,
        data: Vec<u8>,
        pod: &PodContext,
        _options: &UploadOptions,
    ) -> BoxFuture<'_, Result<(), ServiceError>> {
        let target = self.local_path(pod, path);
        let path = path.to_string();

        Box::pin(async move {
            let target = target?;
            ensure_parent_dir(&target, &path).await?;
            tokio::fs::write(&target, data).await.map_err(rejected)
        })
    }
}

/// Pod metadata as stored (encrypted) on disk.
#[derive(Debug, Serialize, Deserialize)]
struct PodMetadata {
    name: String,
    owner: String,
    /// Hex-encoded pod password.
    password: String,
}

/// Account backed by a [`MirrorStore`].
pub struct MirrorAccount {
    store: Arc<MirrorStore>,
    password: String,
    writable: bool,
}

impl MirrorAccount {
    pub fn new(store: Arc<MirrorStore>, password: impl Into<String>, writable: bool) -> Self {
        Self {
            store,
            password: password.into(),
            writable,
        }
    }

    async fn load_pod(&self, meta_path: &Path) -> Result<PodContext, ServiceError> {
        let envelope = tokio::fs::read_to_string(meta_path).await.map_err(rejected)?;
        let json = podsync_crypto::decrypt(&self.password, envelope.trim())
            .map_err(|e| ServiceError::Rejected(format!("cannot open pod metadata: {e}")))?;
        let meta: PodMetadata = serde_json::from_str(&json)
            .map_err(|_| ServiceError::Rejected("cannot open pod metadata: wrong password".into()))?;

        Ok(PodContext {
            name: meta.name,
            owner: meta.owner,
            password: hex::decode(&meta.password).map_err(rejected)?,
        })
    }

    async fn create_pod(
        &self,
        pod_name: &str,
        meta_path: &Path,
    ) -> Result<PodContext, ServiceError> {
        let mut password = [0u8; POD_PASSWORD_LENGTH];
        rand::thread_rng().fill(&mut password);

        let owner = checksum_bytes(format!("{pod_name}:{}", self.password).as_bytes())[..40].to_string();
        let meta = PodMetadata {
            name: pod_name.to_string(),
            owner: owner.clone(),
            password: hex::encode(password),
        };
        let json = serde_json::to_string(&meta).map_err(rejected)?;
        let envelope = podsync_crypto::encrypt(&self.password, &json).map_err(rejected)?;

        if let Some(parent) = meta_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(rejected)?;
        }
        tokio::fs::create_dir_all(self.store.pod_dir(pod_name))
            .await
            .map_err(rejected)?;
        tokio::fs::write(meta_path, envelope).await.map_err(rejected)?;

        info!(pod = %pod_name, "pod created");
        Ok(PodContext {
            name: pod_name.to_string(),
            owner,
            password: password.to_vec(),
        })
    }
}

impl AccountSession for MirrorAccount {
    fn assert_writable(&self) -> Result<(), DirectoryError> {
        if self.writable {
            Ok(())
        } else {
            Err(DirectoryError::Authorization(
                "mirror store is configured read-only".into(),
            ))
        }
    }

    fn open_pod(&self, pod_name: &str) -> BoxFuture<'_, Result<PodContext, ServiceError>> {
        let pod_name = pod_name.to_string();

        Box::pin(async move {
            if matches!(pod_name.as_str(), "" | "." | "..") || pod_name.contains(['/', '\\']) {
                return Err(ServiceError::Rejected(format!("invalid pod name: {pod_name:?}")));
            }

            let meta_path = self.store.meta_path(&pod_name);
            if tokio::fs::try_exists(&meta_path).await.map_err(rejected)? {
                debug!(pod = %pod_name, "opening pod");
                self.load_pod(&meta_path).await
            } else if self.writable {
                self.create_pod(&pod_name, &meta_path).await
            } else {
                Err(ServiceError::Rejected(format!("pod does not exist: {pod_name}")))
            }
        })
    }
}

fn rejected(e: impl Display) -> ServiceError {
    ServiceError::Rejected(e.to_string())
}

async fn ensure_parent_dir(target: &Path, path: &str) -> Result<(), ServiceError> {
    let parent_is_dir = match target.parent() {
        Some(parent) => tokio::fs::metadata(parent)
            .await
            .is_ok_and(|m| m.is_dir()),
        None => false,
    };

    if parent_is_dir {
        Ok(())
    } else {
        Err(ServiceError::Rejected(format!(
            "parent directory does not exist: {path}"
        )))
    }
}

/// Lists `dir` in file-name order. Symlinks are skipped.
fn list_local(
    dir: PathBuf,
    name: String,
    recursive: bool,
) -> BoxFuture<'static, std::io::Result<DirectoryItem>> {
    Box::pin(async move {
        let mut item = DirectoryItem::new(name);

        let mut read_dir = tokio::fs::read_dir(&dir).await?;
        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            entries.push(entry);
        }
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let entry_name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type().await?;

            if file_type.is_dir() {
                let child = if recursive {
                    list_local(entry.path(), entry_name, true).await?
                } else {
                    DirectoryItem::new(entry_name)
                };
                item.directories.push(child);
            } else if file_type.is_file() {
                let size = entry.metadata().await?.len();
                item.files.push(FileItem {
                    name: entry_name,
                    size,
                });
            }
        }

        Ok(item)
    })
}
