//! Pod directory client: read, create, delete and upload trees.
//!
//! Uploads run as one sequential pipeline. Directories are created one at a
//! time, parents first, and every file is uploaded only after all
//! directories exist. The first remote failure aborts the rest; nothing
//! already created is rolled back.

use std::sync::Arc;

use podsync_protocol::{CreateOutcome, DirectoryItem, PodContext};
use podsync_transfer::{
    DirectoryPlan, checksum_bytes, compute_plan, extract_path_info, get_path_parts,
    validate_directory_name,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::DirectoryError;
use crate::files::{enumerate_files, read_content};
use crate::service::{AccountSession, ContentService, DirectoryService};
use crate::types::{
    Environment, FileEntry, FileOrigin, FileSource, UploadDirectoryOptions, UploadEvent,
    UploadSummary,
};

/// Directory operations on the pods of one account.
pub struct DirectoryClient {
    session: Arc<dyn AccountSession>,
    directories: Arc<dyn DirectoryService>,
    content: Arc<dyn ContentService>,
    environment: Environment,
    events_tx: mpsc::Sender<UploadEvent>,
    events_rx: Option<mpsc::Receiver<UploadEvent>>,
}

impl DirectoryClient {
    /// Creates a client for the given collaborators and runtime capability.
    pub fn new(
        session: Arc<dyn AccountSession>,
        directories: Arc<dyn DirectoryService>,
        content: Arc<dyn ContentService>,
        environment: Environment,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            session,
            directories,
            content,
            environment,
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Takes the event receiver. Can only be called once.
    ///
    /// Events are dropped rather than awaited when the receiver lags.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.take()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Lists `path` inside a pod. Does not need write access.
    pub async fn read(
        &self,
        pod_name: &str,
        path: &str,
        recursive: bool,
    ) -> Result<DirectoryItem, DirectoryError> {
        validate_pod_name(pod_name)?;
        get_path_parts(path)?;

        let pod = self.session.open_pod(pod_name).await?;
        let item = self.directories.list_directory(path, &pod, recursive).await?;
        Ok(item)
    }

    /// Creates a single directory. Its parent must already exist remotely.
    pub async fn create(
        &self,
        pod_name: &str,
        path: &str,
    ) -> Result<CreateOutcome, DirectoryError> {
        self.session.assert_writable()?;
        validate_pod_name(pod_name)?;
        let info = extract_path_info(path)?;
        validate_directory_name(&info.name)?;

        let pod = self.session.open_pod(pod_name).await?;
        let outcome = self.create_one(path, &pod).await?;

        debug!(pod = %pod_name, path, ?outcome, "create directory");
        Ok(outcome)
    }

    /// Removes a single directory. The root cannot be removed.
    pub async fn delete(&self, pod_name: &str, path: &str) -> Result<(), DirectoryError> {
        self.session.assert_writable()?;
        validate_pod_name(pod_name)?;
        extract_path_info(path)?;

        let pod = self.session.open_pod(pod_name).await?;
        self.directories.remove_directory(path, &pod).await?;

        debug!(pod = %pod_name, path, "directory removed");
        Ok(())
    }

    /// Uploads a file tree into a pod.
    ///
    /// Validation (write access, pod name, environment, enumeration, planned
    /// names) happens before any remote call. An empty tree succeeds without
    /// touching the pod.
    ///
    /// Emits [`UploadEvent::Failed`] before returning any error.
    pub async fn upload(
        &self,
        pod_name: &str,
        source: &FileSource,
        options: &UploadDirectoryOptions,
    ) -> Result<UploadSummary, DirectoryError> {
        match self.run_upload(pod_name, source, options).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                let error = e.to_string();
                error!(pod = %pod_name, error = %error, "upload failed");
                self.emit(UploadEvent::Failed { error });
                Err(e)
            }
        }
    }

    async fn run_upload(
        &self,
        pod_name: &str,
        source: &FileSource,
        options: &UploadDirectoryOptions,
    ) -> Result<UploadSummary, DirectoryError> {
        self.session.assert_writable()?;
        validate_pod_name(pod_name)?;
        self.check_environment(source.origin())?;

        let files = enumerate_files(source, options)?;
        if files.is_empty() {
            info!(pod = %pod_name, "nothing to upload");
            let summary = UploadSummary::default();
            self.emit(UploadEvent::Completed(summary));
            return Ok(summary);
        }

        let include_name = options.include_directory_name;
        let plan = compute_plan(files.iter().map(|f| f.relative_path_for(include_name)));
        validate_plan(&plan)?;

        debug!(
            pod = %pod_name,
            files = files.len(),
            directories = plan.len(),
            "upload planned"
        );

        let pod = self.session.open_pod(pod_name).await?;

        let mut summary = UploadSummary::default();
        self.create_directories(&plan, &pod, &mut summary).await?;
        self.upload_files(&files, &pod, options, &mut summary).await?;

        info!(
            pod = %pod_name,
            files = summary.files_uploaded,
            bytes = summary.bytes_uploaded,
            created = summary.directories_created,
            existing = summary.directories_existing,
            "upload completed"
        );
        self.emit(UploadEvent::Completed(summary));

        Ok(summary)
    }

    fn check_environment(&self, origin: FileOrigin) -> Result<(), DirectoryError> {
        if self.environment.supports(origin) {
            return Ok(());
        }

        let msg = match origin {
            FileOrigin::Native => "uploading from a filesystem path needs native filesystem access",
            FileOrigin::Browser => "uploading a browser file selection needs a browser environment",
        };
        Err(DirectoryError::EnvironmentMismatch(msg.into()))
    }

    /// Creates one directory, treating a legacy "already listed" rejection
    /// as [`CreateOutcome::AlreadyExists`].
    async fn create_one(
        &self,
        path: &str,
        pod: &PodContext,
    ) -> Result<CreateOutcome, DirectoryError> {
        match self.directories.create_directory(path, pod).await {
            Ok(outcome) => Ok(outcome),
            Err(source) => CreateOutcome::from_error_message(source.message()).ok_or_else(|| {
                DirectoryError::DirectoryCreation {
                    path: path.to_string(),
                    source,
                }
            }),
        }
    }

    async fn create_directories(
        &self,
        plan: &DirectoryPlan,
        pod: &PodContext,
        summary: &mut UploadSummary,
    ) -> Result<(), DirectoryError> {
        for directory in plan.creation_order() {
            let outcome = self.create_one(directory, pod).await?;

            let path = directory.to_string();
            match outcome {
                CreateOutcome::Created => {
                    debug!(path = %path, "directory created");
                    summary.directories_created += 1;
                    self.emit(UploadEvent::DirectoryCreated { path });
                }
                CreateOutcome::AlreadyExists => {
                    debug!(path = %path, "directory already exists");
                    summary.directories_existing += 1;
                    self.emit(UploadEvent::DirectoryExists { path });
                }
            }
        }

        Ok(())
    }

    async fn upload_files(
        &self,
        files: &[FileEntry],
        pod: &PodContext,
        options: &UploadDirectoryOptions,
        summary: &mut UploadSummary,
    ) -> Result<(), DirectoryError> {
        for file in files {
            let data = read_content(file).await?;
            let path = file.upload_path(options.include_directory_name);
            let size = data.len() as u64;
            let checksum = checksum_bytes(&data);

            if let Err(source) = self
                .content
                .upload_content(&path, data, pod, &options.upload_options)
                .await
            {
                return Err(DirectoryError::Upload { path, source });
            }

            debug!(path = %path, size, "file uploaded");
            summary.files_uploaded += 1;
            summary.bytes_uploaded += size;
            self.emit(UploadEvent::FileUploaded {
                path,
                size,
                checksum,
            });
        }

        Ok(())
    }

    fn emit(&self, event: UploadEvent) {
        let _ = self.events_tx.try_send(event);
    }
}

fn validate_pod_name(pod_name: &str) -> Result<(), DirectoryError> {
    if pod_name.is_empty() {
        return Err(DirectoryError::InvalidInput("pod name is empty".into()));
    }
    if pod_name.contains('/') {
        return Err(DirectoryError::InvalidInput(format!(
            "pod name contains \"/\": {pod_name}"
        )));
    }
    Ok(())
}

fn validate_plan(plan: &DirectoryPlan) -> Result<(), DirectoryError> {
    for directory in plan.directories() {
        let info = extract_path_info(directory)?;
        validate_directory_name(&info.name)?;
    }
    Ok(())
}
