//! podsync
//!
//! Uploads local directory trees into pods of a mirror store.

mod config;
mod mirror;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use podsync_directory::{
    DirectoryClient, Environment, FileSource, UploadDirectoryOptions, UploadEvent, enumerate_files,
};
use podsync_protocol::{CreateOutcome, DirectoryItem};
use podsync_transfer::compute_plan;
use tracing_subscriber::EnvFilter;

use config::CliConfig;
use mirror::{MirrorAccount, MirrorStore};

/// podsync - mirror local directory trees into pods.
#[derive(Parser, Debug)]
#[command(name = "podsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Mirror store directory (overrides the configuration)
    #[arg(long, global = true, value_name = "DIR")]
    pub mirror: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write the current configuration to the config file
    Init,

    /// Print the directories and upload targets for a local tree
    Plan {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Upload a local tree into a pod
    Upload {
        #[command(flatten)]
        pod: PodArgs,

        #[command(flatten)]
        tree: TreeArgs,
    },

    /// List a directory inside a pod
    Ls {
        #[command(flatten)]
        pod: PodArgs,

        /// Directory to list
        #[arg(default_value = "/")]
        path: String,

        /// Include nested directories
        #[arg(long, short)]
        recursive: bool,
    },

    /// Create a directory inside a pod
    Mkdir {
        #[command(flatten)]
        pod: PodArgs,

        /// Absolute directory path
        path: String,
    },

    /// Remove an empty directory from a pod
    Rmdir {
        #[command(flatten)]
        pod: PodArgs,

        /// Absolute directory path
        path: String,
    },

    /// Encrypt text with a password
    Encrypt {
        #[arg(long, short)]
        password: String,

        text: String,
    },

    /// Decrypt an envelope produced by `encrypt`
    Decrypt {
        #[arg(long, short)]
        password: String,

        envelope: String,
    },
}

/// Selects a pod and the account that owns it.
#[derive(Args, Debug, Clone)]
pub struct PodArgs {
    /// Pod name
    #[arg(long)]
    pub pod: String,

    /// Account password
    #[arg(long, short)]
    pub password: String,
}

/// Local tree selection.
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Local directory to upload
    pub dir: PathBuf,

    /// Only upload the directory's own files
    #[arg(long)]
    pub no_recursive: bool,

    /// Skip files whose name starts with '.'
    #[arg(long)]
    pub exclude_dot_files: bool,

    /// Upload the contents without the directory's own name
    #[arg(long)]
    pub flatten: bool,
}

impl TreeArgs {
    /// Command-line flags applied over the configured defaults.
    fn options(&self, defaults: &UploadDirectoryOptions) -> UploadDirectoryOptions {
        UploadDirectoryOptions {
            recursive: defaults.recursive && !self.no_recursive,
            exclude_dot_files: defaults.exclude_dot_files || self.exclude_dot_files,
            include_directory_name: defaults.include_directory_name && !self.flatten,
            upload_options: defaults.upload_options.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(mirror) = cli.mirror {
        config.mirror_root = mirror;
    }

    tracing::debug!(mirror = %config.mirror_root.display(), "configuration loaded");
    if let Commands::Init = cli.command {
        let path = cli.config.unwrap_or_else(config::default_config_path);
        config.save(&path)?;
        println!("configuration written to {}", path.display());
        return Ok(());
    }

    run(cli.command, &config).await
}

async fn run(command: Commands, config: &CliConfig) -> anyhow::Result<()> {
    match command {
        Commands::Init => Ok(()),
        Commands::Plan { tree } => print_plan(&tree, config),
        Commands::Upload { pod, tree } => {
            let mut client = mirror_client(&pod, config);
            let options = tree.options(&config.upload);

            let printer = client.take_events().map(|mut events| {
                tokio::spawn(async move {
                    while let Some(event) = events.recv().await {
                        print_event(&event);
                    }
                })
            });

            let result = client
                .upload(&pod.pod, &FileSource::native(&tree.dir), &options)
                .await;

            // Closing the channel lets the printer drain and stop.
            drop(client);
            if let Some(printer) = printer {
                let _ = printer.await;
            }

            let summary =
                result.with_context(|| format!("upload of {} failed", tree.dir.display()))?;
            println!(
                "{} files ({} bytes), {} directories created, {} already present",
                summary.files_uploaded,
                summary.bytes_uploaded,
                summary.directories_created,
                summary.directories_existing
            );
            Ok(())
        }
        Commands::Ls {
            pod,
            path,
            recursive,
        } => {
            let client = mirror_client(&pod, config);
            let listing = client.read(&pod.pod, &path, recursive).await?;
            print_listing(&listing, 0);
            Ok(())
        }
        Commands::Mkdir { pod, path } => {
            let client = mirror_client(&pod, config);
            match client.create(&pod.pod, &path).await? {
                CreateOutcome::Created => println!("created {path}"),
                CreateOutcome::AlreadyExists => println!("{path} already exists"),
            }
            Ok(())
        }
        Commands::Rmdir { pod, path } => {
            let client = mirror_client(&pod, config);
            client.delete(&pod.pod, &path).await?;
            println!("removed {path}");
            Ok(())
        }
        Commands::Encrypt { password, text } => {
            println!("{}", podsync_crypto::encrypt(&password, &text)?);
            Ok(())
        }
        Commands::Decrypt { password, envelope } => {
            println!("{}", podsync_crypto::decrypt(&password, &envelope)?);
            Ok(())
        }
    }
}

fn mirror_client(pod: &PodArgs, config: &CliConfig) -> DirectoryClient {
    let store = Arc::new(MirrorStore::new(&config.mirror_root));
    let account = Arc::new(MirrorAccount::new(
        store.clone(),
        pod.password.clone(),
        !config.read_only,
    ));
    DirectoryClient::new(account, store.clone(), store, Environment::current())
}

fn print_plan(tree: &TreeArgs, config: &CliConfig) -> anyhow::Result<()> {
    let options = tree.options(&config.upload);
    let files = enumerate_files(&FileSource::native(&tree.dir), &options)?;
    let plan = compute_plan(
        files
            .iter()
            .map(|f| f.relative_path_for(options.include_directory_name)),
    );

    println!("directories ({}):", plan.len());
    for directory in plan.creation_order() {
        println!("  {directory}");
    }
    println!("files ({}):", files.len());
    for file in &files {
        println!(
            "  {} -> {}",
            file.full_path,
            file.upload_path(options.include_directory_name)
        );
    }
    Ok(())
}

fn print_event(event: &UploadEvent) {
    match event {
        UploadEvent::DirectoryCreated { path } => println!("mkdir  {path}"),
        UploadEvent::DirectoryExists { path } => println!("exists {path}"),
        UploadEvent::FileUploaded {
            path,
            size,
            checksum,
        } => println!("upload {path} ({size} bytes, sha256 {})", &checksum[..12]),
        UploadEvent::Completed(_) => {}
        UploadEvent::Failed { error } => println!("failed {error}"),
    }
}

fn print_listing(item: &DirectoryItem, depth: usize) {
    let indent = "  ".repeat(depth);
    for directory in &item.directories {
        println!("{indent}{}/", directory.name);
        print_listing(directory, depth + 1);
    }
    for file in &item.files {
        println!("{indent}{} ({} bytes)", file.name, file.size);
    }
}
