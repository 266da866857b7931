//! CLI Tooling
//!
//! Command-line interface for browsing and writing repositories through the
//! filesystem view.

use super::format::{format_entries, format_object};
use crate::config::{ConfigLoader, NexusConfig};
use crate::error::NexusError;
use crate::types::UploadRequest;
use crate::view::NexusFs;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::info;

/// CLI for the repository filesystem view
#[derive(Parser)]
#[command(name = "nexusfs")]
#[command(about = "Browse a repository manager as a filesystem")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root of the view: empty for all repositories, or `repository[/path]`
    #[arg(long, default_value = "")]
    pub root: String,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a directory
    Ls {
        /// Directory relative to the root
        #[arg(default_value = "")]
        path: String,
        /// List every file below the directory
        #[arg(short = 'R', long)]
        recursive: bool,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one object
    Stat {
        path: String,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Upload a local file
    Put {
        /// Local file to upload
        source: PathBuf,
        /// Destination relative to the root
        dest: String,
        /// Content type sent with the upload
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Create a directory (no effect on the remote)
    Mkdir { path: String },
    /// Remove a directory (no effect on the remote)
    Rmdir { path: String },
}

impl Cli {
    /// Load configuration and apply the logging flags on top of it.
    pub fn load_config(&self) -> Result<NexusConfig, NexusError> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(None)?,
        };
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        Ok(config)
    }
}

/// CLI context for executing commands
pub struct CliContext {
    fs: NexusFs,
    runtime: Runtime,
}

impl CliContext {
    /// Create a context backed by the configured repository manager.
    pub fn new(root: &str, config: &NexusConfig) -> Result<Self, NexusError> {
        Self::with_fs(NexusFs::from_config(root, config)?)
    }

    /// Create a context around an existing view.
    pub fn with_fs(fs: NexusFs) -> Result<Self, NexusError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(Self { fs, runtime })
    }

    pub fn fs(&self) -> &NexusFs {
        &self.fs
    }

    /// Execute a CLI command and return its rendered output
    pub fn execute(&self, command: &Commands) -> Result<String, NexusError> {
        match command {
            Commands::Ls {
                path,
                recursive,
                format,
            } => {
                let entries = self.runtime.block_on(self.fs.list(path, *recursive))?;
                format_entries(&entries, format)
            }
            Commands::Stat { path, format } => {
                let object = self.runtime.block_on(self.fs.get_object(path))?;
                format_object(&object, format)
            }
            Commands::Put {
                source,
                dest,
                content_type,
            } => {
                let content = std::fs::read(source)?;
                let mut request = UploadRequest::new(content);
                if let Some(content_type) = content_type {
                    request = request.with_content_type(content_type);
                }
                let object = self.runtime.block_on(self.fs.put(dest, request))?;
                info!(source = %source.display(), dest = %object.path, "Put complete");
                Ok(format!("Uploaded {} ({} bytes)", object.path, object.size))
            }
            Commands::Mkdir { path } => {
                self.runtime.block_on(self.fs.mkdir(path))?;
                Ok(String::new())
            }
            Commands::Rmdir { path } => {
                self.runtime.block_on(self.fs.rmdir(path))?;
                Ok(String::new())
            }
        }
    }
}
