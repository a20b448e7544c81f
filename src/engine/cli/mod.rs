//! assetsync CLI Module
//! Command-line interface for checking and updating the synced asset

pub mod formatter;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::config::{ConfigError, SyncConfig};

#[derive(Parser, Debug)]
#[command(name = "assetsync")]
#[command(author = "assetsync Team")]
#[command(version)]
#[command(about = "Keeps a locally cached rules database in sync with its latest release", long_about = None)]
pub struct Cli {
    /// Config file (defaults to assetsync.config.json in the data directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the asset directory from the config
    #[arg(short, long, global = true)]
    pub asset_dir: Option<PathBuf>,

    /// Output format (json for scripting)
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a newer release is published
    Check,

    /// Update the local asset if it is stale
    Update {
        /// Download even if the local asset is current
        #[arg(long)]
        force: bool,
    },

    /// Show the installed asset version
    Status,
}

impl Cli {
    /// Load the config and apply command-line overrides
    pub fn load_config(&self) -> Result<SyncConfig, ConfigError> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => SyncConfig::default_path()?,
        };
        let mut config = if self.config.is_some() {
            SyncConfig::load(&path)?
        } else {
            SyncConfig::load_or_default(&path)?
        };
        if let Some(dir) = &self.asset_dir {
            config.asset_dir = dir.clone();
        }
        Ok(config)
    }
}
