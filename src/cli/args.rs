//! Command-line argument parsing for CAPES Fetcher
//!
//! This module defines the CLI structure using clap derive macros. Running
//! the binary without a subcommand behaves like `run` with its defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::RunOptions;
use crate::config::AppConfig;
use crate::constants::files;

/// CAPES Fetcher - Download open datasets from the CAPES catalog
#[derive(Parser, Debug)]
#[command(
    name = "capes_fetcher",
    version,
    about = "Download dataset resources listed by the CAPES open-data catalog",
    long_about = "Lists the resources of a CKAN open-data catalog, keeps those matching a dataset
title and format, and downloads them into one directory per dataset, retrying failed transfers."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand; `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress progress bars and non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List, filter and download resources
    Run(RunArgs),

    /// List catalog resources without downloading
    List(ListArgs),
}

/// Catalog search overrides shared by both commands
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Catalog search query (defaults to the configured query)
    #[arg(long)]
    pub query: Option<String>,

    /// Number of datasets to request (defaults to the configured rows)
    #[arg(long)]
    pub rows: Option<u32>,

    /// Keep only datasets whose title contains this text (case-sensitive)
    #[arg(short, long, default_value = "")]
    pub name: String,
}

impl SearchArgs {
    /// Query to send, falling back to the configuration
    pub fn query(&self, config: &AppConfig) -> String {
        self.query
            .clone()
            .unwrap_or_else(|| config.catalog.query.clone())
    }

    /// Rows to request, falling back to the configuration
    pub fn rows(&self, config: &AppConfig) -> u32 {
        self.rows.unwrap_or(config.catalog.rows)
    }
}

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Destination directory; one subdirectory is created per dataset
    #[arg(short, long, value_name = "DIR", default_value = files::DEFAULT_DEST_DIR)]
    pub dest_dir: PathBuf,

    /// Resource format to download (exact, case-sensitive)
    #[arg(short, long, default_value = files::DEFAULT_FORMAT)]
    pub format: String,

    /// Catalog search options
    #[command(flatten)]
    pub search: SearchArgs,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            dest_dir: PathBuf::from(files::DEFAULT_DEST_DIR),
            format: files::DEFAULT_FORMAT.to_string(),
            search: SearchArgs::default(),
        }
    }
}

impl RunArgs {
    /// Check argument values clap cannot check
    pub fn validate(&self) -> Result<(), String> {
        if self.format.is_empty() {
            return Err("Format must not be empty".to_string());
        }
        if self.search.rows == Some(0) {
            return Err("Rows must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Pipeline options with configuration fallbacks applied
    pub fn to_options(&self, config: &AppConfig) -> RunOptions {
        RunOptions {
            dest_dir: self.dest_dir.clone(),
            format: self.format.clone(),
            name_pattern: self.search.name.clone(),
            query: self.search.query(config),
            rows: self.search.rows(config),
        }
    }
}

/// Arguments for the list command
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Show only resources of this format (exact, case-sensitive)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Catalog search options
    #[command(flatten)]
    pub search: SearchArgs,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    ///
    /// Without any flag the configured level applies, so `None` is returned.
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}
