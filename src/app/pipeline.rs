//! End-to-end fetch pipeline: list, filter, download
//!
//! The pipeline owns one catalog client and one downloader sharing a single
//! HTTP handler, so both memoization caches live as long as the pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::app::batch::download_filtered;
use crate::app::client::{CatalogClient, Downloader, HttpHandler};
use crate::app::filter::filter_by_name_and_format;
use crate::app::models::DatasetTable;
use crate::app::progress::ProgressReporter;
use crate::config::AppConfig;
use crate::constants::files;
use crate::errors::Result;

/// Parameters of one fetch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Root directory receiving one subdirectory per dataset
    pub dest_dir: PathBuf,
    /// Exact resource format to keep
    pub format: String,
    /// Substring the dataset title must contain; empty keeps every dataset
    pub name_pattern: String,
    /// Catalog search query
    pub query: String,
    /// Number of datasets requested from the catalog
    pub rows: u32,
}

impl RunOptions {
    /// Options for the configured catalog search with the default
    /// destination and format and no name filter
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            dest_dir: PathBuf::from(files::DEFAULT_DEST_DIR),
            format: files::DEFAULT_FORMAT.to_string(),
            name_pattern: String::new(),
            query: config.catalog.query.clone(),
            rows: config.catalog.rows,
        }
    }
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Resources in the catalog listing
    pub listed: usize,
    /// Resources left after filtering
    pub selected: usize,
    /// Files written (or remembered), in listing order
    pub paths: Vec<PathBuf>,
}

/// Catalog client and downloader wired together
#[derive(Debug)]
pub struct Pipeline {
    catalog: CatalogClient,
    downloader: Downloader,
    progress: ProgressReporter,
}

impl Pipeline {
    /// Build the pipeline described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the catalog
    /// base URL is invalid
    pub fn from_config(config: &AppConfig, progress: ProgressReporter) -> Result<Self> {
        let http = Arc::new(HttpHandler::from_config(&config.client)?);
        let catalog = CatalogClient::new(
            Arc::clone(&http),
            &config.catalog.base_url,
            config.catalog.cache_capacity,
        )?;
        let downloader = Downloader::new(http, config.download.clone(), progress.clone());

        Ok(Self {
            catalog,
            downloader,
            progress,
        })
    }

    /// Catalog client, for listing without downloading
    pub fn catalog(&mut self) -> &mut CatalogClient {
        &mut self.catalog
    }

    /// Downloader, for single-file downloads
    pub fn downloader(&mut self) -> &mut Downloader {
        &mut self.downloader
    }

    /// List every resource for a search, with a spinner while waiting
    ///
    /// # Errors
    ///
    /// Returns a network- or format-category error from the catalog
    pub async fn list(&mut self, query: &str, rows: u32) -> Result<Arc<DatasetTable>> {
        let spinner = self.progress.spinner("Listing catalog resources...");
        let result = self.catalog.list_resources(query, rows).await;
        spinner.finish_and_clear();
        Ok(result?)
    }

    /// List, filter and download into per-dataset directories
    ///
    /// # Errors
    ///
    /// Returns the listing error, a filesystem error creating `dest_dir`, or
    /// the first download that exhausted its retries
    pub async fn run(&mut self, options: &RunOptions) -> Result<RunSummary> {
        info!(
            "Fetching format {:?} resources for q={:?} rows={} into {}",
            options.format,
            options.query,
            options.rows,
            options.dest_dir.display()
        );

        let table = self.list(&options.query, options.rows).await?;
        tokio::fs::create_dir_all(&options.dest_dir).await?;

        let selection = filter_by_name_and_format(&table, &options.name_pattern, &options.format);
        info!(
            "Selected {} of {} resources",
            selection.len(),
            table.len()
        );
        if selection.is_empty() {
            warn!(
                "No resources match name {:?} and format {:?}",
                options.name_pattern, options.format
            );
        }

        let paths = download_filtered(&mut self.downloader, &selection, &options.dest_dir).await?;

        Ok(RunSummary {
            listed: table.len(),
            selected: selection.len(),
            paths,
        })
    }
}
