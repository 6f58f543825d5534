//! Prelude module for CAPES Fetcher
//!
//! Re-exports the items needed for typical library usage with a single
//! `use capes_fetcher::prelude::*;` statement.
//!
//! ```rust,no_run
//! use capes_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::default();
//!     let mut pipeline = Pipeline::from_config(&config, ProgressReporter::hidden())?;
//!     let table = pipeline.list(&config.catalog.query, config.catalog.rows).await?;
//!
//!     for record in filter_by_name_and_format(&table, "", "CSV").iter() {
//!         println!("{} -> {}", slugify(&record.dataset_name), record.url);
//!     }
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

pub use crate::app::{
    download_filtered, filter_by_name_and_format, slugify, CacheKeyMode, CatalogClient,
    DatasetTable, Downloader, HttpHandler, Pipeline, ProgressReporter, ResourceRecord,
    ResourceView, RetryPolicy, RunOptions, RunSummary,
};
pub use crate::config::AppConfig;

pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

pub use tokio;
