//! Core application logic for CAPES Fetcher
//!
//! This module contains the catalog client, the resource filter, the file
//! downloader and the pipeline that wires them together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use capes_fetcher::app::{Pipeline, ProgressReporter, RunOptions};
//! use capes_fetcher::config::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let mut pipeline = Pipeline::from_config(&config, ProgressReporter::default())?;
//!
//! let options = RunOptions {
//!     dest_dir: "./capes".into(),
//!     ..RunOptions::from_config(&config)
//! };
//! let summary = pipeline.run(&options).await?;
//! println!("Downloaded {} files", summary.paths.len());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod cache;
pub mod client;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod retry;
pub mod slug;

// Re-export main public API
pub use batch::{dataset_dir, download_filtered};
pub use cache::{MemoCache, MemoStats};
pub use client::{
    CacheKeyMode, CatalogClient, CatalogConfig, ClientConfig, DownloadConfig, Downloader,
    HttpHandler,
};
pub use filter::filter_by_name_and_format;
pub use models::{DatasetTable, PackageSearchResponse, ResourceRecord, ResourceView};
pub use pipeline::{Pipeline, RunOptions, RunSummary};
pub use progress::ProgressReporter;
pub use retry::{Exhausted, RetryPolicy};
pub use slug::slugify;
