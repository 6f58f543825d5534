//! HTTP side of CAPES Fetcher
//!
//! The module is organized into specialized components:
//! - `config`: client, catalog and download settings
//! - `http`: rate-limited GET shared by everything below
//! - `catalog`: `package_search` listing with memoization
//! - `download`: chunked file downloads with retry and memoization

pub mod catalog;
pub mod config;
pub mod download;
pub mod http;

pub use catalog::CatalogClient;
pub use config::{CacheKeyMode, CatalogConfig, ClientConfig, DownloadConfig};
pub use download::{file_name_from_url, total_chunks, Downloader};
pub use http::HttpHandler;
