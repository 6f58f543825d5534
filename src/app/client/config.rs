//! HTTP client, catalog and download configuration
//!
//! These structures double as the `[client]`, `[catalog]` and `[download]`
//! tables of the configuration file; durations are written in humantime
//! notation ("30s", "1500ms").

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app::retry::RetryPolicy;
use crate::constants::{cache, catalog, files, http};

/// Configuration for the shared HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Whole-request timeout for catalog listings, body included; downloads
    /// use `DownloadConfig::read_timeout` instead
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
    /// User agent sent with every request
    pub user_agent: String,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Honour HTTP(S)_PROXY and friends from the environment
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            rate_limit_rps: http::DEFAULT_RATE_LIMIT_RPS,
            user_agent: http::USER_AGENT.to_string(),
            tcp_nodelay: true,
            use_system_proxy: true,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    ///
    /// No overall timeout is set on the client: `request_timeout` is applied
    /// per request by `HttpHandler::get`.
    pub fn build_http_client(&self) -> reqwest::Result<Client> {
        let mut client_builder = Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .tcp_nodelay(self.tcp_nodelay);

        if !self.use_system_proxy {
            client_builder = client_builder.no_proxy();
        }

        client_builder.build()
    }
}

/// Where and what to search in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// CKAN action API base, `package_search` is appended to it
    pub base_url: String,
    /// Default search query
    pub query: String,
    /// Default number of datasets per search
    pub rows: u32,
    /// Distinct (query, rows) listings remembered
    pub cache_capacity: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: catalog::BASE_URL.to_string(),
            query: catalog::DEFAULT_QUERY.to_string(),
            rows: catalog::DEFAULT_ROWS,
            cache_capacity: cache::DEFAULT_CAPACITY,
        }
    }
}

/// What identifies a previous download in the memoization cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheKeyMode {
    /// The URL alone: a repeat call with another destination directory
    /// returns the first path and writes nothing
    #[default]
    Url,
    /// URL and destination directory together
    UrlAndDestination,
}

/// File downloader settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Bytes written to disk per chunk
    pub chunk_size: usize,
    /// Attempts and waits for a failing transfer
    #[serde(flatten)]
    pub retry: RetryPolicy,
    /// Distinct downloads remembered
    pub cache_capacity: usize,
    /// Memoization key
    pub cache_key: CacheKeyMode,
    /// Longest silence allowed while waiting for the response or the next
    /// body piece; a transfer that keeps receiving data never times out
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            chunk_size: files::DOWNLOAD_CHUNK_SIZE,
            retry: RetryPolicy::default(),
            cache_capacity: cache::DEFAULT_CAPACITY,
            cache_key: CacheKeyMode::default(),
            read_timeout: http::READ_TIMEOUT,
        }
    }
}
