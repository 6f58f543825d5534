//! Application constants for CAPES Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Catalog API defaults
pub mod catalog {
    /// CAPES open-data portal CKAN action API
    pub const BASE_URL: &str = "https://dadosabertos.capes.gov.br/api/3/action";

    /// Dataset search action appended to the base URL
    pub const SEARCH_PATH: &str = "package_search";

    /// Default search query (thesis and dissertation catalog group)
    pub const DEFAULT_QUERY: &str = "catalogo-de-teses-e-dissertacoes";

    /// Default number of datasets requested per search
    pub const DEFAULT_ROWS: u32 = 10;
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("CAPES-Fetcher/", env!("CARGO_PKG_VERSION"));

    /// Whole-request timeout for catalog listings
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Longest wait for the next piece of a download before the attempt fails
    pub const READ_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default rate limit for outgoing requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 5;
}

/// Retry configuration for downloads
pub mod retry {
    use super::Duration;

    /// Total attempts per download, first one included
    pub const MAX_ATTEMPTS: u32 = 5;

    /// Lower bound of the random wait between attempts
    pub const MIN_DELAY: Duration = Duration::from_secs(1);

    /// Upper bound of the random wait between attempts
    pub const MAX_DELAY: Duration = Duration::from_secs(5);
}

/// File operation constants
pub mod files {
    /// Download chunk size for streaming (1MB)
    pub const DOWNLOAD_CHUNK_SIZE: usize = 1_000_000;

    /// Default destination directory
    pub const DEFAULT_DEST_DIR: &str = ".";

    /// Default resource format to download
    pub const DEFAULT_FORMAT: &str = "CSV";

    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "capes-fetcher.toml";

    /// Directory under the user config dir holding `config.toml`
    pub const CONFIG_DIR_NAME: &str = "capes-fetcher";
}

/// Memoization cache constants
pub mod cache {
    /// Distinct argument combinations remembered per component
    pub const DEFAULT_CAPACITY: usize = 128;
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

pub use catalog::{BASE_URL as CATALOG_BASE_URL, DEFAULT_QUERY, DEFAULT_ROWS};
pub use files::{DEFAULT_DEST_DIR, DEFAULT_FORMAT, DOWNLOAD_CHUNK_SIZE};
pub use http::USER_AGENT;
pub use retry::MAX_ATTEMPTS;
