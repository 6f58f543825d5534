//! Error types for CAPES Fetcher
//!
//! Errors are grouped by the component that raises them: the catalog listing,
//! the file downloader and configuration loading. `AppError` unifies them for
//! the command-line layer and maps every variant onto one of the categories
//! reported to the user (network, format, filesystem, download, config).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Catalog listing errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The request could not be sent or the body could not be read
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status
    #[error("Catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body does not match the `package_search` shape
    #[error("Unexpected catalog response format: {0}")]
    Format(#[from] serde_json::Error),

    /// The configured base URL cannot be turned into an endpoint
    #[error("Invalid catalog URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },
}

/// Download and file writing errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request or body stream failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned error status
    #[error("Server error: HTTP {status} for {url}")]
    ServerError { status: u16, url: String },

    /// No response or body data arrived within the read timeout
    #[error("No data received from {url} for {timeout:?}")]
    Stalled { url: String, timeout: Duration },

    /// Creating the destination directory or writing the file failed
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// The URL has no final path segment to name the local file after
    #[error("Cannot derive a file name from URL: {url}")]
    NoFileName { url: String },

    /// Every attempt failed; carries the error of the last one
    #[error("Download of {url} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<DownloadError>,
    },
}

impl DownloadError {
    /// Whether another attempt of the same transfer could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DownloadError::Http(_)
                | DownloadError::ServerError { .. }
                | DownloadError::Stalled { .. }
                | DownloadError::Io(_)
        )
    }

    /// The innermost error, looking through `RetriesExhausted`
    pub fn root(&self) -> &DownloadError {
        match self {
            DownloadError::RetriesExhausted { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Catalog listing error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Catalog(CatalogError::Http(_)) => true,
            AppError::Catalog(CatalogError::Status { status, .. }) => *status >= 500,
            AppError::Download(err) => err.root().is_transient(),
            _ => false,
        }
    }

    /// Get error category for logging and user reporting
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Catalog(CatalogError::Format(_)) => "format",
            AppError::Catalog(_) => "network",
            AppError::Download(DownloadError::Http(_))
            | AppError::Download(DownloadError::ServerError { .. })
            | AppError::Download(DownloadError::Stalled { .. }) => "network",
            AppError::Download(DownloadError::Io(_)) | AppError::Io(_) => "filesystem",
            AppError::Download(_) => "download",
            AppError::Config(_) => "config",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Catalog result type alias
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
