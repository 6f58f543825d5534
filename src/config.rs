//! Configuration management for CAPES Fetcher
//!
//! Settings come from a TOML file when one is found, falling back to built-in
//! defaults for every missing table or key. Command-line flags override the
//! catalog query and row count per invocation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{CatalogConfig, ClientConfig, DownloadConfig};
use crate::constants::{files, logging};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog endpoint and default search
    pub catalog: CatalogConfig,
    /// HTTP client settings
    pub client: ClientConfig,
    /// Downloader settings
    pub download: DownloadConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with precedence:
    /// 1. Explicit file (must exist)
    /// 2. `./capes-fetcher.toml`
    /// 3. `<user config dir>/capes-fetcher/config.toml`
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit file is missing, a file cannot be
    /// read or parsed, or a value fails validation
    pub async fn load(config_file_override: Option<&Path>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(path) => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            None => Self::find_config_file(),
        };

        let config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found in standard locations, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFormat` on malformed TOML or wrong types
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject values the pipeline cannot run with
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field: &str, value: String, reason: &str| {
            Err(ConfigError::InvalidValue {
                field: field.to_string(),
                value,
                reason: reason.to_string(),
            })
        };

        if self.catalog.rows == 0 {
            return invalid("catalog.rows", "0".to_string(), "At least one row is required");
        }
        if self.client.rate_limit_rps == 0 {
            return invalid(
                "client.rate_limit_rps",
                "0".to_string(),
                "Rate limit must be non-zero",
            );
        }
        if self.download.chunk_size == 0 {
            return invalid("download.chunk_size", "0".to_string(), "Chunk size must be non-zero");
        }
        if self.download.retry.max_attempts == 0 {
            return invalid(
                "download.max_attempts",
                "0".to_string(),
                "At least one attempt is required",
            );
        }
        if self.download.read_timeout.is_zero() {
            return invalid(
                "download.read_timeout",
                "0s".to_string(),
                "Read timeout must be non-zero",
            );
        }
        if self.download.retry.min_delay > self.download.retry.max_delay {
            return invalid(
                "download.min_delay",
                format!("{:?}", self.download.retry.min_delay),
                "Must not exceed download.max_delay",
            );
        }
        Ok(())
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(".").join(files::LOCAL_CONFIG_FILE)];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(files::CONFIG_DIR_NAME).join("config.toml"))
    }

    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }
}
