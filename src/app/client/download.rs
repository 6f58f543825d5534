//! Streaming file downloads with retry and memoization
//!
//! A transfer writes the response body to `<dest_dir>/<last URL segment>` in
//! fixed-size chunks. The whole transfer is the unit of retry. There is no
//! overall deadline: an attempt fails only when the server stays silent for
//! longer than the read timeout. Successful
//! downloads are remembered so a repeated request for the same URL returns
//! the earlier path without touching the network.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use indicatif::ProgressBar;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};
use url::Url;

use crate::app::cache::{MemoCache, MemoStats};
use crate::app::client::config::{CacheKeyMode, DownloadConfig};
use crate::app::client::http::HttpHandler;
use crate::app::progress::ProgressReporter;
use crate::errors::{DownloadError, DownloadResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DownloadKey {
    Url(String),
    UrlAndDestination(String, PathBuf),
}

/// Derive the local file name from the final path segment of a URL
///
/// Query string and fragment are not part of the name. Returns `None` when
/// the path ends with a slash or has no segments.
pub fn file_name_from_url(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Progress bar length for a body of `content_length` bytes: the number of
/// whole chunks it holds, or zero (spinner) when the length is unknown
pub fn total_chunks(content_length: Option<u64>, chunk_size: usize) -> u64 {
    let chunk_size = chunk_size.max(1) as u64;
    content_length.map_or(0, |len| len / chunk_size)
}

/// Downloads files one at a time with retry and per-URL memoization
#[derive(Debug)]
pub struct Downloader {
    http: Arc<HttpHandler>,
    config: DownloadConfig,
    cache: MemoCache<DownloadKey, PathBuf>,
    progress: ProgressReporter,
}

impl Downloader {
    /// Create a downloader sharing `http` with other components
    pub fn new(http: Arc<HttpHandler>, config: DownloadConfig, progress: ProgressReporter) -> Self {
        let cache = MemoCache::new(config.cache_capacity);
        Self {
            http,
            config,
            cache,
            progress,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Progress reporter used for file bars
    pub fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    /// Download cache statistics
    pub fn cache_stats(&self) -> MemoStats {
        self.cache.stats()
    }

    /// Whether a call with these arguments would be answered from the cache
    pub fn is_cached(&self, url: &str, dest_dir: &Path) -> bool {
        self.cache.contains(&self.cache_key(url, dest_dir))
    }

    fn cache_key(&self, url: &str, dest_dir: &Path) -> DownloadKey {
        match self.config.cache_key {
            CacheKeyMode::Url => DownloadKey::Url(url.to_string()),
            CacheKeyMode::UrlAndDestination => {
                DownloadKey::UrlAndDestination(url.to_string(), dest_dir.to_path_buf())
            }
        }
    }

    /// Download `url` into `dest_dir`, returning the written file's path
    ///
    /// `dest_dir` is created if absent. A failing transfer is retried
    /// according to the configured policy. With the default URL-only cache
    /// key, a second call for the same URL returns the first call's path even
    /// when `dest_dir` differs.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::InvalidUrl` or `DownloadError::NoFileName`
    /// without any attempt, and `DownloadError::RetriesExhausted` wrapping
    /// the last failure once every attempt failed
    pub async fn download_file(&mut self, url: &str, dest_dir: &Path) -> DownloadResult<PathBuf> {
        let key = self.cache_key(url, dest_dir);
        if let Some(path) = self.cache.get(&key) {
            debug!("{} already downloaded to {}", url, path.display());
            return Ok(path);
        }

        let parsed = Url::parse(url).map_err(|e| DownloadError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        })?;
        let file_name = file_name_from_url(&parsed).ok_or_else(|| DownloadError::NoFileName {
            url: url.to_string(),
        })?;
        let dest_path = dest_dir.join(&file_name);

        let this = &*self;
        let target = (&parsed, dest_path.as_path(), file_name.as_str());
        let outcome = this
            .config
            .retry
            .run(move |attempt| async move {
                let (url, path, name) = target;
                debug!("Downloading {} (attempt {})", url, attempt);
                this.transfer(url, dest_dir, path, name).await
            })
            .await;

        match outcome {
            Ok(()) => {
                info!("Downloaded {} to {}", url, dest_path.display());
                self.cache.insert(key, dest_path.clone());
                Ok(dest_path)
            }
            Err(exhausted) => {
                error!(
                    "Download of {} failed after {} attempts: {}",
                    url, exhausted.attempts, exhausted.last_error
                );
                Err(DownloadError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: exhausted.attempts,
                    source: Box::new(exhausted.last_error),
                })
            }
        }
    }

    /// One attempt: request, then stream the body to `dest_path`
    async fn transfer(
        &self,
        url: &Url,
        dest_dir: &Path,
        dest_path: &Path,
        file_name: &str,
    ) -> DownloadResult<()> {
        tokio::fs::create_dir_all(dest_dir).await?;

        let read_timeout = self.config.read_timeout;
        let response = tokio::time::timeout(read_timeout, self.http.get_stream(url))
            .await
            .map_err(|_| DownloadError::Stalled {
                url: url.to_string(),
                timeout: read_timeout,
            })??;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let chunk_size = self.config.chunk_size.max(1);
        let total = total_chunks(response.content_length(), chunk_size);

        let mut file = File::create(dest_path).await?;
        let bar = self.progress.file_bar(file_name, total);
        let written = write_chunked(response, &mut file, chunk_size, read_timeout, &bar).await;
        bar.finish_and_clear();

        let bytes = written?;
        debug!("Wrote {} bytes to {}", bytes, dest_path.display());
        Ok(())
    }
}

/// Copy the body into `file` in writes of exactly `chunk_size` bytes, the
/// last one possibly shorter, ticking `bar` once per write
///
/// Fails with `DownloadError::Stalled` when no body data arrives for
/// `read_timeout`.
async fn write_chunked(
    response: reqwest::Response,
    file: &mut File,
    chunk_size: usize,
    read_timeout: Duration,
    bar: &ProgressBar,
) -> DownloadResult<u64> {
    let url = response.url().to_string();
    let mut stream = response.bytes_stream();
    let mut buffer = Vec::with_capacity(chunk_size);
    let mut written = 0u64;

    loop {
        let item = match tokio::time::timeout(read_timeout, stream.next()).await {
            Ok(Some(item)) => item,
            Ok(None) => break,
            Err(_) => {
                return Err(DownloadError::Stalled {
                    url,
                    timeout: read_timeout,
                })
            }
        };
        let bytes = item?;
        let mut rest = &bytes[..];
        while !rest.is_empty() {
            let take = (chunk_size - buffer.len()).min(rest.len());
            buffer.extend_from_slice(&rest[..take]);
            rest = &rest[take..];

            if buffer.len() == chunk_size {
                file.write_all(&buffer).await?;
                written += buffer.len() as u64;
                buffer.clear();
                bar.inc(1);
            }
        }
    }

    if !buffer.is_empty() {
        file.write_all(&buffer).await?;
        written += buffer.len() as u64;
        bar.inc(1);
    }

    file.flush().await?;
    Ok(written)
}
