//! Rate-limited HTTP GET shared by the catalog client and the downloader
//!
//! No retry happens here: catalog listings are never retried and downloads
//! are retried as a whole by the downloader's `RetryPolicy`. Listings get a
//! whole-request timeout; streamed download responses do not.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use crate::app::client::config::ClientConfig;
use crate::errors::{ConfigError, ConfigResult, Result};

type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// HTTP operations handler with client-side rate limiting
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: DirectRateLimiter,
    request_timeout: Option<Duration>,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limiting
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `rate_limit_rps` is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> ConfigResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
            request_timeout: None,
        })
    }

    /// Sets the whole-request timeout used by [`HttpHandler::get`]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Whole-request timeout applied by [`HttpHandler::get`], if any
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Builds the client described by `config` and wraps it
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised or the rate
    /// limit is zero
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = config.build_http_client().map_err(|e| ConfigError::InvalidValue {
            field: "client".to_string(),
            value: config.user_agent.clone(),
            reason: e.to_string(),
        })?;
        let handler = Self::new(client, config.rate_limit_rps)?;
        Ok(handler.with_request_timeout(config.request_timeout))
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> ConfigResult<DirectRateLimiter> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| ConfigError::InvalidValue {
            field: "client.rate_limit_rps".to_string(),
            value: rate_limit_rps.to_string(),
            reason: "Rate limit must be non-zero".to_string(),
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    /// Sends a GET request bounded by the whole-request timeout
    ///
    /// The response is returned whatever its status; callers decide which
    /// statuses are failures. Reading the body is covered by the same
    /// timeout.
    pub async fn get(&self, url: &Url) -> reqwest::Result<Response> {
        let mut request = self.client.get(url.clone());
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }
        self.send(url, request).await
    }

    /// Sends a GET request with no overall deadline, for streamed bodies
    ///
    /// Callers bound the wait for each piece of the response themselves.
    pub async fn get_stream(&self, url: &Url) -> reqwest::Result<Response> {
        self.send(url, self.client.get(url.clone())).await
    }

    async fn send(&self, url: &Url, request: RequestBuilder) -> reqwest::Result<Response> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        tracing::debug!("GET {}", url);
        request.send().await
    }

    /// Get a reference to the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}
