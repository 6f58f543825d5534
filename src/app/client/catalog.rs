//! CKAN `package_search` listing
//!
//! One GET per distinct `(query, rows)` per client: results are memoized and
//! shared out as `Arc<DatasetTable>`. Failures are not retried.

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::app::cache::{MemoCache, MemoStats};
use crate::app::client::http::HttpHandler;
use crate::app::models::{DatasetTable, PackageSearchResponse};
use crate::constants::catalog;
use crate::errors::{CatalogError, CatalogResult};

/// Client for the catalog's dataset search action
#[derive(Debug)]
pub struct CatalogClient {
    http: Arc<HttpHandler>,
    endpoint: Url,
    cache: MemoCache<(String, u32), Arc<DatasetTable>>,
}

impl CatalogClient {
    /// Create a client searching `<base_url>/package_search`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidUrl` if `base_url` is not an absolute URL
    pub fn new(http: Arc<HttpHandler>, base_url: &str, cache_capacity: usize) -> CatalogResult<Self> {
        let raw = format!("{}/{}", base_url.trim_end_matches('/'), catalog::SEARCH_PATH);
        let endpoint = Url::parse(&raw).map_err(|e| CatalogError::InvalidUrl {
            url: raw.clone(),
            error: e.to_string(),
        })?;

        Ok(Self {
            http,
            endpoint,
            cache: MemoCache::new(cache_capacity),
        })
    }

    /// The search endpoint, without query parameters
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for a search
    pub fn search_url(&self, query: &str, max_rows: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("rows", &max_rows.to_string());
        url
    }

    /// List every resource of the first `max_rows` datasets matching `query`
    ///
    /// Repeated calls with the same arguments return the table from the first
    /// call without another request.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` or `CatalogError::Status` when the request
    /// fails, and `CatalogError::Format` when the body does not have the
    /// expected shape
    pub async fn list_resources(
        &mut self,
        query: &str,
        max_rows: u32,
    ) -> CatalogResult<Arc<DatasetTable>> {
        let key = (query.to_string(), max_rows);
        if let Some(table) = self.cache.get(&key) {
            debug!("Catalog listing for q={:?} rows={} served from cache", query, max_rows);
            return Ok(table);
        }

        let url = self.search_url(query, max_rows);
        let response = self.http.get(&url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let parsed = PackageSearchResponse::from_slice(&body)?;
        let datasets = parsed.result.results.len();
        let table = Arc::new(DatasetTable::from_response(parsed));

        info!(
            "Catalog listed {} resources across {} datasets for q={:?}",
            table.len(),
            datasets,
            query
        );

        self.cache.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Listing cache statistics
    pub fn cache_stats(&self) -> MemoStats {
        self.cache.stats()
    }
}
