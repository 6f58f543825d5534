//! Data models for CAPES Fetcher
//!
//! This module defines the typed shape of the CKAN `package_search` response
//! and the flattened table of downloadable resources built from it.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::errors::CatalogResult;

/// Envelope of a CKAN action response
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSearchResponse {
    /// Search payload
    pub result: PackageSearchResult,
}

/// Payload of a `package_search` call
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSearchResult {
    /// Datasets returned for this page
    pub results: Vec<CatalogDataset>,
}

/// A dataset ("package" in CKAN terms) and its resources
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDataset {
    /// Human-readable title, used for filtering and directory naming
    pub title: String,
    /// Machine name of the dataset
    #[serde(default)]
    pub name: Option<String>,
    /// Downloadable files of the dataset
    pub resources: Vec<CatalogResource>,
}

/// A single downloadable file as listed by the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResource {
    /// Download URL
    pub url: String,
    /// Format label, e.g. "CSV"
    pub format: String,
    /// Resource identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Resource display name
    #[serde(default)]
    pub name: Option<String>,
    /// Declared media type
    #[serde(default)]
    pub mimetype: Option<String>,
}

impl PackageSearchResponse {
    /// Decode a raw response body
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Format` if the body is not JSON or is missing
    /// any of the keys the search result requires
    pub fn from_slice(body: &[u8]) -> CatalogResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// One row of the flattened catalog: a resource annotated with its dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Download URL
    pub url: String,
    /// Format label, e.g. "CSV"
    pub format: String,
    /// Title of the parent dataset
    pub dataset_name: String,
    /// Machine name of the parent dataset
    pub dataset_id: Option<String>,
    /// Resource identifier
    pub resource_id: Option<String>,
    /// Resource display name
    pub resource_name: Option<String>,
    /// Declared media type
    pub mimetype: Option<String>,
}

impl ResourceRecord {
    /// Create a record with only the fields the pipeline relies on
    pub fn new(
        url: impl Into<String>,
        format: impl Into<String>,
        dataset_name: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            format: format.into(),
            dataset_name: dataset_name.into(),
            dataset_id: None,
            resource_id: None,
            resource_name: None,
            mimetype: None,
        }
    }
}

/// Ordered resources of one catalog response, one row per resource
///
/// Duplicate URLs across datasets are kept as separate rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetTable {
    records: Vec<ResourceRecord>,
}

impl DatasetTable {
    /// Wrap already flattened records
    pub fn new(records: Vec<ResourceRecord>) -> Self {
        Self { records }
    }

    /// Flatten datasets into one row per resource, in response order
    pub fn from_response(response: PackageSearchResponse) -> Self {
        let records = response
            .result
            .results
            .into_iter()
            .flat_map(|dataset| {
                let CatalogDataset {
                    title,
                    name,
                    resources,
                } = dataset;
                resources.into_iter().map(move |resource| ResourceRecord {
                    url: resource.url,
                    format: resource.format,
                    dataset_name: title.clone(),
                    dataset_id: name.clone(),
                    resource_id: resource.id,
                    resource_name: resource.name,
                    mimetype: resource.mimetype,
                })
            })
            .collect();
        Self { records }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate rows in order
    pub fn iter(&self) -> std::slice::Iter<'_, ResourceRecord> {
        self.records.iter()
    }

    /// Rows as a slice
    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    /// View over every row
    pub fn view(&self) -> ResourceView<'_> {
        ResourceView::new(self.records.iter().collect())
    }
}

impl Index<usize> for DatasetTable {
    type Output = ResourceRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a DatasetTable {
    type Item = &'a ResourceRecord;
    type IntoIter = std::slice::Iter<'a, ResourceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Borrowed, order-preserving selection of rows from a [`DatasetTable`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceView<'a> {
    rows: Vec<&'a ResourceRecord>,
}

impl<'a> ResourceView<'a> {
    /// Wrap selected rows
    pub fn new(rows: Vec<&'a ResourceRecord>) -> Self {
        Self { rows }
    }

    /// Number of selected rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing was selected
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate selected rows in table order
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, &'a ResourceRecord>> {
        self.rows.iter().copied()
    }
}

impl<'v, 'a> IntoIterator for &'v ResourceView<'a> {
    type Item = &'a ResourceRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a ResourceRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter().copied()
    }
}
