//! CAPES Fetcher Library
//!
//! Lists the downloadable resources of a CKAN open-data catalog (by default
//! the CAPES portal), filters them by dataset title and format, and downloads
//! the matching files into one directory per dataset with retry and progress
//! reporting.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
