//! Sequential download of a selection of resources
//!
//! Each resource lands in a subdirectory named after the slug of its dataset
//! title. Rows are processed strictly in order and the first download that
//! exhausts its retries aborts the rest of the batch.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::app::client::Downloader;
use crate::app::models::ResourceRecord;
use crate::app::slug::slugify;
use crate::errors::DownloadResult;

/// Directory a resource is downloaded into: `dest_dir/<slug of its dataset title>`
pub fn dataset_dir(dest_dir: &Path, record: &ResourceRecord) -> PathBuf {
    dest_dir.join(slugify(&record.dataset_name))
}

/// Download every row into its dataset directory under `dest_dir`
///
/// Returns the written paths in row order. An empty selection returns an
/// empty list without any request.
///
/// # Errors
///
/// Returns the first `DownloadError` raised; rows after it are not attempted
/// and files already written stay on disk
pub async fn download_filtered<'a, I>(
    downloader: &mut Downloader,
    rows: I,
    dest_dir: &Path,
) -> DownloadResult<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a ResourceRecord>,
    I::IntoIter: ExactSizeIterator,
{
    let rows = rows.into_iter();
    let total = rows.len();
    if total == 0 {
        debug!("Nothing to download");
        return Ok(Vec::new());
    }

    info!("Downloading {} resources into {}", total, dest_dir.display());
    let bar = downloader.progress().batch_bar(total);
    let mut paths = Vec::with_capacity(total);

    for record in rows {
        let target_dir = dataset_dir(dest_dir, record);
        match downloader.download_file(&record.url, &target_dir).await {
            Ok(path) => {
                paths.push(path);
                bar.inc(1);
            }
            Err(e) => {
                bar.abandon();
                return Err(e);
            }
        }
    }

    bar.finish_and_clear();
    Ok(paths)
}
