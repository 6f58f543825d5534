//! Command handlers for CAPES Fetcher CLI
//!
//! These handlers translate parsed arguments into pipeline calls and print
//! results for the user; all network and file work happens in `app`.

use std::time::Instant;

use tracing::info;

use crate::app::{filter_by_name_and_format, Pipeline, ProgressReporter, ResourceRecord};
use crate::cli::{ListArgs, RunArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the run command
///
/// Lists the catalog, keeps resources matching the name and format, and
/// downloads them under the destination directory.
pub async fn handle_run(args: RunArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    args.validate().map_err(AppError::generic)?;
    let options = args.to_options(config);

    let start_time = Instant::now();
    let mut pipeline = Pipeline::from_config(config, ProgressReporter::new(!quiet))?;
    let summary = pipeline.run(&options).await?;

    info!(
        "Run finished in {:?}: {} listed, {} selected, {} downloaded",
        start_time.elapsed(),
        summary.listed,
        summary.selected,
        summary.paths.len()
    );

    if summary.selected == 0 {
        println!(
            "No {} resources found among {} listed (name filter {:?})",
            options.format, summary.listed, options.name_pattern
        );
        return Ok(());
    }

    if !quiet {
        for path in &summary.paths {
            println!("{}", path.display());
        }
    }
    println!(
        "Downloaded {} of {} listed resources into {}",
        summary.paths.len(),
        summary.listed,
        options.dest_dir.display()
    );
    Ok(())
}

/// Handle the list command
///
/// Prints one line per resource: dataset title, format and URL.
pub async fn handle_list(args: ListArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    if args.search.rows == Some(0) {
        return Err(AppError::generic("Rows must be greater than 0"));
    }

    let mut pipeline = Pipeline::from_config(config, ProgressReporter::new(!quiet))?;
    let table = pipeline
        .list(&args.search.query(config), args.search.rows(config))
        .await?;

    let rows: Vec<&ResourceRecord> = match &args.format {
        Some(format) => filter_by_name_and_format(&table, &args.search.name, format)
            .iter()
            .collect(),
        None => table
            .iter()
            .filter(|record| record.dataset_name.contains(&args.search.name))
            .collect(),
    };

    for record in &rows {
        println!("{}", format_record(record));
    }
    println!("{} of {} resources", rows.len(), table.len());
    Ok(())
}

/// One tab-separated listing line
fn format_record(record: &ResourceRecord) -> String {
    let format = if record.format.is_empty() {
        "-"
    } else {
        record.format.as_str()
    };
    format!("{}\t{}\t{}", record.dataset_name, format, record.url)
}
