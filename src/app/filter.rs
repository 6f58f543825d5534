//! Client-side resource selection

use crate::app::models::{DatasetTable, ResourceView};

/// Select rows by dataset title substring and exact format label
///
/// Both comparisons are case-sensitive; `name_pattern` is a plain substring,
/// and an empty pattern matches every title. Matching rows keep their table
/// order. An empty result is not an error.
pub fn filter_by_name_and_format<'a>(
    table: &'a DatasetTable,
    name_pattern: &str,
    format: &str,
) -> ResourceView<'a> {
    ResourceView::new(
        table
            .iter()
            .filter(|record| record.dataset_name.contains(name_pattern) && record.format == format)
            .collect(),
    )
}
