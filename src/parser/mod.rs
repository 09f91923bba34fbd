//! Workbook parser
//!
//! Runs the three resolution stages over one `.twb` document: datasource
//! extraction, worksheet indexing, and dashboard resolution.

pub mod dashboard;
pub mod datasource;
pub mod shelves;
pub mod worksheet;

use crate::dom::parse_document;
use crate::error::Result;
use crate::types::ParsedWorkbook;

pub use dashboard::resolve_dashboards;
pub use datasource::extract_datasources;
pub use worksheet::{resolve_worksheet, worksheet_index};

/// Parse a `.twb` document into its documentation model.
///
/// # Errors
/// Returns an error if the input is not well-formed XML. No partial model is
/// produced in that case.
pub fn parse(data: &[u8]) -> Result<ParsedWorkbook> {
    let root = parse_document(data)?;

    let datasources = extract_datasources(&root);
    let worksheets = worksheet_index(&root);
    log::info!(
        "found {} datasources and {} worksheets",
        datasources.len(),
        worksheets.len()
    );

    let (dashboards, warnings) = resolve_dashboards(&root, &worksheets, &datasources);
    log::info!(
        "resolved {} dashboards ({} warnings)",
        dashboards.len(),
        warnings.len()
    );

    Ok(ParsedWorkbook {
        datasources,
        dashboards,
        warnings,
    })
}
