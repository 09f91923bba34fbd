//! twbdoc - Tableau workbook documenter
//!
//! Reads a Tableau workbook definition (`.twb`, plain XML) and documents it:
//! - Datasources and their columns, including calculated-field formulas
//! - Dashboards, their worksheets, and other dashboard objects
//! - Per-worksheet dimensions, measures, filters, and shelf placements
//!
//! The resolved model renders to an XLSX workbook (one sheet per dashboard),
//! a DOCX narrative with a numbered annotation checklist, JSON, or a text overview.
//!
//! # Usage
//!
//! ```no_run
//! let data = std::fs::read("Sales.twb")?;
//! let workbook = twbdoc::parse_twb(&data)?;
//! let xlsx = twbdoc::export::export_xlsx(&workbook.dashboards)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Parsing modules
pub mod dom;
pub mod error;
pub mod names;
pub mod parser;
pub mod types;
pub mod xml_helpers;

// Output modules
pub mod cell_ref;
pub mod export;
pub mod summary;

pub use error::{Result, TwbdocError};
pub use types::*;

/// Parse a `.twb` document into its documentation model.
///
/// # Errors
/// Returns an error if the input is not well-formed XML.
pub fn parse_twb(data: &[u8]) -> Result<ParsedWorkbook> {
    parser::parse(data)
}

/// Parse a `.twb` document and return the model as a JSON string.
///
/// # Errors
/// Returns an error if the input is not well-formed XML.
pub fn parse_twb_to_json(data: &[u8]) -> Result<String> {
    let workbook = parser::parse(data)?;
    Ok(serde_json::to_string_pretty(&workbook)?)
}

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
