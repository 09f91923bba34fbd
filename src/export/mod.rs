//! Documentation exporters.
//!
//! Both outputs are OOXML packages assembled in memory: a spreadsheet with one
//! sheet per dashboard, and a narrative word-processing document.

mod docx;
mod package;
pub mod rows;
mod sheet_writer;
mod xlsx;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::Dashboard;

/// Settings shared by the exporters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Title heading of the narrative document
    pub title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "Tableau Workbook Documentation".to_string(),
        }
    }
}

/// Render the tabular export as XLSX bytes.
///
/// # Errors
/// Returns an error if the ZIP package cannot be written.
pub fn export_xlsx(dashboards: &[Dashboard]) -> Result<Vec<u8>> {
    let bytes = xlsx::build_xlsx(dashboards)?;
    log::info!(
        "wrote XLSX export: {} sheets, {} bytes",
        dashboards.len().max(1),
        bytes.len()
    );
    Ok(bytes)
}

/// Render the narrative export as DOCX bytes.
///
/// # Errors
/// Returns an error if the ZIP package cannot be written.
pub fn export_docx(dashboards: &[Dashboard], options: &ExportOptions) -> Result<Vec<u8>> {
    let bytes = docx::build_docx(dashboards, options)?;
    log::info!("wrote DOCX export: {} bytes", bytes.len());
    Ok(bytes)
}

/// Output file for `input` with the given extension: `report.twb` becomes
/// `report_documentation.<extension>`, placed in `output_dir` when given and
/// next to the input otherwise.
pub fn documentation_path(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string());
    let file_name = format!("{stem}_documentation.{extension}");
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_documentation_path_next_to_input() {
        let path = documentation_path(Path::new("/data/Sales Report.twb"), None, "xlsx");
        assert_eq!(path, PathBuf::from("/data/Sales Report_documentation.xlsx"));
    }

    #[test]
    fn test_documentation_path_in_output_dir() {
        let path = documentation_path(Path::new("book.twb"), Some(Path::new("out")), "docx");
        assert_eq!(path, PathBuf::from("out/book_documentation.docx"));
    }
}
