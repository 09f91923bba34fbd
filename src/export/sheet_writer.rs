//! Generates worksheet XML for a dashboard sheet.
//!
//! Cells use inline strings (`t="inlineStr"`), so no shared string table is
//! written. Row 1 holds the bold header.

use crate::cell_ref::{cell_ref, col_to_letter};
use crate::xml_helpers::xml_escape;

use super::rows::{ReportRow, HEADERS};

/// Style index of the bold header cells in the generated `styles.xml`.
pub(crate) const HEADER_STYLE: u32 = 1;

/// Column widths in Excel character units for Section, Item, Details.
const COLUMN_WIDTHS: [f64; 3] = [32.0, 28.0, 90.0];

/// Write a complete worksheet XML string for a header plus `rows`.
pub(crate) fn write_sheet_xml(rows: &[ReportRow]) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    // <dimension>
    let last_row = rows.len() + 1;
    let end_col = col_to_letter(u32::try_from(HEADERS.len().saturating_sub(1)).unwrap_or(0));
    out.push_str(&format!("<dimension ref=\"A1:{end_col}{last_row}\"/>\n"));

    // <sheetViews>: header row frozen
    out.push_str("<sheetViews><sheetView workbookViewId=\"0\">");
    out.push_str("<pane ySplit=\"1\" topLeftCell=\"A2\" activePane=\"bottomLeft\" state=\"frozen\"/>");
    out.push_str("</sheetView></sheetViews>\n");

    // <cols>
    out.push_str("<cols>\n");
    for (idx, width) in COLUMN_WIDTHS.iter().enumerate() {
        let col1 = idx + 1; // XLSX is 1-based
        out.push_str(&format!(
            "<col min=\"{col1}\" max=\"{col1}\" width=\"{width:.4}\" customWidth=\"1\"/>\n"
        ));
    }
    out.push_str("</cols>\n");

    // <sheetData>
    out.push_str("<sheetData>\n");
    write_row(&mut out, 0, &HEADERS, Some(HEADER_STYLE));
    for (idx, row) in rows.iter().enumerate() {
        let row_idx = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        write_row(&mut out, row_idx, &row.cells(), None);
    }
    out.push_str("</sheetData>\n");

    out.push_str("</worksheet>");
    out
}

/// Write a single `<row>` of inline-string cells.
fn write_row(out: &mut String, row: u32, values: &[&str], style: Option<u32>) {
    out.push_str(&format!("<row r=\"{}\">", u64::from(row) + 1));
    for (col, value) in values.iter().enumerate() {
        let col = u32::try_from(col).unwrap_or(u32::MAX);
        write_cell(out, &cell_ref(row, col), value, style);
    }
    out.push_str("</row>\n");
}

/// Write a single `<c>` element holding an inline string.
fn write_cell(out: &mut String, cell_ref: &str, value: &str, style: Option<u32>) {
    out.push_str(&format!("<c r=\"{cell_ref}\""));
    if let Some(si) = style {
        out.push_str(&format!(" s=\"{si}\""));
    }
    out.push_str(" t=\"inlineStr\"><is><t xml:space=\"preserve\">");
    out.push_str(&xml_escape(value));
    out.push_str("</t></is></c>");
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_sheet() {
        let xml = write_sheet_xml(&[]);
        assert!(xml.contains("<dimension ref=\"A1:C1\"/>"));
        assert!(xml.contains(
            "<c r=\"A1\" s=\"1\" t=\"inlineStr\"><is><t xml:space=\"preserve\">Section</t></is></c>"
        ));
        assert!(xml.contains("<t xml:space=\"preserve\">Details</t>"));
        assert!(!xml.contains("<row r=\"2\">"));
    }

    #[test]
    fn test_rows_escaped_and_numbered() {
        let rows = vec![ReportRow {
            section: "Worksheet: P&L".into(),
            item: "Calculated Field".into(),
            details: "Ratio (Formula: [a] < [b])".into(),
        }];
        let xml = write_sheet_xml(&rows);
        assert!(xml.contains("<dimension ref=\"A1:C2\"/>"));
        assert!(xml.contains("<row r=\"2\"><c r=\"A2\" t=\"inlineStr\">"));
        assert!(xml.contains("Worksheet: P&amp;L"));
        assert!(xml.contains("Ratio (Formula: [a] &lt; [b])"));
    }
}
