//! XLSX package for the tabular export: one sheet per dashboard.

use crate::error::Result;
use crate::types::Dashboard;
use crate::xml_helpers::xml_escape;

use super::package::{
    content_types_xml, relationships_xml, write_package, Part, REL_OFFICE_DOCUMENT, REL_STYLES,
    XML_DECLARATION,
};
use super::rows::{dashboard_rows, sheet_name};
use super::sheet_writer::write_sheet_xml;

const CT_WORKBOOK: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

/// Sheet used when a workbook has no dashboards; an XLSX needs at least one sheet.
pub(crate) const EMPTY_SHEET_NAME: &str = "Dashboards";

/// Fonts: regular and bold. Cell formats: default and bold header.
const STYLES_XML: &str = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/><family val="2"/></font><font><b/><sz val="11"/><name val="Calibri"/><family val="2"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Build the complete XLSX package.
pub(crate) fn build_xlsx(dashboards: &[Dashboard]) -> Result<Vec<u8>> {
    let sheets: Vec<(String, String)> = if dashboards.is_empty() {
        vec![(EMPTY_SHEET_NAME.to_string(), write_sheet_xml(&[]))]
    } else {
        dashboards
            .iter()
            .enumerate()
            .map(|(i, db)| {
                (
                    sheet_name(&db.name, i),
                    write_sheet_xml(&dashboard_rows(db)),
                )
            })
            .collect()
    };

    let mut overrides = vec![
        ("/xl/workbook.xml".to_string(), CT_WORKBOOK),
        ("/xl/styles.xml".to_string(), CT_STYLES),
    ];
    let mut workbook_rels = Vec::with_capacity(sheets.len() + 1);
    let mut sheet_entries = String::new();
    for (idx, (name, _)) in sheets.iter().enumerate() {
        let n = idx + 1;
        overrides.push((format!("/xl/worksheets/sheet{n}.xml"), CT_WORKSHEET));
        workbook_rels.push((
            format!("rId{n}"),
            REL_WORKSHEET,
            format!("worksheets/sheet{n}.xml"),
        ));
        sheet_entries.push_str(&format!(
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            xml_escape(name)
        ));
    }
    workbook_rels.push((
        format!("rId{}", sheets.len() + 1),
        REL_STYLES,
        "styles.xml".to_string(),
    ));

    let workbook_xml = format!(
        r#"{XML_DECLARATION}<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheet_entries}</sheets></workbook>"#
    );

    let mut parts = vec![
        Part::new("[Content_Types].xml", content_types_xml(&overrides)),
        Part::new(
            "_rels/.rels",
            relationships_xml(&[(
                "rId1".to_string(),
                REL_OFFICE_DOCUMENT,
                "xl/workbook.xml".to_string(),
            )]),
        ),
        Part::new("xl/workbook.xml", workbook_xml),
        Part::new(
            "xl/_rels/workbook.xml.rels",
            relationships_xml(&workbook_rels),
        ),
        Part::new("xl/styles.xml", format!("{XML_DECLARATION}{STYLES_XML}")),
    ];
    for (idx, (_, xml)) in sheets.into_iter().enumerate() {
        parts.push(Part::new(format!("xl/worksheets/sheet{}.xml", idx + 1), xml));
    }

    write_package(&parts)
}
