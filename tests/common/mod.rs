//! Common test utilities: workbook XML fixtures and package readers.
//!
//! Fixtures are built from small string helpers so each test states only the
//! datasources, worksheets, and dashboards it cares about.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::io::{Cursor, Read};

// ============================================================================
// Workbook XML builders
// ============================================================================

/// Wrap datasource, worksheet, and dashboard XML into a `.twb` document.
#[must_use]
pub fn workbook(datasources: &str, worksheets: &str, dashboards: &str) -> String {
    format!(
        r#"<?xml version='1.0' encoding='utf-8' ?>
<workbook source-build='2023.1.0' version='18.1' xmlns:user='http://www.tableausoftware.com/xml/user'>
  <datasources>{datasources}</datasources>
  <worksheets>{worksheets}</worksheets>
  <dashboards>{dashboards}</dashboards>
  <windows/>
</workbook>"#
    )
}

/// A `<datasource>` with the given column XML.
#[must_use]
pub fn datasource(name: &str, columns: &str) -> String {
    format!(r#"<datasource name='{name}' version='18.1'>{columns}</datasource>"#)
}

/// A plain `<column>`.
#[must_use]
pub fn column(name: &str, role: &str, datatype: &str) -> String {
    format!(r#"<column name='{name}' role='{role}' datatype='{datatype}' type='nominal'/>"#)
}

/// A `<column>` with a calculation formula (formula must be XML-escaped).
#[must_use]
pub fn calc_column(name: &str, role: &str, datatype: &str, formula: &str) -> String {
    format!(
        r#"<column name='{name}' role='{role}' datatype='{datatype}'><calculation class='tableau' formula='{formula}'/></column>"#
    )
}

/// A `<worksheet>` whose view depends on `datasource` and holds `view_body`.
#[must_use]
pub fn worksheet(name: &str, datasource: &str, view_body: &str) -> String {
    format!(
        r#"<worksheet name='{name}'><table><view>
             <datasources><datasource name='{datasource}'/></datasources>
             <datasource-dependencies datasource='{datasource}'/>
             {view_body}
           </view></table></worksheet>"#
    )
}

/// A `<column-instance>` inside a direct shelf container such as `rows`.
#[must_use]
pub fn on_container(container: &str, field: &str, usage: &str) -> String {
    format!(r#"<{container}><column-instance column='{field}' type='{usage}'/></{container}>"#)
}

/// A `<column-instance>` inside a named `shelf-item`.
#[must_use]
pub fn on_shelf_item(shelf: &str, field: &str, usage: &str) -> String {
    format!(
        r#"<shelf-item name='{shelf}'><column-instance column='{field}' type='{usage}'/></shelf-item>"#
    )
}

/// A `<dashboard>` with the given zone XML.
#[must_use]
pub fn dashboard(name: &str, zones: &str) -> String {
    format!(r#"<dashboard name='{name}'><zones>{zones}</zones></dashboard>"#)
}

/// A `<zone>` with a type and a name.
#[must_use]
pub fn zone(zone_type: &str, name: &str) -> String {
    format!(r#"<zone type='{zone_type}' name='{name}'/>"#)
}

/// The Sales fixture: one datasource with a dimension, a measure, and a
/// calculated field, plus one worksheet and one dashboard using it.
#[must_use]
pub fn sales_workbook() -> String {
    let columns = [
        column("[Sales].[Region]", "dimension", "string"),
        column("[Sales].[Profit]", "measure", "real"),
        calc_column(
            "[Sales].[Margin]",
            "measure",
            "real",
            "SUM([Profit]) / SUM([Sales])",
        ),
    ]
    .concat();
    let view = [
        on_container("rows", "[Sales].[Profit]", "quantitative"),
        on_container("cols", "[Sales].[Region]", "nominal"),
        on_shelf_item("[MarkShelf].[ColorShelf]", "[Sales].[Margin]", "quantitative"),
        r#"<filter class='categorical' column='[Sales].[Region]'>
             <groupfilter function='union'><member value='East'/><member value='West'/></groupfilter>
           </filter>"#
            .to_string(),
    ]
    .concat();
    workbook(
        &datasource("Sales", &columns),
        &worksheet("Profit by Region", "Sales", &view),
        &dashboard(
            "Executive Overview",
            &[
                zone("layout-basic", "Container"),
                zone("text", "Title"),
                zone("worksheet", "Profit by Region"),
            ]
            .concat(),
        ),
    )
}

// ============================================================================
// Package readers
// ============================================================================

/// Read one part of a ZIP package as UTF-8.
#[must_use]
pub fn read_part(package: &[u8], path: &str) -> String {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(package)).expect("Failed to open ZIP archive");
    let mut file = archive
        .by_name(path)
        .unwrap_or_else(|_| panic!("missing part {path}"));
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

/// All part names in a ZIP package, in archive order.
#[must_use]
pub fn part_names(package: &[u8]) -> Vec<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(package)).expect("Failed to open ZIP archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}
