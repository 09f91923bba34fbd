//! Flattened (Section, Item, Details) rows for the tabular export.

use crate::types::{Column, Dashboard, Filter, ShelfField, Worksheet};

/// Placeholder for optional values that are absent.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum characters kept from a dashboard name in a sheet name.
const SHEET_NAME_PREFIX_LEN: usize = 25;
/// Characters Excel forbids in sheet names.
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', '*', ':', '\\', '?', '/'];

/// Column headers of every dashboard sheet.
pub const HEADERS: [&str; 3] = ["Section", "Item", "Details"];

/// One row of a dashboard sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub section: String,
    pub item: String,
    pub details: String,
}

impl ReportRow {
    fn new(section: &str, item: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            section: section.to_string(),
            item: item.into(),
            details: details.into(),
        }
    }

    pub fn cells(&self) -> [&str; 3] {
        [&self.section, &self.item, &self.details]
    }
}

/// Sheet name for the dashboard at `index`: forbidden characters removed,
/// truncated, and suffixed with the index so names stay unique and within
/// Excel's 31-character limit.
pub fn sheet_name(dashboard_name: &str, index: usize) -> String {
    let cleaned: String = dashboard_name
        .chars()
        .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c))
        .take(SHEET_NAME_PREFIX_LEN)
        .collect();
    // Excel also rejects names starting with an apostrophe
    format!("{}_{index}", cleaned.trim_start_matches('\''))
}

pub(crate) fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// All rows for one dashboard sheet (header row excluded).
pub fn dashboard_rows(dashboard: &Dashboard) -> Vec<ReportRow> {
    const INFO: &str = "Dashboard Info";

    let mut rows = vec![ReportRow::new(INFO, "Name", dashboard.name.as_str())];
    if !dashboard.objects.is_empty() {
        let objects = dashboard
            .objects
            .iter()
            .map(|obj| format!("{} ({})", obj.name, obj.object_type))
            .collect::<Vec<_>>()
            .join(", ");
        rows.push(ReportRow::new(INFO, "Other Objects", objects));
    }

    for ws in &dashboard.worksheets {
        worksheet_rows(ws, &mut rows);
    }
    rows
}

fn worksheet_rows(ws: &Worksheet, rows: &mut Vec<ReportRow>) {
    let section = format!("Worksheet: {}", ws.name);
    let section = section.as_str();

    rows.push(ReportRow::new(
        section,
        "Datasources",
        join_names(ws.datasources_used.iter()),
    ));
    for dim in &ws.dimensions {
        rows.push(ReportRow::new(section, "Dimension", typed_column(dim)));
    }
    for meas in &ws.measures {
        rows.push(ReportRow::new(section, "Measure", typed_column(meas)));
    }
    for cf in &ws.calculated_fields_used {
        rows.push(ReportRow::new(
            section,
            "Calculated Field",
            format!("{} (Formula: {})", cf.name, or_na(cf.formula.as_deref())),
        ));
    }
    for filter in &ws.filters {
        rows.push(ReportRow::new(section, "Filter", filter_details(filter, "Members")));
    }
    for shelf in &ws.fields_on_shelves {
        rows.push(ReportRow::new(
            section,
            format!("Field on Shelf ({})", shelf.shelf),
            shelf_details(shelf),
        ));
    }
}

pub(crate) fn join_names<'a>(names: impl Iterator<Item = &'a String>) -> String {
    names.map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn typed_column(col: &Column) -> String {
    format!("{} (Type: {})", col.name, or_na(col.datatype.as_deref()))
}

/// `"{field} (Type: {class})"` plus `" ({label}: a, b)"` when members were selected.
pub(crate) fn filter_details(filter: &Filter, members_label: &str) -> String {
    let mut details = format!("{} (Type: {})", filter.field, or_na(filter.class.as_deref()));
    if let Some(members) = filter.members.as_ref().filter(|m| !m.is_empty()) {
        details.push_str(&format!(" ({members_label}: {})", members.join(", ")));
    }
    details
}

fn shelf_details(shelf: &ShelfField) -> String {
    format!(
        "{} (Role: {}, Datatype: {}, Usage: {})",
        shelf.field,
        or_na(shelf.role.as_deref()),
        or_na(shelf.datatype.as_deref()),
        or_na(shelf.type_on_shelf.as_deref())
    )
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
    use crate::types::DashboardObject;

    #[test]
    fn test_sheet_name_sanitized_and_indexed() {
        assert_eq!(sheet_name("Sales [2024]: Q1/Q2?", 0), "Sales 2024 Q1Q2_0");
        assert_eq!(sheet_name("'Quoted", 3), "Quoted_3");
    }

    #[test]
    fn test_sheet_name_fits_excel_limit() {
        let long = "A very long dashboard name that goes on and on";
        let name = sheet_name(long, 123);
        assert_eq!(name, "A very long dashboard nam_123");
        assert!(name.chars().count() <= 31);
    }

    #[test]
    fn test_sheet_names_unique_for_same_prefix() {
        let a = sheet_name("Executive Overview Dashboard 2024", 0);
        let b = sheet_name("Executive Overview Dashboard 2025", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_dashboard_rows_layout() {
        let mut db = Dashboard::new("Overview");
        db.objects.push(DashboardObject {
            name: "Title".into(),
            object_type: "text".into(),
        });
        db.objects.push(DashboardObject {
            name: "Logo".into(),
            object_type: "bitmap".into(),
        });
        let mut ws = Worksheet::new("Map");
        ws.datasources_used.insert("Sales".into());
        ws.measures.push(Column::new(
            "[Profit]",
            Some("measure".into()),
            Some("real".into()),
            None,
            None,
        ));
        ws.calculated_fields_used.push(Column::new(
            "[Margin]",
            Some("measure".into()),
            None,
            None,
            Some("[a]/[b]".into()),
        ));
        ws.filters.push(Filter {
            field: "Region".into(),
            class: Some("categorical".into()),
            datatype: "string".into(),
            members: Some(vec!["East".into(), "West".into()]),
        });
        ws.fields_on_shelves.push(ShelfField {
            field: "Profit".into(),
            role: Some("measure".into()),
            datatype: Some("real".into()),
            shelf: "Rows".into(),
            type_on_shelf: None,
        });
        db.worksheets.push(ws);

        let rows = dashboard_rows(&db);
        let cells: Vec<_> = rows.iter().map(ReportRow::cells).collect();
        assert_eq!(cells[0], ["Dashboard Info", "Name", "Overview"]);
        assert_eq!(
            cells[1],
            ["Dashboard Info", "Other Objects", "Title (text), Logo (bitmap)"]
        );
        assert_eq!(cells[2], ["Worksheet: Map", "Datasources", "Sales"]);
        assert_eq!(cells[3], ["Worksheet: Map", "Measure", "Profit (Type: real)"]);
        assert_eq!(
            cells[4],
            ["Worksheet: Map", "Calculated Field", "Margin (Formula: [a]/[b])"]
        );
        assert_eq!(
            cells[5],
            [
                "Worksheet: Map",
                "Filter",
                "Region (Type: categorical) (Members: East, West)"
            ]
        );
        assert_eq!(
            cells[6],
            [
                "Worksheet: Map",
                "Field on Shelf (Rows)",
                "Profit (Role: measure, Datatype: real, Usage: N/A)"
            ]
        );
        assert_eq!(rows.len(), 7);
    }

    #[test]
    fn test_dashboard_without_objects_has_single_info_row() {
        let rows = dashboard_rows(&Dashboard::new("Empty"));
        assert_eq!(rows.len(), 1);
    }
}
