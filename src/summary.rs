//! Plain-text overview of a parsed workbook, printed by the CLI.

use crate::export::rows::{filter_details, join_names, or_na, NOT_AVAILABLE};
use crate::types::{Datasource, Dashboard, ParsedWorkbook, Worksheet};

/// Columns listed per datasource before the rest are summarized as a count.
const PREVIEW_COLUMNS: usize = 10;

/// Render the overview: global datasources, then every dashboard with its
/// component checklist and worksheet details.
pub fn render_overview(workbook: &ParsedWorkbook) -> String {
    let mut out = String::new();

    if !workbook.datasources.is_empty() {
        out.push_str("Global Datasource Information\n");
        for ds in &workbook.datasources {
            datasource_overview(ds, &mut out);
        }
        out.push('\n');
    }

    if workbook.dashboards.is_empty() {
        out.push_str("No dashboards found in the workbook.\n");
    }
    for (idx, dashboard) in workbook.dashboards.iter().enumerate() {
        dashboard_overview(idx + 1, dashboard, &mut out);
    }

    out
}

fn datasource_overview(ds: &Datasource, out: &mut String) {
    out.push_str(&format!(
        "  Datasource: {} ({} columns)\n",
        ds.name,
        ds.columns.len()
    ));
    for col in ds.columns.iter().take(PREVIEW_COLUMNS) {
        out.push_str(&format!(
            "    {} | role: {} | datatype: {} | calculated: {}",
            col.name,
            or_na(col.role.as_deref()),
            or_na(col.datatype.as_deref()),
            col.is_calculated
        ));
        if let Some(formula) = &col.formula {
            out.push_str(&format!(" | formula: {formula}"));
        }
        out.push('\n');
    }
    if ds.columns.len() > PREVIEW_COLUMNS {
        out.push_str(&format!(
            "    ...and {} more columns.\n",
            ds.columns.len() - PREVIEW_COLUMNS
        ));
    }
}

fn dashboard_overview(number: usize, dashboard: &Dashboard, out: &mut String) {
    out.push_str(&format!("Dashboard {number}: {}\n", dashboard.name));
    out.push_str("  Dashboard Components (for numbering):\n");
    if !dashboard.objects.is_empty() {
        out.push_str("    General Objects:\n");
    }
    for (n, component) in dashboard.components() {
        out.push_str(&format!("    {n}. {component}\n"));
    }

    if !dashboard.objects.is_empty() {
        out.push_str(&format!(
            "  Dashboard-Level Objects/Controls ({} items)\n",
            dashboard.objects.len()
        ));
        for obj in &dashboard.objects {
            out.push_str(&format!("    - {} (Type: {})\n", obj.name, obj.object_type));
        }
    }

    for ws in &dashboard.worksheets {
        worksheet_overview(ws, out);
    }
    out.push_str("---\n");
}

fn worksheet_overview(ws: &Worksheet, out: &mut String) {
    out.push_str(&format!("  Worksheet: {}\n", ws.name));
    let datasources = if ws.datasources_used.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        join_names(ws.datasources_used.iter())
    };
    out.push_str(&format!("    Datasources: {datasources}\n"));

    if !ws.dimensions.is_empty() {
        out.push_str("    Dimensions Used:\n");
        for item in &ws.dimensions {
            out.push_str(&format!(
                "      - {} (Type: {})\n",
                item.name,
                or_na(item.datatype.as_deref())
            ));
        }
    }
    if !ws.measures.is_empty() {
        out.push_str("    Measures Used:\n");
        for item in &ws.measures {
            out.push_str(&format!(
                "      - {} (Type: {})\n",
                item.name,
                or_na(item.datatype.as_deref())
            ));
        }
    }
    if !ws.calculated_fields_used.is_empty() {
        out.push_str("    Calculated Fields Used:\n");
        for item in &ws.calculated_fields_used {
            out.push_str(&format!("      - {}\n", item.name));
            out.push_str(&format!(
                "        Formula: {}\n",
                or_na(item.formula.as_deref())
            ));
        }
    }
    if !ws.filters.is_empty() {
        out.push_str("    Filters:\n");
        for item in &ws.filters {
            out.push_str(&format!("      - {}\n", filter_details(item, "Selected")));
        }
    }
    if !ws.fields_on_shelves.is_empty() {
        out.push_str("    Fields on Shelves (Rows, Columns, Marks, etc.):\n");
        for item in &ws.fields_on_shelves {
            out.push_str(&format!(
                "      - {} | shelf: {} | role: {} | datatype: {} | usage: {}\n",
                item.field,
                item.shelf,
                or_na(item.role.as_deref()),
                or_na(item.datatype.as_deref()),
                or_na(item.type_on_shelf.as_deref())
            ));
        }
    }
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
    use crate::types::{Column, DashboardObject, DatasourceMap};

    #[test]
    fn test_overview_truncates_column_preview() {
        let mut datasources = DatasourceMap::new();
        let columns = (0..12)
            .map(|i| Column::new(&format!("[Field {i}]"), None, None, None, None))
            .collect();
        datasources.insert(Datasource {
            name: "Wide".into(),
            columns,
        });
        let text = render_overview(&ParsedWorkbook {
            datasources,
            ..ParsedWorkbook::default()
        });
        assert!(text.contains("  Datasource: Wide (12 columns)\n"));
        assert!(text.contains("    Field 9 | role: N/A"));
        assert!(!text.contains("Field 10 |"));
        assert!(text.contains("    ...and 2 more columns.\n"));
        assert!(text.contains("No dashboards found in the workbook."));
    }

    #[test]
    fn test_overview_dashboard_sections() {
        let mut dashboard = Dashboard::new("Overview");
        dashboard.objects.push(DashboardObject {
            name: "Logo".into(),
            object_type: "bitmap".into(),
        });
        dashboard.worksheets.push(Worksheet::new("Blank"));
        let text = render_overview(&ParsedWorkbook {
            dashboards: vec![dashboard],
            ..ParsedWorkbook::default()
        });
        assert!(text.starts_with("Dashboard 1: Overview\n"));
        assert!(text.contains("    1. Logo (bitmap)\n    2. Worksheet: Blank\n"));
        assert!(text.contains("Dashboard-Level Objects/Controls (1 items)"));
        assert!(text.contains("  Worksheet: Blank\n    Datasources: N/A\n"));
        assert!(text.ends_with("---\n"));
    }
}
