//! Datasource extraction.
//!
//! Every `<datasource>` element anywhere in the document contributes an entry;
//! every `<column>` anywhere beneath it contributes a [`Column`].

use crate::dom::Element;
use crate::types::{Column, Datasource, DatasourceMap};

/// Identity used when a datasource has no name, caption or formatted name.
pub const UNKNOWN_DATASOURCE: &str = "Unknown Datasource";

/// Build the datasource map for a whole workbook.
pub fn extract_datasources(root: &Element) -> DatasourceMap {
    let mut map = DatasourceMap::new();
    for ds_node in root.descendants("datasource") {
        let datasource = parse_datasource(ds_node);
        log::debug!(
            "datasource '{}': {} columns",
            datasource.name,
            datasource.columns.len()
        );
        if !map.insert(datasource) {
            log::debug!("kept earlier definition for a repeated datasource reference");
        }
    }
    map
}

/// Parse one `<datasource>` element.
pub fn parse_datasource(ds_node: &Element) -> Datasource {
    let columns = ds_node
        .descendants("column")
        .into_iter()
        .filter_map(parse_column)
        .collect();
    Datasource {
        name: datasource_identity(ds_node).to_string(),
        columns,
    }
}

/// Name, else caption, else formatted name, else [`UNKNOWN_DATASOURCE`].
///
/// Federated datasources lacking all three share the fallback identity and
/// therefore collide in the map.
pub fn datasource_identity(ds_node: &Element) -> &str {
    ds_node
        .attr_non_empty("name")
        .or_else(|| ds_node.attr_non_empty("caption"))
        .or_else(|| ds_node.attr_non_empty("formatted-name"))
        .unwrap_or(UNKNOWN_DATASOURCE)
}

/// Parse one `<column>` element; columns with neither name nor caption are skipped.
fn parse_column(col_node: &Element) -> Option<Column> {
    let Some(original_name) = col_node
        .attr_non_empty("name")
        .or_else(|| col_node.attr_non_empty("caption"))
    else {
        log::debug!("skipping column without name or caption");
        return None;
    };

    let formula = col_node
        .child("calculation")
        .and_then(|calc| calc.attr("formula"))
        .map(str::to_string);

    Some(Column::new(
        original_name,
        col_node.attr("role").map(str::to_string),
        col_node.attr("datatype").map(str::to_string),
        col_node.attr("type").map(str::to_string),
        formula,
    ))
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
    use crate::dom::parse_document;

    fn extract(xml: &str) -> DatasourceMap {
        extract_datasources(&parse_document(xml.as_bytes()).unwrap())
    }

    #[test]
    fn test_identity_fallback_chain() {
        let map = extract(
            r#"<workbook><datasources>
                <datasource name="federated.1" caption="Sales"/>
                <datasource caption="Orders"/>
                <datasource formatted-name="Returns"/>
                <datasource/>
            </datasources></workbook>"#,
        );
        let names: Vec<_> = map.iter().map(|ds| ds.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["federated.1", "Orders", "Returns", UNKNOWN_DATASOURCE]
        );
    }

    #[test]
    fn test_columns_nested_anywhere() {
        let map = extract(
            r#"<workbook><datasource name="Sales">
                <column name="[Region]" role="dimension" datatype="string" type="nominal"/>
                <connection><metadata><column name="[Profit]" role="measure" datatype="real"/></metadata></connection>
            </datasource></workbook>"#,
        );
        let ds = map.get("Sales").unwrap();
        assert_eq!(ds.columns.len(), 2);
        assert_eq!(ds.columns[0].name, "Region");
        assert_eq!(ds.columns[0].semantic_type.as_deref(), Some("nominal"));
        assert_eq!(ds.columns[1].name, "Profit");
        assert_eq!(ds.columns[1].role.as_deref(), Some("measure"));
    }

    #[test]
    fn test_calculation_formula() {
        let map = extract(
            r#"<workbook><datasource name="Sales">
                <column name="[Margin]" role="measure" datatype="real">
                    <calculation class="tableau" formula="SUM([Profit]) / SUM([Sales])"/>
                </column>
                <column name="[Empty]" role="measure"><calculation formula=""/></column>
                <column name="[Bin]" role="dimension"><calculation class="bin"/></column>
            </datasource></workbook>"#,
        );
        let cols = &map.get("Sales").unwrap().columns;
        assert!(cols[0].is_calculated);
        assert_eq!(cols[0].formula.as_deref(), Some("SUM([Profit]) / SUM([Sales])"));
        assert!(!cols[1].is_calculated);
        assert_eq!(cols[1].formula.as_deref(), Some(""));
        assert!(!cols[2].is_calculated);
        assert_eq!(cols[2].formula, None);
    }

    #[test]
    fn test_caption_used_for_unnamed_column() {
        let map = extract(
            r#"<workbook><datasource name="d">
                <column caption="Nice Name" datatype="string"/>
                <column datatype="string"/>
            </datasource></workbook>"#,
        );
        let cols = &map.get("d").unwrap().columns;
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].name, "Nice Name");
        assert_eq!(cols[0].role, None);
    }
}
