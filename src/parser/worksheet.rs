//! Worksheet resolution: datasource dependencies, filters, and shelf placements.

use std::collections::HashMap;

use crate::dom::Element;
use crate::names::clean_field_name;
use crate::types::{
    Column, Datasource, DatasourceMap, Filter, ShelfField, Worksheet, UNRESOLVED_DATATYPE,
};

use super::shelves::shelf_label;

/// Index of every `<worksheet>` element by name. A later element of the same
/// name replaces an earlier one.
pub fn worksheet_index(root: &Element) -> HashMap<&str, &Element> {
    root.descendants("worksheet")
        .into_iter()
        .filter_map(|ws| ws.attr("name").map(|name| (name, ws)))
        .collect()
}

/// The datasources one worksheet depends on, with field lookup over just those.
struct LocalDatasources<'a> {
    datasources: Vec<&'a Datasource>,
}

impl<'a> LocalDatasources<'a> {
    fn add(&mut self, datasource: &'a Datasource) {
        if !self.datasources.iter().any(|ds| ds.name == datasource.name) {
            self.datasources.push(datasource);
        }
    }

    /// First column matching a (possibly bracket-qualified) field reference.
    fn find_field(&self, raw: &str) -> Option<&'a Column> {
        let cleaned = clean_field_name(raw);
        self.datasources
            .iter()
            .flat_map(|ds| ds.columns.iter())
            .find(|col| col.matches_reference(raw, &cleaned))
    }
}

/// Resolve one `<worksheet>` element against the workbook's datasources.
pub fn resolve_worksheet(ws_node: &Element, all_datasources: &DatasourceMap) -> Worksheet {
    let mut worksheet = Worksheet::new(ws_node.attr("name").unwrap_or_default());
    let local = collect_dependencies(ws_node, all_datasources, &mut worksheet);

    worksheet.filters = parse_filters(ws_node, &local);

    for (field_ref, shelf) in shelf_placements(ws_node) {
        let Some(column) = local.find_field(field_ref.column) else {
            log::debug!(
                "worksheet '{}': unresolved shelf field {}",
                worksheet.name,
                field_ref.column
            );
            continue;
        };
        worksheet.fields_on_shelves.push(ShelfField {
            field: column.name.clone(),
            role: column.role.clone(),
            datatype: column.datatype.clone(),
            shelf,
            type_on_shelf: field_ref.usage.map(str::to_string),
        });
        worksheet.classify(column);
    }

    worksheet.dedup();
    worksheet
}

/// Record `datasource-dependencies` names and gather the matching datasources.
///
/// Both the literal dependency name and, when distinct, its caption are tried
/// against the workbook map; every hit becomes a local datasource.
fn collect_dependencies<'a>(
    ws_node: &Element,
    all_datasources: &'a DatasourceMap,
    worksheet: &mut Worksheet,
) -> LocalDatasources<'a> {
    let mut local = LocalDatasources {
        datasources: Vec::new(),
    };

    for dep in ws_node.descendants("datasource-dependencies") {
        let Some(ds_name) = dep.attr_non_empty("datasource") else {
            continue;
        };
        worksheet.datasources_used.insert(ds_name.to_string());
        if let Some(ds) = all_datasources.get(ds_name) {
            local.add(ds);
        }
        if let Some(caption) = dep.attr_non_empty("caption").filter(|c| *c != ds_name) {
            if let Some(ds) = all_datasources.get(caption) {
                worksheet.datasources_used.insert(caption.to_string());
                local.add(ds);
            }
        }
    }

    local
}

/// Every `<filter>` with a target column, in document order.
fn parse_filters(ws_node: &Element, local: &LocalDatasources<'_>) -> Vec<Filter> {
    ws_node
        .descendants("filter")
        .into_iter()
        .filter_map(|filter_node| {
            let field_name = filter_node.attr_non_empty("column")?;
            let datatype = local
                .find_field(field_name)
                .and_then(|col| col.datatype.clone())
                .unwrap_or_else(|| UNRESOLVED_DATATYPE.to_string());
            let members: Vec<String> = filter_node
                .descendants("member")
                .into_iter()
                .filter_map(|m| m.attr("value").map(str::to_string))
                .collect();
            Some(Filter {
                field: clean_field_name(field_name),
                class: filter_node.attr("class").map(str::to_string),
                datatype,
                members: (!members.is_empty()).then_some(members),
            })
        })
        .collect()
}

/// A `column-instance` reference: the field it points at and its usage type.
struct FieldRef<'a> {
    column: &'a str,
    usage: Option<&'a str>,
}

/// Column instances under the worksheet's view section, with their shelf labels.
fn shelf_placements(ws_node: &Element) -> Vec<(FieldRef<'_>, String)> {
    let mut placements = Vec::new();
    for view in ws_node.outermost("view") {
        for (instance, parent) in view.find_all_with_parent(|e| e.name == "column-instance") {
            let Some(column) = instance.attr_non_empty("column") else {
                continue;
            };
            let field_ref = FieldRef {
                column,
                usage: instance.attr("type"),
            };
            placements.push((field_ref, shelf_label(Some(parent))));
        }
    }
    placements
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
    use crate::parser::datasource::extract_datasources;

    const DATASOURCES: &str = r#"
        <datasources>
          <datasource name="federated.abc" caption="Sales">
            <column name="[Region]" role="dimension" datatype="string" type="nominal"/>
            <column name="[Profit]" role="measure" datatype="real" type="quantitative"/>
            <column name="[Margin]" role="measure" datatype="real">
              <calculation class="tableau" formula="SUM([Profit])/SUM([Sales])"/>
            </column>
          </datasource>
          <datasource name="Returns">
            <column name="[Returned]" role="dimension" datatype="boolean"/>
          </datasource>
        </datasources>"#;

    fn resolve(worksheet_xml: &str) -> Worksheet {
        let xml = format!(
            "<workbook>{DATASOURCES}<worksheets>{worksheet_xml}</worksheets></workbook>"
        );
        let root = parse_document(xml.as_bytes()).unwrap();
        let map = extract_datasources(&root);
        let index = worksheet_index(&root);
        let ws = index.values().next().copied().unwrap();
        resolve_worksheet(ws, &map)
    }

    #[test]
    fn test_dependencies_by_name() {
        let ws = resolve(
            r#"<worksheet name="W"><table><view>
                 <datasource-dependencies datasource="federated.abc">
                   <column-instance column="[Region]" type="nominal"/>
                 </datasource-dependencies>
               </view></table></worksheet>"#,
        );
        assert_eq!(ws.datasources_used.len(), 1);
        assert!(ws.datasources_used.contains("federated.abc"));
        assert_eq!(ws.dimensions.len(), 1);
        assert_eq!(ws.fields_on_shelves[0].shelf, "datasource-dependencies");
    }

    #[test]
    fn test_dependencies_by_caption_alias() {
        let ws = resolve(
            r#"<worksheet name="W"><table><view>
                 <datasource-dependencies datasource="Unmatched" caption="Returns"/>
                 <rows><column-instance column="[Returned]" type="nominal"/></rows>
               </view></table></worksheet>"#,
        );
        let used: Vec<_> = ws.datasources_used.iter().map(String::as_str).collect();
        assert_eq!(used, vec!["Returns", "Unmatched"]);
        assert_eq!(ws.dimensions[0].name, "Returned");
        assert_eq!(ws.fields_on_shelves[0].shelf, "Rows");
    }

    #[test]
    fn test_unknown_dependency_resolves_nothing() {
        let ws = resolve(
            r#"<worksheet name="W"><table><view>
                 <datasource-dependencies datasource="Ghost"/>
                 <rows><column-instance column="[Region]"/></rows>
               </view></table>
               <filter class="categorical" column="[Region]"/></worksheet>"#,
        );
        assert!(ws.datasources_used.contains("Ghost"));
        assert!(ws.fields_on_shelves.is_empty());
        assert!(ws.dimensions.is_empty());
        assert_eq!(ws.filters[0].datatype, UNRESOLVED_DATATYPE);
    }

    #[test]
    fn test_shelf_item_parent_label() {
        let ws = resolve(
            r#"<worksheet name="W"><table><view>
                 <datasource-dependencies datasource="federated.abc"/>
                 <shelf-item name="[MarkShelf].[ColorShelf]">
                   <column-instance column="[federated.abc].[Profit]" type="quantitative"/>
                 </shelf-item>
               </view></table></worksheet>"#,
        );
        let shelf = &ws.fields_on_shelves[0];
        assert_eq!(shelf.field, "Profit");
        assert_eq!(shelf.shelf, "Marks - Color");
        assert_eq!(shelf.role.as_deref(), Some("measure"));
        assert_eq!(shelf.datatype.as_deref(), Some("real"));
        assert_eq!(shelf.type_on_shelf.as_deref(), Some("quantitative"));
        assert_eq!(ws.measures.len(), 1);
    }

    #[test]
    fn test_column_instances_outside_view_ignored() {
        let ws = resolve(
            r#"<worksheet name="W">
                 <datasource-dependencies datasource="federated.abc">
                   <column-instance column="[Region]"/>
                 </datasource-dependencies>
                 <table/></worksheet>"#,
        );
        assert!(ws.fields_on_shelves.is_empty());
        assert!(ws.dimensions.is_empty());
    }

    #[test]
    fn test_calculated_wins_over_role() {
        let ws = resolve(
            r#"<worksheet name="W"><table><view>
                 <datasource-dependencies datasource="federated.abc"/>
                 <rows><column-instance column="[Margin]"/></rows>
               </view></table></worksheet>"#,
        );
        assert_eq!(ws.calculated_fields_used.len(), 1);
        assert!(ws.measures.is_empty());
        assert_eq!(
            ws.calculated_fields_used[0].formula.as_deref(),
            Some("SUM([Profit])/SUM([Sales])")
        );
    }

    #[test]
    fn test_repeated_placements_deduplicated() {
        let ws = resolve(
            r#"<worksheet name="W"><table><view>
                 <datasource-dependencies datasource="federated.abc"/>
                 <rows><column-instance column="[Region]" type="nominal"/></rows>
                 <rows><column-instance column="[Region]" type="nominal"/></rows>
                 <cols><column-instance column="[Region]" type="nominal"/></cols>
               </view></table></worksheet>"#,
        );
        assert_eq!(ws.dimensions.len(), 1);
        assert_eq!(ws.fields_on_shelves.len(), 2);
        assert_eq!(ws.fields_on_shelves[0].shelf, "Rows");
        assert_eq!(ws.fields_on_shelves[1].shelf, "Columns");
    }

    #[test]
    fn test_filters_members_and_class() {
        let ws = resolve(
            r#"<worksheet name="W"><table><view>
                 <datasource-dependencies datasource="federated.abc"/>
                 <filter class="categorical" column="[federated.abc].[Region]">
                   <groupfilter function="union">
                     <groupfilter function="member" member="x"><member value="East"/></groupfilter>
                     <member value="West"/>
                   </groupfilter>
                 </filter>
                 <filter class="quantitative" column="[Profit]"/>
                 <filter class="categorical"/>
               </view></table></worksheet>"#,
        );
        assert_eq!(ws.filters.len(), 2);
        let region = &ws.filters[0];
        assert_eq!(region.field, "Region");
        assert_eq!(region.class.as_deref(), Some("categorical"));
        assert_eq!(region.datatype, "string");
        assert_eq!(
            region.members.as_deref(),
            Some(&["East".to_string(), "West".to_string()][..])
        );
        assert_eq!(ws.filters[1].members, None);
        assert_eq!(ws.filters[1].datatype, "real");
    }

    #[test]
    fn test_empty_worksheet() {
        let ws = resolve(r#"<worksheet name="Blank"/>"#);
        assert_eq!(ws.name, "Blank");
        assert!(ws.datasources_used.is_empty());
        assert!(ws.filters.is_empty());
        assert!(ws.fields_on_shelves.is_empty());
    }

    #[test]
    fn test_worksheet_index_last_wins() {
        let root = parse_document(
            br#"<w><worksheet name="A" id="1"/><worksheet name="A" id="2"/><worksheet/></w>"#,
        )
        .unwrap();
        let index = worksheet_index(&root);
        assert_eq!(index.len(), 1);
        assert_eq!(index["A"].attr("id"), Some("2"));
    }
}
