//! Dashboard resolution: zones become resolved worksheets or dashboard objects.

use std::collections::HashMap;

use crate::dom::Element;
use crate::names::clean_field_name;
use crate::types::{Dashboard, DashboardObject, DatasourceMap, ParseWarning};

use super::worksheet::resolve_worksheet;

/// Zone type of worksheet placements.
const WORKSHEET_ZONE: &str = "worksheet";
/// Zone type of pure layout containers, never documented.
const LAYOUT_ZONE: &str = "layout-basic";

/// Resolve every `<dashboard>` element in document order.
///
/// Zones naming a worksheet missing from `worksheets` produce a
/// [`ParseWarning::MissingWorksheet`] and are left out of that dashboard.
pub fn resolve_dashboards(
    root: &Element,
    worksheets: &HashMap<&str, &Element>,
    datasources: &DatasourceMap,
) -> (Vec<Dashboard>, Vec<ParseWarning>) {
    let mut dashboards = Vec::new();
    let mut warnings = Vec::new();

    for db_node in root.descendants("dashboard") {
        let mut dashboard = Dashboard::new(db_node.attr("name").unwrap_or_default());

        for zone in db_node.descendants("zone") {
            match zone.attr("type") {
                Some(WORKSHEET_ZONE) => {
                    let Some(ws_name) = zone.attr_non_empty("name") else {
                        continue;
                    };
                    match worksheets.get(ws_name) {
                        Some(ws_node) => dashboard
                            .worksheets
                            .push(resolve_worksheet(ws_node, datasources)),
                        None => {
                            let warning = ParseWarning::MissingWorksheet {
                                dashboard: dashboard.name.clone(),
                                worksheet: ws_name.to_string(),
                            };
                            log::warn!("{warning}");
                            warnings.push(warning);
                        }
                    }
                }
                Some(LAYOUT_ZONE) | None => {}
                Some(object_type) => {
                    if let Some(object) = dashboard_object(zone, object_type) {
                        dashboard.objects.push(object);
                    }
                }
            }
        }

        log::debug!(
            "dashboard '{}': {} worksheets, {} objects",
            dashboard.name,
            dashboard.worksheets.len(),
            dashboard.objects.len()
        );
        dashboards.push(dashboard);
    }

    (dashboards, warnings)
}

/// A non-worksheet zone, named by its `name` or else its cleaned `param`.
fn dashboard_object(zone: &Element, object_type: &str) -> Option<DashboardObject> {
    let name = match zone.attr_non_empty("name") {
        Some(name) => name.to_string(),
        None => clean_field_name(zone.attr_non_empty("param")?),
    };
    if name.is_empty() {
        return None;
    }
    Some(DashboardObject {
        name,
        object_type: object_type.to_string(),
    })
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
    use crate::parser::worksheet::worksheet_index;

    fn resolve(xml: &str) -> (Vec<Dashboard>, Vec<ParseWarning>) {
        let root = parse_document(xml.as_bytes()).unwrap();
        let index = worksheet_index(&root);
        resolve_dashboards(&root, &index, &DatasourceMap::new())
    }

    #[test]
    fn test_zone_kinds() {
        let (dashboards, warnings) = resolve(
            r#"<workbook>
                 <worksheets><worksheet name="Map"/></worksheets>
                 <dashboards><dashboard name="Overview"><zones>
                   <zone type="layout-basic" name="Container" param="[Parameters].[P]">
                     <zone type="worksheet" name="Map"/>
                     <zone type="text" name="Title Text"/>
                     <zone type="filter" param="[Parameters].[Top N]"/>
                     <zone type="bitmap"/>
                     <zone name="Untyped"/>
                   </zone>
                 </zones></dashboard></dashboards>
               </workbook>"#,
        );
        assert!(warnings.is_empty());
        let db = &dashboards[0];
        assert_eq!(db.name, "Overview");
        assert_eq!(db.worksheets.len(), 1);
        assert_eq!(db.worksheets[0].name, "Map");
        let objects: Vec<_> = db
            .objects
            .iter()
            .map(|o| (o.name.as_str(), o.object_type.as_str()))
            .collect();
        assert_eq!(objects, vec![("Title Text", "text"), ("Top N", "filter")]);
    }

    #[test]
    fn test_missing_worksheet_warns_and_continues() {
        let (dashboards, warnings) = resolve(
            r#"<workbook>
                 <worksheets><worksheet name="Real"/></worksheets>
                 <dashboards>
                   <dashboard name="One"><zones>
                     <zone type="worksheet" name="Ghost"/>
                     <zone type="worksheet" name="Real"/>
                   </zones></dashboard>
                   <dashboard name="Two"><zones><zone type="worksheet" name="Real"/></zones></dashboard>
                 </dashboards>
               </workbook>"#,
        );
        assert_eq!(dashboards.len(), 2);
        assert_eq!(dashboards[0].worksheets.len(), 1);
        assert_eq!(dashboards[1].worksheets.len(), 1);
        assert_eq!(
            warnings,
            vec![ParseWarning::MissingWorksheet {
                dashboard: "One".into(),
                worksheet: "Ghost".into()
            }]
        );
    }

    #[test]
    fn test_worksheet_zone_without_name_dropped() {
        let (dashboards, warnings) = resolve(
            r#"<workbook><dashboard name="D"><zone type="worksheet"/></dashboard></workbook>"#,
        );
        assert!(warnings.is_empty());
        assert!(dashboards[0].worksheets.is_empty());
        assert!(dashboards[0].objects.is_empty());
    }

    #[test]
    fn test_same_worksheet_twice_resolved_twice() {
        let (dashboards, _) = resolve(
            r#"<workbook><worksheet name="W"/><dashboard name="D">
                 <zone type="worksheet" name="W"/><zone type="worksheet" name="W"/>
               </dashboard></workbook>"#,
        );
        assert_eq!(dashboards[0].worksheets.len(), 2);
    }
}
