//! End-to-end parsing tests: datasources, worksheet resolution, dashboards.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::*;
use twbdoc::{parse_twb, ParseWarning, UNRESOLVED_DATATYPE};

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_measure_on_rows_scenario() {
    let xml = workbook(
        &datasource("Sales", &column("[Sales].[Profit]", "measure", "real")),
        &worksheet(
            "Sheet 1",
            "Sales",
            &on_container("rows", "[Sales].[Profit]", "quantitative"),
        ),
        &dashboard("D", &zone("worksheet", "Sheet 1")),
    );
    let parsed = parse_twb(xml.as_bytes()).unwrap();

    let ws = &parsed.dashboards[0].worksheets[0];
    assert_eq!(ws.measures.len(), 1);
    assert_eq!(ws.measures[0].name, "Profit");
    assert_eq!(ws.measures[0].datatype.as_deref(), Some("real"));
    assert!(ws.dimensions.is_empty());
    assert!(ws.calculated_fields_used.is_empty());
    assert_eq!(ws.fields_on_shelves.len(), 1);
    assert_eq!(ws.fields_on_shelves[0].shelf, "Rows");
    assert_eq!(ws.fields_on_shelves[0].field, "Profit");
}

#[test]
fn test_calculated_measure_only_in_calculated_fields() {
    let xml = workbook(
        &datasource(
            "Sales",
            &calc_column("[Sales].[Profit]", "measure", "real", "SUM([Sales])"),
        ),
        &worksheet(
            "Sheet 1",
            "Sales",
            &on_container("rows", "[Sales].[Profit]", "quantitative"),
        ),
        &dashboard("D", &zone("worksheet", "Sheet 1")),
    );
    let parsed = parse_twb(xml.as_bytes()).unwrap();

    let ws = &parsed.dashboards[0].worksheets[0];
    assert!(ws.measures.is_empty());
    assert_eq!(ws.calculated_fields_used.len(), 1);
    assert_eq!(
        ws.calculated_fields_used[0].formula.as_deref(),
        Some("SUM([Sales])")
    );
}

#[test]
fn test_empty_formula_classifies_by_role() {
    let xml = workbook(
        &datasource(
            "Sales",
            &calc_column("[Sales].[Profit]", "measure", "real", ""),
        ),
        &worksheet(
            "Sheet 1",
            "Sales",
            &on_container("rows", "[Sales].[Profit]", "quantitative"),
        ),
        &dashboard("D", &zone("worksheet", "Sheet 1")),
    );
    let parsed = parse_twb(xml.as_bytes()).unwrap();

    let ws = &parsed.dashboards[0].worksheets[0];
    assert!(ws.calculated_fields_used.is_empty());
    assert_eq!(ws.measures.len(), 1);
    assert!(!ws.measures[0].is_calculated);
    assert_eq!(ws.measures[0].formula.as_deref(), Some(""));
}

#[test]
fn test_filter_members_scenario() {
    let filter = r#"<filter class='categorical' column='[Sales].[Region]'>
                      <member value="East"/><member value="West"/>
                    </filter>"#;
    let xml = workbook(
        &datasource("Sales", &column("[Sales].[Region]", "dimension", "string")),
        &worksheet("Sheet 1", "Sales", filter),
        &dashboard("D", &zone("worksheet", "Sheet 1")),
    );
    let parsed = parse_twb(xml.as_bytes()).unwrap();

    let ws = &parsed.dashboards[0].worksheets[0];
    assert_eq!(ws.filters.len(), 1);
    assert_eq!(ws.filters[0].field, "Region");
    assert_eq!(ws.filters[0].datatype, "string");
    assert_eq!(
        ws.filters[0].members,
        Some(vec!["East".to_string(), "West".to_string()])
    );
    // Filters do not classify fields
    assert!(ws.dimensions.is_empty());
}

#[test]
fn test_unresolved_filter_field() {
    let filter = r#"<filter class='quantitative' column='[Other].[Discount]'/>"#;
    let xml = workbook(
        &datasource("Sales", &column("[Sales].[Region]", "dimension", "string")),
        &worksheet("Sheet 1", "Sales", filter),
        &dashboard("D", &zone("worksheet", "Sheet 1")),
    );
    let parsed = parse_twb(xml.as_bytes()).unwrap();

    let filter = &parsed.dashboards[0].worksheets[0].filters[0];
    assert_eq!(filter.field, "Discount");
    assert_eq!(filter.datatype, UNRESOLVED_DATATYPE);
    assert_eq!(filter.members, None);
}

// ============================================================================
// Full fixture
// ============================================================================

#[test]
fn test_sales_fixture() {
    let parsed = parse_twb(sales_workbook().as_bytes()).unwrap();

    // The worksheet's bare <datasource name='Sales'/> reference keeps the definition
    assert_eq!(parsed.datasources.len(), 1);
    assert_eq!(parsed.datasources.get("Sales").unwrap().columns.len(), 3);
    assert!(parsed.warnings.is_empty());

    let db = &parsed.dashboards[0];
    assert_eq!(db.name, "Executive Overview");
    assert_eq!(db.objects.len(), 1);
    assert_eq!(db.objects[0].name, "Title");

    let ws = &db.worksheets[0];
    assert_eq!(ws.name, "Profit by Region");
    assert!(ws.datasources_used.contains("Sales"));
    assert_eq!(ws.dimensions[0].name, "Region");
    assert_eq!(ws.measures[0].name, "Profit");
    assert_eq!(ws.calculated_fields_used[0].name, "Margin");
    let shelves: Vec<_> = ws
        .fields_on_shelves
        .iter()
        .map(|s| (s.field.as_str(), s.shelf.as_str()))
        .collect();
    assert_eq!(
        shelves,
        vec![
            ("Profit", "Rows"),
            ("Region", "Columns"),
            ("Margin", "Marks - Color")
        ]
    );
    assert_eq!(
        ws.filters[0].members.as_deref(),
        Some(&["East".to_string(), "West".to_string()][..])
    );
}

#[test]
fn test_repeated_resolution_is_stable() {
    let xml = workbook(
        &datasource("Sales", &column("[Sales].[Region]", "dimension", "string")),
        &worksheet(
            "Sheet 1",
            "Sales",
            &[
                on_container("rows", "[Sales].[Region]", "nominal"),
                on_container("rows", "[Region]", "nominal"),
                on_shelf_item("[MarkShelf].[DetailShelf]", "[Sales].[Region]", "nominal"),
            ]
            .concat(),
        ),
        &dashboard(
            "D",
            &[zone("worksheet", "Sheet 1"), zone("worksheet", "Sheet 1")].concat(),
        ),
    );
    let first = parse_twb(xml.as_bytes()).unwrap();
    let second = parse_twb(xml.as_bytes()).unwrap();
    assert_eq!(first, second);

    let [a, b] = &first.dashboards[0].worksheets[..] else {
        panic!("expected two worksheet placements");
    };
    assert_eq!(a.dimensions.len(), 1);
    assert_eq!(a.dimensions.len(), b.dimensions.len());
    assert_eq!(a.fields_on_shelves.len(), 2);
}

// ============================================================================
// Dashboards
// ============================================================================

#[test]
fn test_missing_worksheet_does_not_abort_siblings() {
    let xml = workbook(
        &datasource("Sales", &column("[Sales].[Region]", "dimension", "string")),
        &worksheet("Real", "Sales", ""),
        &[
            dashboard(
                "Broken",
                &[zone("worksheet", "Deleted Sheet"), zone("worksheet", "Real")].concat(),
            ),
            dashboard("Fine", &zone("worksheet", "Real")),
        ]
        .concat(),
    );
    let parsed = parse_twb(xml.as_bytes()).unwrap();

    assert_eq!(parsed.dashboards.len(), 2);
    assert_eq!(parsed.dashboards[0].worksheets.len(), 1);
    assert_eq!(parsed.dashboards[0].worksheets[0].name, "Real");
    assert_eq!(parsed.dashboards[1].worksheets.len(), 1);
    assert_eq!(
        parsed.warnings,
        vec![ParseWarning::MissingWorksheet {
            dashboard: "Broken".into(),
            worksheet: "Deleted Sheet".into(),
        }]
    );
    assert_eq!(
        parsed.warnings[0].to_string(),
        "Worksheet 'Deleted Sheet' referenced in dashboard 'Broken' not found in workbook."
    );
}

#[test]
fn test_layout_basic_never_an_object() {
    let zones = r#"<zone type='layout-basic' name='Named Container'>
                     <zone type='layout-basic' param='[Parameters].[Hidden]'/>
                     <zone type='layout-flow' name='Flow'/>
                     <zone type='paramctrl' param='[Parameters].[Top N]'/>
                     <zone type='bitmap'/>
                   </zone>"#;
    let xml = workbook("", "", &dashboard("D", zones));
    let parsed = parse_twb(xml.as_bytes()).unwrap();

    let objects: Vec<_> = parsed.dashboards[0]
        .objects
        .iter()
        .map(|o| (o.name.as_str(), o.object_type.as_str()))
        .collect();
    assert_eq!(objects, vec![("Flow", "layout-flow"), ("Top N", "paramctrl")]);
}

#[test]
fn test_workbook_without_dashboards() {
    let xml = workbook(
        &datasource("Sales", &column("[Sales].[Region]", "dimension", "string")),
        &worksheet("Sheet 1", "Sales", ""),
        "",
    );
    let parsed = parse_twb(xml.as_bytes()).unwrap();
    assert!(parsed.dashboards.is_empty());
    assert_eq!(parsed.datasources.len(), 1);
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_malformed_xml_aborts() {
    let xml = sales_workbook();
    let truncated = &xml[..xml.len() / 2];
    let err = parse_twb(truncated.as_bytes()).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn test_malformed_text_aborts() {
    let inputs: [&[u8]; 4] = [
        b"garbage<workbook><dashboards/></workbook>",
        b"<workbook/>trailing junk",
        b"<workbook>&bogus;<dashboard name='D'/></workbook>",
        b"<workbook>a & b<dashboard name='D'/></workbook>",
    ];
    for input in inputs {
        let err = parse_twb(input).unwrap_err();
        assert!(
            err.is_invalid_input(),
            "{:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_not_xml_at_all() {
    let err = parse_twb(b"PK\x03\x04 this is a twbx archive").unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn test_json_model_shape() {
    let json = twbdoc::parse_twb_to_json(sales_workbook().as_bytes()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["datasources"][0]["name"], "Sales");
    let margin = &value["datasources"][0]["columns"][2];
    assert_eq!(margin["originalName"], "[Sales].[Margin]");
    assert_eq!(margin["isCalculated"], true);
    let ws = &value["dashboards"][0]["worksheets"][0];
    assert_eq!(ws["fieldsOnShelves"][0]["typeOnShelf"], "quantitative");
    assert_eq!(ws["datasourcesUsed"][0], "Sales");
    assert!(value.get("warnings").is_none());
}
