//! DOCX package for the narrative export.
//!
//! The document is first laid out as a flat list of [`Paragraph`]s, then
//! serialized to WordprocessingML. Styles are defined in our own `styles.xml`,
//! so list paragraphs carry their numbers in the text.

use crate::error::Result;
use crate::types::{Dashboard, Worksheet};
use crate::xml_helpers::xml_escape;

use super::package::{
    content_types_xml, relationships_xml, write_package, Part, REL_OFFICE_DOCUMENT, REL_STYLES,
    XML_DECLARATION,
};
use super::rows::{filter_details, join_names, or_na};
use super::ExportOptions;

const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Half an inch in twentieths of a point.
const FORMULA_INDENT_TWIPS: u32 = 720;
const GROUP_LABEL_INDENT_TWIPS: u32 = 360;

const SNIPPET_INSTRUCTIONS: &str = "1. Take a screenshot of this dashboard in Tableau.\n\
     2. Paste the screenshot here.\n\
     3. Use the component list below to manually number sections on your screenshot.";

/// Paragraph styles defined in the generated `styles.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParagraphStyle {
    Title,
    Heading1,
    Heading2,
    Heading3,
    ListNumber,
    ListBullet,
}

impl ParagraphStyle {
    fn style_id(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Heading1 => "Heading1",
            Self::Heading2 => "Heading2",
            Self::Heading3 => "Heading3",
            Self::ListNumber => "ListNumber",
            Self::ListBullet => "ListBullet",
        }
    }
}

/// A single-run paragraph. Line breaks in `text` become `<w:br/>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Paragraph {
    pub style: Option<ParagraphStyle>,
    pub text: String,
    pub bold: bool,
    pub indent_twips: Option<u32>,
}

impl Paragraph {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn styled(style: ParagraphStyle, text: impl Into<String>) -> Self {
        Self {
            style: Some(style),
            text: text.into(),
            ..Self::default()
        }
    }

    fn bullet(text: impl Into<String>) -> Self {
        Self::styled(ParagraphStyle::ListBullet, text)
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn indented(mut self, twips: u32) -> Self {
        self.indent_twips = Some(twips);
        self
    }
}

/// Lay out the whole narrative document.
pub(crate) fn build_paragraphs(dashboards: &[Dashboard], options: &ExportOptions) -> Vec<Paragraph> {
    let mut doc = vec![Paragraph::styled(ParagraphStyle::Title, options.title.as_str())];
    for dashboard in dashboards {
        dashboard_paragraphs(dashboard, &mut doc);
    }
    doc
}

fn dashboard_paragraphs(dashboard: &Dashboard, doc: &mut Vec<Paragraph>) {
    doc.push(Paragraph::styled(
        ParagraphStyle::Heading1,
        format!("Dashboard: {}", dashboard.name),
    ));

    doc.push(Paragraph::plain("Instructions for Dashboard Snippet:").bold());
    doc.push(Paragraph::plain(SNIPPET_INSTRUCTIONS));
    doc.push(Paragraph::plain(
        "Dashboard Components (for manual numbering on snippet):",
    ));
    if !dashboard.objects.is_empty() {
        doc.push(Paragraph::plain("General Objects:").indented(GROUP_LABEL_INDENT_TWIPS));
    }
    for (number, component) in dashboard.components() {
        doc.push(Paragraph::styled(
            ParagraphStyle::ListNumber,
            format!("{number}. {component}"),
        ));
    }
    doc.push(Paragraph::plain("--- End of Component List ---"));

    if !dashboard.objects.is_empty() {
        doc.push(Paragraph::styled(
            ParagraphStyle::Heading2,
            "Dashboard-Level Objects",
        ));
        for obj in &dashboard.objects {
            doc.push(Paragraph::bullet(format!(
                "- {} (Type: {})",
                obj.name, obj.object_type
            )));
        }
    }

    for ws in &dashboard.worksheets {
        worksheet_paragraphs(ws, doc);
    }
}

fn worksheet_paragraphs(ws: &Worksheet, doc: &mut Vec<Paragraph>) {
    doc.push(Paragraph::styled(
        ParagraphStyle::Heading2,
        format!("Worksheet: {}", ws.name),
    ));

    if !ws.datasources_used.is_empty() {
        doc.push(Paragraph::plain(format!(
            "Datasources: {}",
            join_names(ws.datasources_used.iter())
        )));
    }

    if !ws.dimensions.is_empty() {
        doc.push(Paragraph::styled(ParagraphStyle::Heading3, "Dimensions Used:"));
        for item in &ws.dimensions {
            doc.push(Paragraph::bullet(format!(
                "- {} (Datatype: {})",
                item.name,
                or_na(item.datatype.as_deref())
            )));
        }
    }

    if !ws.measures.is_empty() {
        doc.push(Paragraph::styled(ParagraphStyle::Heading3, "Measures Used:"));
        for item in &ws.measures {
            doc.push(Paragraph::bullet(format!(
                "- {} (Datatype: {})",
                item.name,
                or_na(item.datatype.as_deref())
            )));
        }
    }

    if !ws.calculated_fields_used.is_empty() {
        doc.push(Paragraph::styled(
            ParagraphStyle::Heading3,
            "Calculated Fields Used:",
        ));
        for item in &ws.calculated_fields_used {
            doc.push(Paragraph::bullet(item.name.as_str()));
            doc.push(
                Paragraph::plain(format!("Formula: {}", or_na(item.formula.as_deref())))
                    .indented(FORMULA_INDENT_TWIPS),
            );
        }
    }

    if !ws.filters.is_empty() {
        doc.push(Paragraph::styled(ParagraphStyle::Heading3, "Filters:"));
        for item in &ws.filters {
            doc.push(Paragraph::bullet(format!(
                "- {}",
                filter_details(item, "Selected")
            )));
        }
    }

    if !ws.fields_on_shelves.is_empty() {
        doc.push(Paragraph::styled(ParagraphStyle::Heading3, "Fields on Shelves:"));
        for item in &ws.fields_on_shelves {
            doc.push(Paragraph::bullet(format!(
                "- {} (On: {}, Role: {}, Usage: {})",
                item.field,
                item.shelf,
                or_na(item.role.as_deref()),
                or_na(item.type_on_shelf.as_deref())
            )));
        }
    }

    // Spacer between worksheets
    doc.push(Paragraph::default());
}

/// Serialize paragraphs into `word/document.xml`.
pub(crate) fn write_document_xml(paragraphs: &[Paragraph]) -> String {
    let mut out = String::with_capacity(8192);
    out.push_str(XML_DECLARATION);
    out.push_str(&format!("<w:document xmlns:w=\"{W_NS}\"><w:body>"));
    for paragraph in paragraphs {
        write_paragraph(&mut out, paragraph);
    }
    // US Letter, one-inch margins
    out.push_str(
        "<w:sectPr><w:pgSz w:w=\"12240\" w:h=\"15840\"/>\
         <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
         w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr>",
    );
    out.push_str("</w:body></w:document>");
    out
}

fn write_paragraph(out: &mut String, paragraph: &Paragraph) {
    out.push_str("<w:p>");
    if paragraph.style.is_some() || paragraph.indent_twips.is_some() {
        out.push_str("<w:pPr>");
        if let Some(style) = paragraph.style {
            out.push_str(&format!("<w:pStyle w:val=\"{}\"/>", style.style_id()));
        }
        if let Some(left) = paragraph.indent_twips {
            out.push_str(&format!("<w:ind w:left=\"{left}\"/>"));
        }
        out.push_str("</w:pPr>");
    }
    if !paragraph.text.is_empty() {
        out.push_str("<w:r>");
        if paragraph.bold {
            out.push_str("<w:rPr><w:b/></w:rPr>");
        }
        for (idx, line) in paragraph.text.split('\n').enumerate() {
            if idx > 0 {
                out.push_str("<w:br/>");
            }
            out.push_str("<w:t xml:space=\"preserve\">");
            out.push_str(&xml_escape(line));
            out.push_str("</w:t>");
        }
        out.push_str("</w:r>");
    }
    out.push_str("</w:p>");
}

/// `(style id, display name, font size in half-points, bold, outline level, left indent)`
const STYLE_TABLE: [(&str, &str, u32, bool, Option<u32>, Option<u32>); 6] = [
    ("Title", "Title", 56, false, None, None),
    ("Heading1", "heading 1", 32, true, Some(0), None),
    ("Heading2", "heading 2", 26, true, Some(1), None),
    ("Heading3", "heading 3", 24, true, Some(2), None),
    ("ListNumber", "List Number", 22, false, None, Some(720)),
    ("ListBullet", "List Bullet", 22, false, None, Some(360)),
];

fn write_styles_xml() -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push_str(&format!("<w:styles xmlns:w=\"{W_NS}\">"));
    out.push_str(
        "<w:docDefaults><w:rPrDefault><w:rPr>\
         <w:rFonts w:ascii=\"Calibri\" w:hAnsi=\"Calibri\" w:cs=\"Calibri\"/>\
         <w:sz w:val=\"22\"/></w:rPr></w:rPrDefault>\
         <w:pPrDefault><w:pPr><w:spacing w:after=\"120\"/></w:pPr></w:pPrDefault>\
         </w:docDefaults>",
    );
    out.push_str(
        "<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">\
         <w:name w:val=\"Normal\"/><w:qFormat/></w:style>",
    );
    for (id, name, size, bold, outline, indent) in STYLE_TABLE {
        out.push_str(&format!(
            "<w:style w:type=\"paragraph\" w:styleId=\"{id}\"><w:name w:val=\"{name}\"/>\
             <w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/><w:qFormat/><w:pPr>"
        ));
        if outline.is_some() {
            out.push_str("<w:keepNext/><w:spacing w:before=\"240\" w:after=\"80\"/>");
        }
        if let Some(left) = indent {
            out.push_str(&format!("<w:ind w:left=\"{left}\"/>"));
        }
        if let Some(level) = outline {
            out.push_str(&format!("<w:outlineLvl w:val=\"{level}\"/>"));
        }
        out.push_str("</w:pPr><w:rPr>");
        if bold {
            out.push_str("<w:b/>");
        }
        out.push_str(&format!("<w:sz w:val=\"{size}\"/></w:rPr></w:style>"));
    }
    out.push_str("</w:styles>");
    out
}

/// Build the complete DOCX package.
pub(crate) fn build_docx(dashboards: &[Dashboard], options: &ExportOptions) -> Result<Vec<u8>> {
    let document_xml = write_document_xml(&build_paragraphs(dashboards, options));

    let parts = vec![
        Part::new(
            "[Content_Types].xml",
            content_types_xml(&[
                ("/word/document.xml".to_string(), CT_DOCUMENT),
                ("/word/styles.xml".to_string(), CT_STYLES),
            ]),
        ),
        Part::new(
            "_rels/.rels",
            relationships_xml(&[(
                "rId1".to_string(),
                REL_OFFICE_DOCUMENT,
                "word/document.xml".to_string(),
            )]),
        ),
        Part::new("word/document.xml", document_xml),
        Part::new(
            "word/_rels/document.xml.rels",
            relationships_xml(&[("rId1".to_string(), REL_STYLES, "styles.xml".to_string())]),
        ),
        Part::new("word/styles.xml", write_styles_xml()),
    ];

    write_package(&parts)
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
    use crate::types::{Column, DashboardObject, Filter, ShelfField};

    fn texts(paragraphs: &[Paragraph]) -> Vec<&str> {
        paragraphs.iter().map(|p| p.text.as_str()).collect()
    }

    #[test]
    fn test_checklist_objects_then_worksheets() {
        let mut db = Dashboard::new("Sales");
        db.objects.push(DashboardObject {
            name: "Header".into(),
            object_type: "text".into(),
        });
        db.worksheets.push(Worksheet::new("Map"));
        db.worksheets.push(Worksheet::new("Trend"));

        let doc = build_paragraphs(&[db], &ExportOptions::default());
        let numbered: Vec<_> = doc
            .iter()
            .filter(|p| p.style == Some(ParagraphStyle::ListNumber))
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(
            numbered,
            vec!["1. Header (text)", "2. Worksheet: Map", "3. Worksheet: Trend"]
        );
        let all = texts(&doc);
        assert_eq!(all[0], "Tableau Workbook Documentation");
        assert_eq!(all[1], "Dashboard: Sales");
        assert!(all.contains(&"General Objects:"));
        assert!(all.contains(&"- Header (Type: text)"));
    }

    #[test]
    fn test_no_objects_section_without_objects() {
        let mut db = Dashboard::new("Only Sheets");
        db.worksheets.push(Worksheet::new("Map"));
        let doc = build_paragraphs(&[db], &ExportOptions::default());
        let all = texts(&doc);
        assert!(!all.contains(&"General Objects:"));
        assert!(!all.contains(&"Dashboard-Level Objects"));
        assert!(all.contains(&"1. Worksheet: Map"));
    }

    #[test]
    fn test_worksheet_sections() {
        let mut ws = Worksheet::new("Map");
        ws.datasources_used.insert("Sales".into());
        ws.datasources_used.insert("Returns".into());
        ws.dimensions.push(Column::new(
            "[Region]",
            Some("dimension".into()),
            Some("string".into()),
            None,
            None,
        ));
        ws.calculated_fields_used.push(Column::new(
            "[Margin]",
            Some("measure".into()),
            Some("real".into()),
            None,
            Some("SUM([Profit])/SUM([Sales])".into()),
        ));
        ws.filters.push(Filter {
            field: "Region".into(),
            class: Some("categorical".into()),
            datatype: "string".into(),
            members: Some(vec!["East".into(), "West".into()]),
        });
        ws.fields_on_shelves.push(ShelfField {
            field: "Region".into(),
            role: Some("dimension".into()),
            datatype: Some("string".into()),
            shelf: "Rows".into(),
            type_on_shelf: Some("nominal".into()),
        });
        let mut db = Dashboard::new("D");
        db.worksheets.push(ws);

        let doc = build_paragraphs(&[db], &ExportOptions::default());
        let all = texts(&doc);
        assert!(all.contains(&"Datasources: Returns, Sales"));
        assert!(all.contains(&"- Region (Datatype: string)"));
        assert!(!all.contains(&"Measures Used:"));
        assert!(all.contains(&"- Region (Type: categorical) (Selected: East, West)"));
        assert!(all.contains(&"- Region (On: Rows, Role: dimension, Usage: nominal)"));

        let formula = doc
            .iter()
            .find(|p| p.text.starts_with("Formula:"))
            .unwrap();
        assert_eq!(formula.text, "Formula: SUM([Profit])/SUM([Sales])");
        assert_eq!(formula.indent_twips, Some(FORMULA_INDENT_TWIPS));
        assert_eq!(doc.last().unwrap(), &Paragraph::default());
    }

    #[test]
    fn test_document_xml_paragraphs() {
        let xml = write_document_xml(&[
            Paragraph::styled(ParagraphStyle::Heading1, "Dashboard: A & B"),
            Paragraph::plain("line one\nline two").bold(),
            Paragraph::default(),
        ]);
        assert!(xml.contains(
            "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr><w:r><w:t xml:space=\"preserve\">Dashboard: A &amp; B</w:t></w:r></w:p>"
        ));
        assert!(xml.contains(
            "<w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">line one</w:t><w:br/><w:t xml:space=\"preserve\">line two</w:t>"
        ));
        assert!(xml.contains("<w:p></w:p>"));
        assert!(xml.ends_with("</w:body></w:document>"));
    }

    #[test]
    fn test_styles_define_every_paragraph_style() {
        let styles = write_styles_xml();
        for style in [
            ParagraphStyle::Title,
            ParagraphStyle::Heading1,
            ParagraphStyle::Heading2,
            ParagraphStyle::Heading3,
            ParagraphStyle::ListNumber,
            ParagraphStyle::ListBullet,
        ] {
            assert!(styles.contains(&format!("w:styleId=\"{}\"", style.style_id())));
        }
    }
}
