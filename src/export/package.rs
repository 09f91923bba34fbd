//! Assemble OOXML packages (XLSX, DOCX) as in-memory ZIP archives.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::Result;

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// One part of a package: its path inside the archive and its content.
pub(crate) struct Part {
    pub path: String,
    pub content: String,
}

impl Part {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Write `parts` into a deflated ZIP archive, in the given order.
///
/// `[Content_Types].xml` should come first; some consumers sniff it.
pub(crate) fn write_package(parts: &[Part]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for part in parts {
        writer.start_file(part.path.as_str(), options)?;
        writer.write_all(part.content.as_bytes())?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// A `<Relationships>` part from `(id, type, target)` triples.
pub(crate) fn relationships_xml(relationships: &[(String, &str, String)]) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, rel_type, target) in relationships {
        out.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#
        ));
    }
    out.push_str("</Relationships>");
    out
}

/// A `[Content_Types].xml` part with the standard defaults and the given overrides.
pub(crate) fn content_types_xml(overrides: &[(String, &str)]) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for (part_name, content_type) in overrides {
        out.push_str(&format!(
            r#"<Override PartName="{part_name}" ContentType="{content_type}"/>"#
        ));
    }
    out.push_str("</Types>");
    out
}

/// Relationship type of a package's main document part.
pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
/// Relationship type of a styles part.
pub(crate) const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_write_package_roundtrips_parts() {
        let parts = vec![
            Part::new("[Content_Types].xml", content_types_xml(&[])),
            Part::new("docs/a.xml", "<a/>"),
        ];
        let bytes = write_package(&parts).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "[Content_Types].xml");
        let mut content = String::new();
        archive
            .by_name("docs/a.xml")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<a/>");
    }

    #[test]
    fn test_relationships_xml() {
        let xml = relationships_xml(&[("rId1".into(), REL_STYLES, "styles.xml".into())]);
        assert!(xml.contains(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#));
    }
}
