//! Shared XML utilities for reading workbook elements and writing OOXML parts.
//!
//! Attribute extraction handles entity and character-reference unescaping
//! (Tableau formulas are full of `&quot;` and `&#10;`). The escaping helper is
//! shared by the XLSX and DOCX writers.

use quick_xml::events::BytesStart;

use crate::error::Result;

/// Get the qualified element name as an owned string.
///
/// Tableau tags carry no namespace prefixes worth stripping, so the full name is kept.
#[inline]
pub fn name_string(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Extract every attribute of an element as unescaped `(key, value)` pairs, in
/// document order.
///
/// Duplicate or malformed attributes are a well-formedness error.
pub fn attributes(e: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        out.push((key, value));
    }
    Ok(out)
}

/// Minimal XML escaping for attribute/text content.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab/newline are not allowed in XML 1.0
            c if c.is_control() && c != '\t' && c != '\n' && c != '\r' => {}
            _ => out.push(c),
        }
    }
    out
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

    fn make_start(xml: &str) -> BytesStart<'_> {
        // Strip < and > / /> to get just the tag content
        let content = xml
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();
        BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()))
    }

    #[test]
    fn test_name_string() {
        let e = make_start(r#"<column-instance column="[Profit]" />"#);
        assert_eq!(name_string(&e), "column-instance");
    }

    #[test]
    fn test_attributes_unescaped_in_order() {
        let e = make_start(r#"<calculation class="tableau" formula="IF [a] &gt; 1 THEN &quot;x&quot; END" />"#);
        let attrs = attributes(&e).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0], ("class".to_string(), "tableau".to_string()));
        assert_eq!(attrs[1].1, r#"IF [a] > 1 THEN "x" END"#);
    }

    #[test]
    fn test_attributes_char_refs() {
        let e = make_start(r#"<calculation formula="SUM([Sales])&#10;/ 2" />"#);
        let attrs = attributes(&e).unwrap();
        assert_eq!(attrs[0].1, "SUM([Sales])\n/ 2");
    }

    #[test]
    fn test_attributes_duplicate_is_error() {
        let e = make_start(r#"<column name="a" name="b" />"#);
        assert!(attributes(&e).is_err());
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape(r#"a<b & "c"'"#), "a&lt;b &amp; &quot;c&quot;&apos;");
        assert_eq!(xml_escape("tab\there"), "tab\there");
        assert_eq!(xml_escape("bell\u{7}"), "bell");
    }
}
