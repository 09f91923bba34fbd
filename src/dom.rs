//! Owned element tree built from quick-xml events.
//!
//! Workbook resolution needs "find anywhere below this node" searches and the
//! parent of a matched node, so the document is materialized once into a tree of
//! [`Element`]s. Elements carry no back-references: traversals that need the
//! parent pass it down explicitly while walking.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Result, TwbdocError};
use crate::xml_helpers::{attributes, name_string};

/// One XML element with its attributes and child elements. Text content is not
/// kept; nothing in a workbook definition that we document lives in text nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attribute value by key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value by key, treating an empty value as missing.
    pub fn attr_non_empty(&self, key: &str) -> Option<&str> {
        self.attr(key).filter(|v| !v.is_empty())
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Every descendant (not `self`) matching `predicate`, in document order.
    pub fn find_all<P>(&self, mut predicate: P) -> Vec<&Element>
    where
        P: FnMut(&Element) -> bool,
    {
        let mut found = Vec::new();
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if predicate(node) {
                found.push(node);
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }

    /// Every descendant with the given element name, in document order.
    pub fn descendants(&self, name: &str) -> Vec<&Element> {
        self.find_all(|e| e.name == name)
    }

    /// Descendants with the given name that have no ancestor of the same name
    /// below `self`. Searching inside each result then never visits a node twice.
    pub fn outermost(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.name == name {
                found.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        found
    }

    /// Every descendant matching `predicate`, paired with its immediate parent.
    pub fn find_all_with_parent<P>(&self, mut predicate: P) -> Vec<(&Element, &Element)>
    where
        P: FnMut(&Element) -> bool,
    {
        let mut found = Vec::new();
        let mut stack: Vec<(&Element, &Element)> =
            self.children.iter().rev().map(|c| (c, self)).collect();
        while let Some((node, parent)) = stack.pop() {
            if predicate(node) {
                found.push((node, parent));
            }
            stack.extend(node.children.iter().rev().map(|c| (c, node)));
        }
        found
    }
}

/// Parse a complete XML document into its root element.
///
/// The whole input must be well-formed: mismatched or unclosed tags, a missing
/// root, or content after the root element abort parsing and nothing is returned.
pub fn parse_document(data: &[u8]) -> Result<Element> {
    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                ensure_single_root(root.as_ref(), &stack)?;
                let mut element = Element::new(name_string(e));
                element.attrs = attributes(e)?;
                stack.push(element);
            }
            Event::Empty(ref e) => {
                ensure_single_root(root.as_ref(), &stack)?;
                let mut element = Element::new(name_string(e));
                element.attrs = attributes(e)?;
                attach(element, &mut stack, &mut root);
            }
            Event::End(ref e) => {
                let Some(element) = stack.pop() else {
                    return Err(TwbdocError::Malformed(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                };
                attach(element, &mut stack, &mut root);
            }
            Event::Text(ref e) => {
                // Unescaping rejects undefined entities and bare '&'
                let text = e.unescape()?;
                if stack.is_empty() && !text.trim().is_empty() {
                    return Err(TwbdocError::Malformed(
                        "text outside the document element".into(),
                    ));
                }
            }
            Event::CData(_) if stack.is_empty() => {
                return Err(TwbdocError::Malformed(
                    "CDATA outside the document element".into(),
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(TwbdocError::Malformed(format!(
            "unclosed element <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| TwbdocError::Malformed("no root element found".into()))
}

fn ensure_single_root(root: Option<&Element>, stack: &[Element]) -> Result<()> {
    if stack.is_empty() && root.is_some() {
        return Err(TwbdocError::Malformed(
            "content after the document element".into(),
        ));
    }
    Ok(())
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
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

    fn names(elements: &[&Element]) -> Vec<String> {
        elements
            .iter()
            .map(|e| e.attr("id").unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_parse_simple_tree() {
        let root = parse_document(br#"<?xml version='1.0'?><a x="1"><b/><c><d/></c></a>"#).unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.attr("x"), Some("1"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].children[0].name, "d");
    }

    #[test]
    fn test_descendants_document_order() {
        let root = parse_document(
            br#"<r><n id="1"><n id="2"/></n><m><n id="3"/></m><n id="4"/></r>"#,
        )
        .unwrap();
        assert_eq!(names(&root.descendants("n")), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_descendants_excludes_self() {
        let root = parse_document(br#"<n id="0"><n id="1"/></n>"#).unwrap();
        assert_eq!(names(&root.descendants("n")), vec!["1"]);
    }

    #[test]
    fn test_outermost_skips_nested_matches() {
        let root = parse_document(br#"<r><v id="1"><v id="2"/></v><x><v id="3"/></x></r>"#).unwrap();
        assert_eq!(names(&root.outermost("v")), vec!["1", "3"]);
    }

    #[test]
    fn test_find_all_with_parent() {
        let root =
            parse_document(br#"<r><rows><ci id="a"/></rows><shelf-item><ci id="b"/></shelf-item></r>"#)
                .unwrap();
        let found = root.find_all_with_parent(|e| e.name == "ci");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].1.name, "rows");
        assert_eq!(found[1].1.name, "shelf-item");
    }

    #[test]
    fn test_attr_non_empty() {
        let root = parse_document(br#"<d name="" caption="Sales"/>"#).unwrap();
        assert_eq!(root.attr("name"), Some(""));
        assert_eq!(root.attr_non_empty("name"), None);
        assert_eq!(root.attr_non_empty("caption"), Some("Sales"));
    }

    #[test]
    fn test_child_is_direct_only() {
        let root = parse_document(br#"<column><x><calculation/></x></column>"#).unwrap();
        assert!(root.child("calculation").is_none());
        assert!(root.child("x").is_some());
    }

    #[test]
    fn test_mismatched_tags_rejected() {
        assert!(parse_document(b"<a><b></a></b>").is_err());
    }

    #[test]
    fn test_unclosed_root_rejected() {
        let err = parse_document(b"<workbook><datasources>").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(parse_document(b"").is_err());
        assert!(parse_document(b"   ").is_err());
    }

    #[test]
    fn test_second_root_rejected() {
        assert!(parse_document(b"<a/><b/>").is_err());
    }

    #[test]
    fn test_whitespace_around_root_allowed() {
        let root = parse_document(b"<?xml version='1.0'?>\n  <a>text &amp; more</a>\n").unwrap();
        assert_eq!(root.name, "a");
    }

    #[test]
    fn test_text_outside_root_rejected() {
        assert!(parse_document(b"junk<a/>").unwrap_err().is_invalid_input());
        assert!(parse_document(b"<a/>junk").unwrap_err().is_invalid_input());
        assert!(parse_document(b"<a/><![CDATA[x]]>").is_err());
    }

    #[test]
    fn test_bad_entities_in_text_rejected() {
        assert!(parse_document(b"<a>&bogus;</a>").unwrap_err().is_invalid_input());
        assert!(parse_document(b"<a>x & y</a>").unwrap_err().is_invalid_input());
    }
}
