//! Shelf label mapping for fields placed in a worksheet view.

use crate::dom::Element;

/// Label used when a column instance has no parent to inspect.
pub const UNKNOWN_SHELF: &str = "Unknown Shelf";
/// Label used for a `shelf-item` without a name.
pub const UNKNOWN_SHELF_ITEM: &str = "Unknown Shelf Item";

/// Internal shelf keys and their friendly labels, in match priority order.
const SHELF_TYPES: [(&str, &str); 10] = [
    ("rows", "Rows"),
    ("cols", "Columns"),
    ("color", "Marks - Color"),
    ("size", "Marks - Size"),
    ("label", "Marks - Label"),
    ("detail", "Marks - Detail"),
    ("tooltip", "Marks - Tooltip"),
    ("shape", "Marks - Shape"),
    ("angle", "Marks - Angle"),
    ("filter", "Filters Shelf"),
];

/// Friendly label for a `shelf-item` name such as `[MarkShelf].[ColorShelf]`.
///
/// The first shelf key found as a case-insensitive substring wins; unmatched names
/// are returned as-is.
pub fn label_for_shelf_item(name: &str) -> String {
    let lower = name.to_lowercase();
    SHELF_TYPES
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map_or_else(|| name.to_string(), |(_, label)| (*label).to_string())
}

/// Friendly label for a container tag such as `rows` or `cols` (exact key match).
pub fn label_for_container(tag: &str) -> String {
    SHELF_TYPES
        .iter()
        .find(|(key, _)| *key == tag)
        .map_or_else(|| tag.to_string(), |(_, label)| (*label).to_string())
}

/// Shelf label for a column instance, decided by its immediate parent element.
pub fn shelf_label(parent: Option<&Element>) -> String {
    match parent {
        Some(p) if p.name == "shelf-item" => {
            label_for_shelf_item(p.attr("name").unwrap_or(UNKNOWN_SHELF_ITEM))
        }
        Some(p) => label_for_container(&p.name),
        None => UNKNOWN_SHELF.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("[MarkShelf].[ColorShelf]", "Marks - Color")]
    #[test_case("[Rows]", "Rows")]
    #[test_case("COLS", "Columns")]
    #[test_case("tooltip-shelf", "Marks - Tooltip")]
    #[test_case("[FilterShelf]", "Filters Shelf")]
    #[test_case("LabelAndSize", "Marks - Size" ; "earlier key wins")]
    #[test_case("[Pages]", "[Pages]" ; "unmatched keeps raw")]
    fn test_label_for_shelf_item(name: &str, expected: &str) {
        assert_eq!(label_for_shelf_item(name), expected);
    }

    #[test_case("rows", "Rows")]
    #[test_case("cols", "Columns")]
    #[test_case("datasource-dependencies", "datasource-dependencies" ; "raw tag")]
    #[test_case("ROWS", "ROWS" ; "exact match only")]
    fn test_label_for_container(tag: &str, expected: &str) {
        assert_eq!(label_for_container(tag), expected);
    }

    #[test]
    fn test_shelf_label_from_parent() {
        let mut item = Element::new("shelf-item");
        assert_eq!(shelf_label(Some(&item)), UNKNOWN_SHELF_ITEM);
        item.attrs.push(("name".into(), "[MarkShelf].[SizeShelf]".into()));
        assert_eq!(shelf_label(Some(&item)), "Marks - Size");
        assert_eq!(shelf_label(Some(&Element::new("rows"))), "Rows");
        assert_eq!(shelf_label(None), UNKNOWN_SHELF);
    }
}
