use serde::{Deserialize, Serialize};

use crate::names::clean_field_name;

/// One field of a datasource.
///
/// Records are compared structurally: two columns are the same only if every
/// attribute matches, which is what worksheet deduplication relies on.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Display name, cleaned of bracket qualifiers
    pub name: String,
    /// Name as written in the workbook, used for exact matching
    pub original_name: String,
    /// `dimension`, `measure`, or absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Declared data type (`string`, `integer`, `real`, `date`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    /// Semantic type: `nominal`, `quantitative` or `ordinal`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub semantic_type: Option<String>,
    /// Calculation formula for computed fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// True iff the column carries a non-empty formula
    pub is_calculated: bool,
}

impl Column {
    /// Build a column; the display name and calculated flag are derived here.
    pub fn new(
        original_name: &str,
        role: Option<String>,
        datatype: Option<String>,
        semantic_type: Option<String>,
        formula: Option<String>,
    ) -> Self {
        Self {
            name: clean_field_name(original_name),
            original_name: original_name.to_string(),
            role,
            datatype,
            semantic_type,
            is_calculated: formula.as_deref().is_some_and(|f| !f.is_empty()),
            formula,
        }
    }

    pub fn is_dimension(&self) -> bool {
        self.role.as_deref() == Some("dimension")
    }

    pub fn is_measure(&self) -> bool {
        self.role.as_deref() == Some("measure")
    }

    /// Whether this column answers a (possibly bracket-qualified) field reference.
    ///
    /// Matches on cleaned names, or on the exact original name.
    pub fn matches_reference(&self, raw: &str, cleaned: &str) -> bool {
        self.name == cleaned || self.original_name == raw
    }
}

/// A named datasource and its columns in document order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    pub name: String,
    pub columns: Vec<Column>,
}

/// Datasources keyed by name, in first-seen order.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct DatasourceMap {
    datasources: Vec<Datasource>,
}

impl DatasourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a datasource, replacing an existing entry of the same name in place.
    ///
    /// A column-less entry never replaces a populated one: worksheets repeat
    /// datasource elements as bare references, and those must not erase the
    /// definition. Returns `true` if the map changed.
    pub fn insert(&mut self, datasource: Datasource) -> bool {
        match self
            .datasources
            .iter_mut()
            .find(|ds| ds.name == datasource.name)
        {
            Some(existing) => {
                if datasource.columns.is_empty() && !existing.columns.is_empty() {
                    return false;
                }
                *existing = datasource;
                true
            }
            None => {
                self.datasources.push(datasource);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Datasource> {
        self.datasources.iter().find(|ds| ds.name == name)
    }

    pub fn len(&self) -> usize {
        self.datasources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasources.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Datasource> {
        self.datasources.iter()
    }
}

impl<'a> IntoIterator for &'a DatasourceMap {
    type Item = &'a Datasource;
    type IntoIter = std::slice::Iter<'a, Datasource>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn column(name: &str) -> Column {
        Column::new(name, Some("dimension".into()), Some("string".into()), None, None)
    }

    #[test]
    fn test_column_derives_display_name() {
        let col = column("[Sales].[Region]");
        assert_eq!(col.name, "Region");
        assert_eq!(col.original_name, "[Sales].[Region]");
        assert!(!col.is_calculated);
        assert!(col.is_dimension());
        assert!(!col.is_measure());
    }

    #[test]
    fn test_empty_formula_not_calculated() {
        let col = Column::new("[Calc]", None, None, None, Some(String::new()));
        assert!(!col.is_calculated);
        assert_eq!(col.formula.as_deref(), Some(""));
    }

    #[test]
    fn test_matches_reference() {
        let col = column("[Sales].[Region]");
        assert!(col.matches_reference("[Region]", "Region"));
        assert!(col.matches_reference("[Sales].[Region]", "Region"));
        assert!(!col.matches_reference("[Segment]", "Segment"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = DatasourceMap::new();
        map.insert(Datasource { name: "a".into(), columns: vec![column("[x]")] });
        map.insert(Datasource { name: "b".into(), columns: vec![] });
        map.insert(Datasource { name: "a".into(), columns: vec![column("[y]")] });
        let names: Vec<_> = map.iter().map(|ds| ds.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(map.get("a").unwrap().columns[0].name, "y");
    }

    #[test]
    fn test_bare_reference_does_not_erase_definition() {
        let mut map = DatasourceMap::new();
        map.insert(Datasource { name: "a".into(), columns: vec![column("[x]")] });
        assert!(!map.insert(Datasource { name: "a".into(), columns: vec![] }));
        assert_eq!(map.get("a").unwrap().columns.len(), 1);
        assert_eq!(map.len(), 1);
    }
}
