use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Column;

/// Datatype recorded for a filter whose field cannot be resolved.
pub const UNRESOLVED_DATATYPE: &str = "N/A";

/// A filter applied to a worksheet
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Target field, cleaned
    pub field: String,
    /// Declared filter class (`categorical`, `quantitative`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Datatype of the target field, or [`UNRESOLVED_DATATYPE`]
    pub datatype: String,
    /// Explicitly selected members, only when the workbook lists any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

/// A field placed on a visual encoding shelf
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ShelfField {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    /// Friendly shelf label ("Rows", "Marks - Color", ...) or the raw shelf key
    pub shelf: String,
    /// How the field is used on the shelf (`nominal`, `quantitative`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_on_shelf: Option<String>,
}

/// A fully resolved worksheet
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Worksheet {
    pub name: String,
    /// Names of the datasources the worksheet depends on
    pub datasources_used: BTreeSet<String>,
    pub dimensions: Vec<Column>,
    pub measures: Vec<Column>,
    pub calculated_fields_used: Vec<Column>,
    pub filters: Vec<Filter>,
    pub fields_on_shelves: Vec<ShelfField>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// File a resolved shelf column under exactly one classified list.
    ///
    /// Calculated status wins over role; a column with neither a calculation nor a
    /// dimension/measure role is not classified.
    pub fn classify(&mut self, column: &Column) {
        if column.is_calculated {
            self.calculated_fields_used.push(column.clone());
        } else if column.is_dimension() {
            self.dimensions.push(column.clone());
        } else if column.is_measure() {
            self.measures.push(column.clone());
        }
    }

    /// Collapse structurally identical entries, keeping first occurrences.
    pub fn dedup(&mut self) {
        dedup_records(&mut self.dimensions);
        dedup_records(&mut self.measures);
        dedup_records(&mut self.calculated_fields_used);
        dedup_records(&mut self.fields_on_shelves);
    }
}

/// Remove records equal to an earlier record, preserving order.
pub fn dedup_records<T>(records: &mut Vec<T>)
where
    T: Clone + Eq + std::hash::Hash,
{
    let mut seen = std::collections::HashSet::with_capacity(records.len());
    records.retain(|record| seen.insert(record.clone()));
}
