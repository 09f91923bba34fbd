use serde::{Deserialize, Serialize};
use std::fmt;

use super::Worksheet;

/// A non-worksheet zone on a dashboard (text, image, parameter control, ...)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardObject {
    pub name: String,
    /// Declared zone type
    #[serde(rename = "type")]
    pub object_type: String,
}

/// A dashboard with its resolved worksheets and other objects, in zone order
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub name: String,
    pub worksheets: Vec<Worksheet>,
    pub objects: Vec<DashboardObject>,
}

impl Dashboard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Manual-annotation checklist: general objects first, then worksheets,
    /// numbered from 1.
    pub fn components(&self) -> impl Iterator<Item = (usize, Component<'_>)> {
        self.objects
            .iter()
            .map(Component::Object)
            .chain(self.worksheets.iter().map(Component::Worksheet))
            .enumerate()
            .map(|(idx, component)| (idx + 1, component))
    }
}

/// One entry of a dashboard's component checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component<'a> {
    Object(&'a DashboardObject),
    Worksheet(&'a Worksheet),
}

impl fmt::Display for Component<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(obj) => write!(f, "{} ({})", obj.name, obj.object_type),
            Self::Worksheet(ws) => write!(f, "Worksheet: {}", ws.name),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_components_objects_first_one_indexed() {
        let mut db = Dashboard::new("D");
        db.worksheets.push(Worksheet::new("Map"));
        db.objects.push(DashboardObject {
            name: "Title".into(),
            object_type: "text".into(),
        });
        db.worksheets.push(Worksheet::new("Trend"));
        let entries: Vec<String> = db
            .components()
            .map(|(n, c)| format!("{n}. {c}"))
            .collect();
        assert_eq!(
            entries,
            vec!["1. Title (text)", "2. Worksheet: Map", "3. Worksheet: Trend"]
        );
    }
}
