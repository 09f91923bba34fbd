use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Dashboard, DatasourceMap};

/// Everything extracted from one workbook file
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedWorkbook {
    pub datasources: DatasourceMap,
    pub dashboards: Vec<Dashboard>,
    /// Non-fatal reference problems found while resolving dashboards
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<ParseWarning>,
}

/// A non-fatal problem found while resolving the workbook
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParseWarning {
    /// A dashboard zone names a worksheet that does not exist in the workbook
    #[serde(rename_all = "camelCase")]
    MissingWorksheet { dashboard: String, worksheet: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingWorksheet {
                dashboard,
                worksheet,
            } => write!(
                f,
                "Worksheet '{worksheet}' referenced in dashboard '{dashboard}' not found in workbook."
            ),
        }
    }
}
