//! Data types for the workbook documentation model.

mod dashboard;
mod datasource;
mod workbook;
mod worksheet;

pub use dashboard::*;
pub use datasource::*;
pub use workbook::*;
pub use worksheet::*;
