//! Structured error types for twbdoc.
//!
//! Only well-formedness problems and output failures are errors. Sparse or
//! dangling references inside a workbook degrade to empty results or
//! [`crate::types::ParseWarning`]s instead.

/// All errors that can occur while parsing a workbook or writing documentation.
#[derive(Debug, thiserror::Error)]
pub enum TwbdocError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Document is readable XML events but not a well-formed document
    /// (unclosed elements, no root, several roots, text outside the root).
    #[error("Malformed workbook: {0}")]
    Malformed(String),

    /// ZIP archive error while assembling an OOXML package.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON serialization error.
    #[error("JSON serialization: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TwbdocError {
    /// True when the input itself is not a usable XML document.
    ///
    /// The CLI reports these as an invalid file rather than an unexpected failure.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Xml(_) | Self::Malformed(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TwbdocError>;
