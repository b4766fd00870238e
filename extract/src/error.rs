//! Error types for content extraction.

use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting one document.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// PDF could not be parsed or its text decoded.
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Office document is not a readable ZIP archive.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A required part is missing from an Office document.
    #[error("missing document part: {0}")]
    MissingPart(String),

    /// Office document markup could not be scanned.
    #[error("invalid markup: {0}")]
    Markup(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The extraction task did not run to completion.
    #[error("extraction task failed: {0}")]
    Task(String),
}
