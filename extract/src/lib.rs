//! # Content extraction
//!
//! Converts uploaded files into plain text for graph synthesis.
//!
//! - **PDF**: page text in page order
//! - **Word (OOXML)**: raw paragraph text from `word/document.xml`
//! - **Plain text**: decoded verbatim
//!
//! Any other type is skipped. A failure in one document never aborts the
//! rest of the batch.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Document ──► DocumentKind ──► FormatExtractor ──► truncate     │
//! │                                                       │         │
//! │                                                       ▼         │
//! │                                               ExtractedText     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod document;
pub mod docx;
pub mod error;
pub mod extractor;
pub mod pdf;
pub mod text;

pub use document::{Document, DocumentKind, ExtractedText};
pub use docx::DocxExtractor;
pub use error::{ExtractError, Result};
pub use extractor::{ContentExtractor, ExtractorConfig, FormatExtractor};
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;
