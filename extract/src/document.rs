//! Input documents and their extracted text.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";

/// An uploaded file, alive only for the duration of one extraction.
#[derive(Debug, Clone)]
pub struct Document {
    /// File name as shown to the user.
    pub name: String,

    /// Declared MIME type.
    pub mime_type: String,

    /// File contents.
    pub raw_bytes: Vec<u8>,
}

impl Document {
    /// Create a document from its parts.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        raw_bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            raw_bytes: raw_bytes.into(),
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw_bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            name,
            mime_type,
            raw_bytes,
        })
    }

    /// Classify the declared MIME type.
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_mime(&self.mime_type)
    }
}

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
    /// Anything else; skipped without error.
    Unsupported,
}

impl DocumentKind {
    /// Classify a MIME type. Parameters such as `charset` are ignored.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            MIME_PDF => Self::Pdf,
            MIME_DOCX => Self::Docx,
            MIME_TEXT => Self::PlainText,
            _ => Self::Unsupported,
        }
    }

    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }
}

/// Text extracted from one accepted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Name of the source document.
    pub source_name: String,

    /// Extracted (possibly truncated) text.
    pub text: String,

    /// Whether the text was cut to the character budget.
    pub truncated: bool,
}

impl ExtractedText {
    /// Build an entry, cutting `text` to at most `max_chars` characters.
    pub fn truncated_to(source_name: impl Into<String>, text: String, max_chars: usize) -> Self {
        let (text, truncated) = truncate_chars(text, max_chars);
        Self {
            source_name: source_name.into(),
            text,
            truncated,
        }
    }

    /// An entry for a document whose extraction failed.
    pub fn empty(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            text: String::new(),
            truncated: false,
        }
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
fn truncate_chars(mut text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            text.truncate(byte_idx);
            (text, true)
        }
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(DocumentKind::from_mime("application/pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_mime(MIME_DOCX), DocumentKind::Docx);
        assert_eq!(
            DocumentKind::from_mime("Text/Plain; charset=utf-8"),
            DocumentKind::PlainText
        );
        assert_eq!(DocumentKind::from_mime("image/png"), DocumentKind::Unsupported);
        assert_eq!(DocumentKind::from_mime(""), DocumentKind::Unsupported);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let entry = ExtractedText::truncated_to("a.txt", "héllo wörld".to_string(), 5);
        assert_eq!(entry.text, "héllo");
        assert!(entry.truncated);

        let entry = ExtractedText::truncated_to("a.txt", "short".to_string(), 5);
        assert_eq!(entry.text, "short");
        assert!(!entry.truncated);
    }

    #[test]
    fn test_from_path_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let doc = Document::from_path(&path).unwrap();
        assert_eq!(doc.name, "notes.txt");
        assert_eq!(doc.mime_type, "text/plain");
        assert_eq!(doc.kind(), DocumentKind::PlainText);
        assert_eq!(doc.raw_bytes, b"hello");
    }
}
