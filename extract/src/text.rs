//! Plain text passthrough.

use crate::document::DocumentKind;
use crate::error::Result;
use crate::extractor::FormatExtractor;

/// Extractor for `text/plain` uploads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl FormatExtractor for PlainTextExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::PlainText
    }

    /// Decode as UTF-8. A leading byte-order mark is dropped and invalid
    /// sequences become U+FFFD.
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let text = String::from_utf8_lossy(bytes);
        Ok(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
    }
}
