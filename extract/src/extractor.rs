//! Format dispatch and batch extraction.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::document::{Document, DocumentKind, ExtractedText};
use crate::docx::DocxExtractor;
use crate::error::{ExtractError, Result};
use crate::pdf::PdfExtractor;
use crate::text::PlainTextExtractor;

/// Default character budget per document.
pub const DEFAULT_MAX_CHARS: usize = 8_000;

/// Turns the bytes of one supported format into plain text.
pub trait FormatExtractor: Send + Sync {
    /// The format this extractor handles.
    fn kind(&self) -> DocumentKind;

    /// Extract the full, untruncated text.
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// Configuration for content extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum characters kept per document.
    pub max_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// Converts uploaded documents into truncated plain text.
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    config: ExtractorConfig,
}

impl ContentExtractor {
    /// Create an extractor with the given configuration.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Create an extractor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExtractorConfig::default())
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract one document.
    ///
    /// Returns `Ok(None)` for unsupported types. This call blocks; use
    /// [`ContentExtractor::extract_all`] from async code.
    pub fn extract(&self, document: &Document) -> Result<Option<ExtractedText>> {
        extract_document(document, self.config.max_chars)
    }

    /// Extract a batch concurrently, preserving input order.
    ///
    /// Unsupported documents are skipped. A supported document that fails
    /// contributes an empty entry; one whose task never finished is
    /// omitted. No failure affects the other documents.
    pub async fn extract_all(&self, documents: Vec<Document>) -> Vec<ExtractedText> {
        let max_chars = self.config.max_chars;
        let mut tasks = Vec::with_capacity(documents.len());

        for document in documents {
            if !document.kind().is_supported() {
                debug!(
                    "Skipping {} with unsupported type {}",
                    document.name, document.mime_type
                );
                continue;
            }
            let name = document.name.clone();
            let handle =
                tokio::task::spawn_blocking(move || extract_document(&document, max_chars));
            tasks.push((name, handle));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for (name, handle) in tasks {
            match handle.await {
                Ok(Ok(Some(extracted))) => results.push(extracted),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    warn!("Failed to extract {name}: {e}");
                    results.push(ExtractedText::empty(name));
                }
                Err(e) => {
                    let e = ExtractError::Task(e.to_string());
                    error!("Dropping {name}: {e}");
                }
            }
        }

        info!(
            "Extracted {} documents ({} truncated)",
            results.len(),
            results.iter().filter(|r| r.truncated).count()
        );
        results
    }
}

/// Look up the extractor for a supported format.
fn extractor_for(kind: DocumentKind) -> Option<&'static dyn FormatExtractor> {
    match kind {
        DocumentKind::Pdf => Some(&PdfExtractor),
        DocumentKind::Docx => Some(&DocxExtractor),
        DocumentKind::PlainText => Some(&PlainTextExtractor),
        DocumentKind::Unsupported => None,
    }
}

fn extract_document(document: &Document, max_chars: usize) -> Result<Option<ExtractedText>> {
    let Some(extractor) = extractor_for(document.kind()) else {
        return Ok(None);
    };

    debug!(
        "Extracting {} as {:?} ({} bytes)",
        document.name,
        extractor.kind(),
        document.raw_bytes.len()
    );
    let text = extractor.extract_text(&document.raw_bytes)?;

    Ok(Some(ExtractedText::truncated_to(
        document.name.clone(),
        text,
        max_chars,
    )))
}
