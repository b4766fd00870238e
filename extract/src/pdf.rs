//! PDF text extraction.
//!
//! Uses lopdf to walk the page tree and decode each page's text.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use tracing::{debug, warn};

use crate::document::DocumentKind;
use crate::error::Result;
use crate::extractor::FormatExtractor;

/// `TJ` kerning adjustments below this (in thousandths of an em) read as a word gap.
const TJ_WORD_GAP: i64 = -100;

/// Extractor for PDF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl FormatExtractor for PdfExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    /// Pages are emitted in page order and joined with `\n`. Within a page,
    /// text items are joined with a single space.
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let doc = Document::load_mem(bytes)?;
        let pages = doc.get_pages();
        debug!("PDF has {} pages", pages.len());

        let mut page_texts = Vec::with_capacity(pages.len());
        for page_id in pages.values() {
            let items = page_items(&doc, *page_id)?;
            page_texts.push(join_items(&items.join(" ")));
        }

        Ok(page_texts.join("\n"))
    }
}

/// Decode every `Tj`/`TJ` show operation on a page, one string per operation.
fn page_items(doc: &Document, page_id: ObjectId) -> Result<Vec<String>> {
    let encodings = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .map(|(name, font)| font.get_font_encoding(doc).map(|encoding| (name, encoding)))
        .collect::<lopdf::Result<BTreeMap<Vec<u8>, Encoding>>>()?;
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut items = Vec::new();
    let mut current = None;
    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                current = operation
                    .operands
                    .first()
                    .and_then(|font| font.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "Tj" | "TJ" => match current {
                Some(encoding) => {
                    let mut item = String::new();
                    show_text(&mut item, encoding, &operation.operands)?;
                    items.push(item);
                }
                None => warn!("Text shown without a selected font; skipping"),
            },
            _ => {}
        }
    }
    Ok(items)
}

fn show_text(out: &mut String, encoding: &Encoding, operands: &[Object]) -> Result<()> {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => out.push_str(&Document::decode_text(encoding, bytes)?),
            Object::Array(parts) => show_text(out, encoding, parts)?,
            Object::Integer(adjust) if *adjust < TJ_WORD_GAP => out.push(' '),
            Object::Real(adjust) if f64::from(*adjust) < TJ_WORD_GAP as f64 => out.push(' '),
            _ => {}
        }
    }
    Ok(())
}

/// Collapse the item and line breaks inside a page to single spaces.
fn join_items(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
