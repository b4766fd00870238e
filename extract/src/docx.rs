//! Word (Office Open XML) text extraction.
//!
//! A `.docx` file is a ZIP archive; the body lives in `word/document.xml`.
//! Only run text survives: `<w:t>` contents, tabs, line breaks and
//! paragraph boundaries. Everything else is markup and is dropped.

use std::io::{Cursor, Read};

use regex_lite::Regex;
use tracing::debug;

use crate::document::DocumentKind;
use crate::error::{ExtractError, Result};
use crate::extractor::FormatExtractor;

const BODY_PART: &str = "word/document.xml";

/// Paragraph properties (skipped), run text, tab/break elements, and
/// paragraph ends (closing or empty).
const TOKEN_PATTERN: &str = r"(?s:<w:pPr>.*?</w:pPr>)|<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:(tab|br|cr)(?:\s[^>]*)?/>|(</w:p>|<w:p(?:\s[^>]*)?/>)";

/// Extractor for `.docx` uploads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl FormatExtractor for DocxExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut xml = String::new();
        match archive.by_name(BODY_PART) {
            Ok(mut part) => {
                part.read_to_string(&mut xml)?;
            }
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ExtractError::MissingPart(BODY_PART.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        let text = body_text(&xml)?;
        debug!("Extracted {} characters from {BODY_PART}", text.len());
        Ok(text)
    }
}

/// Flatten WordprocessingML into paragraphs separated by blank lines.
fn body_text(xml: &str) -> Result<String> {
    let tokens = Regex::new(TOKEN_PATTERN).map_err(|e| ExtractError::Markup(e.to_string()))?;

    let mut out = String::new();
    let mut paragraph = String::new();
    for caps in tokens.captures_iter(xml) {
        if let Some(run) = caps.get(1) {
            paragraph.push_str(&decode_entities(run.as_str()));
        } else if let Some(element) = caps.get(2) {
            paragraph.push(if element.as_str() == "tab" { '\t' } else { '\n' });
        } else if caps.get(3).is_some() {
            out.push_str(&paragraph);
            out.push_str("\n\n");
            paragraph.clear();
        }
    }
    out.push_str(&paragraph);

    Ok(out.trim().to_string())
}

/// Decode the predefined XML entities and numeric character references.
fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail.find(';').and_then(|end| {
            let name = &tail[1..end];
            let ch = match name {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, end))
        });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    out
}
