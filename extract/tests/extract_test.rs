//! Integration tests for batch extraction across formats.
//!
//! PDF and Word fixtures are built in memory so the suite has no binary
//! files to maintain.

use std::io::{Cursor, Write};

use docgraph_extract::{ContentExtractor, Document, ExtractorConfig};
use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, dictionary};
use pretty_assertions::assert_eq;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Build a minimal `.docx` with one `<w:p>` per paragraph.
fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(b"<Types/>").unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Build a PDF with one text line per page.
fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    let pages: Vec<Vec<&str>> = pages.iter().map(|line| vec![*line]).collect();
    pdf_with_items(&pages)
}

/// Build a PDF where each page shows its items as separate `Tj` operations
/// inside a single text block.
fn pdf_with_items(pages: &[Vec<&str>]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for items in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
        ];
        for (i, item) in items.iter().enumerate() {
            let dx = if i == 0 { 72 } else { 90 };
            operations.push(Operation::new("Td", vec![dx.into(), 700.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*item)]));
        }
        operations.push(Operation::new("ET", vec![]));
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_docx_paragraphs_in_order() {
    let extractor = ContentExtractor::with_defaults();
    let doc = Document::new(
        "plan.docx",
        DOCX_MIME,
        docx_bytes(&["Roadmap", "Phase one &amp; two", "Launch"]),
    );

    let extracted = extractor.extract(&doc).unwrap().unwrap();
    assert_eq!(extracted.text, "Roadmap\n\nPhase one & two\n\nLaunch");
}

#[test]
fn test_docx_without_body_part_fails() {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/styles.xml", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(b"<w:styles/>").unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let extractor = ContentExtractor::with_defaults();
    let doc = Document::new("empty.docx", DOCX_MIME, bytes);
    assert!(extractor.extract(&doc).is_err());
}

#[test]
fn test_pdf_pages_joined_by_newline() {
    let extractor = ContentExtractor::with_defaults();
    let doc = Document::new(
        "report.pdf",
        "application/pdf",
        pdf_bytes(&["First page", "Second page"]),
    );

    let extracted = extractor.extract(&doc).unwrap().unwrap();
    let lines: Vec<&str> = extracted.text.split('\n').collect();
    assert_eq!(lines.len(), 2, "unexpected text: {:?}", extracted.text);
    assert!(lines[0].contains("First"));
    assert!(lines[1].contains("Second"));
}

#[test]
fn test_pdf_items_in_one_block_are_space_separated() {
    let extractor = ContentExtractor::with_defaults();
    let doc = Document::new(
        "energy.pdf",
        "application/pdf",
        pdf_with_items(&[vec!["Solar", "Panels"], vec!["Wind", "Turbines", "Offshore"]]),
    );

    let extracted = extractor.extract(&doc).unwrap().unwrap();
    assert_eq!(extracted.text, "Solar Panels\nWind Turbines Offshore");
}

#[tokio::test]
async fn test_batch_preserves_order_and_budget() {
    let extractor = ContentExtractor::new(ExtractorConfig { max_chars: 10 });
    let docs = vec![
        Document::new("a.docx", DOCX_MIME, docx_bytes(&["Alpha paragraph text"])),
        Document::new("b.txt", "text/plain", "bravo"),
        Document::new("c.pdf", "application/pdf", pdf_bytes(&["Charlie"])),
    ];

    let results = extractor.extract_all(docs).await;

    let names: Vec<_> = results.iter().map(|r| r.source_name.as_str()).collect();
    assert_eq!(names, vec!["a.docx", "b.txt", "c.pdf"]);
    for entry in &results {
        assert!(entry.char_len() <= 10, "{} exceeds budget", entry.source_name);
    }
    assert!(results[0].truncated);
    assert_eq!(results[1].text, "bravo");
    assert!(!results[1].truncated);
}

#[tokio::test]
async fn test_unsupported_file_does_not_block_others() {
    let extractor = ContentExtractor::with_defaults();
    let docs = vec![
        Document::new("one.txt", "text/plain", "one"),
        Document::new("sheet.xlsx", "application/vnd.ms-excel", vec![1u8, 2, 3]),
        Document::new("two.txt", "text/plain", "two"),
    ];

    let results = extractor.extract_all(docs).await;
    let texts: Vec<_> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two"]);
}

#[tokio::test]
async fn test_documents_loaded_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("summary.txt");
    let docx = dir.path().join("brief.docx");
    std::fs::write(&txt, "from disk").unwrap();
    std::fs::write(&docx, docx_bytes(&["Brief"])).unwrap();

    let docs = vec![
        Document::from_path(&txt).unwrap(),
        Document::from_path(&docx).unwrap(),
    ];
    let results = ContentExtractor::with_defaults().extract_all(docs).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text, "from disk");
    assert_eq!(results[1].text, "Brief");
}
