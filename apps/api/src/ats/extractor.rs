//! Text extraction primitives. Turn rendered document bytes back into plain text the way an
//! ATS parser would see it.
//!
//! Both backends are CPU-bound and run on the blocking pool via `tokio::task::spawn_blocking`.
//! A panic inside a parser surfaces as `ExtractionError::Worker` instead of unwinding into the
//! caller.

use std::fmt;
use std::io::{Cursor, Read};
use std::str::FromStr;
use std::sync::OnceLock;

use async_trait::async_trait;
use bytes::Bytes;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zip::ZipArchive;

use crate::ats::issues::IssueType;

const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Infers the format from a file name extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        ext.parse().ok()
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("pdf"),
            DocumentFormat::Docx => f.write_str("docx"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Malformed document structure: {0}")]
    Structure(String),

    #[error("Text encoding error: {0}")]
    Encoding(String),

    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

impl ExtractionError {
    pub fn issue_type(&self) -> IssueType {
        match self {
            ExtractionError::Encoding(_) => IssueType::EncodingError,
            ExtractionError::Structure(_) | ExtractionError::Worker(_) => IssueType::StructureError,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Narrow capability over a concrete parser library. Swap implementations without touching
/// the validation pipeline.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    fn format(&self) -> DocumentFormat;

    async fn extract_text(&self, bytes: Bytes) -> Result<String, ExtractionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PDF
// ────────────────────────────────────────────────────────────────────────────

/// Content-stream text via `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    async fn extract_text(&self, bytes: Bytes) -> Result<String, ExtractionError> {
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ExtractionError::Worker(format!("PDF parser aborted: {e}")))?
            .map_err(|e| ExtractionError::Structure(format!("Unreadable PDF: {e}")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DOCX
// ────────────────────────────────────────────────────────────────────────────

/// Run text from `word/document.xml`. Paragraph ends and breaks become newlines, tabs stay tabs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxTextExtractor;

#[async_trait]
impl TextExtractor for DocxTextExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    async fn extract_text(&self, bytes: Bytes) -> Result<String, ExtractionError> {
        tokio::task::spawn_blocking(move || docx_text(&bytes))
            .await
            .map_err(|e| ExtractionError::Worker(format!("DOCX parser aborted: {e}")))?
    }
}

pub fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Structure(format!("Not a DOCX archive: {e}")))?;

    let mut part = archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| ExtractionError::Structure(format!("Missing {DOCX_BODY_PART}: {e}")))?;

    let mut raw = Vec::new();
    part.read_to_end(&mut raw)
        .map_err(|e| ExtractionError::Structure(format!("Failed to read {DOCX_BODY_PART}: {e}")))?;

    let xml = String::from_utf8(raw)
        .map_err(|e| ExtractionError::Encoding(format!("{DOCX_BODY_PART} is not UTF-8: {e}")))?;

    Ok(document_xml_text(&xml))
}

fn docx_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab\s*/>|<w:(?:br|cr)(?:\s[^>]*)?/>|</w:p>")
            .expect("docx token regex")
    })
}

fn xml_entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(amp|lt|gt|quot|apos|#[0-9]+|#x[0-9a-fA-F]+);").expect("xml entity regex")
    })
}

/// Walks text runs, tabs, breaks and paragraph ends in document order.
fn document_xml_text(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() / 4);
    for caps in docx_token_re().captures_iter(xml) {
        match caps.get(1) {
            Some(run) => out.push_str(&unescape_xml(run.as_str())),
            None if caps[0].starts_with("<w:tab") => out.push('\t'),
            None => out.push('\n'),
        }
    }
    out.trim_end().to_string()
}

fn unescape_xml(text: &str) -> String {
    xml_entity_re()
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = match entity.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            // Unknown or invalid references are left as written.
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

/// Builds a minimal DOCX archive with one paragraph per entry.
#[cfg(test)]
pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let body: String = paragraphs
        .iter()
        .map(|p| {
            let escaped = p.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;");
            format!(r#"<w:p><w:r><w:t xml:space="preserve">{escaped}</w:t></w:r></w:p>"#)
        })
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(DOCX_BODY_PART, SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Builds a one-page PDF with one Helvetica line per entry.
#[cfg(test)]
pub(crate) fn build_pdf(lines: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 11.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("Td", vec![0.into(), (-16).into()]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}
