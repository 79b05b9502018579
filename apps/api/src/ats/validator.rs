//! Document validator. Checks that a rendered resume survives ATS text extraction.
//!
//! Pipeline per document:
//! 1. Extract text with the format's `TextExtractor` (failures become issues, not errors)
//! 2. Run the garble detectors
//! 3. Flag documents with too little text
//! 4. Compare against the expected content, if supplied
//! 5. `success` = no error-severity issue
//!
//! Only a contract violation at the boundary (an empty buffer) is returned as `Err`.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::ats::extractor::{
    DocumentFormat, DocxTextExtractor, ExtractionError, PdfTextExtractor, TextExtractor,
};
use crate::ats::garble::{find_garbled, has_replacement_char};
use crate::ats::issues::{passes, IssueType, ValidationIssue};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Pass/fail thresholds. Defaults are the ATS policy; tests may tighten them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationThresholds {
    /// Minimum trimmed length of extracted text.
    pub min_content_chars: usize,
    /// Extraction rate below this is an error.
    pub error_rate: f64,
    /// Extraction rate below this (and at or above `error_rate`) is a warning.
    pub warning_rate: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_content_chars: 50,
            error_rate: 0.85,
            warning_rate: 0.95,
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Document buffer is empty")]
    EmptyDocument,

    #[error("Unsupported document format '{0}'. Expected 'pdf' or 'docx'")]
    UnsupportedFormat(String),
}

/// Outcome of validating one document. Built once, never modified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextExtractionResult {
    pub success: bool,
    pub extracted_text: String,
    pub word_count: usize,
    pub character_count: usize,
    /// 0.0 to 1.0; 1.0 when no expected content was supplied.
    pub extraction_rate: f64,
    pub issues: Vec<ValidationIssue>,
    pub timestamp: DateTime<Utc>,
}

impl TextExtractionResult {
    /// Result for a document whose text could not be obtained at all.
    fn failed(issue: ValidationIssue) -> Self {
        Self {
            success: false,
            extracted_text: String::new(),
            word_count: 0,
            character_count: 0,
            extraction_rate: 0.0,
            issues: vec![issue],
            timestamp: Utc::now(),
        }
    }
}

/// One document in a batch request. `format` is `None` when it could not be determined.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub name: String,
    pub format: Option<DocumentFormat>,
    pub bytes: Bytes,
    pub expected_content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDocumentResult {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<DocumentFormat>,
    pub result: TextExtractionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchValidationReport {
    pub total_documents: usize,
    pub successful_extractions: usize,
    pub average_extraction_rate: f64,
    /// Number of issues of each type across the whole batch.
    pub issue_type_counts: BTreeMap<IssueType, usize>,
    pub documents: Vec<BatchDocumentResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Validator
// ────────────────────────────────────────────────────────────────────────────

/// Holds no mutable state; share it freely across requests.
#[derive(Clone)]
pub struct DocumentValidator {
    pdf: Arc<dyn TextExtractor>,
    docx: Arc<dyn TextExtractor>,
    thresholds: ValidationThresholds,
}

impl DocumentValidator {
    pub fn new(
        pdf: Arc<dyn TextExtractor>,
        docx: Arc<dyn TextExtractor>,
        thresholds: ValidationThresholds,
    ) -> Self {
        Self {
            pdf,
            docx,
            thresholds,
        }
    }

    /// `pdf-extract` for PDF, zip + document.xml for DOCX.
    pub fn with_default_extractors(thresholds: ValidationThresholds) -> Self {
        Self::new(Arc::new(PdfTextExtractor), Arc::new(DocxTextExtractor), thresholds)
    }

    pub fn thresholds(&self) -> &ValidationThresholds {
        &self.thresholds
    }

    fn extractor(&self, format: DocumentFormat) -> &dyn TextExtractor {
        match format {
            DocumentFormat::Pdf => self.pdf.as_ref(),
            DocumentFormat::Docx => self.docx.as_ref(),
        }
    }

    /// Validates one rendered document.
    pub async fn validate(
        &self,
        bytes: Bytes,
        format: DocumentFormat,
        expected_content: Option<&str>,
    ) -> Result<TextExtractionResult, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::EmptyDocument);
        }

        let size = bytes.len();
        let extractor = self.extractor(format);
        let result = match extractor.extract_text(bytes).await {
            Ok(text) => self.evaluate(text, expected_content),
            Err(e) => {
                warn!("{} extraction failed ({size} bytes): {e}", extractor.format());
                TextExtractionResult::failed(extraction_issue(&e))
            }
        };

        info!(
            %format,
            success = result.success,
            extraction_rate = result.extraction_rate,
            issues = result.issues.len(),
            "Validated document"
        );
        Ok(result)
    }

    /// Runs steps 2 to 5 of the pipeline on already-extracted text.
    pub fn evaluate(&self, text: String, expected_content: Option<&str>) -> TextExtractionResult {
        let mut issues = Vec::new();

        let garbled = find_garbled(&text);
        if !garbled.is_empty() {
            let snippets: Vec<String> = garbled
                .iter()
                .map(|g| format!("\"{}\"", g.snippet))
                .collect();
            issues.push(ValidationIssue::error(
                IssueType::GarbledText,
                format!("Garbled characters in extracted text: {}", snippets.join(", ")),
                "Embed fonts with a standard encoding or switch to an ATS-safe font family",
            ));
        }

        if has_replacement_char(&text) {
            issues.push(ValidationIssue::error(
                IssueType::EncodingError,
                "Extracted text contains Unicode replacement characters (U+FFFD)",
                "Re-export the document with UTF-8 text and fully embedded fonts",
            ));
        }

        let trimmed_chars = text.trim().chars().count();
        if trimmed_chars < self.thresholds.min_content_chars {
            issues.push(ValidationIssue::error(
                IssueType::MissingContent,
                format!(
                    "Only {trimmed_chars} characters of text could be extracted (minimum {})",
                    self.thresholds.min_content_chars
                ),
                "Make sure text is real text, not images or outlined glyphs",
            ));
        }

        let extraction_rate = match expected_content {
            Some(expected) => extraction_rate(expected, &text),
            None => 1.0,
        };
        if let Some(issue) = self.rate_issue(extraction_rate) {
            issues.push(issue);
        }

        TextExtractionResult {
            success: passes(&issues),
            word_count: text.split_whitespace().count(),
            character_count: text.chars().count(),
            extracted_text: text,
            extraction_rate,
            issues,
            timestamp: Utc::now(),
        }
    }

    fn rate_issue(&self, rate: f64) -> Option<ValidationIssue> {
        let percent = (rate * 100.0).round();
        if rate < self.thresholds.error_rate {
            Some(ValidationIssue::error(
                IssueType::MissingContent,
                format!("Only {percent}% of expected words were extracted"),
                "Avoid text in images, columns, text boxes and headers or footers",
            ))
        } else if rate < self.thresholds.warning_rate {
            Some(ValidationIssue::warning(
                IssueType::MissingContent,
                format!("{percent}% of expected words were extracted"),
                "Check section headings and special characters render as plain text",
            ))
        } else {
            None
        }
    }

    /// Validates documents one at a time. A failing document is recorded and the batch moves on.
    pub async fn validate_batch(&self, documents: Vec<DocumentInput>) -> BatchValidationReport {
        let mut results = Vec::with_capacity(documents.len());

        for doc in documents {
            let outcome = match doc.format {
                Some(format) => {
                    self.validate(doc.bytes, format, doc.expected_content.as_deref())
                        .await
                }
                None => Err(ValidationError::UnsupportedFormat(doc.name.clone())),
            };
            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    warn!("Skipping extraction for '{}': {e}", doc.name);
                    TextExtractionResult::failed(ValidationIssue::error(
                        IssueType::StructureError,
                        e.to_string(),
                        "Upload a non-empty .pdf or .docx file",
                    ))
                }
            };
            results.push(BatchDocumentResult {
                name: doc.name,
                format: doc.format,
                result,
            });
        }

        summarize(results)
    }
}

fn extraction_issue(error: &ExtractionError) -> ValidationIssue {
    let suggestion = match error.issue_type() {
        IssueType::EncodingError => "Re-export the document with UTF-8 text encoding",
        _ => "Re-export the document from the original template; the file appears corrupted",
    };
    ValidationIssue::error(error.issue_type(), error.to_string(), suggestion)
}

fn summarize(documents: Vec<BatchDocumentResult>) -> BatchValidationReport {
    let total_documents = documents.len();
    let successful_extractions = documents.iter().filter(|d| d.result.success).count();

    let average_extraction_rate = if total_documents == 0 {
        0.0
    } else {
        documents.iter().map(|d| d.result.extraction_rate).sum::<f64>() / total_documents as f64
    };

    let mut issue_type_counts = BTreeMap::new();
    for issue in documents.iter().flat_map(|d| &d.result.issues) {
        *issue_type_counts.entry(issue.issue_type).or_insert(0) += 1;
    }

    BatchValidationReport {
        total_documents,
        successful_extractions,
        average_extraction_rate,
        issue_type_counts,
        documents,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction rate
// ────────────────────────────────────────────────────────────────────────────

/// Lowercases, drops punctuation and collapses whitespace.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn word_set(text: &str) -> HashSet<String> {
    normalize_text(text)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Share of distinct expected words present in the extracted text. 1.0 when nothing is expected.
pub fn extraction_rate(expected: &str, extracted: &str) -> f64 {
    let expected_words = word_set(expected);
    if expected_words.is_empty() {
        return 1.0;
    }
    let extracted_words = word_set(extracted);
    let found = expected_words.intersection(&extracted_words).count();
    found as f64 / expected_words.len() as f64
}
