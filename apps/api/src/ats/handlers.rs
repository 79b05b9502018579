//! Axum route handlers for the ATS compliance API.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::ats::extractor::DocumentFormat;
use crate::ats::font_policy::{FontConfig, FontValidation, FontVariant};
use crate::ats::validator::{
    BatchValidationReport, DocumentInput, TextExtractionResult, ValidationError,
};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Font metadata reported by a renderer. Every field may be missing or null.
#[derive(Debug, Default, Deserialize)]
pub struct FontCheckRequest {
    pub family: Option<String>,
    pub size: Option<f32>,
    pub color: Option<String>,
}

impl From<FontCheckRequest> for FontConfig {
    /// Missing values become empty/zero so they fail the policy rather than the request.
    fn from(request: FontCheckRequest) -> Self {
        FontConfig {
            family: request.family.unwrap_or_default(),
            size: request.size.unwrap_or(0.0),
            color: request.color.unwrap_or_default(),
        }
    }
}

/// One uploaded file from a multipart body.
struct Upload {
    file_name: Option<String>,
    bytes: Bytes,
}

/// Parsed multipart form: `file` (repeatable), `format`, `expected_content`.
#[derive(Default)]
struct UploadForm {
    files: Vec<Upload>,
    format: Option<String>,
    expected_content: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Font handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/fonts
pub async fn handle_list_fonts(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, FontConfig>> {
    let table = FontVariant::ALL
        .iter()
        .map(|&variant| (variant.to_string(), state.font_policy.get_font(variant)))
        .collect();
    Json(table)
}

/// GET /api/v1/fonts/:variant
pub async fn handle_get_font(
    State(state): State<AppState>,
    Path(variant): Path<String>,
) -> Result<Json<FontConfig>, AppError> {
    let variant: FontVariant = variant.parse().map_err(AppError::NotFound)?;
    Ok(Json(state.font_policy.get_font(variant)))
}

/// POST /api/v1/fonts/validate
pub async fn handle_validate_font(
    State(state): State<AppState>,
    Json(request): Json<FontCheckRequest>,
) -> Json<FontValidation> {
    Json(state.font_policy.validate(&request.into()))
}

// ────────────────────────────────────────────────────────────────────────────
// Document handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/validate
///
/// Multipart: `file`, optional `format` (pdf|docx, else taken from the file name),
/// optional `expected_content`.
pub async fn handle_validate_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TextExtractionResult>, AppError> {
    let mut form = read_form(multipart).await?;
    let upload = match form.files.len() {
        0 => return Err(AppError::Validation("'file' field is required".to_string())),
        1 => form.files.remove(0),
        n => {
            return Err(AppError::Validation(format!(
                "Expected exactly one file, got {n}. Use /api/v1/validate/batch for several."
            )))
        }
    };

    let format = resolve_format(form.format.as_deref(), upload.file_name.as_deref())?;
    let result = state
        .validator
        .validate(upload.bytes, format, form.expected_content.as_deref())
        .await?;

    Ok(Json(result))
}

/// POST /api/v1/validate/batch
///
/// Multipart: repeated `file` fields (format from each file name) and an optional
/// `expected_content` shared by every document. A file with an unrecognised extension is
/// reported in its own result; the rest of the batch is still validated.
pub async fn handle_validate_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchValidationReport>, AppError> {
    let form = read_form(multipart).await?;
    if form.files.is_empty() {
        return Err(AppError::Validation(
            "At least one 'file' field is required".to_string(),
        ));
    }

    let documents = form
        .files
        .into_iter()
        .enumerate()
        .map(|(i, upload)| DocumentInput {
            format: resolve_format(None, upload.file_name.as_deref()).ok(),
            name: upload
                .file_name
                .unwrap_or_else(|| format!("document-{}", i + 1)),
            bytes: upload.bytes,
            expected_content: form.expected_content.clone(),
        })
        .collect();

    Ok(Json(state.validator.validate_batch(documents).await))
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                form.files.push(Upload { file_name, bytes });
            }
            "format" | "expected_content" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid '{name}' field: {e}")))?;
                if name == "format" {
                    form.format = Some(text);
                } else {
                    form.expected_content = Some(text);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Explicit format tag wins; otherwise the file extension decides.
fn resolve_format(
    tag: Option<&str>,
    file_name: Option<&str>,
) -> Result<DocumentFormat, ValidationError> {
    match tag {
        Some(tag) => tag.parse().map_err(ValidationError::UnsupportedFormat),
        None => file_name
            .and_then(DocumentFormat::from_file_name)
            .ok_or_else(|| {
                ValidationError::UnsupportedFormat(file_name.unwrap_or_default().to_string())
            }),
    }
}
