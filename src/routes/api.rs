//! JSON OCR API
//!
//! `POST /api/v1/ocr` takes the same multipart form as the page and returns
//! the text, the full nested result and the optional overlay as JSON.

use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::form::read_upload_form;
use crate::document::DocumentKind;
use crate::error::Result;
use crate::ocr::Page;
use crate::pipeline::{ProcessedUpload, RunOptions};
use crate::state::AppState;

/// Response from OCR processing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub kind: DocumentKind,
    /// Concatenated word values
    pub text: String,
    pub page_count: usize,
    pub pages: Vec<Page>,
    pub options: RunOptions,
    /// Base64 PNG with detection boxes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_png: Option<String>,
    pub processing_time_ms: f64,
    pub processed_at: DateTime<Utc>,
}

impl From<ProcessedUpload> for OcrResponse {
    fn from(result: ProcessedUpload) -> Self {
        Self {
            success: true,
            file_name: result.file_name,
            kind: result.kind,
            text: result.text,
            page_count: result.document.pages.len(),
            pages: result.document.pages,
            options: result.options,
            overlay_png: result
                .overlay_png
                .map(|png| base64::engine::general_purpose::STANDARD.encode(png)),
            processing_time_ms: result.processing_time_ms,
            processed_at: Utc::now(),
        }
    }
}

/// OCR processing endpoint
pub async fn ocr_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OcrResponse>> {
    let request_id = uuid::Uuid::new_v4().to_string();

    let (upload, options) = read_upload_form(multipart).await?.require_upload()?;
    tracing::info!(request_id = %request_id, "Processing OCR API request");

    let result = state.pipeline().process(upload, options).await.map_err(|e| {
        tracing::error!(request_id = %request_id, error = %e, "OCR processing failed");
        e
    })?;

    tracing::info!(
        request_id = %request_id,
        pages = result.document.pages.len(),
        total_ms = result.processing_time_ms,
        "OCR completed"
    );

    Ok(Json(result.into()))
}
