//! Upload processing pipeline
//!
//! One run per upload: persist, load pages, run the model, flatten the text
//! and optionally plot the detection boxes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::DocumentConfig;
use crate::document::{load_pages, DocumentError, DocumentKind};
use crate::ocr::{extract_text, Document, OcrError, OcrService};
use crate::upload::{StoredUpload, Upload, UploadError};
use crate::visualize::{OverlayError, OverlayRenderer};

/// Sidebar toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    /// Shown to the user and echoed back; not passed to the model
    pub assume_straight_pages: bool,
    /// Plot the detection boxes
    pub show_boxes: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            assume_straight_pages: true,
            show_boxes: true,
        }
    }
}

/// Original image bytes, for the preview above the results
#[derive(Debug, Clone)]
pub struct ImagePreview {
    pub mime: String,
    pub data: Vec<u8>,
}

/// Everything the page shows for one upload
#[derive(Debug, Clone)]
pub struct ProcessedUpload {
    pub file_name: Option<String>,
    pub kind: DocumentKind,
    pub options: RunOptions,
    /// Present for image uploads only
    pub preview: Option<ImagePreview>,
    pub document: Document,
    pub text: String,
    /// PNG figure with detection boxes, present when `show_boxes` is on
    pub overlay_png: Option<Vec<u8>>,
    pub processing_time_ms: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

/// Runs uploads through the loaders, the model and the box renderer
pub struct Pipeline {
    ocr: Arc<OcrService>,
    overlay: Arc<dyn OverlayRenderer>,
    document_config: DocumentConfig,
    temp_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(
        ocr: Arc<OcrService>,
        overlay: Arc<dyn OverlayRenderer>,
        document_config: DocumentConfig,
        temp_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            ocr,
            overlay,
            document_config,
            temp_dir,
        }
    }

    pub fn ocr(&self) -> &OcrService {
        &self.ocr
    }

    /// Process one upload
    pub async fn process(
        &self,
        upload: Upload,
        options: RunOptions,
    ) -> Result<ProcessedUpload, PipelineError> {
        let start = Instant::now();

        let mime = DocumentKind::resolve_mime(
            upload.content_type.as_deref(),
            upload.file_name.as_deref(),
        )?;
        let kind = DocumentKind::from_mime(&mime);

        tracing::info!(
            file_name = ?upload.file_name,
            mime = %mime,
            kind = ?kind,
            bytes = upload.data.len(),
            assume_straight_pages = options.assume_straight_pages,
            show_boxes = options.show_boxes,
            "Processing upload"
        );

        let stored = StoredUpload::persist(&upload.data, &mime, self.temp_dir.as_deref())?;
        let pages = load_pages(kind, stored.path().to_path_buf(), &self.document_config).await?;
        tracing::debug!("Loaded {} page(s)", pages.len());

        let preview = match kind {
            DocumentKind::Image => Some(ImagePreview {
                mime: mime.clone(),
                data: upload.data,
            }),
            DocumentKind::Pdf => None,
        };

        // Pages are needed again only for plotting
        let plot_pages = options.show_boxes.then(|| pages.clone());

        let ocr_start = Instant::now();
        let document = self.ocr.recognize(pages).await?;
        tracing::info!(
            pages = document.pages.len(),
            words = document.word_count(),
            ocr_ms = ocr_start.elapsed().as_secs_f64() * 1000.0,
            "OCR completed"
        );

        let text = extract_text(&document);

        let overlay_png = match plot_pages {
            Some(pages) => {
                let overlay = self.overlay.clone();
                let doc = document.clone();
                let png = tokio::task::spawn_blocking(move || overlay.render(&pages, &doc))
                    .await
                    .map_err(|e| OcrError::ProcessingError(format!("Task join error: {}", e)))??;
                Some(png)
            }
            None => None,
        };

        drop(stored);

        Ok(ProcessedUpload {
            file_name: upload.file_name,
            kind,
            options,
            preview,
            document,
            text,
            overlay_png,
            processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }
}
