//! Document loading
//!
//! Turns a persisted upload into page images for the OCR model. PDFs are
//! rasterized page by page, images are decoded as a single page.

mod error;
mod kind;
mod pdf;

use std::path::{Path, PathBuf};

use image::RgbImage;

pub use error::{DocumentError, DocumentResult};
pub use kind::{DocumentKind, ACCEPTED_EXTENSIONS, ACCEPTED_MIME_TYPES};
pub use pdf::render_pdf_file;
#[cfg(test)]
pub(crate) use pdf::tests::blank_pdf;

use crate::config::DocumentConfig;

/// Decode an image file into a single RGB page
pub fn load_image_file(path: &Path) -> DocumentResult<RgbImage> {
    let img = image::open(path).map_err(|e| DocumentError::ImageError(e.to_string()))?;
    Ok(img.to_rgb8())
}

/// Load every page of the file at `path` with the loader for `kind`.
///
/// Runs on the blocking pool; decoding and rasterizing are CPU bound.
pub async fn load_pages(
    kind: DocumentKind,
    path: PathBuf,
    config: &DocumentConfig,
) -> DocumentResult<Vec<RgbImage>> {
    let scale = config.pdf_scale;

    tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => render_pdf_file(&path, scale),
        DocumentKind::Image => load_image_file(&path).map(|img| vec![img]),
    })
    .await
    .map_err(|e| DocumentError::IoError(std::io::Error::other(format!("Task join error: {}", e))))?
}
