//! PDF rasterization
//!
//! Renders every page of a PDF to an RGB image with MuPDF.

use std::path::Path;

use image::RgbImage;
use mupdf::{Colorspace, Document, Matrix};

use super::error::{DocumentError, DocumentResult};

/// Render all pages of the PDF at `path`.
///
/// `scale` 1.0 renders at 72 dpi. Any page failing to render fails the
/// whole document.
pub fn render_pdf_file(path: &Path, scale: f32) -> DocumentResult<Vec<RgbImage>> {
    let path_str = path.to_string_lossy();
    let doc = Document::open(&*path_str)?;
    let page_count = doc.page_count()? as usize;

    if page_count == 0 {
        return Err(DocumentError::EmptyPdf);
    }

    let scale = scale.clamp(0.1, 8.0);
    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();
    let mut images = Vec::with_capacity(page_count);

    for index in 0..page_count {
        let render = || -> Result<RgbImage, mupdf::Error> {
            let page = doc.load_page(index as i32)?;
            let pixmap = page.to_pixmap(&matrix, &colorspace, false, true)?;
            Ok(pixmap_to_rgb(&pixmap))
        };

        let image = render().map_err(|e| DocumentError::RenderError {
            page: index + 1,
            message: e.to_string(),
        })?;
        images.push(image);
    }

    tracing::debug!("Rendered {} PDF pages at scale {}", images.len(), scale);
    Ok(images)
}

fn pixmap_to_rgb(pixmap: &mupdf::Pixmap) -> RgbImage {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;
    let stride = pixmap.stride() as usize;

    RgbImage::from_fn(width, height, |x, y| {
        let offset = y as usize * stride + x as usize * n;
        let r = samples.get(offset).copied().unwrap_or(255);
        let g = samples.get(offset + 1).copied().unwrap_or(r);
        let b = samples.get(offset + 2).copied().unwrap_or(r);
        image::Rgb([r, g, b])
    })
}
