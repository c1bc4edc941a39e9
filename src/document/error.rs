//! Document error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Upload type outside the accepted list
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Failed to decode an image upload
    #[error("Failed to decode image: {0}")]
    ImageError(String),

    /// Failed to open a PDF
    #[error("Failed to load PDF: {0}")]
    PdfLoadError(String),

    /// Failed to rasterize a PDF page
    #[error("Failed to render page {page}: {message}")]
    RenderError { page: usize, message: String },

    #[error("PDF has no pages")]
    EmptyPdf,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::PdfLoadError(err.to_string())
    }
}
