//! Accepted upload types and loader selection

use serde::Serialize;

use super::error::{DocumentError, DocumentResult};

/// MIME types the upload form accepts
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// File extensions the upload form accepts
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

const PDF_MIME: &str = "application/pdf";

/// Which loader handles an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    /// `application/pdf` goes to the PDF loader, everything else to the image loader
    pub fn from_mime(mime: &str) -> Self {
        if mime.eq_ignore_ascii_case(PDF_MIME) {
            Self::Pdf
        } else {
            Self::Image
        }
    }

    /// Resolve the MIME type of an upload against the accepted list.
    ///
    /// Browsers sometimes report `application/octet-stream` or nothing; the
    /// type is then guessed from the file name.
    pub fn resolve_mime(
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> DocumentResult<String> {
        let declared = content_type
            .map(|ct| {
                ct.split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase()
            })
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

        if let Some(mime) = declared {
            return if ACCEPTED_MIME_TYPES.contains(&mime.as_str()) {
                Ok(mime)
            } else {
                Err(DocumentError::UnsupportedFormat(mime))
            };
        }

        let name = file_name.unwrap_or_default();
        let extension = std::path::Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DocumentError::UnsupportedFormat(if name.is_empty() {
                "unknown".to_string()
            } else {
                name.to_string()
            }));
        }

        mime_guess::from_ext(&extension)
            .first()
            .map(|m| m.essence_str().to_string())
            .ok_or_else(|| DocumentError::UnsupportedFormat(name.to_string()))
    }
}
