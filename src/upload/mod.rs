//! Upload handling
//!
//! An upload lives for one request: its bytes are written to a named
//! temporary file, handed to the document loader, and the file is removed
//! when the `StoredUpload` is dropped.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// A file received from the upload form
#[derive(Debug, Clone)]
pub struct Upload {
    /// Original file name, if the browser sent one
    pub file_name: Option<String>,
    /// MIME type as reported by the browser
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Upload error types
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file provided. Use field name 'file'")]
    MissingFile,

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Failed to read upload: {0}")]
    Multipart(String),

    #[error("Failed to store upload: {0}")]
    Storage(#[from] std::io::Error),
}

/// Upload persisted to a temporary path
pub struct StoredUpload {
    file: NamedTempFile,
}

impl StoredUpload {
    /// Write `data` to a new temporary file under `dir` (system temp dir if `None`).
    ///
    /// The file name carries the extension for `mime` so loaders that sniff
    /// by extension see the right type.
    pub fn persist(data: &[u8], mime: &str, dir: Option<&Path>) -> Result<Self, UploadError> {
        if data.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        let suffix = format!(".{}", extension_for_mime(mime));
        let mut builder = tempfile::Builder::new();
        builder.prefix("ocr-upload-").suffix(&suffix);

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(data)?;
        file.flush()?;

        tracing::debug!("Stored {} bytes at {}", data.len(), file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// File extension used for a stored upload of the given MIME type
fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "application/pdf" => "pdf",
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let stored = StoredUpload::persist(b"%PDF-1.4", "application/pdf", Some(dir.path())).unwrap();
        assert!(stored.path().starts_with(dir.path()));
        let path = stored.path().to_path_buf();

        assert_eq!(path.extension().unwrap(), "pdf");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");

        drop(stored);
        assert!(!path.exists());
    }

    #[test]
    fn test_persist_rejects_empty() {
        assert!(matches!(
            StoredUpload::persist(b"", "image/png", None),
            Err(UploadError::EmptyFile)
        ));
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/jpg"), "jpg");
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("text/plain"), "bin");
    }
}
