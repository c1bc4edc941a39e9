//! Upload form parsing shared by the page and the JSON API

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use crate::error::AppError;
use crate::pipeline::RunOptions;
use crate::upload::{Upload, UploadError};

/// Parsed upload form
#[derive(Debug)]
pub struct UploadForm {
    pub upload: Option<Upload>,
    pub options: RunOptions,
}

impl UploadForm {
    /// The uploaded file, or `MissingFile`
    pub fn require_upload(self) -> Result<(Upload, RunOptions), AppError> {
        match self.upload {
            Some(upload) => Ok((upload, self.options)),
            None => Err(UploadError::MissingFile.into()),
        }
    }
}

/// Read `file`, `assume_straight_pages` and `show_boxes` from the form.
///
/// Toggles default to on; when a toggle is sent more than once the last
/// value wins.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut upload = None;
    let mut options = RunOptions::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        tracing::debug!(
            "Received field: name='{}', filename={:?}, content_type={:?}",
            name,
            file_name,
            content_type
        );

        match name.as_str() {
            "file" => {
                let data = field.bytes().await.map_err(multipart_error)?;
                tracing::debug!("Read {} bytes of file data", data.len());

                // Browsers send an empty part when no file was chosen
                if data.is_empty() && file_name.as_deref().unwrap_or("").is_empty() {
                    continue;
                }

                upload = Some(Upload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "assume_straight_pages" => {
                let value = field.text().await.map_err(multipart_error)?;
                options.assume_straight_pages = parse_flag(&name, &value)?;
            }
            "show_boxes" => {
                let value = field.text().await.map_err(multipart_error)?;
                options.show_boxes = parse_flag(&name, &value)?;
            }
            _ => {
                tracing::debug!("Ignoring unknown field '{}'", name);
            }
        }
    }

    Ok(UploadForm { upload, options })
}

/// Parse a checkbox or boolean form value
pub fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" | "" => Ok(false),
        other => Err(AppError::BadRequest(format!(
            "Invalid value for '{}': '{}'",
            name, other
        ))),
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    tracing::error!("Failed to read multipart field: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        UploadError::Multipart(e.body_text()).into()
    }
}
