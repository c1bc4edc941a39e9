//! Error types for the OCR server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::document::DocumentError;
use crate::ocr::OcrError;
use crate::pipeline::PipelineError;
use crate::upload::UploadError;
use crate::visualize::OverlayError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Upload(e) => AppError::Upload(e),
            PipelineError::Document(e) => AppError::Document(e),
            PipelineError::Ocr(e) => AppError::Ocr(e),
            PipelineError::Overlay(e) => AppError::Overlay(e),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// Status code, machine-readable type and user-facing message.
    ///
    /// Does not log; handlers log failures once with their request id.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg.clone())
            }
            AppError::Upload(e) => match e {
                UploadError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "Failed to store upload".to_string(),
                ),
                _ => (StatusCode::BAD_REQUEST, "bad_request", e.to_string()),
            },
            AppError::Document(e) => match e {
                DocumentError::UnsupportedFormat(_) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "unsupported_media_type",
                    e.to_string(),
                ),
                DocumentError::IoError(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "IO error".to_string(),
                ),
                _ => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_document", e.to_string()),
            },
            AppError::Ocr(e) => match e {
                OcrError::ModelNotFound(_)
                | OcrError::ModelLoad(_)
                | OcrError::ModelNotAvailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable", e.to_string())
                }
                OcrError::ProcessingError(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ocr_error",
                    e.to_string(),
                ),
            },
            AppError::Overlay(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "overlay_error",
                "Failed to draw detection boxes".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.parts();

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::from(UploadError::MissingFile), StatusCode::BAD_REQUEST),
            (
                AppError::from(DocumentError::UnsupportedFormat("image/gif".into())),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (AppError::from(DocumentError::EmptyPdf), StatusCode::UNPROCESSABLE_ENTITY),
            (
                AppError::from(OcrError::ModelNotFound("det.onnx".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::from(OcrError::ProcessingError("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::PayloadTooLarge("over 1 MB".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    /// Counts every event emitted while installed
    struct EventCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for EventCounter {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_error_mapping_does_not_log() {
        let events = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(EventCounter(events.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("counter installed");
            let errors = [
                AppError::from(OcrError::ProcessingError("boom".into())),
                AppError::from(OcrError::ModelLoad("bad onnx".into())),
                AppError::from(UploadError::Storage(std::io::Error::other("disk full"))),
                AppError::from(DocumentError::IoError(std::io::Error::other("gone"))),
                AppError::from(OverlayError::Encode("png".into())),
            ];
            for err in errors {
                let _ = err.into_response();
            }
        });

        assert_eq!(events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pipeline_error_conversion() {
        let err: AppError = PipelineError::Upload(UploadError::EmptyFile).into();
        assert!(matches!(err, AppError::Upload(UploadError::EmptyFile)));
    }
}
