//! Demo page endpoints
//!
//! `GET /` renders the empty page, `POST /` processes the submitted upload
//! and renders the page again with the results.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::Html,
};

use super::form::read_upload_form;
use crate::error::AppError;
use crate::html::{render_page, PageView};
use crate::pipeline::RunOptions;
use crate::state::AppState;

/// Render the page with no results
pub async fn show_page() -> Html<String> {
    Html(render_page(&PageView::default()))
}

/// Process the upload form and render the results
pub async fn submit_page(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Html<String>) {
    let request_id = uuid::Uuid::new_v4().to_string();

    let multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            tracing::warn!(request_id = %request_id, "Rejected form submission: {}", rejection);
            return error_page(
                RunOptions::default(),
                AppError::BadRequest(rejection.body_text()),
            );
        }
    };

    let form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(e) => return error_page(RunOptions::default(), e),
    };
    let options = form.options;

    let (upload, options) = match form.require_upload() {
        Ok(parts) => parts,
        Err(e) => return error_page(options, e),
    };

    tracing::info!(request_id = %request_id, "Processing upload from page");

    match state.pipeline().process(upload, options).await {
        Ok(result) => {
            tracing::info!(
                request_id = %request_id,
                total_ms = result.processing_time_ms,
                "Upload processed"
            );
            let html = render_page(&PageView {
                options,
                result: Some(&result),
                error: None,
            });
            (StatusCode::OK, Html(html))
        }
        Err(e) => {
            let e = AppError::from(e);
            tracing::error!(request_id = %request_id, error = %e, "Upload processing failed");
            error_page(options, e)
        }
    }
}

fn error_page(options: RunOptions, error: AppError) -> (StatusCode, Html<String>) {
    let (status, _, message) = error.parts();
    let html = render_page(&PageView {
        options,
        result: None,
        error: Some(message),
    });
    (status, Html(html))
}
