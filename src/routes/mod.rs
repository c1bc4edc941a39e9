//! Route modules for the OCR server

pub mod api;
pub mod form;
pub mod health;
pub mod page;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().upload.max_upload_bytes();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(page::show_page).post(page::submit_page))
        .route("/api/v1/ocr", post(api::ocr_handler))
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ocr::{MockModel, OcrService};
    use crate::pipeline::tests::{png_bytes, CountingOverlay};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "ocrplusboundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            name: &'a str,
            file_name: &'a str,
            content_type: &'a str,
            data: &'a [u8],
        },
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: {}\r\n\r\n",
                            name, file_name, content_type
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn post(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn app(config: Config) -> (Router, Arc<CountingOverlay>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config;
        config.upload.temp_dir = Some(dir.path().to_path_buf());

        let ocr = Arc::new(OcrService::with_model(Arc::new(MockModel {
            lines: vec![vec!["Hello", "World"]],
        })));
        let overlay = Arc::new(CountingOverlay::default());
        let state = AppState::with_parts(config, ocr, overlay.clone());
        (router(state), overlay, dir)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _dir) = app(Config::default());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["modelLoaded"], true);
    }

    #[tokio::test]
    async fn test_get_page() {
        let (app, _, _dir) = app(Config::default());
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Upload Image or PDF"));
    }

    #[tokio::test]
    async fn test_page_upload_renders_results() {
        let (app, overlay, _dir) = app(Config::default());
        let png = png_bytes();
        let response = app
            .oneshot(post(
                "/",
                &[
                    Part::Text("assume_straight_pages", "false"),
                    Part::Text("assume_straight_pages", "true"),
                    Part::Text("show_boxes", "false"),
                    Part::Text("show_boxes", "true"),
                    Part::File {
                        name: "file",
                        file_name: "scan.png",
                        content_type: "image/png",
                        data: &png,
                    },
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Hello World "));
        assert!(html.contains("Uploaded Image"));
        assert!(html.contains("Text Detection Boxes"));
        assert_eq!(overlay.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_page_unchecked_boxes_skip_plot() {
        let (app, overlay, _dir) = app(Config::default());
        let png = png_bytes();
        let response = app
            .oneshot(post(
                "/",
                &[
                    Part::Text("show_boxes", "false"),
                    Part::File {
                        name: "file",
                        file_name: "scan.png",
                        content_type: "image/png",
                        data: &png,
                    },
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Extracted Text"));
        assert!(!html.contains("Text Detection Boxes"));
        assert_eq!(overlay.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_page_unsupported_type() {
        let (app, _, _dir) = app(Config::default());
        let response = app
            .oneshot(post(
                "/",
                &[Part::File {
                    name: "file",
                    file_name: "anim.gif",
                    content_type: "image/gif",
                    data: b"GIF89a",
                }],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let html = body_string(response).await;
        assert!(html.contains("Unsupported file type: image/gif"));
    }

    #[tokio::test]
    async fn test_page_without_file() {
        let (app, _, _dir) = app(Config::default());
        let response = app
            .oneshot(post("/", &[Part::Text("show_boxes", "true")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_returns_json() {
        let (app, overlay, _dir) = app(Config::default());
        let png = png_bytes();
        let response = app
            .oneshot(post(
                "/api/v1/ocr",
                &[Part::File {
                    name: "file",
                    file_name: "scan.png",
                    content_type: "image/png",
                    data: &png,
                }],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["kind"], "image");
        assert_eq!(json["text"], "Hello World ");
        assert_eq!(json["pageCount"], 1);
        assert_eq!(json["pages"][0]["blocks"][0]["lines"][0]["words"][1]["value"], "World");
        assert_eq!(json["options"]["assumeStraightPages"], true);
        assert!(json["overlayPng"].is_string());
        assert_eq!(overlay.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_api_missing_file() {
        let (app, _, _dir) = app(Config::default());
        let response = app
            .oneshot(post("/api/v1/ocr", &[Part::Text("show_boxes", "off")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_api_body_limit() {
        let mut config = Config::default();
        config.upload.max_upload_mb = 0;
        let (app, _, _dir) = app(config);
        let png = png_bytes();
        let response = app
            .oneshot(post(
                "/api/v1/ocr",
                &[Part::File {
                    name: "file",
                    file_name: "scan.png",
                    content_type: "image/png",
                    data: &png,
                }],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
