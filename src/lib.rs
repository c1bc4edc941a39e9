//! OCR++ Server Library
//!
//! Upload an image or PDF, run a pretrained OCR model over it, and show the
//! extracted text with optional detection-box overlays.
//! The server binary is in main.rs.
//!
//! # Modules
//!
//! - `document`: Upload type resolution and page loading (images, PDFs via MuPDF)
//! - `ocr`: Model trait, memoized model service, text flattening
//! - `pipeline`: One upload from bytes to text and overlay
//! - `routes`: HTML page, JSON API and health endpoints

pub mod config;
pub mod document;
pub mod error;
pub mod html;
pub mod ocr;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod upload;
pub mod visualize;
