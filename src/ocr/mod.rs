//! OCR Module
//!
//! Wraps the pretrained text detection/recognition model and the result
//! structure it produces.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ocr_plus::config::ModelConfig;
//! use ocr_plus::ocr::{extract_text, OcrService};
//!
//! let service = OcrService::from_config(ModelConfig::default());
//!
//! // First call loads the model, later calls reuse it
//! let document = service.recognize(pages).await?;
//! let text = extract_text(&document);
//! ```

mod provider;
mod service;
mod text;
mod types;

pub use provider::{split_line, OcrModel};
pub use service::{ModelLoader, OcrService};
pub use text::extract_text;
pub use types::{Block, Document, Line, OcrError, Page, RelativeBox, Word};

#[cfg(feature = "oar")]
pub use provider::OarModel;

#[cfg(test)]
pub(crate) use provider::MockModel;
