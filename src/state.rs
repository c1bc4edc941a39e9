//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::ocr::OcrService;
use crate::pipeline::Pipeline;
use crate::visualize::{BoxOverlay, OverlayRenderer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: Pipeline,
}

impl AppState {
    /// Create state that loads the configured pretrained model on first use
    pub fn new(config: Config) -> Self {
        let ocr = OcrService::from_config(config.model.clone());
        Self::with_parts(config, Arc::new(ocr), Arc::new(BoxOverlay))
    }

    /// Create state from an explicit OCR service and box renderer
    pub fn with_parts(
        config: Config,
        ocr: Arc<OcrService>,
        overlay: Arc<dyn OverlayRenderer>,
    ) -> Self {
        let pipeline = Pipeline::new(
            ocr,
            overlay,
            config.document.clone(),
            config.upload.temp_dir.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the upload pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.inner.pipeline
    }

    /// Get the OCR service
    pub fn ocr(&self) -> &OcrService {
        self.inner.pipeline.ocr()
    }
}
