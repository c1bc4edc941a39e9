//! OCR Service
//!
//! Owns the process-wide model handle. The model is loaded on first use,
//! exactly once, and reused for every later request.

use std::sync::Arc;

use image::RgbImage;
use tokio::sync::OnceCell;

use super::{
    provider::OcrModel,
    types::{Document, OcrError},
};
use crate::config::ModelConfig;

/// Builds the model. Called at most once per successful load.
pub type ModelLoader =
    Arc<dyn Fn() -> Result<Arc<dyn OcrModel>, OcrError> + Send + Sync>;

/// OCR service with a memoized model
pub struct OcrService {
    model: OnceCell<Arc<dyn OcrModel>>,
    loader: ModelLoader,
}

impl OcrService {
    /// Create a service that loads its model lazily with `loader`
    pub fn new(loader: ModelLoader) -> Self {
        Self {
            model: OnceCell::new(),
            loader,
        }
    }

    /// Create a service around an already loaded model
    pub fn with_model(model: Arc<dyn OcrModel>) -> Self {
        let loader: ModelLoader = {
            let model = model.clone();
            Arc::new(move || Ok(model.clone()))
        };
        Self {
            model: OnceCell::new_with(Some(model)),
            loader,
        }
    }

    /// Create a service that loads the configured pretrained model
    pub fn from_config(config: ModelConfig) -> Self {
        Self::new(Arc::new(move || load_pretrained(&config)))
    }

    /// Whether the model has been loaded yet
    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Get the model, loading it on first call.
    ///
    /// A failed load is not cached; the next call runs the loader again.
    pub async fn model(&self) -> Result<Arc<dyn OcrModel>, OcrError> {
        let model = self
            .model
            .get_or_try_init(|| async {
                tracing::info!("Loading OCR model...");
                let loader = self.loader.clone();
                let model = tokio::task::spawn_blocking(move || loader())
                    .await
                    .map_err(|e| OcrError::ModelLoad(format!("Task join error: {}", e)))??;
                tracing::info!("OCR model '{}' loaded", model.name());
                Ok::<_, OcrError>(model)
            })
            .await?;

        Ok(model.clone())
    }

    /// Run the model over every page
    pub async fn recognize(&self, pages: Vec<RgbImage>) -> Result<Document, OcrError> {
        let model = self.model().await?;
        model.predict(pages).await
    }
}

#[cfg(feature = "oar")]
fn load_pretrained(config: &ModelConfig) -> Result<Arc<dyn OcrModel>, OcrError> {
    let model = super::provider::OarModel::load(config)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "oar"))]
fn load_pretrained(_config: &ModelConfig) -> Result<Arc<dyn OcrModel>, OcrError> {
    Err(OcrError::ModelNotAvailable(
        "built without the 'oar' feature".to_string(),
    ))
}
