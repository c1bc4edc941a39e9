//! Configuration management for the OCR server

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub document: DocumentConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Pretrained model files
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub det_model: PathBuf,
    pub rec_model: PathBuf,
    pub dict_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    /// PDF rasterization scale (1.0 = 72 dpi)
    pub pdf_scale: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_upload_mb: usize,
    /// Where uploads are persisted while processed; system temp dir if unset
    pub temp_dir: Option<PathBuf>,
    /// Load the model at startup instead of on the first upload
    pub preload_model: bool,
}

impl UploadConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Error loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            det_model: PathBuf::from("models/ppocrv4_mobile_det.onnx"),
            rec_model: PathBuf::from("models/ppocrv4_mobile_rec.onnx"),
            dict_path: PathBuf::from("models/ppocr_keys_v1.txt"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8501,
            },
            model: ModelConfig::default(),
            document: DocumentConfig { pdf_scale: 2.0 },
            upload: UploadConfig {
                max_upload_mb: 200,
                temp_dir: None,
                preload_model: false,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; missing keys take defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            server: ServerConfig {
                host: var("OCR_HOST").unwrap_or(defaults.server.host),
                port: parse(&var, "OCR_PORT", defaults.server.port)?,
            },
            model: ModelConfig {
                det_model: var("OCR_DET_MODEL")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.model.det_model),
                rec_model: var("OCR_REC_MODEL")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.model.rec_model),
                dict_path: var("OCR_DICT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.model.dict_path),
            },
            document: DocumentConfig {
                pdf_scale: parse(&var, "OCR_PDF_SCALE", defaults.document.pdf_scale)?,
            },
            upload: UploadConfig {
                max_upload_mb: parse(&var, "OCR_MAX_UPLOAD_MB", defaults.upload.max_upload_mb)?,
                temp_dir: var("OCR_TEMP_DIR").map(PathBuf::from),
                preload_model: parse_bool(&var, "OCR_PRELOAD_MODEL", defaults.upload.preload_model)?,
            },
        })
    }
}

fn parse<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::InvalidValue { key, value }),
        },
        None => Ok(default),
    }
}

fn parse_bool<F>(var: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { key, value }),
        },
        None => Ok(default),
    }
}
