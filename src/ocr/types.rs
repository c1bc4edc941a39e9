//! OCR Types
//!
//! The nested result of one OCR run: pages, blocks, lines and words.
//! Geometry is relative to the page (0-1 in both axes).

use serde::Serialize;

/// Relative bounding box (0-1 coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl RelativeBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min: x_min.clamp(0.0, 1.0),
            y_min: y_min.clamp(0.0, 1.0),
            x_max: x_max.clamp(0.0, 1.0),
            y_max: y_max.clamp(0.0, 1.0),
        }
    }

    /// Build from pixel coordinates on a page of the given size
    pub fn from_pixels(
        x_min: f32,
        y_min: f32,
        x_max: f32,
        y_max: f32,
        page_width: u32,
        page_height: u32,
    ) -> Self {
        let w = page_width.max(1) as f32;
        let h = page_height.max(1) as f32;
        Self::new(x_min / w, y_min / h, x_max / w, y_max / h)
    }

    /// Convert to pixel coordinates `(x, y, width, height)` on a page
    pub fn to_pixels(&self, page_width: u32, page_height: u32) -> (i32, i32, u32, u32) {
        let x = (self.x_min * page_width as f32).round() as i32;
        let y = (self.y_min * page_height as f32).round() as i32;
        let width = ((self.x_max - self.x_min) * page_width as f32).round().max(1.0) as u32;
        let height = ((self.y_max - self.y_min) * page_height as f32).round().max(1.0) as u32;
        (x, y, width, height)
    }

    /// Smallest box enclosing both
    pub fn union(&self, other: &RelativeBox) -> RelativeBox {
        RelativeBox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// Single recognized word
#[derive(Debug, Clone, Serialize)]
pub struct Word {
    /// Recognized text
    pub value: String,
    /// Recognition confidence (0-1)
    pub confidence: f32,
    pub geometry: RelativeBox,
}

/// A line of words, in reading order
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub words: Vec<Word>,
    pub geometry: RelativeBox,
}

/// A group of lines
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub lines: Vec<Line>,
    pub geometry: RelativeBox,
}

/// One page of the result
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Page index (0-based)
    pub index: usize,
    /// Pixel width of the page image the model saw
    pub width: u32,
    /// Pixel height of the page image the model saw
    pub height: u32,
    pub blocks: Vec<Block>,
}

impl Page {
    /// Iterate every word on the page in reading order
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.words.iter())
    }
}

/// Complete OCR result for one upload
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|p| p.words().count()).sum()
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to load OCR model: {0}")]
    ModelLoad(String),

    #[error("OCR model not available: {0}")]
    ModelNotAvailable(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),
}
