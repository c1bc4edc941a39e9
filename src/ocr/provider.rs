//! OCR Models
//!
//! Defines the model trait and the `oar-ocr` backed implementation.

use async_trait::async_trait;
use image::RgbImage;

use super::types::{OcrError, RelativeBox};
use super::Document;

/// Pretrained OCR model
#[async_trait]
pub trait OcrModel: Send + Sync {
    /// Short name used in logs and API responses
    fn name(&self) -> &'static str;

    /// Run detection and recognition over every page, in order
    async fn predict(&self, pages: Vec<RgbImage>) -> Result<Document, OcrError>;
}

/// Split a recognized line into words with their boxes.
///
/// When the model returned one box per word those are used, otherwise the
/// line box is divided horizontally in proportion to character offsets.
pub fn split_line(
    text: &str,
    line_box: RelativeBox,
    word_boxes: Option<&[RelativeBox]>,
) -> Vec<(String, RelativeBox)> {
    let words: Vec<&str> = text.split_whitespace().collect();

    if let Some(boxes) = word_boxes {
        if boxes.len() == words.len() {
            return words
                .into_iter()
                .zip(boxes.iter().copied())
                .map(|(w, b)| (w.to_string(), b))
                .collect();
        }
    }

    let total = text.chars().count().max(1) as f32;
    let width = line_box.x_max - line_box.x_min;
    let base = text.as_ptr() as usize;

    words
        .into_iter()
        .map(|w| {
            let byte_start = w.as_ptr() as usize - base;
            let start = text[..byte_start].chars().count() as f32;
            let end = start + w.chars().count() as f32;
            let geometry = RelativeBox::new(
                line_box.x_min + width * start / total,
                line_box.y_min,
                line_box.x_min + width * end / total,
                line_box.y_max,
            );
            (w.to_string(), geometry)
        })
        .collect()
}

#[cfg(feature = "oar")]
pub use oar::OarModel;

#[cfg(feature = "oar")]
mod oar {
    use std::sync::Arc;

    use async_trait::async_trait;
    use image::RgbImage;
    use oar_ocr::oarocr::{OAROCRBuilder, OAROCRResult, OAROCR};

    use super::{split_line, OcrModel};
    use crate::config::ModelConfig;
    use crate::ocr::types::{Block, Document, Line, OcrError, Page, RelativeBox, Word};

    /// ONNX text detection + recognition pipeline from `oar-ocr`
    pub struct OarModel {
        ocr: Arc<OAROCR>,
    }

    impl OarModel {
        /// Build the pipeline from model files on disk
        pub fn load(config: &ModelConfig) -> Result<Self, OcrError> {
            for (label, path) in [
                ("Detection model", &config.det_model),
                ("Recognition model", &config.rec_model),
                ("Dictionary file", &config.dict_path),
            ] {
                if !path.exists() {
                    return Err(OcrError::ModelNotFound(format!(
                        "{} not found: {}",
                        label,
                        path.display()
                    )));
                }
            }

            // Library word boxes can be per character; split_line then
            // falls back to the proportional split.
            let ocr = OAROCRBuilder::new(&config.det_model, &config.rec_model, &config.dict_path)
                .return_word_box(true)
                .build()
                .map_err(|e| OcrError::ModelLoad(e.to_string()))?;

            Ok(Self { ocr: Arc::new(ocr) })
        }
    }

    #[async_trait]
    impl OcrModel for OarModel {
        fn name(&self) -> &'static str {
            "oar-ocr"
        }

        async fn predict(&self, pages: Vec<RgbImage>) -> Result<Document, OcrError> {
            if pages.is_empty() {
                return Ok(Document::default());
            }

            let ocr = self.ocr.clone();
            let results = tokio::task::spawn_blocking(move || ocr.predict(pages))
                .await
                .map_err(|e| OcrError::ProcessingError(format!("Task join error: {}", e)))?
                .map_err(|e| OcrError::ProcessingError(e.to_string()))?;

            Ok(Document {
                pages: results
                    .iter()
                    .enumerate()
                    .map(|(index, result)| convert_page(index, result))
                    .collect(),
            })
        }
    }

    fn convert_page(index: usize, result: &OAROCRResult) -> Page {
        let width = result.input_img.width();
        let height = result.input_img.height();
        let to_relative = |b: &oar_ocr::processors::BoundingBox| {
            RelativeBox::from_pixels(b.x_min(), b.y_min(), b.x_max(), b.y_max(), width, height)
        };

        let mut lines = Vec::new();
        for region in result.text_regions.iter() {
            let Some(text) = region.text.as_deref() else {
                continue;
            };
            let confidence = region.confidence.unwrap_or(0.0);
            let line_box = to_relative(&region.bounding_box);
            let word_boxes: Option<Vec<RelativeBox>> = region
                .word_boxes
                .as_ref()
                .map(|boxes| boxes.iter().map(to_relative).collect());

            let words: Vec<Word> = split_line(text, line_box, word_boxes.as_deref())
                .into_iter()
                .map(|(value, geometry)| Word {
                    value,
                    confidence,
                    geometry,
                })
                .collect();

            if !words.is_empty() {
                lines.push(Line {
                    words,
                    geometry: line_box,
                });
            }
        }

        let blocks = match lines.iter().map(|l| l.geometry).reduce(|a, b| a.union(&b)) {
            Some(geometry) => vec![Block { lines, geometry }],
            None => Vec::new(),
        };

        Page {
            index,
            width,
            height,
            blocks,
        }
    }
}

/// Canned model for testing
#[cfg(test)]
pub struct MockModel {
    /// Words returned for each page, one line per inner vector
    pub lines: Vec<Vec<&'static str>>,
}

#[cfg(test)]
#[async_trait]
impl OcrModel for MockModel {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn predict(&self, pages: Vec<RgbImage>) -> Result<Document, OcrError> {
        use super::types::{Block, Line, Page, Word};

        let pages = pages
            .iter()
            .enumerate()
            .map(|(index, img)| {
                let lines: Vec<Line> = self
                    .lines
                    .iter()
                    .enumerate()
                    .map(|(row, words)| {
                        let y = 0.1 * row as f32;
                        let line_box = RelativeBox::new(0.1, y, 0.9, y + 0.08);
                        let text = words.join(" ");
                        Line {
                            words: split_line(&text, line_box, None)
                                .into_iter()
                                .map(|(value, geometry)| Word {
                                    value,
                                    confidence: 0.99,
                                    geometry,
                                })
                                .collect(),
                            geometry: line_box,
                        }
                    })
                    .collect();
                Page {
                    index,
                    width: img.width(),
                    height: img.height(),
                    blocks: vec![Block {
                        lines,
                        geometry: RelativeBox::new(0.1, 0.0, 0.9, 1.0),
                    }],
                }
            })
            .collect();

        Ok(Document { pages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_proportional() {
        let line = RelativeBox::new(0.0, 0.2, 1.0, 0.3);
        let words = split_line("ab cd", line, None);

        assert_eq!(words.len(), 2);
        assert_eq!(words[0].0, "ab");
        assert_eq!(words[1].0, "cd");
        assert!((words[0].1.x_max - 0.4).abs() < 1e-6);
        assert!((words[1].1.x_min - 0.6).abs() < 1e-6);
        assert_eq!(words[1].1.y_min, 0.2);
    }

    #[test]
    fn test_split_line_uses_model_word_boxes() {
        let line = RelativeBox::new(0.0, 0.0, 1.0, 0.1);
        let boxes = [
            RelativeBox::new(0.0, 0.0, 0.2, 0.1),
            RelativeBox::new(0.5, 0.0, 0.9, 0.1),
        ];
        let words = split_line("Hello World", line, Some(&boxes));
        assert_eq!(words[1].1, boxes[1]);
    }

    #[test]
    fn test_split_line_ignores_mismatched_word_boxes() {
        let line = RelativeBox::new(0.0, 0.0, 1.0, 0.1);
        let boxes = [RelativeBox::new(0.0, 0.0, 0.2, 0.1)];
        let words = split_line("one two", line, Some(&boxes));
        assert_eq!(words.len(), 2);
        assert_ne!(words[0].1, boxes[0]);
    }

    #[test]
    fn test_split_line_per_character_boxes_fall_back() {
        let line = RelativeBox::new(0.0, 0.0, 1.0, 0.1);
        let boxes: Vec<RelativeBox> = (0..5)
            .map(|i| RelativeBox::new(0.2 * i as f32, 0.0, 0.2 * i as f32 + 0.15, 0.1))
            .collect();
        let words = split_line("ab cd", line, Some(&boxes));

        assert_eq!(words.len(), 2);
        assert!((words[0].1.x_max - 0.4).abs() < 1e-6);
        assert!((words[1].1.x_min - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_split_line_whitespace_only() {
        let line = RelativeBox::new(0.0, 0.0, 1.0, 0.1);
        assert!(split_line("   ", line, None).is_empty());
    }

    #[tokio::test]
    async fn test_mock_model_one_page_per_image() {
        let model = MockModel {
            lines: vec![vec!["Hello", "World"]],
        };
        let doc = model
            .predict(vec![RgbImage::new(10, 10), RgbImage::new(20, 20)])
            .await
            .unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[1].width, 20);
        assert_eq!(doc.word_count(), 4);
    }
}
