//! Detection box overlays
//!
//! Draws the line and word boxes of an OCR result over the page images and
//! stacks the pages into one PNG figure.

use std::io::Cursor;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::ocr::{Document, RelativeBox};

const WORD_COLOR: Rgb<u8> = Rgb([52, 152, 219]);
const LINE_COLOR: Rgb<u8> = Rgb([231, 76, 60]);
const PAGE_GAP: u32 = 16;

/// Plots an OCR result over its pages
pub trait OverlayRenderer: Send + Sync {
    /// Render one PNG figure for the whole document
    fn render(&self, pages: &[RgbImage], document: &Document) -> Result<Vec<u8>, OverlayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("Result has {results} pages but {images} page images were given")]
    PageMismatch { results: usize, images: usize },

    #[error("Failed to encode overlay: {0}")]
    Encode(String),
}

/// Hollow rectangles for every word, thicker ones for every line
#[derive(Debug, Default, Clone)]
pub struct BoxOverlay;

impl OverlayRenderer for BoxOverlay {
    fn render(&self, pages: &[RgbImage], document: &Document) -> Result<Vec<u8>, OverlayError> {
        if pages.len() != document.pages.len() {
            return Err(OverlayError::PageMismatch {
                results: document.pages.len(),
                images: pages.len(),
            });
        }

        let annotated: Vec<RgbImage> = pages
            .iter()
            .zip(document.pages.iter())
            .map(|(img, page)| {
                let mut canvas = img.clone();
                for block in &page.blocks {
                    for line in &block.lines {
                        draw_box(&mut canvas, &line.geometry, LINE_COLOR, 2);
                        for word in &line.words {
                            draw_box(&mut canvas, &word.geometry, WORD_COLOR, 1);
                        }
                    }
                }
                canvas
            })
            .collect();

        encode_png(&stack_vertically(&annotated))
    }
}

fn draw_box(canvas: &mut RgbImage, geometry: &RelativeBox, color: Rgb<u8>, thickness: u32) {
    let (x, y, width, height) = geometry.to_pixels(canvas.width(), canvas.height());

    for t in 0..thickness {
        let t_i = t as i32;
        let w = width.saturating_sub(2 * t);
        let h = height.saturating_sub(2 * t);
        if w == 0 || h == 0 {
            break;
        }
        draw_hollow_rect_mut(canvas, Rect::at(x + t_i, y + t_i).of_size(w, h), color);
    }
}

/// Stack pages top to bottom on a white background
fn stack_vertically(pages: &[RgbImage]) -> RgbImage {
    let width = pages.iter().map(|p| p.width()).max().unwrap_or(1).max(1);
    let gaps = PAGE_GAP * (pages.len().saturating_sub(1) as u32);
    let height = (pages.iter().map(|p| p.height()).sum::<u32>() + gaps).max(1);

    let mut figure = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    let mut y = 0i64;
    for page in pages {
        image::imageops::overlay(&mut figure, page, 0, y);
        y += (page.height() + PAGE_GAP) as i64;
    }
    figure
}

fn encode_png(img: &RgbImage) -> Result<Vec<u8>, OverlayError> {
    let mut output = Vec::new();
    img.write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| OverlayError::Encode(e.to_string()))?;
    Ok(output)
}
