//! Text flattening
//!
//! Walks pages, blocks, lines and words in the order the model produced them
//! and joins the word values into one string.

use super::types::Document;

/// Concatenate every word value, each followed by a single space.
///
/// An empty result yields an empty string. Line and paragraph boundaries are
/// not preserved.
pub fn extract_text(document: &Document) -> String {
    let mut extracted = String::new();

    for page in &document.pages {
        for block in &page.blocks {
            for line in &block.lines {
                for word in &line.words {
                    extracted.push_str(&word.value);
                    extracted.push(' ');
                }
            }
        }
    }

    extracted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::types::{Block, Line, Page, RelativeBox, Word};

    fn word(value: &str) -> Word {
        Word {
            value: value.to_string(),
            confidence: 0.9,
            geometry: RelativeBox::new(0.0, 0.0, 0.1, 0.1),
        }
    }

    fn page(index: usize, lines: Vec<Vec<&str>>) -> Page {
        let lines = lines
            .into_iter()
            .map(|words| Line {
                words: words.into_iter().map(word).collect(),
                geometry: RelativeBox::new(0.0, 0.0, 1.0, 0.1),
            })
            .collect();
        Page {
            index,
            width: 100,
            height: 100,
            blocks: vec![Block {
                lines,
                geometry: RelativeBox::new(0.0, 0.0, 1.0, 1.0),
            }],
        }
    }

    #[test]
    fn test_zero_pages_is_empty() {
        assert_eq!(extract_text(&Document::default()), "");
    }

    #[test]
    fn test_hello_world_keeps_trailing_space() {
        let doc = Document {
            pages: vec![page(0, vec![vec!["Hello", "World"]])],
        };
        assert_eq!(extract_text(&doc), "Hello World ");
    }

    #[test]
    fn test_order_follows_pages_then_lines() {
        let doc = Document {
            pages: vec![
                page(0, vec![vec!["a", "b"], vec!["c"]]),
                page(1, vec![vec!["d"]]),
            ],
        };
        assert_eq!(extract_text(&doc), "a b c d ");
    }

    #[test]
    fn test_no_dedup_or_normalization() {
        let doc = Document {
            pages: vec![page(0, vec![vec!["x", "x", " y"]])],
        };
        assert_eq!(extract_text(&doc), "x x  y ");
    }

    #[test]
    fn test_page_without_words() {
        let doc = Document {
            pages: vec![page(0, vec![])],
        };
        assert_eq!(extract_text(&doc), "");
    }
}
