use serde::Serialize;

use crate::ir::Word;

use super::geometry::Rect;

/// One committed word: where it sits and how large it is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordLayout {
    pub word: Word,
    pub rect: Rect,
    pub font_size: f64,
    pub opacity: f64,
    pub color_index: usize,
    /// Position of the word in the caller's input.
    pub source_index: usize,
    /// Ink extents of the committed measurement; the baseline sits
    /// `padding + ascent` below `rect.y`.
    pub ascent: f64,
    pub descent: f64,
    pub attempts: u64,
    pub shrinks: u32,
}

/// A complete, committed layout in commit order (descending normalized
/// score). No two rects intersect and all of them lie inside the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub font_family: String,
    pub words: Vec<WordLayout>,
    /// Shuffled palette; empty until colors are assigned.
    pub palette: Vec<String>,
}

impl Layout {
    pub fn empty(width: f64, height: f64, padding: f64, font_family: &str) -> Self {
        Self {
            width,
            height,
            padding,
            font_family: font_family.to_string(),
            words: Vec::new(),
            palette: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn color_of(&self, word: &WordLayout) -> Option<&str> {
        self.palette.get(word.color_index).map(String::as_str)
    }

    pub fn total_attempts(&self) -> u64 {
        self.words.iter().map(|w| w.attempts).sum()
    }
}
