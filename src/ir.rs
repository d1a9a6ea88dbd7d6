use serde::{Deserialize, Serialize};

/// A caller-supplied label and its weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub score: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}

/// A word whose score has been divided by the batch total.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedWord {
    pub text: String,
    pub score: f64,
    /// Position of the word in the caller's input.
    pub index: usize,
}

/// Pixel dimensions of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_f(&self) -> f64 {
        self.width as f64
    }

    pub fn height_f(&self) -> f64 {
        self.height as f64
    }
}
