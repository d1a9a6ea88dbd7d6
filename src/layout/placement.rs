use crate::config::PlacementConfig;
use crate::ir::{Canvas, NormalizedWord};
use crate::rng::RandomSource;
use crate::text_metrics::{TextExtent, TextMetrics};

use super::cancel::CancelToken;
use super::geometry::{Rect, intersects, is_in_bounds};
use super::{LayoutError, LayoutResult};

// Checking the deadline reads the clock, so only look every few attempts.
const CANCEL_CHECK_INTERVAL: u64 = 256;

#[derive(Debug, Clone, Copy)]
pub(super) struct Placement {
    pub rect: Rect,
    pub font_size: f64,
    pub extent: TextExtent,
    pub attempts: u64,
    pub shrinks: u32,
}

/// Greedy random placer. Words must be fed largest first; each committed
/// rect becomes an obstacle for every later word.
pub(super) struct Placer<'a> {
    canvas_width: f64,
    canvas_height: f64,
    padding: f64,
    base_font_size: f64,
    font_family: &'a str,
    tuning: &'a PlacementConfig,
    metrics: &'a mut dyn TextMetrics,
    rng: &'a mut dyn RandomSource,
    cancel: &'a CancelToken,
    used: Vec<Rect>,
}

impl<'a> Placer<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        canvas: Canvas,
        padding: f64,
        base_font_size: f64,
        font_family: &'a str,
        tuning: &'a PlacementConfig,
        metrics: &'a mut dyn TextMetrics,
        rng: &'a mut dyn RandomSource,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            canvas_width: canvas.width_f(),
            canvas_height: canvas.height_f(),
            padding,
            base_font_size,
            font_family,
            tuning,
            metrics,
            rng,
            cancel,
            used: Vec::new(),
        }
    }

    pub fn place(&mut self, word: &NormalizedWord) -> LayoutResult<Placement> {
        let floor_score = (self.tuning.min_font_size / self.base_font_size).min(word.score);
        let mut score = word.score;
        let mut tries: u32 = 0;
        let mut attempts: u64 = 0;
        let mut shrinks: u32 = 0;

        loop {
            let font_size = self.base_font_size * score;
            if attempts >= self.tuning.max_attempts_per_word {
                return Err(self.unsatisfiable(word, font_size, attempts));
            }
            if attempts % CANCEL_CHECK_INTERVAL == 0 && self.cancel.is_cancelled() {
                return Err(LayoutError::Cancelled);
            }
            attempts += 1;

            let extent = self.metrics.measure(&word.text, self.font_family, font_size)?;
            let width = extent.width + 2.0 * self.padding;
            let height = extent.height() + 2.0 * self.padding;
            if !width.is_finite() || !height.is_finite() {
                return Err(LayoutError::EnvironmentUnavailable(format!(
                    "non-finite measurement for '{}' at {font_size}px",
                    word.text
                )));
            }

            let fits_canvas = width <= self.canvas_width && height <= self.canvas_height;
            if fits_canvas {
                let x = self.rng.next_f64() * (self.canvas_width - width);
                let y = self.rng.next_f64() * (self.canvas_height - height);
                let candidate = Rect::new(x, y, width, height);
                if self.is_free(&candidate) {
                    self.used.push(candidate);
                    tracing::debug!(
                        text = %word.text,
                        font_size,
                        attempts,
                        shrinks,
                        "placed word"
                    );
                    return Ok(Placement {
                        rect: candidate,
                        font_size,
                        extent,
                        attempts,
                        shrinks,
                    });
                }
                tries += 1;
                if tries <= self.tuning.retry_threshold {
                    continue;
                }
            }

            // No position can help an oversized rect, so it shrinks right away.
            tries = 0;
            if score <= floor_score {
                if !fits_canvas {
                    return Err(self.unsatisfiable(word, font_size, attempts));
                }
                continue;
            }
            score = (score * self.tuning.shrink_factor).max(floor_score);
            shrinks += 1;
            tracing::trace!(
                text = %word.text,
                from = font_size,
                to = self.base_font_size * score,
                attempts,
                "shrinking word"
            );
        }
    }

    fn is_free(&self, candidate: &Rect) -> bool {
        is_in_bounds(candidate, self.canvas_width, self.canvas_height)
            && !self.used.iter().any(|rect| intersects(rect, candidate))
    }

    fn unsatisfiable(&self, word: &NormalizedWord, font_size: f64, attempts: u64) -> LayoutError {
        tracing::warn!(
            text = %word.text,
            font_size,
            attempts,
            placed = self.used.len(),
            "word cannot be placed"
        );
        LayoutError::PlacementUnsatisfiable {
            text: word.text.clone(),
            font_size,
            attempts,
        }
    }
}
