mod cancel;
mod color;
mod error;
pub mod geometry;
mod normalize;
mod placement;
pub(crate) mod types;

pub use cancel::CancelToken;
pub use color::{assign_colors, shuffle};
pub use error::{LayoutError, LayoutResult};
pub use geometry::{Rect, intersects, is_in_bounds};
pub use hit_test::{PointerAdapter, hit_test, hit_test_all};
pub use normalize::normalize_words;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{Canvas, Word};
use crate::rng::RandomSource;
use crate::text_metrics::TextMetrics;
use crate::theme::Theme;
use placement::Placer;

/// Lays out `words` on `canvas`. Pure apart from the metrics cache and the
/// random source handed in; the caller's slice is never modified.
pub fn compute_layout(
    words: &[Word],
    canvas: Canvas,
    theme: &Theme,
    config: &LayoutConfig,
    metrics: &mut dyn TextMetrics,
    rng: &mut dyn RandomSource,
) -> LayoutResult<Layout> {
    compute_layout_with_cancel(
        words,
        canvas,
        theme,
        config,
        metrics,
        rng,
        &CancelToken::new(),
    )
}

pub fn compute_layout_with_cancel(
    words: &[Word],
    canvas: Canvas,
    theme: &Theme,
    config: &LayoutConfig,
    metrics: &mut dyn TextMetrics,
    rng: &mut dyn RandomSource,
    cancel: &CancelToken,
) -> LayoutResult<Layout> {
    validate_config(canvas, config)?;
    let _span = tracing::debug_span!(
        "compute_layout",
        words = words.len(),
        width = canvas.width,
        height = canvas.height
    )
    .entered();

    let mut layout = Layout::empty(
        canvas.width_f(),
        canvas.height_f(),
        config.padding,
        &theme.font_family,
    );
    if words.is_empty() {
        return Ok(layout);
    }

    let normalized = normalize_words(words)?;
    let mut placer = Placer::new(
        canvas,
        config.padding,
        config.base_font_size,
        &theme.font_family,
        &config.placement,
        metrics,
        rng,
        cancel,
    );
    layout.words.reserve(normalized.len());
    for word in &normalized {
        let placed = placer.place(word)?;
        layout.words.push(WordLayout {
            word: words[word.index].clone(),
            rect: placed.rect,
            font_size: placed.font_size,
            opacity: 1.0,
            color_index: 0,
            source_index: word.index,
            ascent: placed.extent.ascent,
            descent: placed.extent.descent,
            attempts: placed.attempts,
            shrinks: placed.shrinks,
        });
    }

    tracing::debug!(
        placed = layout.len(),
        attempts = layout.total_attempts(),
        "layout complete"
    );
    Ok(layout)
}

/// Layout followed by color assignment, both drawing from `rng`.
pub fn compute_cloud(
    words: &[Word],
    canvas: Canvas,
    theme: &Theme,
    config: &LayoutConfig,
    metrics: &mut dyn TextMetrics,
    rng: &mut dyn RandomSource,
) -> LayoutResult<Layout> {
    let mut layout = compute_layout(words, canvas, theme, config, metrics, rng)?;
    assign_colors(&mut layout, &theme.palette, rng)?;
    Ok(layout)
}

fn validate_config(canvas: Canvas, config: &LayoutConfig) -> LayoutResult<()> {
    let invalid = |msg: String| Err(LayoutError::InvalidConfig(msg));
    if canvas.width == 0 || canvas.height == 0 {
        return invalid(format!(
            "canvas must be non-empty, got {}x{}",
            canvas.width, canvas.height
        ));
    }
    if !config.padding.is_finite() || config.padding < 0.0 {
        return invalid(format!("padding must be >= 0, got {}", config.padding));
    }
    if !config.base_font_size.is_finite() || config.base_font_size <= 0.0 {
        return invalid(format!(
            "base font size must be > 0, got {}",
            config.base_font_size
        ));
    }
    let placement = &config.placement;
    if !(placement.shrink_factor > 0.0 && placement.shrink_factor < 1.0) {
        return invalid(format!(
            "shrink factor must lie in (0, 1), got {}",
            placement.shrink_factor
        ));
    }
    if placement.retry_threshold == 0 {
        return invalid("retry threshold must be at least 1".to_string());
    }
    if placement.max_attempts_per_word == 0 {
        return invalid("max attempts per word must be at least 1".to_string());
    }
    if !placement.min_font_size.is_finite() || placement.min_font_size <= 0.0 {
        return invalid(format!(
            "minimum font size must be > 0, got {}",
            placement.min_font_size
        ));
    }
    Ok(())
}
