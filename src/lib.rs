pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod rng;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, PlacementConfig, RenderConfig, load_config, parse_config};
pub use ir::{Canvas, NormalizedWord, Word};
pub use layout::{
    CancelToken, Layout, LayoutError, PointerAdapter, Rect, WordLayout, assign_colors,
    compute_cloud, compute_layout, compute_layout_with_cancel, hit_test, intersects,
    is_in_bounds, normalize_words,
};
pub use parser::parse_word_list;
pub use render::render_svg;
pub use rng::{RandomSource, XorShift64Star};
pub use text_metrics::{ApproximateMetrics, FontMetrics, TextExtent, TextMetrics};
pub use theme::{Theme, ThemeVariables};

/// Everything needed to turn a word list into a drawing.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    /// Fixed seed for reproducible output; drawn from entropy when unset.
    pub seed: Option<u64>,
}

impl RenderOptions {
    pub fn dark() -> Self {
        Self {
            theme: Theme::dark(),
            ..Default::default()
        }
    }

    pub fn light() -> Self {
        Self {
            theme: Theme::light(),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.render.width, self.render.height)
    }
}

impl From<Config> for RenderOptions {
    fn from(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
            seed: config.seed,
        }
    }
}

/// Picks the metrics backend the layout config asks for.
pub fn metrics_for(config: &LayoutConfig) -> Box<dyn TextMetrics> {
    if config.fast_text_metrics {
        Box::new(ApproximateMetrics)
    } else {
        Box::new(FontMetrics::new())
    }
}

/// Lays out `words` and assigns colors, owning a fresh generator for this
/// one request.
pub fn generate_cloud(words: &[Word], options: &RenderOptions) -> Result<Layout, LayoutError> {
    let mut rng = match options.seed {
        Some(seed) => XorShift64Star::new(seed),
        None => XorShift64Star::from_entropy(),
    };
    let mut metrics = metrics_for(&options.layout);
    compute_cloud(
        words,
        options.canvas(),
        &options.theme,
        &options.layout,
        metrics.as_mut(),
        &mut rng,
    )
}

/// Full pipeline: layout, colors, SVG.
pub fn render_words(words: &[Word], options: &RenderOptions) -> anyhow::Result<String> {
    let layout = generate_cloud(words, options)?;
    Ok(render_svg(&layout, &options.theme, &options.render))
}
