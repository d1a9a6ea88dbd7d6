use crate::theme::{Theme, ThemeVariables};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs of the collision-retry loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Failed attempts at one size before the word shrinks.
    pub retry_threshold: u32,
    /// Multiplier applied to the word's score on each shrink, in (0, 1).
    pub shrink_factor: f64,
    /// Hard cap on attempts for a single word, across all sizes.
    pub max_attempts_per_word: u64,
    /// Shrinking stops at this pixel size (or the word's initial size, if
    /// that is already smaller).
    pub min_font_size: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            retry_threshold: 1000,
            shrink_factor: 0.95,
            max_attempts_per_word: 250_000,
            min_font_size: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub padding: f64,
    pub base_font_size: f64,
    pub fast_text_metrics: bool,
    pub placement: PlacementConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            base_font_size: 5000.0,
            fast_text_metrics: false,
            placement: PlacementConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Canvas width in backing-store pixels.
    pub width: u32,
    pub height: u32,
    pub show_debug_rects: bool,
    /// Backing-store pixels per CSS pixel, used when mapping pointers.
    pub pixel_ratio: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            show_debug_rects: false,
            pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    /// Theme edits from the config file, already applied to `theme`.
    pub theme_variables: ThemeVariables,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f64>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    padding: Option<NumberOrString>,
    base_font_size: Option<NumberOrString>,
    fast_text_metrics: Option<bool>,
    retry_threshold: Option<u32>,
    shrink_factor: Option<f64>,
    max_attempts_per_word: Option<u64>,
    min_font_size: Option<NumberOrString>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<u32>,
    height: Option<u32>,
    show_debug_rects: Option<bool>,
    pixel_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
    seed: Option<u64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

/// Parses a JSON5 config document and applies it on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme '{theme_name}'"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if vars.palette.as_ref().is_some_and(Vec::is_empty) {
            anyhow::bail!("themeVariables.palette must not be empty");
        }
        config.theme.apply(&vars);
        config.theme_variables = vars;
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.padding.as_ref().and_then(|v| v.as_f64()) {
            config.layout.padding = v;
        }
        if let Some(v) = layout.base_font_size.as_ref().and_then(|v| v.as_f64()) {
            config.layout.base_font_size = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            config.layout.fast_text_metrics = v;
        }
        if let Some(v) = layout.retry_threshold {
            config.layout.placement.retry_threshold = v;
        }
        if let Some(v) = layout.shrink_factor {
            config.layout.placement.shrink_factor = v;
        }
        if let Some(v) = layout.max_attempts_per_word {
            config.layout.placement.max_attempts_per_word = v;
        }
        if let Some(v) = layout.min_font_size.as_ref().and_then(|v| v.as_f64()) {
            config.layout.placement.min_font_size = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.show_debug_rects {
            config.render.show_debug_rects = v;
        }
        if let Some(v) = render.pixel_ratio {
            config.render.pixel_ratio = v;
        }
    }

    if parsed.seed.is_some() {
        config.seed = parsed.seed;
    }

    Ok(config)
}
