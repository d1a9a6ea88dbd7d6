use crate::config::{Config, load_config};
use crate::ir::Canvas;
use crate::layout::{CancelToken, Layout, PointerAdapter, assign_colors, compute_layout_with_cancel};
use crate::layout_dump::write_layout_dump;
use crate::metrics_for;
use crate::parser::parse_word_list;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::rng::{XorShift64Star, entropy_seed};
use crate::theme::Theme;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wcr", version, about = "Lay out weighted words as a non-overlapping word cloud")]
pub struct Args {
    /// Word list (`text score` lines or a JSON array), or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(short = 'w', long = "width")]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(short = 'H', long = "height")]
    pub height: Option<u32>,

    /// Seed for reproducible layouts
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    #[arg(long = "padding")]
    pub padding: Option<f64>,

    /// Font family list, e.g. "Inter, sans-serif"
    #[arg(long = "font")]
    pub font: Option<String>,

    /// Pixel size a word with the whole score to itself would get
    #[arg(long = "baseFontSize")]
    pub base_font_size: Option<f64>,

    /// Built-in theme (dark or light)
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,

    /// Stroke each word's bounding rect
    #[arg(long = "debugRects")]
    pub debug_rects: bool,

    /// Use built-in character widths instead of system fonts
    #[arg(long = "fast")]
    pub fast: bool,

    /// Report the word under this client-space point, e.g. "120,45"
    #[arg(long = "probe", value_parser = parse_point)]
    pub probe: Option<(f64, f64)>,

    /// Canvas pixels per client pixel for --probe
    #[arg(long = "pixelRatio")]
    pub pixel_ratio: Option<f64>,

    /// Abort the layout after this many milliseconds
    #[arg(long = "timeoutMs")]
    pub timeout_ms: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args)?;

    let input = read_input(args.input.as_deref())?;
    let words = parse_word_list(&input)?;
    let seed = config.seed.unwrap_or_else(entropy_seed);
    tracing::info!(words = words.len(), seed, "laying out word cloud");

    let cancel = match args.timeout_ms {
        Some(ms) => CancelToken::with_timeout(Duration::from_millis(ms)),
        None => CancelToken::new(),
    };
    let mut rng = XorShift64Star::new(seed);
    let mut metrics = metrics_for(&config.layout);
    let mut layout = compute_layout_with_cancel(
        &words,
        Canvas::new(config.render.width, config.render.height),
        &config.theme,
        &config.layout,
        metrics.as_mut(),
        &mut rng,
        &cancel,
    )?;
    assign_colors(&mut layout, &config.theme.palette, &mut rng)?;

    if let Some((x, y)) = args.probe {
        report_probe(&layout, x, y, config.render.pixel_ratio);
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_output_png(&svg, &output, &config.render, &config.theme)?;
        }
        OutputFormat::Json => {
            write_layout_dump(args.output.as_deref(), &layout, Some(seed))?;
        }
    }

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wordcloud_rs={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn apply_overrides(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(name) = args.theme.as_deref() {
        config.theme =
            Theme::by_name(name).ok_or_else(|| anyhow::anyhow!("unknown theme '{name}'"))?;
        config.theme.apply(&config.theme_variables);
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(padding) = args.padding {
        config.layout.padding = padding;
    }
    if let Some(font) = &args.font {
        config.theme.font_family = font.clone();
    }
    if let Some(size) = args.base_font_size {
        config.layout.base_font_size = size;
    }
    if args.debug_rects {
        config.render.show_debug_rects = true;
    }
    if args.fast {
        config.layout.fast_text_metrics = true;
    }
    if let Some(ratio) = args.pixel_ratio {
        config.render.pixel_ratio = ratio;
    }
    Ok(())
}

fn report_probe(layout: &Layout, client_x: f64, client_y: f64, pixel_ratio: f64) {
    let adapter = PointerAdapter::new(pixel_ratio);
    let (x, y) = adapter.to_canvas(client_x, client_y);
    match adapter.hit(layout, client_x, client_y) {
        Some(hit) => eprintln!(
            "probe ({x:.1}, {y:.1}): {} (score {})",
            hit.word.text, hit.word.score
        ),
        None => eprintln!("probe ({x:.1}, {y:.1}): no word"),
    }
}

fn parse_point(value: &str) -> std::result::Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let x = x
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad X coordinate: {e}"))?;
    let y = y
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad Y coordinate: {e}"))?;
    Ok((x, y))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_probe_points() {
        assert_eq!(parse_point("12.5, 40").unwrap(), (12.5, 40.0));
        assert!(parse_point("12").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "wcr",
            "-w",
            "640",
            "-H",
            "480",
            "--seed",
            "9",
            "--font",
            "Inter",
            "--theme",
            "light",
            "--debugRects",
            "--fast",
            "--probe",
            "10,20",
            "-e",
            "json",
        ])
        .unwrap();
        let mut config = Config::default();
        apply_overrides(&mut config, &args).unwrap();
        assert_eq!(config.render.width, 640);
        assert_eq!(config.render.height, 480);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.theme.font_family, "Inter");
        assert_eq!(config.theme.background, Theme::light().background);
        assert!(config.render.show_debug_rects);
        assert!(config.layout.fast_text_metrics);
        assert_eq!(args.probe, Some((10.0, 20.0)));
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn theme_flag_keeps_config_file_theme_variables() {
        let mut config = crate::config::parse_config(
            r##"{ themeVariables: { palette: ["#010203"], background: "#abcdef" } }"##,
        )
        .unwrap();
        let args = Args::try_parse_from(["wcr", "--theme", "light"]).unwrap();
        apply_overrides(&mut config, &args).unwrap();
        assert_eq!(config.theme.palette, ["#010203"]);
        assert_eq!(config.theme.background, "#abcdef");
        assert_eq!(config.theme.debug_rect_color, Theme::light().debug_rect_color);
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let args = Args::try_parse_from(["wcr", "--theme", "neon"]).unwrap();
        let mut config = Config::default();
        assert!(apply_overrides(&mut config, &args).is_err());
    }

    #[test]
    fn png_needs_an_output_path() {
        assert!(ensure_output(&None, "png").is_err());
    }
}
