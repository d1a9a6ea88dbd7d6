use crate::config::RenderConfig;
use crate::layout::Layout;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const FALLBACK_TEXT_COLOR: &str = "#FFFFFF";

pub fn render_svg(layout: &Layout, theme: &Theme, config: &RenderConfig) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    let font_family = escape_xml(&layout.font_family);
    for word in &layout.words {
        let fill = layout.color_of(word).unwrap_or(FALLBACK_TEXT_COLOR);
        let x = word.rect.x + layout.padding;
        let baseline = word.rect.y + layout.padding + word.ascent;
        svg.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{baseline:.2}\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\"",
            font_family,
            word.font_size,
            escape_xml(fill),
        ));
        if word.opacity < 1.0 {
            svg.push_str(&format!(" fill-opacity=\"{:.3}\"", word.opacity.clamp(0.0, 1.0)));
        }
        svg.push('>');
        svg.push_str(&escape_xml(&word.word.text));
        svg.push_str("</text>");

        if config.show_debug_rects {
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
                word.rect.x,
                word.rect.y,
                word.rect.width,
                word.rect.height,
                escape_xml(&theme.debug_rect_color)
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options {
        font_family: theme.font_family.clone(),
        default_size: usvg::Size::from_wh(render_cfg.width as f32, render_cfg.height as f32)
            .unwrap_or(usvg::Size::from_wh(1000.0, 1000.0).unwrap()),
        ..Default::default()
    };
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{Canvas, Word};
    use crate::layout::compute_cloud;
    use crate::rng::XorShift64Star;
    use crate::text_metrics::ApproximateMetrics;

    fn cloud(words: &[Word]) -> Layout {
        let config = LayoutConfig {
            padding: 8.0,
            base_font_size: 400.0,
            ..LayoutConfig::default()
        };
        let mut rng = XorShift64Star::new(17);
        compute_cloud(
            words,
            Canvas::new(800, 600),
            &Theme::dark(),
            &config,
            &mut ApproximateMetrics,
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn render_svg_basic() {
        let layout = cloud(&[Word::new("Alpha", 2.0), Word::new("Beta", 1.0)]);
        let svg = render_svg(&layout, &Theme::dark(), &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">Alpha</text>"));
        assert!(svg.contains(">Beta</text>"));
        assert!(svg.contains("fill=\"#1f1f1f\""));
        assert!(!svg.contains("fill=\"none\""));
    }

    #[test]
    fn debug_rects_are_stroked() {
        let layout = cloud(&[Word::new("Alpha", 2.0), Word::new("Beta", 1.0)]);
        let config = RenderConfig {
            show_debug_rects: true,
            ..RenderConfig::default()
        };
        let svg = render_svg(&layout, &Theme::dark(), &config);
        assert_eq!(svg.matches("stroke=\"white\"").count(), 2);
    }

    #[test]
    fn text_is_escaped() {
        let layout = cloud(&[Word::new("<R&D>", 1.0)]);
        let svg = render_svg(&layout, &Theme::dark(), &RenderConfig::default());
        assert!(svg.contains("&lt;R&amp;D&gt;"));
        assert!(!svg.contains("<R&D>"));
    }
}
