use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wordcloud_rs::layout_dump::LayoutDump;
use wordcloud_rs::{Layout, PointerAdapter, RenderOptions, Word, generate_cloud, render_svg};

// wasm32-unknown-unknown has no clock to seed from; callers wanting a fresh
// cloud per call pass their own seed.
const DEFAULT_SEED: u64 = 0x5EED;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloudOptions {
    theme: Option<String>,
    font_family: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    padding: Option<f64>,
    base_font_size: Option<f64>,
    seed: Option<u64>,
    debug_rects: Option<bool>,
}

fn build_render_options(options: CloudOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("light") {
        RenderOptions::light()
    } else {
        RenderOptions::dark()
    };
    // No system fonts in the browser.
    render_options.layout.fast_text_metrics = true;

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(width) = options.width {
        render_options.render.width = width;
    }
    if let Some(height) = options.height {
        render_options.render.height = height;
    }
    if let Some(padding) = options.padding {
        render_options.layout.padding = padding;
    }
    if let Some(size) = options.base_font_size {
        render_options.layout.base_font_size = size;
    }
    if let Some(debug) = options.debug_rects {
        render_options.render.show_debug_rects = debug;
    }
    render_options.seed = Some(options.seed.unwrap_or(DEFAULT_SEED));
    render_options
}

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// A laid-out cloud kept alive on the JS side so pointer events can be
/// resolved against it.
#[wasm_bindgen]
pub struct WordCloud {
    layout: Layout,
    options: RenderOptions,
}

impl WordCloud {
    fn build(words_json: &str, options_json: Option<String>) -> Result<Self, String> {
        let words: Vec<Word> = serde_json::from_str(words_json).map_err(|e| e.to_string())?;
        let options = match options_json {
            Some(raw) => serde_json::from_str::<CloudOptions>(&raw).map_err(|e| e.to_string())?,
            None => CloudOptions::default(),
        };
        let options = build_render_options(options);
        let layout = generate_cloud(&words, &options).map_err(|e| e.to_string())?;
        Ok(Self { layout, options })
    }

    fn word_at_point(&self, client_x: f64, client_y: f64, origin_x: f64, origin_y: f64) -> Option<&Word> {
        let adapter = PointerAdapter::new(self.options.render.pixel_ratio).with_origin(origin_x, origin_y);
        adapter
            .hit(&self.layout, client_x, client_y)
            .map(|hit| &hit.word)
    }

    fn word_json_at(&self, client_x: f64, client_y: f64, origin_x: f64, origin_y: f64) -> Result<Option<String>, String> {
        self.word_at_point(client_x, client_y, origin_x, origin_y)
            .map(|word| serde_json::to_string(word).map_err(|e| e.to_string()))
            .transpose()
    }
}

#[wasm_bindgen]
impl WordCloud {
    #[wasm_bindgen(constructor)]
    pub fn new(words_json: &str, options_json: Option<String>) -> Result<WordCloud, JsValue> {
        Self::build(words_json, options_json).map_err(js_error)
    }

    pub fn svg(&self) -> String {
        render_svg(&self.layout, &self.options.theme, &self.options.render)
    }

    #[wasm_bindgen(js_name = layoutJson)]
    pub fn layout_json(&self) -> Result<String, JsValue> {
        LayoutDump::from_layout(&self.layout, self.options.seed)
            .to_json()
            .map_err(js_error)
    }

    /// The word under a client-space pointer position as `{"text", "score"}`
    /// JSON, if any.
    #[wasm_bindgen(js_name = wordAt)]
    pub fn word_at(&self, client_x: f64, client_y: f64, origin_x: f64, origin_y: f64) -> Result<Option<String>, JsValue> {
        self.word_json_at(client_x, client_y, origin_x, origin_y)
            .map_err(js_error)
    }
}

#[cfg(test)]
mod tests {
    use crate::WordCloud;
    use wordcloud_rs::Word;

    #[test]
    fn builds_cloud_and_resolves_pointer() {
        let cloud = WordCloud::build(
            r#"[{"text":"Hello","score":2},{"text":"World","score":1}]"#,
            Some(r#"{"width":800,"height":600,"padding":10,"baseFontSize":600,"seed":42}"#.into()),
        )
        .expect("cloud should lay out");

        let svg = cloud.svg();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(">Hello</text>"));

        let hello = &cloud.layout.words[0];
        let ratio = cloud.options.render.pixel_ratio;
        let (cx, cy) = (
            (hello.rect.x + hello.rect.width / 2.0) / ratio,
            (hello.rect.y + hello.rect.height / 2.0) / ratio,
        );
        assert_eq!(cloud.word_at_point(cx, cy, 0.0, 0.0), Some(&Word::new("Hello", 2.0)));

        let json = cloud.word_json_at(cx, cy, 0.0, 0.0).unwrap().expect("pointer is over Hello");
        let word: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(word, Word::new("Hello", 2.0));
        assert_eq!(cloud.word_json_at(-5.0, -5.0, 0.0, 0.0).unwrap(), None);
    }

    #[test]
    fn rejects_malformed_words() {
        assert!(WordCloud::build("not json", None).is_err());
    }
}
