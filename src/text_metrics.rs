use crate::layout::{LayoutError, LayoutResult};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use ttf_parser::Face;

// Loading system fonts walks the font directories; do it at most once.
static SYSTEM_FONTS: Lazy<Database> = Lazy::new(|| {
    let mut db = Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "loaded system font database");
    db
});

/// Measured extent of a run of text at a given pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TextExtent {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl TextExtent {
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

pub trait TextMetrics {
    fn measure(
        &mut self,
        text: &str,
        font_family: &str,
        pixel_size: f64,
    ) -> LayoutResult<TextExtent>;
}

fn check_size(pixel_size: f64) -> LayoutResult<()> {
    if !pixel_size.is_finite() || pixel_size < 0.0 {
        return Err(LayoutError::InvalidInput(format!(
            "font size must be a non-negative number, got {pixel_size}"
        )));
    }
    Ok(())
}

/// Deterministic metrics from a per-character width table. Needs no fonts,
/// so it works in WASM and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMetrics;

const APPROX_ASCENT: f64 = 0.72;
const APPROX_DESCENT: f64 = 0.21;

impl TextMetrics for ApproximateMetrics {
    fn measure(
        &mut self,
        text: &str,
        _font_family: &str,
        pixel_size: f64,
    ) -> LayoutResult<TextExtent> {
        check_size(pixel_size)?;
        if text.is_empty() {
            return Ok(TextExtent::default());
        }
        let width = text
            .chars()
            .filter(|ch| *ch != '\n')
            .map(char_width_factor)
            .sum::<f64>()
            * pixel_size;
        let descent = if text.chars().any(has_descender) {
            APPROX_DESCENT * pixel_size
        } else {
            0.0
        };
        Ok(TextExtent {
            width,
            ascent: APPROX_ASCENT * pixel_size,
            descent,
        })
    }
}

fn has_descender(ch: char) -> bool {
    matches!(
        ch,
        'g' | 'j' | 'p' | 'q' | 'y' | 'Q' | ',' | ';' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
    )
}

/// Em widths for a typical humanist sans-serif.
pub(crate) fn char_width_factor(ch: char) -> f64 {
    match ch {
        ' ' => 0.278,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.278,
        '\'' | '`' => 0.191,
        '-' => 0.333,
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 0.667,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 0.722,
        'F' | 'T' | 'Z' => 0.611,
        'G' | 'O' | 'Q' => 0.778,
        'I' => 0.278,
        'J' => 0.5,
        'L' => 0.556,
        'M' => 0.833,
        'W' => 0.944,
        'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 0.556,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 0.5,
        'f' | 't' => 0.278,
        'i' | 'j' | 'l' => 0.222,
        'm' => 0.833,
        'r' => 0.333,
        'w' => 0.722,
        '0'..='9' => 0.556,
        '@' => 1.015,
        '#' | '$' | '&' | '%' => 0.667,
        _ if ch.is_ascii() => 0.556,
        // CJK and other wide scripts
        _ => 1.0,
    }
}

/// Metrics read from real font files resolved through fontdb.
#[derive(Default)]
pub struct FontMetrics {
    cache: HashMap<String, Option<FontFace>>,
}

impl FontMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn face(&mut self, font_family: &str) -> Option<&mut FontFace> {
        let family_key = normalize_family_key(font_family);
        if !self.cache.contains_key(&family_key) {
            let face = load_face(font_family, &family_key);
            if face.is_none() {
                tracing::warn!(family = %family_key, "no font face matches family");
            }
            self.cache.insert(family_key.clone(), face);
        }
        self.cache.get_mut(&family_key).and_then(|face| face.as_mut())
    }
}

impl TextMetrics for FontMetrics {
    fn measure(
        &mut self,
        text: &str,
        font_family: &str,
        pixel_size: f64,
    ) -> LayoutResult<TextExtent> {
        check_size(pixel_size)?;
        let face = self.face(font_family).ok_or_else(|| {
            LayoutError::EnvironmentUnavailable(format!(
                "no usable font found for family '{font_family}'"
            ))
        })?;
        if text.is_empty() {
            return Ok(TextExtent::default());
        }
        let normalized = text.replace('\t', "    ");
        Ok(face.measure(&normalized, pixel_size))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct GlyphInfo {
    present: bool,
    advance: u16,
    /// Vertical ink bounds in font units (y grows upward).
    bounds: Option<(i16, i16)>,
}

impl GlyphInfo {
    fn read(face: &Face<'_>, ch: char) -> Self {
        let Some(id) = face.glyph_index(ch) else {
            return Self::default();
        };
        Self {
            present: true,
            advance: face.glyph_hor_advance(id).unwrap_or(0),
            bounds: face
                .glyph_bounding_box(id)
                .map(|bbox| (bbox.y_min, bbox.y_max)),
        }
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: f64,
    ascender: f64,
    descender: f64,
    ascii: [GlyphInfo; 128],
    glyph_cache: HashMap<char, GlyphInfo>,
}

impl FontFace {
    fn from_bytes(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1) as f64;
        let ascender = face.ascender() as f64;
        let descender = -(face.descender() as f64);
        let mut ascii = [GlyphInfo::default(); 128];
        for byte in 0u8..=127 {
            ascii[byte as usize] = GlyphInfo::read(&face, byte as char);
        }
        drop(face);
        Some(Self {
            data,
            index,
            units_per_em,
            ascender,
            descender,
            ascii,
            glyph_cache: HashMap::new(),
        })
    }

    fn ensure_glyphs(&mut self, text: &str) {
        let missing: Vec<char> = text
            .chars()
            .filter(|ch| !ch.is_ascii() && !self.glyph_cache.contains_key(ch))
            .collect();
        if missing.is_empty() {
            return;
        }
        let Ok(face) = Face::parse(&self.data, self.index) else {
            return;
        };
        for ch in missing {
            self.glyph_cache.insert(ch, GlyphInfo::read(&face, ch));
        }
    }

    fn glyph(&self, ch: char) -> GlyphInfo {
        if ch.is_ascii() {
            self.ascii[ch as usize]
        } else {
            self.glyph_cache.get(&ch).copied().unwrap_or_default()
        }
    }

    fn measure(&mut self, text: &str, pixel_size: f64) -> TextExtent {
        self.ensure_glyphs(text);
        let scale = pixel_size / self.units_per_em;
        let fallback = pixel_size * 0.56;

        let mut width = 0.0f64;
        let mut ink: Option<(i16, i16)> = None;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let glyph = self.glyph(ch);
            if !glyph.present || glyph.advance == 0 {
                width += fallback;
            } else {
                width += glyph.advance as f64 * scale;
            }
            if let Some((y_min, y_max)) = glyph.bounds {
                ink = Some(match ink {
                    Some((lo, hi)) => (lo.min(y_min), hi.max(y_max)),
                    None => (y_min, y_max),
                });
            }
        }

        let (ascent, descent) = match ink {
            Some((y_min, y_max)) => (
                (y_max as f64 * scale).max(0.0),
                (-(y_min as f64) * scale).max(0.0),
            ),
            None => (self.ascender * scale, self.descender * scale),
        };
        TextExtent {
            width: width.max(0.0),
            ascent,
            descent,
        }
    }
}

fn load_face(font_family: &str, family_key: &str) -> Option<FontFace> {
    if let Some(face) = load_cached_face(family_key) {
        return Some(face);
    }

    #[derive(Clone, Copy)]
    enum FamilyToken {
        Generic(Family<'static>),
        Name(usize),
    }

    let mut names: Vec<String> = Vec::new();
    let mut order: Vec<FamilyToken> = Vec::new();
    for part in font_family.split(',') {
        let raw = part.trim().trim_matches('"').trim_matches('\'');
        if raw.is_empty() {
            continue;
        }
        match raw.to_ascii_lowercase().as_str() {
            "serif" => order.push(FamilyToken::Generic(Family::Serif)),
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                order.push(FamilyToken::Generic(Family::SansSerif))
            }
            "monospace" | "ui-monospace" => order.push(FamilyToken::Generic(Family::Monospace)),
            "cursive" => order.push(FamilyToken::Generic(Family::Cursive)),
            "fantasy" => order.push(FamilyToken::Generic(Family::Fantasy)),
            _ => {
                order.push(FamilyToken::Name(names.len()));
                names.push(raw.to_string());
            }
        }
    }
    // Named families that are not installed still resolve to something.
    order.push(FamilyToken::Generic(Family::SansSerif));

    let families: Vec<Family<'_>> = order
        .iter()
        .map(|token| match *token {
            FamilyToken::Generic(family) => family,
            FamilyToken::Name(idx) => Family::Name(names[idx].as_str()),
        })
        .collect();

    let db = &*SYSTEM_FONTS;
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db.query(&query)?;
    let mut loaded: Option<FontFace> = None;
    db.with_face_data(id, |data, index| {
        let bytes = data.to_vec();
        if let Some((font_path, meta_path)) = cache_paths(family_key)
            && !font_path.exists()
        {
            if let Some(parent) = font_path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(&font_path, &bytes);
            let _ = fs::write(&meta_path, index.to_string());
        }
        loaded = FontFace::from_bytes(bytes, index);
    });
    loaded
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

fn cache_paths(family_key: &str) -> Option<(PathBuf, PathBuf)> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))?;
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    family_key.hash(&mut hasher);
    let hash = hasher.finish();
    let dir = base.join("wordcloud-rs").join("font-cache");
    let font_path = dir.join(format!("{hash:x}.font"));
    let meta_path = dir.join(format!("{hash:x}.meta"));
    Some((font_path, meta_path))
}

fn load_cached_face(family_key: &str) -> Option<FontFace> {
    let (font_path, meta_path) = cache_paths(family_key)?;
    if !font_path.exists() || !meta_path.exists() {
        return None;
    }
    let bytes = fs::read(font_path).ok()?;
    let index: u32 = fs::read_to_string(meta_path).ok()?.trim().parse().ok()?;
    FontFace::from_bytes(bytes, index)
}
