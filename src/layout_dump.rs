use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub font_family: String,
    pub seed: Option<u64>,
    pub palette: Vec<String>,
    pub words: Vec<WordDump>,
}

#[derive(Debug, Serialize)]
pub struct WordDump {
    pub text: String,
    pub score: f64,
    pub source_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub opacity: f64,
    pub color: Option<String>,
    pub attempts: u64,
    pub shrinks: u32,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, seed: Option<u64>) -> Self {
        let words = layout
            .words
            .iter()
            .map(|word| WordDump {
                text: word.word.text.clone(),
                score: word.word.score,
                source_index: word.source_index,
                x: word.rect.x,
                y: word.rect.y,
                width: word.rect.width,
                height: word.rect.height,
                font_size: word.font_size,
                opacity: word.opacity,
                color: layout.color_of(word).map(str::to_string),
                attempts: word.attempts,
                shrinks: word.shrinks,
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            padding: layout.padding,
            font_family: layout.font_family.clone(),
            seed,
            palette: layout.palette.clone(),
            words,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn write_layout_dump(path: Option<&Path>, layout: &Layout, seed: Option<u64>) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, seed);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => println!("{}", dump.to_json()?),
    }
    Ok(())
}
