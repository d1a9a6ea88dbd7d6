use serde::{Deserialize, Serialize};

const DARK_PALETTE: [&str; 8] = [
    "#F94144", "#F3722C", "#F8961E", "#F9C74F", "#90BE6D", "#43AA8B", "#4D908E", "#577590",
];

const LIGHT_PALETTE: [&str; 8] = [
    "#1D3557", "#457B9D", "#E63946", "#2A9D8F", "#6D597A", "#B56576", "#E76F51", "#264653",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub palette: Vec<String>,
    pub debug_rect_color: String,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            font_family: "Arial".to_string(),
            background: "#1f1f1f".to_string(),
            palette: DARK_PALETTE.iter().map(|c| c.to_string()).collect(),
            debug_rect_color: "white".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Arial".to_string(),
            background: "#FFFFFF".to_string(),
            palette: LIGHT_PALETTE.iter().map(|c| c.to_string()).collect(),
            debug_rect_color: "#333333".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "default" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

/// Per-field theme edits from a config file, kept so they can be laid over
/// whichever preset ends up selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeVariables {
    pub font_family: Option<String>,
    pub background: Option<String>,
    pub palette: Option<Vec<String>>,
    pub debug_rect_color: Option<String>,
}

impl Theme {
    pub fn apply(&mut self, vars: &ThemeVariables) {
        if let Some(v) = &vars.font_family {
            self.font_family = v.clone();
        }
        if let Some(v) = &vars.background {
            self.background = v.clone();
        }
        if let Some(v) = &vars.palette {
            self.palette = v.clone();
        }
        if let Some(v) = &vars.debug_rect_color {
            self.debug_rect_color = v.clone();
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
