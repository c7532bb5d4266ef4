use std::{collections::HashMap, path::Path};

use anyhow::Context;

use crate::{
    foundation::error::{ScreenError, ScreenResult},
    scene::settings::{DialogueType, Language},
};

const BUILTIN_JSON: &str = include_str!("../../assets/text_properties.json");

/// Fixed text metrics for one language, in canvas pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TextProperties {
    pub name_size: f64,
    pub title_size: f64,
    pub caption_size: f64,
    pub dialogue_size: f64,
    pub line_height: f64,
    pub narration_line_height: f64,
    pub speaker_x_pos: f64,
    pub speaker_y_pos: f64,
    pub dialogue_x_pos: f64,
    pub dialogue_y_pos: f64,
    pub title_y_pos: f64,
    pub caption_y_pos: f64,
    pub narration_y_pos: f64,
    pub book_y_pos: f64,
    pub intro_name_size: f64,
    pub intro_name_y_pos: f64,
    pub intro_title_size: f64,
    pub intro_title_y_pos: f64,
    pub intro_x_pos: f64,
    /// Weight of body text; names and furigana ignore it.
    #[serde(
        default,
        deserialize_with = "de_font_weight",
        skip_serializing_if = "Option::is_none"
    )]
    pub font_weight: Option<u16>,
}

impl TextProperties {
    /// Body font size used by `mode` (caption text is smaller).
    pub fn body_size(&self, mode: DialogueType) -> f64 {
        match mode {
            DialogueType::Caption => self.caption_size,
            _ => self.dialogue_size,
        }
    }

    /// Widest line the wrapper allows on a canvas `canvas_width` pixels wide.
    pub fn max_line_width(&self, canvas_width: f64) -> f64 {
        canvas_width - 2.0 * self.dialogue_x_pos
    }

    fn validate(&self, language: Language) -> ScreenResult<()> {
        let positive = [
            ("nameSize", self.name_size),
            ("titleSize", self.title_size),
            ("captionSize", self.caption_size),
            ("dialogueSize", self.dialogue_size),
            ("lineHeight", self.line_height),
            ("narrationLineHeight", self.narration_line_height),
            ("introNameSize", self.intro_name_size),
            ("introTitleSize", self.intro_title_size),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(ScreenError::validation(format!(
                    "layout '{language}': {name} must be finite and > 0, got {v}"
                )));
            }
        }
        let positions = [
            self.speaker_x_pos,
            self.speaker_y_pos,
            self.dialogue_x_pos,
            self.dialogue_y_pos,
            self.title_y_pos,
            self.caption_y_pos,
            self.narration_y_pos,
            self.book_y_pos,
            self.intro_name_y_pos,
            self.intro_title_y_pos,
            self.intro_x_pos,
        ];
        if positions.iter().any(|v| !v.is_finite()) {
            return Err(ScreenError::validation(format!(
                "layout '{language}': positions must be finite"
            )));
        }
        Ok(())
    }
}

fn de_font_weight<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u16),
        Text(String),
    }

    let raw: Option<Raw> = serde::Deserialize::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => match s.trim() {
            "" => Ok(None),
            "normal" => Ok(Some(400)),
            "bold" => Ok(Some(700)),
            other => other
                .parse::<u16>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid fontWeight '{other}'"))),
        },
    }
}

/// Per-language [`TextProperties`], loaded once and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutTable {
    rows: HashMap<Language, TextProperties>,
}

impl LayoutTable {
    /// The table shipped with the crate (`en`, `ja`, `zh_tw`, `zh_cn`).
    pub fn builtin() -> ScreenResult<Self> {
        Self::from_json_str(BUILTIN_JSON)
    }

    /// Parse and validate a language-keyed JSON document.
    pub fn from_json_str(json: &str) -> ScreenResult<Self> {
        let rows: HashMap<Language, TextProperties> = serde_json::from_str(json)
            .map_err(|e| ScreenError::serde(format!("layout table: {e}")))?;
        for (lang, props) in &rows {
            props.validate(*lang)?;
        }
        Ok(Self { rows })
    }

    /// Read a layout table from `path`.
    pub fn from_path(path: &Path) -> ScreenResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read layout table '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Row for `language`.
    pub fn get(&self, language: Language) -> ScreenResult<&TextProperties> {
        self.rows
            .get(&language)
            .ok_or_else(|| ScreenError::validation(format!("no layout for language '{language}'")))
    }

    /// Add or replace the row for `language`.
    pub fn insert(&mut self, language: Language, props: TextProperties) -> ScreenResult<()> {
        props.validate(language)?;
        self.rows.insert(language, props);
        Ok(())
    }

    /// Languages with a row, in code order.
    pub fn languages(&self) -> Vec<Language> {
        let mut langs: Vec<_> = self.rows.keys().copied().collect();
        langs.sort();
        langs
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout_table.rs"]
mod tests;
