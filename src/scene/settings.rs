use std::{fmt, str::FromStr};

use crate::foundation::error::{ScreenError, ScreenResult};

/// Presentation mode: selects the chrome texture set and the text layout rules.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DialogueType {
    /// Speaker name and text in the bottom dialogue bar.
    #[default]
    Dialogue,
    /// Slanted title card used when a character is introduced.
    Intro,
    /// Centered title and caption band.
    Caption,
    /// Centered white text over a full-screen frame.
    Full,
    /// Centered white text over the caption band.
    Narration,
    /// Brown text on a full-bleed book page.
    Book,
}

impl DialogueType {
    /// All modes, in declaration order.
    pub const ALL: [DialogueType; 6] = [
        DialogueType::Dialogue,
        DialogueType::Intro,
        DialogueType::Caption,
        DialogueType::Full,
        DialogueType::Narration,
        DialogueType::Book,
    ];

    /// Lowercase identifier as used in scene files.
    pub fn as_str(self) -> &'static str {
        match self {
            DialogueType::Dialogue => "dialogue",
            DialogueType::Intro => "intro",
            DialogueType::Caption => "caption",
            DialogueType::Full => "full",
            DialogueType::Narration => "narration",
            DialogueType::Book => "book",
        }
    }
}

impl fmt::Display for DialogueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialogueType {
    type Err = ScreenError;

    fn from_str(s: &str) -> ScreenResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ScreenError::validation(format!("unknown dialogue type '{s}'")))
    }
}

/// Language code selecting the glyph face and the layout table row.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize,
    serde::Deserialize,
)]
pub enum Language {
    /// English.
    #[default]
    #[serde(rename = "en")]
    En,
    /// Japanese.
    #[serde(rename = "ja")]
    Ja,
    /// Traditional Chinese.
    #[serde(rename = "zh_tw")]
    ZhTw,
    /// Simplified Chinese.
    #[serde(rename = "zh_cn")]
    ZhCn,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 4] = [Language::En, Language::Ja, Language::ZhTw, Language::ZhCn];

    /// Language code (`en`, `ja`, `zh_tw`, `zh_cn`).
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
            Language::ZhTw => "zh_tw",
            Language::ZhCn => "zh_cn",
        }
    }

    /// Font family name registered for this language.
    pub fn font_family(self) -> String {
        format!("dragalialost_{}", self.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ScreenError;

    fn from_str(s: &str) -> ScreenResult<Self> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|l| l.code() == norm)
            .ok_or_else(|| ScreenError::validation(format!("unknown language '{s}'")))
    }
}

/// Emotion balloon drawn next to the speaker.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Emotion {
    #[default]
    None,
    Anger,
    Bad,
    Exclamation,
    Heart,
    Inspiration,
    Note,
    Notice,
    Question,
    Sleep,
    Sweat,
}

impl Emotion {
    /// Every icon-bearing emotion (excludes [`Emotion::None`]).
    pub const ICONS: [Emotion; 10] = [
        Emotion::Anger,
        Emotion::Bad,
        Emotion::Exclamation,
        Emotion::Heart,
        Emotion::Inspiration,
        Emotion::Note,
        Emotion::Notice,
        Emotion::Question,
        Emotion::Sleep,
        Emotion::Sweat,
    ];

    /// Icon base name, `None` for [`Emotion::None`].
    pub fn icon_name(self) -> Option<&'static str> {
        Some(match self {
            Emotion::None => return None,
            Emotion::Anger => "anger",
            Emotion::Bad => "bad",
            Emotion::Exclamation => "exclamation",
            Emotion::Heart => "heart",
            Emotion::Inspiration => "inspiration",
            Emotion::Note => "note",
            Emotion::Notice => "notice",
            Emotion::Question => "question",
            Emotion::Sleep => "sleep",
            Emotion::Sweat => "sweat",
        })
    }
}

/// One render configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Speaker display name.
    pub speaker: String,
    /// Dialogue text; may contain `(base){furigana}` annotations and newlines.
    pub dialogue_text: String,
    /// Presentation mode.
    pub dialogue_type: DialogueType,
    /// Language of the glyph face and layout metrics.
    pub font: Language,
    /// Emotion balloon, [`Emotion::None`] to omit.
    pub emotion: Emotion,
    /// Draw the balloon on the left side instead of the right.
    pub emotion_is_left: bool,
    /// Horizontal balloon offset in pixels.
    pub emotion_offset_x: f64,
    /// Vertical balloon offset in pixels (positive is up).
    pub emotion_offset_y: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/settings.rs"]
mod tests;
