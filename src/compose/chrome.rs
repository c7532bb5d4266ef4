use crate::{
    assets::textures::TextureKey,
    scene::settings::{DialogueType, Language},
};

/// Fixed UI textures of one presentation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChromeSet {
    /// Full-bleed image drawn under the art layers.
    pub backdrop: Option<TextureKey>,
    /// Frame drawn over art and emotion icon; `None` means the localized skip button.
    pub bar: Option<TextureKey>,
}

/// Chrome texture table, one row per mode.
pub const fn chrome_for(mode: DialogueType) -> ChromeSet {
    match mode {
        DialogueType::Dialogue => ChromeSet {
            backdrop: None,
            bar: Some(TextureKey::Bar),
        },
        DialogueType::Intro => ChromeSet {
            backdrop: Some(TextureKey::IntroBack),
            bar: Some(TextureKey::IntroBar),
        },
        DialogueType::Caption | DialogueType::Narration => ChromeSet {
            backdrop: None,
            bar: Some(TextureKey::Caption),
        },
        DialogueType::Full => ChromeSet {
            backdrop: None,
            bar: Some(TextureKey::Fullscreen),
        },
        DialogueType::Book => ChromeSet {
            backdrop: Some(TextureKey::Book),
            bar: None,
        },
    }
}

/// Textures drawn for `mode` in `language`, split by stacking position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChromePlan {
    /// Drawn before any layer.
    pub under: Vec<TextureKey>,
    /// Drawn after layers and the emotion icon, in order.
    pub over: Vec<TextureKey>,
}

/// Resolve the chrome table row into concrete textures.
///
/// Book mode uses the skip button as its bar; every other mode adds the localized skip button
/// on top of its bar for languages other than English.
pub fn chrome_plan(mode: DialogueType, language: Language) -> ChromePlan {
    let set = chrome_for(mode);
    let skip = TextureKey::Skip(language);
    let mut over = Vec::with_capacity(2);
    match set.bar {
        Some(bar) => {
            over.push(bar);
            if language != Language::En {
                over.push(skip);
            }
        }
        None => over.push(skip),
    }
    ChromePlan {
        under: set.backdrop.into_iter().collect(),
        over,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/chrome.rs"]
mod tests;
