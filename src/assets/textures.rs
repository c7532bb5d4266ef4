use std::{
    collections::HashMap,
    fmt,
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    foundation::error::ScreenResult,
    scene::settings::{Emotion, Language},
};

/// Symbolic name of a fixed UI texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// Dialogue bar.
    Bar,
    /// Intro title bar.
    IntroBar,
    /// Intro full-bleed backdrop.
    IntroBack,
    /// Caption band (caption and narration modes).
    Caption,
    /// Full-screen frame.
    Fullscreen,
    /// Book page backdrop.
    Book,
    /// Localized skip button.
    Skip(Language),
    /// Emotion balloon, facing left or right.
    Emotion {
        /// Icon to draw; never [`Emotion::None`].
        emotion: Emotion,
        /// Left-side variant.
        left: bool,
    },
}

impl TextureKey {
    /// Balloon texture for `emotion`, `None` when there is nothing to draw.
    pub fn emotion(emotion: Emotion, left: bool) -> Option<Self> {
        emotion.icon_name()?;
        Some(Self::Emotion { emotion, left })
    }

    /// File stem of the texture (`bar`, `skip_zh_tw`, `anger_l`, ...).
    pub fn file_stem(&self) -> String {
        match self {
            TextureKey::Bar => "bar".to_string(),
            TextureKey::IntroBar => "introBar".to_string(),
            TextureKey::IntroBack => "introBack".to_string(),
            TextureKey::Caption => "caption".to_string(),
            TextureKey::Fullscreen => "fullscreen".to_string(),
            TextureKey::Book => "book".to_string(),
            TextureKey::Skip(lang) => format!("skip_{}", lang.code()),
            TextureKey::Emotion { emotion, left } => format!(
                "{}{}",
                emotion.icon_name().unwrap_or("none"),
                if *left { "_l" } else { "_r" }
            ),
        }
    }
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}

/// Loader behind the [`TextureCache`].
pub trait TextureSource: Send + Sync {
    /// Load and decode the texture for `key`.
    fn load(&self, key: &TextureKey) -> ScreenResult<PreparedImage>;
}

/// Reads `<root>/<key>.png` from disk.
#[derive(Clone, Debug)]
pub struct DirTextureSource {
    root: PathBuf,
}

impl DirTextureSource {
    /// Source rooted at `root` (usually `<assets>/images`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureSource for DirTextureSource {
    fn load(&self, key: &TextureKey) -> ScreenResult<PreparedImage> {
        let stem = key.file_stem();
        let path = self.root.join(format!("{stem}.png"));
        let bytes =
            std::fs::read(&path).with_context(|| format!("read texture '{}'", path.display()))?;
        decode_image(&bytes, &stem)
    }
}

type Slot = Arc<Mutex<Option<Arc<PreparedImage>>>>;

/// Append-only memo of decoded UI textures.
///
/// Entries are never evicted. Concurrent requests for the same key wait on one load instead
/// of issuing a second one; failed loads are not memoized and are retried on the next request.
pub struct TextureCache {
    source: Arc<dyn TextureSource>,
    slots: Mutex<HashMap<TextureKey, Slot>>,
    loads: AtomicUsize,
}

impl TextureCache {
    /// Cache over `source`.
    pub fn new(source: Arc<dyn TextureSource>) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
            loads: AtomicUsize::new(0),
        }
    }

    /// Cache reading PNG files from `dir`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(DirTextureSource::new(dir)))
    }

    /// Resolve `key`, loading it on first use. Failures are logged and yield `None`.
    pub fn get(&self, key: &TextureKey) -> Option<Arc<PreparedImage>> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(slots.entry(*key).or_default())
        };

        let mut entry = slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(img) = entry.as_ref() {
            return Some(Arc::clone(img));
        }

        self.loads.fetch_add(1, Ordering::Relaxed);
        match self.source.load(key) {
            Ok(img) => {
                tracing::debug!(texture = %key, width = img.width, height = img.height, "texture loaded");
                let img = Arc::new(img);
                *entry = Some(Arc::clone(&img));
                Some(img)
            }
            Err(err) => {
                tracing::warn!(texture = %key, error = %err, "failed to retrieve texture");
                None
            }
        }
    }

    /// Number of loads issued to the underlying source so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for TextureCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self.slots.lock().map(|s| s.len()).unwrap_or(0);
        f.debug_struct("TextureCache")
            .field("slots", &cached)
            .field("loads", &self.load_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/textures.rs"]
mod tests;
