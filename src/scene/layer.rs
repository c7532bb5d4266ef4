use std::{
    fmt,
    path::PathBuf,
    sync::{Arc, OnceLock},
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    effects::filter::FilterChain,
    foundation::error::{ScreenError, ScreenResult},
};

enum Encoded {
    Bytes(Vec<u8>),
    File(PathBuf),
}

struct Pending {
    source: String,
    encoded: Encoded,
    decoded: OnceLock<Result<Arc<PreparedImage>, String>>,
}

impl Pending {
    fn decode(&self) -> Result<Arc<PreparedImage>, String> {
        let bytes = match &self.encoded {
            Encoded::Bytes(b) => std::borrow::Cow::Borrowed(b.as_slice()),
            Encoded::File(path) => std::borrow::Cow::Owned(
                std::fs::read(path)
                    .with_context(|| format!("read layer image '{}'", path.display()))
                    .map_err(|e| format!("{e:#}"))?,
            ),
        };
        decode_image(&bytes, &self.source)
            .map(Arc::new)
            .map_err(|e| e.to_string())
    }
}

/// Pixel source of a [`Layer`]; decoding is deferred until the image is first needed.
///
/// Clones share one decode. Concurrent resolvers block until the first decode finishes.
#[derive(Clone)]
pub struct LayerImage {
    inner: LayerImageInner,
}

#[derive(Clone)]
enum LayerImageInner {
    Ready(Arc<PreparedImage>),
    Pending(Arc<Pending>),
}

impl LayerImage {
    /// Already decoded pixels.
    pub fn ready(image: Arc<PreparedImage>) -> Self {
        Self {
            inner: LayerImageInner::Ready(image),
        }
    }

    /// Encoded bytes (PNG, JPEG, ...) decoded on first use.
    pub fn encoded(bytes: Vec<u8>, source: impl Into<String>) -> Self {
        Self::pending(source.into(), Encoded::Bytes(bytes))
    }

    /// Image file read and decoded on first use.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::pending(path.display().to_string(), Encoded::File(path))
    }

    fn pending(source: String, encoded: Encoded) -> Self {
        Self {
            inner: LayerImageInner::Pending(Arc::new(Pending {
                source,
                encoded,
                decoded: OnceLock::new(),
            })),
        }
    }

    /// Label of the pixel source.
    pub fn source(&self) -> &str {
        match &self.inner {
            LayerImageInner::Ready(img) => &img.source,
            LayerImageInner::Pending(p) => &p.source,
        }
    }

    /// Whether decoding has finished (successfully or not).
    pub fn is_decoded(&self) -> bool {
        match &self.inner {
            LayerImageInner::Ready(_) => true,
            LayerImageInner::Pending(p) => p.decoded.get().is_some(),
        }
    }

    /// Decoded pixels, waiting for or running the decode as needed.
    pub fn resolve(&self) -> ScreenResult<Arc<PreparedImage>> {
        match &self.inner {
            LayerImageInner::Ready(img) => Ok(Arc::clone(img)),
            LayerImageInner::Pending(p) => p
                .decoded
                .get_or_init(|| p.decode())
                .clone()
                .map_err(ScreenError::asset),
        }
    }
}

impl fmt::Debug for LayerImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerImage")
            .field("source", &self.source())
            .field("decoded", &self.is_decoded())
            .finish()
    }
}

impl From<PreparedImage> for LayerImage {
    fn from(image: PreparedImage) -> Self {
        Self::ready(Arc::new(image))
    }
}

/// One image stacked on the screen, bottom-most first.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Unique id assigned by the owner of the layer list.
    pub id: u32,
    /// Display name.
    pub name: Option<String>,
    /// Pixel source.
    pub image: LayerImage,
    /// Horizontal offset from the canvas center, in pixels.
    pub offset_x: f64,
    /// Vertical offset from the canvas center, in pixels (positive is up).
    pub offset_y: f64,
    /// Clockwise rotation about the offset center, in degrees.
    pub rotation: f64,
    /// Multiplier on the natural image size.
    pub scale: f64,
    /// Opacity in `0..=1`.
    pub opacity: f32,
    /// Mirror horizontally before rotating.
    pub flip_x: bool,
    /// Filter applied to this layer only.
    pub filter: Option<FilterChain>,
}

impl Layer {
    /// Untransformed, fully opaque layer.
    pub fn new(id: u32, image: impl Into<LayerImage>) -> Self {
        Self {
            id,
            name: None,
            image: image.into(),
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
            flip_x: false,
            filter: None,
        }
    }

    /// Set both offsets.
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layer.rs"]
mod tests;
