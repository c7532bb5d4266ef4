//! Dialogue-screen compositor for game cutscene mock-ups.
//!
//! A [`ScreenComposer`] draws one fixed-size frame from [`Settings`] and a stack of
//! [`Layer`]s:
//!
//! - Chrome textures for the selected [`DialogueType`]
//! - Image layers, each offset, scaled, rotated, mirrored and filtered about the canvas center
//! - An optional emotion icon
//! - Speaker name and dialogue body, with `(base){furigana}` ruby annotations
//!
//! Frames rasterize on the CPU through [`CpuSurface`] and export as PNG.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image decoding and chrome textures.
pub mod assets;
/// Screen assembly.
pub mod compose;
/// Pixel effects.
pub mod effects;
/// Drawing surfaces and frame buffers.
pub mod render;
/// Settings and layers.
pub mod scene;
/// Dialogue text layout.
pub mod text;

pub use crate::foundation::core::{
    Affine, CANVAS_HEIGHT, CANVAS_WIDTH, Canvas, Point, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{ScreenError, ScreenResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::textures::{DirTextureSource, TextureCache, TextureKey, TextureSource};
pub use crate::compose::composer::{RenderOutcome, ScreenComposer};
pub use crate::effects::filter::{FilterChain, FilterOp};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::frame::FrameRGBA;
pub use crate::render::recording::{DrawCall, RecordingSurface};
pub use crate::render::surface::{DrawSurface, FontSpec, TextMeasurer};
pub use crate::scene::file::{Scene, SceneFile};
pub use crate::scene::layer::{Layer, LayerImage};
pub use crate::scene::settings::{DialogueType, Emotion, Language, Settings};
pub use crate::text::layout_table::{LayoutTable, TextProperties};
pub use crate::text::markup::{Segment, strip_annotations};
