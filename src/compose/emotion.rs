use crate::{
    assets::textures::{TextureCache, TextureKey},
    compose::layer::draw_layer,
    foundation::{core::Point, error::ScreenResult},
    render::surface::DrawSurface,
    scene::{
        layer::{Layer, LayerImage},
        settings::Settings,
    },
};

/// Horizontal distance of the balloon anchor from its side of the canvas.
pub const EMOTION_SIDE_INSET: f64 = 180.0;
/// Vertical position of the balloon anchor.
pub const EMOTION_Y: f64 = 250.0;

/// Balloon anchor on a canvas `canvas_width` pixels wide.
pub fn emotion_anchor(canvas_width: f64, left: bool) -> Point {
    let x = if left {
        EMOTION_SIDE_INSET
    } else {
        canvas_width - EMOTION_SIDE_INSET
    };
    Point::new(x, EMOTION_Y)
}

/// Draw the emotion balloon chosen in `settings`, if any.
///
/// A balloon texture that cannot be loaded is skipped; the cache has already logged it.
pub fn draw_emotion<S: DrawSurface + ?Sized>(
    surface: &mut S,
    textures: &TextureCache,
    settings: &Settings,
) -> ScreenResult<()> {
    let Some(key) = TextureKey::emotion(settings.emotion, settings.emotion_is_left) else {
        return Ok(());
    };
    let Some(image) = textures.get(&key) else {
        return Ok(());
    };

    let balloon = Layer::new(0, LayerImage::ready(image))
        .with_offset(settings.emotion_offset_x, settings.emotion_offset_y);
    let anchor = emotion_anchor(f64::from(surface.width()), settings.emotion_is_left);
    draw_layer(surface, anchor, &balloon, false)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/emotion.rs"]
mod tests;
