use crate::{
    foundation::{
        core::{Point, Rect, Rgba8, Vec2},
        error::ScreenResult,
    },
    render::surface::{DrawSurface, Shadow},
    scene::layer::Layer,
};

/// Shadow cast by intro-mode layers.
pub const INTRO_SHADOW: Shadow = Shadow {
    color: Rgba8::rgba(0, 0, 0, 64),
    offset: Vec2::new(20.0, 20.0),
};

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// Draw `layer` centered on `center` plus its offsets, flipped and rotated about that point.
///
/// Non-finite offsets and rotation fall back to zero and non-finite opacity to one. A layer
/// whose scale is not a positive finite number draws nothing. Surface state is the same on
/// return as on entry.
pub fn draw_layer<S: DrawSurface + ?Sized>(
    surface: &mut S,
    center: Point,
    layer: &Layer,
    drop_shadow: bool,
) -> ScreenResult<()> {
    let image = layer.image.resolve()?;

    let scale = layer.scale;
    if !scale.is_finite() || scale <= 0.0 {
        tracing::trace!(layer = layer.id, scale, "degenerate layer scale; skipped");
        return Ok(());
    }
    let offset_x = finite_or(layer.offset_x, 0.0);
    let offset_y = -finite_or(layer.offset_y, 0.0);
    let rotation = finite_or(layer.rotation, 0.0);
    let opacity = if layer.opacity.is_finite() {
        layer.opacity.clamp(0.0, 1.0)
    } else {
        1.0
    };

    let (natural_w, natural_h) = image.natural_size();
    let (w, h) = (natural_w * scale, natural_h * scale);
    let pivot = Point::new(center.x + offset_x, center.y + offset_y);
    let dest = Rect::from_center_size(pivot, (w, h));

    surface.save();
    surface.set_filter(layer.filter.clone());
    surface.translate(pivot.x, pivot.y);
    if layer.flip_x {
        surface.scale(-1.0, 1.0);
    }
    if rotation != 0.0 {
        surface.rotate(rotation.to_radians());
    }
    if drop_shadow {
        surface.set_shadow(Some(INTRO_SHADOW));
    }
    surface.set_global_alpha(opacity);
    surface.translate(-pivot.x, -pivot.y);

    let result = surface.draw_image(&image, dest);
    surface.restore();
    result
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layer.rs"]
mod tests;
