use crate::{
    foundation::error::ScreenResult,
    render::surface::{DrawSurface, FontSpec, StrokeStyle},
    text::markup::{Segment, scan_annotations},
};

/// Pixel size of furigana glyphs.
pub const FURIGANA_SIZE: f32 = 15.0;

/// Rotation of intro-mode title text, in degrees.
pub const INTRO_SLANT_DEGREES: f64 = -6.25;

/// Draw one line of dialogue with its baseline starting at `(x, y)`.
///
/// Annotation furigana is drawn first, centered over its base text and `font.size_px - 2`
/// pixels above the baseline. The flow text is then drawn with every annotation replaced by
/// its base, so furigana never affects the line width.
pub fn draw_ruby_line<S: DrawSurface + ?Sized>(
    surface: &mut S,
    line: &str,
    font: &FontSpec,
    x: f64,
    y: f64,
) -> ScreenResult<()> {
    let furigana_font = FontSpec::new(font.language, FURIGANA_SIZE);
    let furigana_y = y - f64::from(font.size_px) + 2.0;
    let mut flow = String::with_capacity(line.len());

    for segment in scan_annotations(line) {
        if let Segment::Ruby { base, furigana } = segment {
            let center =
                x + surface.measure_text(&flow, font)? + surface.measure_text(base, font)? / 2.0;
            let width = surface.measure_text(furigana, &furigana_font)?;
            surface.fill_text(furigana, &furigana_font, center - width / 2.0, furigana_y)?;
        }
        flow.push_str(segment.flow_text());
    }

    surface.fill_text(&flow, font, x, y)
}

/// Draw `text` right-aligned `margin` pixels from the right edge, rotated by
/// [`INTRO_SLANT_DEGREES`] about `(surface width, y)`. With `outline`, the text is stroked
/// before it is filled.
pub fn draw_slanted_text<S: DrawSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    font: &FontSpec,
    y: f64,
    margin: f64,
    outline: Option<StrokeStyle>,
) -> ScreenResult<()> {
    surface.save();
    let result = slanted_body(surface, text, font, y, margin, outline);
    surface.restore();
    result
}

fn slanted_body<S: DrawSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    font: &FontSpec,
    y: f64,
    margin: f64,
    outline: Option<StrokeStyle>,
) -> ScreenResult<()> {
    let width = surface.measure_text(text, font)?;
    let right = f64::from(surface.width());

    surface.translate(right, y);
    surface.rotate(INTRO_SLANT_DEGREES.to_radians());
    surface.translate(-right, -y);

    let x = right - width - margin;
    if let Some(stroke) = outline {
        surface.set_stroke(stroke);
        surface.stroke_text(text, font, x, y)?;
    }
    surface.fill_text(text, font, x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/text/ruby.rs"]
mod tests;
