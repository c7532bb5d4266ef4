use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::decode::PreparedImage,
    effects::filter::shadow_from_alpha,
    foundation::{
        core::{Affine, Canvas, Rect, Rgba8},
        error::{ScreenError, ScreenResult},
    },
    render::{
        composite::over_in_place,
        frame::FrameRGBA,
        surface::{DrawSurface, FontSpec, StateStack, TextMeasurer},
    },
    scene::settings::Language,
};

/// Font files probed in a font directory, per language.
const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// Software [`DrawSurface`] backed by `vello_cpu`, with `parley` text shaping.
///
/// Every draw is rasterized into a scratch pixmap first so the active filter, shadow and
/// global alpha apply to that draw alone before it is composited over the surface.
pub struct CpuSurface {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
    scratch: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    states: StateStack,
    fonts: FontBook,
}

impl CpuSurface {
    /// Transparent surface of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> ScreenResult<Self> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| ScreenError::render("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| ScreenError::render("surface height exceeds u16"))?;
        if width_u16 == 0 || height_u16 == 0 {
            return Err(ScreenError::render("surface size must be non-zero"));
        }
        Ok(Self {
            width: width_u16,
            height: height_u16,
            pixels: vec![0; width as usize * height as usize * 4],
            scratch: vello_cpu::Pixmap::new(width_u16, height_u16),
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
            states: StateStack::default(),
            fonts: FontBook::default(),
        })
    }

    /// The 750x1334 dialogue screen.
    pub fn screen() -> ScreenResult<Self> {
        let Canvas { width, height } = Canvas::SCREEN;
        Self::new(width, height)
    }

    /// Look for `dragalialost_<lang>.{ttf,otf}` in `dir` when a face is first needed.
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts.dir = Some(dir.into());
        self
    }

    /// Register raw font bytes as the face for `language`, replacing any earlier one.
    pub fn register_font(&mut self, language: Language, bytes: Vec<u8>) -> ScreenResult<()> {
        self.fonts.register(language, bytes)
    }

    /// Rasterize whatever `paint` records, then filter, shadow and composite it.
    fn composite_draw(
        &mut self,
        paint: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> ScreenResult<()> {
        let state = self.states.current().clone();
        if state.global_alpha <= 0.0 {
            return Ok(());
        }

        self.ctx.reset();
        self.ctx.set_transform(affine_to_cpu(state.transform));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        paint(&mut self.ctx);
        self.ctx.flush();

        self.scratch.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.scratch);
        let mut layer = self.scratch.data_as_u8_slice().to_vec();

        let (w, h) = (u32::from(self.width), u32::from(self.height));
        if let Some(filter) = &state.filter {
            filter.apply_premul(&mut layer, w, h)?;
        }
        if let Some(shadow) = state.shadow.filter(|s| s.color.a > 0) {
            let mut shadowed = shadow_from_alpha(
                &layer,
                w,
                h,
                shadow.color,
                shadow.offset.x as f32,
                shadow.offset.y as f32,
            );
            over_in_place(&mut shadowed, &layer, 1.0)?;
            layer = shadowed;
        }
        over_in_place(&mut self.pixels, &layer, state.global_alpha)
    }

    fn place_glyphs(
        &mut self,
        text: &str,
        font: &FontSpec,
        x: f64,
        y: f64,
    ) -> ScreenResult<Option<ShapedLine>> {
        if text.is_empty() {
            return Ok(None);
        }
        let shaped = self.fonts.shape(text, font)?;
        if shaped.glyphs.is_empty() {
            return Ok(None);
        }
        let origin = Affine::translate((x, y));
        let st = self.states.current_mut();
        st.transform = st.transform * origin;
        Ok(Some(shaped))
    }
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fonts", &self.fonts.faces.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TextMeasurer for CpuSurface {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> ScreenResult<f64> {
        if text.is_empty() {
            return Ok(0.0);
        }
        Ok(f64::from(self.fonts.shape(text, font)?.width))
    }
}

impl DrawSurface for CpuSurface {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn states(&self) -> &StateStack {
        &self.states
    }

    fn states_mut(&mut self) -> &mut StateStack {
        &mut self.states
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
        self.states.reset();
    }

    fn draw_image(&mut self, image: &PreparedImage, dest: Rect) -> ScreenResult<()> {
        if image.width == 0 || image.height == 0 {
            return Ok(());
        }
        let (iw, ih) = image.natural_size();
        let (dw, dh) = (dest.width(), dest.height());
        if !(dw.is_finite() && dh.is_finite()) || dw == 0.0 || dh == 0.0 {
            return Ok(());
        }

        let paint = image_paint(image)?;
        let placement = Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(dw / iw, dh / ih);
        let base = self.states.current().transform;
        self.states.current_mut().transform = base * placement;
        let result = self.composite_draw(|ctx| {
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        });
        self.states.current_mut().transform = base;
        result
    }

    fn fill_text(&mut self, text: &str, font: &FontSpec, x: f64, y: f64) -> ScreenResult<()> {
        let base = self.states.current().transform;
        let Some(shaped) = self.place_glyphs(text, font, x, y)? else {
            return Ok(());
        };
        let fill = self.states.current().fill;
        let result = self.composite_draw(|ctx| {
            ctx.set_paint(color_to_cpu(fill));
            ctx.glyph_run(&shaped.font)
                .font_size(shaped.size_px)
                .fill_glyphs(shaped.glyphs.into_iter());
        });
        self.states.current_mut().transform = base;
        result
    }

    fn stroke_text(&mut self, text: &str, font: &FontSpec, x: f64, y: f64) -> ScreenResult<()> {
        let base = self.states.current().transform;
        let Some(shaped) = self.place_glyphs(text, font, x, y)? else {
            return Ok(());
        };
        let style = self.states.current().stroke;
        let result = self.composite_draw(|ctx| {
            ctx.set_paint(color_to_cpu(style.color));
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(style.width).with_miter_limit(style.miter_limit),
            );
            ctx.glyph_run(&shaped.font)
                .font_size(shaped.size_px)
                .stroke_glyphs(shaped.glyphs.into_iter());
        });
        self.states.current_mut().transform = base;
        result
    }

    fn fill_rect(&mut self, rect: Rect) -> ScreenResult<()> {
        let fill = self.states.current().fill;
        self.composite_draw(|ctx| {
            ctx.set_paint(color_to_cpu(fill));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
        })
    }

    fn ensure_font(&mut self, language: Language) -> ScreenResult<()> {
        self.fonts.ensure(language)
    }

    fn snapshot(&self) -> ScreenResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixels.clone(),
            premultiplied: true,
        })
    }
}

struct LoadedFace {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Glyphs of one shaped line, positioned relative to its baseline origin.
struct ShapedLine {
    font: vello_cpu::peniko::FontData,
    size_px: f32,
    /// Advance width including trailing whitespace.
    width: f32,
    glyphs: Vec<vello_cpu::Glyph>,
}

/// Per-language faces plus the parley contexts that shape with them.
struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    faces: HashMap<Language, LoadedFace>,
    dir: Option<PathBuf>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
            dir: None,
        }
    }
}

impl FontBook {
    fn register(&mut self, language: Language, bytes: Vec<u8>) -> ScreenResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ScreenError::font(format!("no font families registered for '{language}'"))
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ScreenError::font("registered font family has no name"))?
            .to_string();

        tracing::debug!(%language, %family, "font registered");
        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        self.faces.insert(language, LoadedFace { family, data });
        Ok(())
    }

    fn ensure(&mut self, language: Language) -> ScreenResult<()> {
        if self.faces.contains_key(&language) {
            return Ok(());
        }
        let dir = self.dir.clone().ok_or_else(|| {
            ScreenError::font(format!("no face registered for '{language}' and no font dir"))
        })?;
        let path = find_font_file(&dir, language).ok_or_else(|| {
            ScreenError::font(format!(
                "font '{}' not found in '{}'",
                language.font_family(),
                dir.display()
            ))
        })?;
        let bytes =
            std::fs::read(&path).with_context(|| format!("read font '{}'", path.display()))?;
        self.register(language, bytes)
    }

    fn shape(&mut self, text: &str, spec: &FontSpec) -> ScreenResult<ShapedLine> {
        if !spec.size_px.is_finite() || spec.size_px <= 0.0 {
            return Err(ScreenError::validation("font size must be finite and > 0"));
        }
        self.ensure(spec.language)?;
        let face = self
            .faces
            .get(&spec.language)
            .ok_or_else(|| ScreenError::font(format!("face for '{}' missing", spec.language)))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(spec.size_px));
        if let Some(weight) = spec.weight {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::new(f32::from(weight)),
            ));
        }
        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        let first_baseline = layout
            .lines()
            .next()
            .map(|l| l.metrics().baseline)
            .unwrap_or(0.0);
        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let mut run_x = run.offset();
                let run_y = run.baseline() - first_baseline;
                for glyph in run.glyphs() {
                    glyphs.push(vello_cpu::Glyph {
                        id: glyph.id,
                        x: run_x + glyph.x,
                        y: run_y - glyph.y,
                    });
                    run_x += glyph.advance;
                }
            }
        }

        Ok(ShapedLine {
            font: face.data.clone(),
            size_px: spec.size_px,
            width: layout.full_width(),
            glyphs,
        })
    }
}

fn find_font_file(dir: &Path, language: Language) -> Option<PathBuf> {
    let stem = language.font_family();
    FONT_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn image_paint(image: &PreparedImage) -> ScreenResult<vello_cpu::Image> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| ScreenError::render("image width exceeds u16"))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| ScreenError::render("image height exceeds u16"))?;

    let mut may_have_opacities = false;
    let pixels = image
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);

    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
