use crate::{
    assets::decode::PreparedImage,
    effects::filter::FilterChain,
    foundation::{
        core::{Affine, Rect, Rgba8, Vec2},
        error::ScreenResult,
    },
    render::frame::FrameRGBA,
    scene::settings::Language,
};

/// Font selection for one text draw or measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Face family, one per language.
    pub language: Language,
    /// Size in pixels.
    pub size_px: f32,
    /// Optional CSS-style weight (`400`, `700`, ...).
    pub weight: Option<u16>,
}

impl FontSpec {
    /// Regular weight font of `size_px`.
    pub fn new(language: Language, size_px: f32) -> Self {
        Self {
            language,
            size_px,
            weight: None,
        }
    }

    /// Same font with `weight` applied.
    pub fn with_weight(mut self, weight: Option<u16>) -> Self {
        self.weight = weight;
        self
    }
}

/// Hard drop shadow painted under each draw while set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow tint; its alpha scales the drawn alpha.
    pub color: Rgba8,
    /// Offset in device pixels, unaffected by the current transform.
    pub offset: Vec2,
}

/// Outline parameters for [`DrawSurface::stroke_text`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Rgba8,
    /// Line width in user units.
    pub width: f64,
    /// Miter limit for sharp joins.
    pub miter_limit: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::BLACK,
            width: 1.0,
            miter_limit: 10.0,
        }
    }
}

/// Style and transform applied to every draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    /// Current transformation matrix.
    pub transform: Affine,
    /// Alpha multiplier in `0..=1`.
    pub global_alpha: f32,
    /// Filter applied to each draw before compositing.
    pub filter: Option<FilterChain>,
    /// Shadow painted under each draw.
    pub shadow: Option<Shadow>,
    /// Fill color for text and rectangles.
    pub fill: Rgba8,
    /// Outline style for stroked text.
    pub stroke: StrokeStyle,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            global_alpha: 1.0,
            filter: None,
            shadow: None,
            fill: Rgba8::BLACK,
            stroke: StrokeStyle::default(),
        }
    }
}

/// Current [`DrawState`] plus the states pushed by `save`.
#[derive(Clone, Debug, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    /// The state new draws use.
    pub fn current(&self) -> &DrawState {
        &self.current
    }

    /// Mutable access to the active state.
    pub fn current_mut(&mut self) -> &mut DrawState {
        &mut self.current
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Push a copy of the active state.
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pop the last saved state; a restore without a matching save is ignored.
    pub fn restore(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }

    /// Drop all saved states and return to defaults.
    pub fn reset(&mut self) {
        self.saved.clear();
        self.current = DrawState::default();
    }
}

/// Width measurement shared by the line wrapper and the text renderer.
pub trait TextMeasurer {
    /// Advance width of `text` set in `font`, in pixels.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> ScreenResult<f64>;
}

/// Canvas-like raster target the composer draws into.
///
/// Transform and style changes are provided methods over [`StateStack`]; implementors supply
/// the draw primitives. Transform helpers post-multiply, so the last call applies first to
/// drawn geometry.
pub trait DrawSurface: TextMeasurer {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Style stack.
    fn states(&self) -> &StateStack;

    /// Mutable style stack.
    fn states_mut(&mut self) -> &mut StateStack;

    /// Reset every pixel to transparent and the style stack to defaults.
    fn clear(&mut self);

    /// Draw `image` stretched into `dest` (user space).
    fn draw_image(&mut self, image: &PreparedImage, dest: Rect) -> ScreenResult<()>;

    /// Fill `text` with its alphabetic baseline starting at `(x, y)`.
    fn fill_text(&mut self, text: &str, font: &FontSpec, x: f64, y: f64) -> ScreenResult<()>;

    /// Outline `text` with the current stroke style.
    fn stroke_text(&mut self, text: &str, font: &FontSpec, x: f64, y: f64) -> ScreenResult<()>;

    /// Fill `rect` with the current fill color.
    fn fill_rect(&mut self, rect: Rect) -> ScreenResult<()>;

    /// Make sure the face for `language` is ready for measuring and drawing.
    fn ensure_font(&mut self, language: Language) -> ScreenResult<()>;

    /// Copy of the current pixels.
    fn snapshot(&self) -> ScreenResult<FrameRGBA>;

    /// Active style.
    fn state(&self) -> &DrawState {
        self.states().current()
    }

    /// Push the active style.
    fn save(&mut self) {
        self.states_mut().save();
    }

    /// Pop the last saved style.
    fn restore(&mut self) {
        self.states_mut().restore();
    }

    /// Move the origin by `(dx, dy)`.
    fn translate(&mut self, dx: f64, dy: f64) {
        let st = self.states_mut().current_mut();
        st.transform = st.transform * Affine::translate((dx, dy));
    }

    /// Scale user space by `(sx, sy)`.
    fn scale(&mut self, sx: f64, sy: f64) {
        let st = self.states_mut().current_mut();
        st.transform = st.transform * Affine::scale_non_uniform(sx, sy);
    }

    /// Rotate user space clockwise by `radians` (y axis points down).
    fn rotate(&mut self, radians: f64) {
        let st = self.states_mut().current_mut();
        st.transform = st.transform * Affine::rotate(radians);
    }

    /// Set the alpha multiplier; non-finite values are ignored.
    fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.states_mut().current_mut().global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    /// Set or clear the per-draw filter.
    fn set_filter(&mut self, filter: Option<FilterChain>) {
        self.states_mut().current_mut().filter = filter.filter(|f| !f.is_empty());
    }

    /// Set or clear the drop shadow.
    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.states_mut().current_mut().shadow = shadow;
    }

    /// Set the fill color.
    fn set_fill(&mut self, color: Rgba8) {
        self.states_mut().current_mut().fill = color;
    }

    /// Set the stroke style.
    fn set_stroke(&mut self, stroke: StrokeStyle) {
        self.states_mut().current_mut().stroke = stroke;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
