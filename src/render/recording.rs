use std::collections::HashSet;

use crate::{
    assets::decode::PreparedImage,
    foundation::{
        core::{Rect, Rgba8},
        error::{ScreenError, ScreenResult},
    },
    render::{
        frame::FrameRGBA,
        surface::{DrawState, DrawSurface, FontSpec, StateStack, TextMeasurer},
    },
    scene::settings::Language,
};

/// Style captured with each recorded draw.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RecordedStyle {
    /// Transform coefficients `[a, b, c, d, e, f]`.
    pub transform: [f64; 6],
    /// Global alpha.
    pub alpha: f32,
    /// Filter in CSS syntax, if any.
    pub filter: Option<String>,
    /// Whether a shadow was set.
    pub shadow: bool,
    /// Fill color as straight RGBA.
    pub fill: [u8; 4],
}

impl From<&DrawState> for RecordedStyle {
    fn from(st: &DrawState) -> Self {
        let Rgba8 { r, g, b, a } = st.fill;
        Self {
            transform: st.transform.as_coeffs(),
            alpha: st.global_alpha,
            filter: st.filter.as_ref().map(ToString::to_string),
            shadow: st.shadow.is_some(),
            fill: [r, g, b, a],
        }
    }
}

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    /// Surface cleared.
    Clear,
    /// Image drawn into `dest` (`[x0, y0, x1, y1]`).
    Image {
        /// Image source label.
        source: String,
        /// Destination rectangle in user space.
        dest: [f64; 4],
        /// Active style.
        style: RecordedStyle,
    },
    /// Filled text.
    FillText {
        /// Text drawn.
        text: String,
        /// Font size in pixels.
        size: f32,
        /// Font weight.
        weight: Option<u16>,
        /// Baseline origin x.
        x: f64,
        /// Baseline origin y.
        y: f64,
        /// Active style.
        style: RecordedStyle,
    },
    /// Stroked text.
    StrokeText {
        /// Text drawn.
        text: String,
        /// Font size in pixels.
        size: f32,
        /// Stroke width.
        width: f64,
        /// Baseline origin x.
        x: f64,
        /// Baseline origin y.
        y: f64,
        /// Active style.
        style: RecordedStyle,
    },
    /// Filled rectangle (`[x0, y0, x1, y1]`).
    FillRect {
        /// Rectangle in user space.
        rect: [f64; 4],
        /// Active style.
        style: RecordedStyle,
    },
}

/// Surface that records draw calls instead of rasterizing them.
///
/// Text is measured as a fixed width per character, independent of the font, which makes
/// layouts predictable. Used to inspect a frame's layout without any font files.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    char_width: f64,
    states: StateStack,
    calls: Vec<DrawCall>,
    missing_fonts: HashSet<Language>,
}

impl RecordingSurface {
    /// Recorder for a `width` x `height` canvas measuring 10px per character.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            char_width: 10.0,
            states: StateStack::default(),
            calls: Vec::new(),
            missing_fonts: HashSet::new(),
        }
    }

    /// Use `px` per character for measurement.
    pub fn with_char_width(mut self, px: f64) -> Self {
        self.char_width = px;
        self
    }

    /// Make `ensure_font` fail for `language`.
    pub fn without_font(mut self, language: Language) -> Self {
        self.missing_fonts.insert(language);
        self
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    fn style(&self) -> RecordedStyle {
        RecordedStyle::from(self.states.current())
    }
}

fn rect_coords(r: Rect) -> [f64; 4] {
    [r.x0, r.y0, r.x1, r.y1]
}

impl TextMeasurer for RecordingSurface {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> ScreenResult<f64> {
        if self.missing_fonts.contains(&font.language) {
            return Err(ScreenError::font(format!("no face for '{}'", font.language)));
        }
        Ok(text.chars().count() as f64 * self.char_width)
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn states(&self) -> &StateStack {
        &self.states
    }

    fn states_mut(&mut self) -> &mut StateStack {
        &mut self.states
    }

    fn clear(&mut self) {
        self.states.reset();
        self.calls.push(DrawCall::Clear);
    }

    fn draw_image(&mut self, image: &PreparedImage, dest: Rect) -> ScreenResult<()> {
        let style = self.style();
        self.calls.push(DrawCall::Image {
            source: image.source.to_string(),
            dest: rect_coords(dest),
            style,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, font: &FontSpec, x: f64, y: f64) -> ScreenResult<()> {
        let style = self.style();
        self.calls.push(DrawCall::FillText {
            text: text.to_string(),
            size: font.size_px,
            weight: font.weight,
            x,
            y,
            style,
        });
        Ok(())
    }

    fn stroke_text(&mut self, text: &str, font: &FontSpec, x: f64, y: f64) -> ScreenResult<()> {
        let style = self.style();
        self.calls.push(DrawCall::StrokeText {
            text: text.to_string(),
            size: font.size_px,
            width: self.states.current().stroke.width,
            x,
            y,
            style,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> ScreenResult<()> {
        let style = self.style();
        self.calls.push(DrawCall::FillRect {
            rect: rect_coords(rect),
            style,
        });
        Ok(())
    }

    fn ensure_font(&mut self, language: Language) -> ScreenResult<()> {
        if self.missing_fonts.contains(&language) {
            return Err(ScreenError::font(format!("no face for '{language}'")));
        }
        Ok(())
    }

    fn snapshot(&self) -> ScreenResult<FrameRGBA> {
        Ok(FrameRGBA::new_transparent(self.width, self.height))
    }
}
