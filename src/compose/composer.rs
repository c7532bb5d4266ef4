use std::sync::{Mutex, MutexGuard};

use crate::{
    assets::textures::{TextureCache, TextureKey},
    compose::{chrome::chrome_plan, emotion::draw_emotion, layer::draw_layer},
    foundation::{
        core::{Canvas, Rect},
        error::ScreenResult,
    },
    render::{frame::FrameRGBA, surface::DrawSurface},
    scene::{
        layer::Layer,
        settings::{DialogueType, Language, Settings},
    },
    text::{dialogue::draw_dialogue_text, layout_table::LayoutTable, wrap::wrap_lines},
};

/// Result of one [`ScreenComposer::render`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The frame was drawn completely.
    Rendered,
    /// Another render was in flight; nothing was drawn.
    Skipped,
    /// Drawing stopped at an error, which was logged; the surface keeps what was drawn.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ComposerState {
    Idle,
    Rendering,
}

/// Returns the composer to `Idle` however the render exits.
struct RenderGuard<'a> {
    state: &'a Mutex<ComposerState>,
}

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        *lock(self.state) = ComposerState::Idle;
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Draws complete dialogue screens onto an owned surface.
///
/// At most one render runs at a time; a render requested while another is in flight is
/// dropped, not queued.
pub struct ScreenComposer<S: DrawSurface> {
    surface: Mutex<S>,
    state: Mutex<ComposerState>,
    textures: TextureCache,
    layout: LayoutTable,
}

impl<S: DrawSurface> ScreenComposer<S> {
    /// Composer drawing onto `surface` with chrome from `textures`.
    pub fn new(surface: S, textures: TextureCache, layout: LayoutTable) -> Self {
        Self {
            surface: Mutex::new(surface),
            state: Mutex::new(ComposerState::Idle),
            textures,
            layout,
        }
    }

    /// The chrome texture cache.
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    /// The layout table.
    pub fn layout(&self) -> &LayoutTable {
        &self.layout
    }

    /// Whether a render is currently in flight.
    pub fn is_rendering(&self) -> bool {
        *lock(&self.state) == ComposerState::Rendering
    }

    fn try_begin(&self) -> Option<RenderGuard<'_>> {
        let mut state = lock(&self.state);
        if *state == ComposerState::Rendering {
            return None;
        }
        *state = ComposerState::Rendering;
        Some(RenderGuard { state: &self.state })
    }

    /// Draw one frame for `settings` and `layers` (bottom-most first).
    ///
    /// When `preview` is given it is cleared and receives a downscaled copy of the frame.
    pub fn render(
        &self,
        settings: &Settings,
        layers: &[Layer],
        preview: Option<&mut FrameRGBA>,
    ) -> RenderOutcome {
        let Some(_guard) = self.try_begin() else {
            tracing::debug!("render already in flight; request dropped");
            return RenderOutcome::Skipped;
        };
        let span = tracing::debug_span!(
            "render",
            mode = %settings.dialogue_type,
            lang = %settings.font,
            layers = layers.len()
        );
        let _enter = span.enter();

        let mut surface = lock(&self.surface);
        match self.compose(&mut *surface, settings, layers, preview) {
            Ok(()) => {
                tracing::debug!("frame rendered");
                RenderOutcome::Rendered
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to draw dialogue screen");
                RenderOutcome::Failed
            }
        }
    }

    fn compose(
        &self,
        surface: &mut S,
        settings: &Settings,
        layers: &[Layer],
        preview: Option<&mut FrameRGBA>,
    ) -> ScreenResult<()> {
        let mode = settings.dialogue_type;
        let chrome = chrome_plan(mode, settings.font);

        surface.clear();
        for key in &chrome.under {
            self.draw_texture(surface, key)?;
        }

        let center = Canvas {
            width: surface.width(),
            height: surface.height(),
        }
        .center();
        let drop_shadow = mode == DialogueType::Intro;
        for layer in layers {
            tracing::trace!(layer = layer.id, source = layer.image.source(), "drawing layer");
            draw_layer(surface, center, layer, drop_shadow)?;
        }

        draw_emotion(surface, &self.textures, settings)?;

        for key in &chrome.over {
            self.draw_texture(surface, key)?;
        }

        match surface.ensure_font(settings.font) {
            Ok(()) => {
                let props = self.layout.get(settings.font)?;
                draw_dialogue_text(surface, settings, props)?;
            }
            Err(err) => {
                tracing::warn!(
                    lang = %settings.font,
                    error = %err,
                    "font unavailable; text skipped"
                );
            }
        }

        if let Some(preview) = preview {
            preview.blit_scaled_from(&surface.snapshot()?)?;
        }
        Ok(())
    }

    fn draw_texture(&self, surface: &mut S, key: &TextureKey) -> ScreenResult<()> {
        let Some(image) = self.textures.get(key) else {
            return Ok(());
        };
        let (w, h) = image.natural_size();
        surface.draw_image(&image, Rect::new(0.0, 0.0, w, h))
    }

    /// Insert line breaks into `text` so it fits the dialogue area of `mode`.
    ///
    /// Measures with the surface's face for `language`, loading it first if needed.
    pub fn wrap(&self, text: &str, mode: DialogueType, language: Language) -> ScreenResult<String> {
        let props = self.layout.get(language)?;
        let mut surface = lock(&self.surface);
        surface.ensure_font(language)?;
        let width = f64::from(surface.width());
        wrap_lines(text, mode, language, props, width, &mut *surface)
    }

    /// Copy of the current frame.
    pub fn snapshot(&self) -> ScreenResult<FrameRGBA> {
        lock(&self.surface).snapshot()
    }

    /// Current frame encoded as PNG.
    pub fn export_png(&self) -> ScreenResult<Vec<u8>> {
        self.snapshot()?.encode_png()
    }

    /// Run `f` with exclusive access to the surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut *lock(&self.surface))
    }

    /// Give back the surface.
    pub fn into_surface(self) -> S {
        self.surface.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S: DrawSurface> std::fmt::Debug for ScreenComposer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenComposer")
            .field("rendering", &self.is_rendering())
            .field("textures", &self.textures)
            .finish()
    }
}
