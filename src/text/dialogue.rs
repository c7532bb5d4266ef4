//! Placement of the speaker name and dialogue body for each presentation mode.

use crate::{
    foundation::{
        core::{Rect, Rgba8},
        error::ScreenResult,
    },
    render::surface::{DrawSurface, FontSpec, StrokeStyle},
    scene::settings::{DialogueType, Settings},
    text::{
        layout_table::TextProperties,
        markup::strip_annotations,
        ruby::{draw_ruby_line, draw_slanted_text},
    },
};

/// Body text color in the dialogue bar.
pub const DIALOGUE_INK: Rgba8 = Rgba8::rgb(0x01, 0x22, 0x31);
/// Body text color on the book page.
pub const BOOK_INK: Rgba8 = Rgba8::rgb(0x41, 0x2c, 0x29);
/// Intro title fill and name outline color.
pub const INTRO_INK: Rgba8 = Rgba8::rgb(0x33, 0x33, 0x33);
/// Vertical position of the caption divider rule.
pub const CAPTION_RULE_Y: f64 = 430.0;

/// How the body lines of a mode are placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyLayout {
    /// Font size in pixels.
    pub size: f64,
    /// Distance between baselines.
    pub line_height: f64,
    /// Text color.
    pub fill: Rgba8,
    /// Center each line horizontally instead of starting at `dialogueXPos`.
    pub centered: bool,
}

impl BodyLayout {
    /// Layout of body text for `mode`; `None` for intro, which draws a slanted title instead.
    pub fn for_mode(mode: DialogueType, props: &TextProperties) -> Option<Self> {
        let layout = match mode {
            DialogueType::Intro => return None,
            DialogueType::Dialogue => BodyLayout {
                size: props.dialogue_size,
                line_height: props.line_height,
                fill: DIALOGUE_INK,
                centered: false,
            },
            DialogueType::Caption => BodyLayout {
                size: props.caption_size,
                line_height: props.line_height,
                fill: Rgba8::WHITE,
                centered: true,
            },
            DialogueType::Narration | DialogueType::Full => BodyLayout {
                size: props.dialogue_size,
                line_height: props.narration_line_height,
                fill: Rgba8::WHITE,
                centered: true,
            },
            DialogueType::Book => BodyLayout {
                size: props.dialogue_size,
                line_height: props.narration_line_height,
                fill: BOOK_INK,
                centered: true,
            },
        };
        Some(layout)
    }

    /// Baseline of the first of `lines` lines.
    pub fn start_y(
        &self,
        mode: DialogueType,
        props: &TextProperties,
        canvas_height: f64,
        lines: usize,
    ) -> f64 {
        let extra = lines.saturating_sub(1) as f64 * self.line_height;
        match mode {
            DialogueType::Caption => props.caption_y_pos,
            DialogueType::Narration | DialogueType::Full => {
                props.narration_y_pos - (self.size + extra) / 2.0
            }
            DialogueType::Book => canvas_height / 2.0 - extra / 2.0,
            DialogueType::Dialogue | DialogueType::Intro => props.dialogue_y_pos,
        }
    }
}

/// Draw the speaker name and dialogue body of `settings` onto `surface`.
///
/// The font for `settings.font` must already be available. Surface state is saved and
/// restored around the whole block.
pub fn draw_dialogue_text<S: DrawSurface + ?Sized>(
    surface: &mut S,
    settings: &Settings,
    props: &TextProperties,
) -> ScreenResult<()> {
    surface.save();
    let result = draw_text_block(surface, settings, props);
    surface.restore();
    result
}

fn draw_text_block<S: DrawSurface + ?Sized>(
    surface: &mut S,
    settings: &Settings,
    props: &TextProperties,
) -> ScreenResult<()> {
    let lang = settings.font;
    let mode = settings.dialogue_type;
    let width = f64::from(surface.width());
    let name = settings.speaker.as_str();

    surface.set_fill(Rgba8::WHITE);
    match mode {
        DialogueType::Dialogue => {
            let font = FontSpec::new(lang, props.name_size as f32);
            surface.fill_text(name, &font, props.speaker_x_pos, props.speaker_y_pos)?;
        }
        DialogueType::Caption => {
            let font = FontSpec::new(lang, props.title_size as f32);
            let w = surface.measure_text(name, &font)?;
            surface.fill_text(name, &font, (width - w) / 2.0, props.title_y_pos)?;
            surface.fill_rect(Rect::new(0.0, CAPTION_RULE_Y, width, CAPTION_RULE_Y + 1.0))?;
        }
        DialogueType::Intro => {
            let font = FontSpec::new(lang, props.intro_name_size as f32);
            let outline = StrokeStyle {
                color: INTRO_INK,
                width: 8.0,
                miter_limit: 2.0,
            };
            draw_slanted_text(
                surface,
                name,
                &font,
                props.intro_name_y_pos,
                props.intro_x_pos,
                Some(outline),
            )?;

            surface.set_fill(INTRO_INK);
            let font = FontSpec::new(lang, props.intro_title_size as f32);
            let title = settings.dialogue_text.replace('\n', " ");
            return draw_slanted_text(
                surface,
                &title,
                &font,
                props.intro_title_y_pos,
                props.intro_x_pos,
                None,
            );
        }
        DialogueType::Narration | DialogueType::Full | DialogueType::Book => {}
    }

    let Some(body) = BodyLayout::for_mode(mode, props) else {
        return Ok(());
    };
    let lines: Vec<&str> = settings.dialogue_text.split('\n').collect();
    let font = FontSpec::new(lang, body.size as f32).with_weight(props.font_weight);
    let start_y = body.start_y(mode, props, f64::from(surface.height()), lines.len());

    surface.set_fill(body.fill);
    for (i, line) in lines.iter().enumerate() {
        let x = if body.centered {
            (width - surface.measure_text(&strip_annotations(line), &font)?) / 2.0
        } else {
            props.dialogue_x_pos
        };
        let y = start_y + i as f64 * body.line_height;
        draw_ruby_line(surface, line, &font, x, y)?;
    }
    tracing::trace!(%mode, lines = lines.len(), "dialogue text drawn");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/text/dialogue.rs"]
mod tests;
