use std::collections::VecDeque;

use crate::{
    foundation::error::ScreenResult,
    render::surface::{FontSpec, TextMeasurer},
    scene::settings::{DialogueType, Language},
    text::{
        layout_table::TextProperties,
        markup::{atomic_units, split_tokens, strip_annotations},
    },
};

/// Greedy word wrap of dialogue text for `mode`.
///
/// Tokens are separated by whitespace runs and re-joined with single spaces; annotations are
/// never split. A token too wide for a line on its own is broken between atomic units (single
/// characters or whole annotations). Widths are measured on annotation-stripped text with the
/// same font the renderer will use.
pub fn wrap_lines(
    text: &str,
    mode: DialogueType,
    language: Language,
    props: &TextProperties,
    canvas_width: f64,
    measurer: &mut impl TextMeasurer,
) -> ScreenResult<String> {
    let font = FontSpec::new(language, props.body_size(mode) as f32).with_weight(props.font_weight);
    let max_width = props.max_line_width(canvas_width);
    let mut fits = |s: &str| -> ScreenResult<bool> {
        Ok(measurer.measure_text(&strip_annotations(s), &font)? <= max_width)
    };

    let mut tokens: VecDeque<String> = split_tokens(text).into_iter().map(String::from).collect();
    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    while let Some(token) = tokens.pop_front() {
        let candidate = if current.is_empty() {
            token.clone()
        } else {
            format!("{} {token}", current.join(" "))
        };
        if fits(&candidate)? {
            current.push(token);
            continue;
        }
        if !current.is_empty() {
            lines.push(current.join(" "));
            current.clear();
            tokens.push_front(token);
            continue;
        }

        // the token alone is too wide: break it between units
        let units = atomic_units(&token);
        let mut fragment = String::new();
        let mut remainder = None;
        for (i, unit) in units.iter().enumerate() {
            let candidate = format!("{fragment}{unit}");
            if fits(&candidate)? {
                fragment = candidate;
            } else if fragment.is_empty() {
                // a single unit wider than the line still gets a line of its own
                lines.push(candidate);
            } else {
                lines.push(std::mem::take(&mut fragment));
                remainder = Some(units[i..].concat());
                break;
            }
        }
        match remainder {
            Some(rest) => tokens.push_front(rest),
            None if !fragment.is_empty() => current.push(fragment),
            None => {}
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    tracing::trace!(%mode, %language, lines = lines.len(), "wrapped dialogue");
    Ok(lines.join("\n"))
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
