//! Scanner for the inline ruby markup `(base){furigana}`.
//!
//! Unbalanced or nested markup simply does not match and stays literal text. Markup never
//! spans a line break, so every match lives on one drawn line.

use std::{borrow::Cow, ops::Range, sync::LazyLock};

use regex::Regex;

static RUBY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([^)\n]+)\)\{([^}\n]+)\}").unwrap_or_else(|e| unreachable!("ruby pattern: {e}"))
});

/// Piece of a scanned line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text drawn as-is.
    Plain(&'a str),
    /// Base text with its pronunciation guide.
    Ruby {
        /// Text in the line flow.
        base: &'a str,
        /// Small text drawn above `base`.
        furigana: &'a str,
    },
}

impl<'a> Segment<'a> {
    /// Text this segment contributes to the line flow.
    pub fn flow_text(&self) -> &'a str {
        match *self {
            Segment::Plain(s) => s,
            Segment::Ruby { base, .. } => base,
        }
    }
}

/// Split `text` into plain runs and annotations, left to right.
pub fn scan_annotations(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in RUBY.captures_iter(text) {
        let (Some(whole), Some(base), Some(furigana)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Plain(&text[last..whole.start()]));
        }
        out.push(Segment::Ruby {
            base: base.as_str(),
            furigana: furigana.as_str(),
        });
        last = whole.end();
    }
    if last < text.len() {
        out.push(Segment::Plain(&text[last..]));
    }
    out
}

/// `text` with every annotation replaced by its base text.
pub fn strip_annotations(text: &str) -> Cow<'_, str> {
    RUBY.replace_all(text, "$1")
}

/// Byte ranges of every annotation in `text`.
fn annotation_spans(text: &str) -> Vec<Range<usize>> {
    RUBY.find_iter(text).map(|m| m.range()).collect()
}

/// Smallest unsplittable pieces of `token`: one per annotation, one per other character.
pub fn atomic_units(token: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut last = 0;
    for span in annotation_spans(token) {
        units.extend(chars_of(&token[last..span.start]));
        units.push(&token[span.clone()]);
        last = span.end;
    }
    units.extend(chars_of(&token[last..]));
    units
}

fn chars_of(s: &str) -> impl Iterator<Item = &str> {
    s.char_indices().map(move |(i, c)| &s[i..i + c.len_utf8()])
}

/// Whitespace separated tokens of `text`; an annotation is never split, even when its base or
/// furigana contains whitespace.
pub fn split_tokens(text: &str) -> Vec<&str> {
    let spans = annotation_spans(text);
    let mut spans = spans.iter().peekable();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        if let Some(span) = spans.next_if(|s| s.start == i) {
            start.get_or_insert(i);
            // skip the rest of the annotation
            while chars.offset() < span.end {
                if chars.next().is_none() {
                    break;
                }
            }
            continue;
        }
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(&text[s..i]);
            }
        } else {
            start.get_or_insert(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

#[cfg(test)]
#[path = "../../tests/unit/text/markup.rs"]
mod tests;
