//! Dialogue text: ruby markup, per-language layout, wrapping and placement.

/// Speaker name and body placement per presentation mode.
pub mod dialogue;
/// Per-language text metrics.
pub mod layout_table;
/// Ruby annotation markup.
pub mod markup;
/// Drawing lines with furigana and slanted intro text.
pub mod ruby;
/// Greedy line wrapping.
pub mod wrap;
