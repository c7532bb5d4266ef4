//! What to draw: render settings and the layer stack.

/// JSON scene documents.
pub mod file;
/// Image layers.
pub mod layer;
/// Render settings, presentation modes, languages and emotions.
pub mod settings;
