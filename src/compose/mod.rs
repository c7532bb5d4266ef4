//! Assembling a complete dialogue screen.

/// Chrome textures per presentation mode.
pub mod chrome;
/// The render entry point and its in-flight guard.
pub mod composer;
/// Emotion icon placement.
pub mod emotion;
/// Placing one image layer.
pub mod layer;
