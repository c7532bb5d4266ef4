//! Pixel effects applied to offscreen layer buffers.

/// Separable gaussian blur over premultiplied RGBA8.
pub mod blur;
/// CSS-style filter chains.
pub mod filter;
