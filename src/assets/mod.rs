//! Image decoding and the chrome texture cache.

/// Decoding encoded images into premultiplied RGBA8.
pub mod decode;
/// Chrome texture keys, sources and the shared cache.
pub mod textures;
