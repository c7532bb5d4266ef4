use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{ScreenError, ScreenResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Where the pixels came from (texture key or file path); used in logs.
    pub source: Arc<str>,
}

impl PreparedImage {
    /// Wrap already premultiplied pixels.
    pub fn from_premul(
        width: u32,
        height: u32,
        rgba8_premul: Vec<u8>,
        source: impl Into<Arc<str>>,
    ) -> ScreenResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| ScreenError::asset("image size overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(ScreenError::asset(format!(
                "image byte length {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            source: source.into(),
        })
    }

    /// Natural size as floating point `(width, height)`.
    pub fn natural_size(&self) -> (f64, f64) {
        (f64::from(self.width), f64::from(self.height))
    }
}

/// Decode encoded image bytes (PNG, JPEG, WebP, ...) and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8], source: &str) -> ScreenResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .with_context(|| format!("decode image '{source}' from memory"))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
        source: Arc::from(source),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
