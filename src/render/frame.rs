use std::{io::Cursor, path::Path};

use anyhow::Context;

use crate::{
    assets::decode::unpremultiply_rgba8_in_place,
    foundation::error::{ScreenError, ScreenResult},
};

/// Snapshot of a surface's pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent premultiplied frame.
    pub fn new_transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            premultiplied: true,
        }
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }

    /// Encode the frame as PNG bytes.
    pub fn encode_png(&self) -> ScreenResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba8())
            .ok_or_else(|| ScreenError::render("frame byte length does not match its size"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf)
    }

    /// Encode as PNG and write to `path`, creating parent directories.
    pub fn write_png(&self, path: &Path) -> ScreenResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    /// Clear `self` and fill it with `src` resampled to `self`'s declared size.
    pub fn blit_scaled_from(&mut self, src: &FrameRGBA) -> ScreenResult<()> {
        self.clear();
        if self.width == 0 || self.height == 0 || src.width == 0 || src.height == 0 {
            return Ok(());
        }
        let src_img = image::RgbaImage::from_raw(src.width, src.height, src.data.clone())
            .ok_or_else(|| ScreenError::render("source frame byte length does not match its size"))?;
        let scaled = image::imageops::resize(
            &src_img,
            self.width,
            self.height,
            image::imageops::FilterType::Triangle,
        );
        self.data = scaled.into_raw();
        self.premultiplied = src.premultiplied;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
