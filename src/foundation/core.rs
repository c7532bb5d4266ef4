use crate::foundation::error::{ScreenError, ScreenResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Width of the dialogue screen in pixels.
pub const CANVAS_WIDTH: u32 = 750;
/// Height of the dialogue screen in pixels.
pub const CANVAS_HEIGHT: u32 = 1334;

/// Pixel dimensions of a render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed 750x1334 dialogue screen.
    pub const SCREEN: Canvas = Canvas {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    };

    /// Center point of the canvas.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::SCREEN
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba8 = Rgba8::rgba(0, 0, 0, 0);

    /// Opaque color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from channels including alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Replace alpha with `alpha` in `0..=1`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = if alpha.is_finite() {
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            self.a
        };
        Self { a, ..self }
    }

    /// Premultiplied `[r, g, b, a]`.
    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            ((u16::from(c) * u16::from(a) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }

    /// Parse a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)`, or one of a
    /// few keywords.
    pub fn parse_css(input: &str) -> ScreenResult<Self> {
        let s = input.trim().to_ascii_lowercase();
        match s.as_str() {
            "black" => return Ok(Self::BLACK),
            "white" => return Ok(Self::WHITE),
            "transparent" => return Ok(Self::TRANSPARENT),
            _ => {}
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| {
                ScreenError::validation(format!("invalid hex color '{input}'"))
            });
        }
        let args = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ScreenError::validation(format!("unsupported color '{input}'")))?;

        let parts: Vec<&str> = args
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(ScreenError::validation(format!(
                "color '{input}' must have 3 or 4 components"
            )));
        }

        let channel = |p: &str| -> ScreenResult<u8> {
            let v: f32 = p
                .parse()
                .map_err(|_| ScreenError::validation(format!("invalid color channel '{p}'")))?;
            Ok(v.clamp(0.0, 255.0).round() as u8)
        };
        let mut out = Self::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
        if let Some(a) = parts.get(3) {
            let alpha = match a.strip_suffix('%') {
                Some(pct) => pct.parse::<f32>().map(|v| v / 100.0),
                None => a.parse::<f32>(),
            }
            .map_err(|_| ScreenError::validation(format!("invalid alpha '{a}'")))?;
            out = out.with_alpha(alpha);
        }
        Ok(out)
    }
}

fn parse_hex(hex: &str) -> Option<Rgba8> {
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Rgba8::rgb(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
        )),
        6 => Some(Rgba8::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba8::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
