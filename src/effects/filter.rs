//! CSS-style filter expressions applied to a single layer draw.
//!
//! The accepted syntax is the subset produced by the editor's filter panel: a whitespace
//! separated list of filter functions, e.g. `"blur(4px) hue-rotate(90deg) url(#flashback)"`.

use std::{fmt, str::FromStr};

use crate::{
    assets::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    effects::blur::gaussian_blur_premul,
    foundation::core::Rgba8,
    foundation::error::{ScreenError, ScreenResult},
    render::composite::over_in_place,
};

/// One filter function.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterOp {
    /// Gaussian blur with the given standard deviation in pixels.
    Blur {
        /// Standard deviation in pixels.
        radius_px: f32,
    },
    /// Linear multiplier on color channels.
    Brightness(f32),
    /// Contrast around mid-gray.
    Contrast(f32),
    /// Desaturation amount in `0..=1`.
    Grayscale(f32),
    /// Inversion amount in `0..=1`.
    Invert(f32),
    /// Alpha multiplier in `0..=1`.
    Opacity(f32),
    /// Saturation multiplier (`1` is identity).
    Saturate(f32),
    /// Sepia amount in `0..=1`.
    Sepia(f32),
    /// Hue rotation in degrees.
    HueRotate {
        /// Rotation angle in degrees.
        degrees: f32,
    },
    /// Offset, blurred, tinted copy of the alpha drawn beneath the content.
    DropShadow {
        /// Horizontal offset in pixels.
        offset_x: f32,
        /// Vertical offset in pixels.
        offset_y: f32,
        /// Blur radius in pixels (twice the standard deviation).
        blur_px: f32,
        /// Shadow color.
        color: Rgba8,
    },
    /// Sepia-toned desaturation preset referenced as `url(#flashback)`.
    Flashback,
}

/// Ordered list of filter functions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterChain {
    ops: Vec<FilterOp>,
}

impl FilterChain {
    /// Chain from explicit operations.
    pub fn new(ops: Vec<FilterOp>) -> Self {
        Self { ops }
    }

    /// Operations in application order.
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// `true` when applying the chain is a no-op.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Parse `input`, logging and discarding it when malformed, like a canvas ignores an
    /// invalid `filter` value.
    pub fn parse_lenient(input: &str) -> Option<Self> {
        match input.parse::<FilterChain>() {
            Ok(chain) if chain.is_empty() => None,
            Ok(chain) => Some(chain),
            Err(err) => {
                tracing::warn!(filter = input, error = %err, "ignoring invalid filter");
                None
            }
        }
    }

    /// Apply every operation, in order, to a premultiplied RGBA8 buffer.
    pub fn apply_premul(&self, data: &mut [u8], width: u32, height: u32) -> ScreenResult<()> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(ScreenError::render(
                "filter buffer does not match width*height*4",
            ));
        }
        for op in &self.ops {
            apply_op(op, data, width, height)?;
        }
        Ok(())
    }
}

impl FromStr for FilterChain {
    type Err = ScreenError;

    fn from_str(input: &str) -> ScreenResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::default());
        }
        let ops = split_functions(trimmed)?
            .into_iter()
            .map(|(name, args)| parse_function(&name, args))
            .collect::<ScreenResult<Vec<_>>>()?;
        Ok(Self { ops })
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return f.write_str("none");
        }
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match op {
                FilterOp::Blur { radius_px } => write!(f, "blur({radius_px}px)")?,
                FilterOp::Brightness(v) => write!(f, "brightness({v})")?,
                FilterOp::Contrast(v) => write!(f, "contrast({v})")?,
                FilterOp::Grayscale(v) => write!(f, "grayscale({v})")?,
                FilterOp::Invert(v) => write!(f, "invert({v})")?,
                FilterOp::Opacity(v) => write!(f, "opacity({v})")?,
                FilterOp::Saturate(v) => write!(f, "saturate({v})")?,
                FilterOp::Sepia(v) => write!(f, "sepia({v})")?,
                FilterOp::HueRotate { degrees } => write!(f, "hue-rotate({degrees}deg)")?,
                FilterOp::DropShadow {
                    offset_x,
                    offset_y,
                    blur_px,
                    color,
                } => write!(
                    f,
                    "drop-shadow({offset_x}px {offset_y}px {blur_px}px #{:02x}{:02x}{:02x}{:02x})",
                    color.r, color.g, color.b, color.a
                )?,
                FilterOp::Flashback => f.write_str("url(#flashback)")?,
            }
        }
        Ok(())
    }
}

impl serde::Serialize for FilterChain {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for FilterChain {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Split `name(args) name(args) ...` honoring nested parentheses inside arguments.
fn split_functions(input: &str) -> ScreenResult<Vec<(String, &str)>> {
    let mut out = Vec::new();
    let mut rest = input.trim_start();
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| ScreenError::validation(format!("expected '(' in filter '{input}'")))?;
        let name = rest[..open].trim().to_ascii_lowercase();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
            return Err(ScreenError::validation(format!(
                "invalid filter function name '{name}'"
            )));
        }

        let mut depth = 0usize;
        let mut close = None;
        for (i, c) in rest[open..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let close = close.ok_or_else(|| {
            ScreenError::validation(format!("unbalanced parentheses in filter '{input}'"))
        })?;
        out.push((name, rest[open + 1..close].trim()));
        rest = rest[close + 1..].trim_start();
    }
    Ok(out)
}

fn parse_function(name: &str, args: &str) -> ScreenResult<FilterOp> {
    let op = match name {
        "blur" => FilterOp::Blur {
            radius_px: if args.is_empty() { 0.0 } else { parse_length(args)? },
        },
        "brightness" => FilterOp::Brightness(parse_amount(args, None)?),
        "contrast" => FilterOp::Contrast(parse_amount(args, None)?),
        "grayscale" => FilterOp::Grayscale(parse_amount(args, Some(1.0))?),
        "invert" => FilterOp::Invert(parse_amount(args, Some(1.0))?),
        "opacity" => FilterOp::Opacity(parse_amount(args, Some(1.0))?),
        "saturate" => FilterOp::Saturate(parse_amount(args, None)?),
        "sepia" => FilterOp::Sepia(parse_amount(args, Some(1.0))?),
        "hue-rotate" => FilterOp::HueRotate {
            degrees: if args.is_empty() { 0.0 } else { parse_angle(args)? },
        },
        "drop-shadow" => parse_drop_shadow(args)?,
        "url" => {
            let target = args.trim_matches(|c| c == '"' || c == '\'');
            if target == "#flashback" {
                FilterOp::Flashback
            } else {
                return Err(ScreenError::validation(format!(
                    "unknown filter reference '{target}'"
                )));
            }
        }
        other => {
            return Err(ScreenError::validation(format!(
                "unknown filter function '{other}'"
            )));
        }
    };
    Ok(op)
}

fn parse_number(s: &str) -> ScreenResult<f32> {
    let v: f32 = s
        .trim()
        .parse()
        .map_err(|_| ScreenError::validation(format!("invalid number '{s}'")))?;
    if !v.is_finite() {
        return Err(ScreenError::validation(format!("number '{s}' must be finite")));
    }
    Ok(v)
}

fn parse_length(s: &str) -> ScreenResult<f32> {
    let s = s.trim();
    match s.strip_suffix("px") {
        Some(n) => parse_number(n),
        None if parse_number(s)? == 0.0 => Ok(0.0),
        None => Err(ScreenError::validation(format!(
            "length '{s}' must use px units"
        ))),
    }
}

/// Number or percentage; negative values are invalid. Missing argument means `1`.
fn parse_amount(s: &str, max: Option<f32>) -> ScreenResult<f32> {
    let s = s.trim();
    let v = if s.is_empty() {
        1.0
    } else if let Some(pct) = s.strip_suffix('%') {
        parse_number(pct)? / 100.0
    } else {
        parse_number(s)?
    };
    if v < 0.0 {
        return Err(ScreenError::validation(format!(
            "filter amount '{s}' must be >= 0"
        )));
    }
    Ok(match max {
        Some(m) => v.min(m),
        None => v,
    })
}

fn parse_angle(s: &str) -> ScreenResult<f32> {
    let s = s.trim();
    if let Some(n) = s.strip_suffix("deg") {
        parse_number(n)
    } else if let Some(n) = s.strip_suffix("grad") {
        Ok(parse_number(n)? * 0.9)
    } else if let Some(n) = s.strip_suffix("rad") {
        Ok(parse_number(n)?.to_degrees())
    } else if let Some(n) = s.strip_suffix("turn") {
        Ok(parse_number(n)? * 360.0)
    } else if parse_number(s)? == 0.0 {
        Ok(0.0)
    } else {
        Err(ScreenError::validation(format!("angle '{s}' needs a unit")))
    }
}

fn parse_drop_shadow(args: &str) -> ScreenResult<FilterOp> {
    let mut lengths = Vec::new();
    let mut color = None;
    for token in split_top_level_whitespace(args) {
        let starts_numeric = token
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+' || c == '.');
        if starts_numeric {
            lengths.push(parse_length(token)?);
        } else if color.is_none() {
            color = Some(Rgba8::parse_css(token)?);
        } else {
            return Err(ScreenError::validation(format!(
                "drop-shadow has more than one color: '{args}'"
            )));
        }
    }
    let (offset_x, offset_y, blur_px) = match lengths.as_slice() {
        [x, y] => (*x, *y, 0.0),
        [x, y, b] if *b >= 0.0 => (*x, *y, *b),
        _ => {
            return Err(ScreenError::validation(format!(
                "drop-shadow expects 2 or 3 lengths: '{args}'"
            )));
        }
    };
    Ok(FilterOp::DropShadow {
        offset_x,
        offset_y,
        blur_px,
        color: color.unwrap_or(Rgba8::BLACK),
    })
}

fn split_top_level_whitespace(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(st) = start.take() {
                    out.push(&s[st..i]);
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(st) = start {
        out.push(&s[st..]);
    }
    out
}

type Matrix3 = [[f32; 3]; 3];

fn saturate_matrix(s: f32) -> Matrix3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn grayscale_matrix(amount: f32) -> Matrix3 {
    let s = 1.0 - amount;
    [
        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
    ]
}

fn sepia_matrix(amount: f32) -> Matrix3 {
    let s = 1.0 - amount;
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> Matrix3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

const FLASHBACK_TINT: [f32; 3] = [0.929, 0.757, 0.675];

fn apply_op(op: &FilterOp, data: &mut [u8], width: u32, height: u32) -> ScreenResult<()> {
    match *op {
        FilterOp::Blur { radius_px } => {
            let blurred = gaussian_blur_premul(data, width, height, radius_px)?;
            data.copy_from_slice(&blurred);
        }
        FilterOp::Opacity(a) => {
            let mul = (a.clamp(0.0, 1.0) * 255.0).round() as u16;
            for c in data.iter_mut() {
                *c = ((u16::from(*c) * mul + 127) / 255) as u8;
            }
        }
        FilterOp::Brightness(b) => map_rgb(data, |c| c.map(|v| v * b)),
        FilterOp::Contrast(k) => map_rgb(data, |c| c.map(|v| (v - 0.5) * k + 0.5)),
        FilterOp::Invert(a) => map_rgb(data, |c| c.map(|v| a + v * (1.0 - 2.0 * a))),
        FilterOp::Grayscale(a) => apply_matrix(data, &grayscale_matrix(a)),
        FilterOp::Sepia(a) => apply_matrix(data, &sepia_matrix(a)),
        FilterOp::Saturate(s) => apply_matrix(data, &saturate_matrix(s)),
        FilterOp::HueRotate { degrees } => apply_matrix(data, &hue_rotate_matrix(degrees)),
        FilterOp::Flashback => {
            let gray = saturate_matrix(0.0);
            map_rgb(data, |c| {
                let g = mul_matrix(&gray, c);
                [
                    g[0] * FLASHBACK_TINT[0],
                    g[1] * FLASHBACK_TINT[1],
                    g[2] * FLASHBACK_TINT[2],
                ]
            });
        }
        FilterOp::DropShadow {
            offset_x,
            offset_y,
            blur_px,
            color,
        } => {
            let mut shadow = shadow_from_alpha(data, width, height, color, offset_x, offset_y);
            if blur_px > 0.0 {
                shadow = gaussian_blur_premul(&shadow, width, height, blur_px / 2.0)?;
            }
            over_in_place(&mut shadow, data, 1.0)?;
            data.copy_from_slice(&shadow);
        }
    }
    Ok(())
}

/// Tinted copy of `src`'s alpha, shifted by the (rounded) offset.
pub(crate) fn shadow_from_alpha(
    src: &[u8],
    width: u32,
    height: u32,
    color: Rgba8,
    offset_x: f32,
    offset_y: f32,
) -> Vec<u8> {
    let tint = color.premultiplied();
    let (w, h) = (width as i64, height as i64);
    let (dx, dy) = (offset_x.round() as i64, offset_y.round() as i64);
    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        for x in 0..w {
            let sx = x - dx;
            if sx < 0 || sx >= w {
                continue;
            }
            let a = u16::from(src[((sy * w + sx) * 4 + 3) as usize]);
            if a == 0 {
                continue;
            }
            let o = ((y * w + x) * 4) as usize;
            for c in 0..4 {
                out[o + c] = ((u16::from(tint[c]) * a + 127) / 255) as u8;
            }
        }
    }
    out
}

fn mul_matrix(m: &Matrix3, c: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * c[0] + m[0][1] * c[1] + m[0][2] * c[2],
        m[1][0] * c[0] + m[1][1] * c[1] + m[1][2] * c[2],
        m[2][0] * c[0] + m[2][1] * c[1] + m[2][2] * c[2],
    ]
}

fn apply_matrix(data: &mut [u8], m: &Matrix3) {
    map_rgb(data, |c| mul_matrix(m, c));
}

/// Run `f` on straight-alpha RGB in `0..=1`, writing back premultiplied clamped values.
fn map_rgb(data: &mut [u8], f: impl Fn([f32; 3]) -> [f32; 3]) {
    unpremultiply_rgba8_in_place(data);
    for px in data.chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let c = [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        ];
        let out = f(c);
        for (dst, v) in px.iter_mut().zip(out) {
            *dst = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
    premultiply_rgba8_in_place(data);
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
