use serde::{Deserialize, Serialize};

use crate::foundation::error::{PaintMaskError, PaintMaskResult};

pub use kurbo::{Point, Vec2};

/// Pixel extent of a painting or a raster target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Size of `width` x `height` pixels. Zero is allowed.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Like [`Size::new`] but rejects zero-area extents.
    pub fn non_empty(width: u32, height: u32) -> PaintMaskResult<Self> {
        if width == 0 || height == 0 {
            return Err(PaintMaskError::validation(format!(
                "size must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Whether either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels, saturating.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Half-open containment test: `[0,width) x [0,height)`.
    pub fn contains(self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < f64::from(self.width) && p.y < f64::from(self.height)
    }

    /// Element-wise maximum of two extents.
    pub fn max(self, other: Size) -> Size {
        Size {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// Straight-alpha color with unit-range channels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    /// Color from straight channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color with alpha 1.
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from 8-bit straight channels.
    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self {
            r: f32::from(px[0]) / 255.0,
            g: f32::from(px[1]) / 255.0,
            b: f32::from(px[2]) / 255.0,
            a: f32::from(px[3]) / 255.0,
        }
    }

    /// Every channel clamped to `[0,1]`.
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Whether every channel is finite.
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Premultiplied `[r*a, g*a, b*a, a]`.
    pub fn to_premul(self) -> [f32; 4] {
        let c = self.clamped();
        [c.r * c.a, c.g * c.a, c.b * c.a, c.a]
    }

    /// Clamp and round to 8-bit straight channels.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f32) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }

    /// `[r, g, b, a]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj {
                r: f32,
                g: f32,
                b: f32,
                #[serde(default = "one")]
                a: f32,
            },
            Arr(Vec<f32>),
        }

        fn one() -> f32 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self::new(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::new(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Self::new(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgba, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    let a = match s.len() {
        6 => 255,
        8 => hex_byte(&s[6..8])?,
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };
    Ok(Rgba::from_rgba8([
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
        a,
    ]))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
