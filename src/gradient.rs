//! Magnitude-keyed color gradients baked into a 1D lookup texture.
//!
//! Particles are tinted by the speed of the flow under them. The host
//! describes the mapping as color stops keyed by magnitude; [`encode_gradient`]
//! remaps the stop values into the dataset's observed magnitude range and
//! renders a `K x 1` RGBA strip the particle shader can sample with
//! `normalized_speed` as the u coordinate.
//!
//! ```ignore
//! let stops = vec![
//!     ColorStop::new(0.0, Color::parse("#313695")?),
//!     ColorStop::new(15.0, Color::parse("#a50026")?),
//! ];
//! let lut = encode_gradient(&stops, magnitude, DEFAULT_GRADIENT_WIDTH);
//! ```

use std::fmt;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::data::MagnitudeExtent;
use crate::error::StyleError;
use crate::textures::GradientTexture;

/// Width in pixels of the gradient lookup strip.
pub const DEFAULT_GRADIENT_WIDTH: u32 = 200;

/// Straight-alpha RGBA color with `0.0..=1.0` channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorSpec", into = "[f32; 4]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Same color with alpha multiplied by `opacity`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity,
            ..self
        }
    }

    /// Convert to 8-bit channels, rounding and clamping.
    pub fn to_rgba8(self) -> [u8; 4] {
        self.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Linear interpolation between two colors.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Parse a CSS-style color string.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
    /// `rgba(r, g, b, a)` where `r, g, b` are `0-255` and `a` is `0-1`.
    pub fn parse(s: &str) -> Result<Self, StyleError> {
        let trimmed = s.trim();
        let invalid = || StyleError::InvalidColor(s.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            let digits: Vec<u8> = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8))
                .collect::<Option<_>>()
                .ok_or_else(invalid)?;
            let bytes: [u8; 4] = match digits.len() {
                3 => [digits[0] * 17, digits[1] * 17, digits[2] * 17, 255],
                6 | 8 => {
                    let mut out = [255u8; 4];
                    for (i, pair) in digits.chunks(2).enumerate() {
                        out[i] = pair[0] * 16 + pair[1];
                    }
                    out
                }
                _ => return Err(invalid()),
            };
            return Ok(Color::from(bytes));
        }

        let lower = trimmed.to_ascii_lowercase();
        let (body, expect_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let body = body.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<f32> = body
            .split(',')
            .map(|p| p.trim().parse::<f32>().ok())
            .collect::<Option<_>>()
            .ok_or_else(invalid)?;
        match (parts.as_slice(), expect_alpha) {
            ([r, g, b], false) => Ok(Color::rgba(r / 255.0, g / 255.0, b / 255.0, 1.0)),
            ([r, g, b, a], true) => Ok(Color::rgba(r / 255.0, g / 255.0, b / 255.0, *a)),
            _ => Err(invalid()),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<[u8; 4]> for Color {
    fn from(c: [u8; 4]) -> Self {
        Color::rgba(
            c[0] as f32 / 255.0,
            c[1] as f32 / 255.0,
            c[2] as f32 / 255.0,
            c[3] as f32 / 255.0,
        )
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Color::rgba(c[0], c[1], c[2], c[3])
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

/// Serialized forms a [`Color`] may take in a style document.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Css(String),
    Rgba([f32; 4]),
}

impl TryFrom<ColorSpec> for Color {
    type Error = StyleError;

    fn try_from(value: ColorSpec) -> Result<Self, Self::Error> {
        match value {
            ColorSpec::Css(s) => Color::parse(&s),
            ColorSpec::Rgba(c) => Ok(Color::from(c)),
        }
    }
}

/// A color pinned to a vector magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Magnitude at which `color` applies.
    pub value: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn new(value: f64, color: Color) -> Self {
        Self { value, color }
    }
}

/// Position of a stop value along the gradient strip.
///
/// `(value - min) / (max - min)` clamped into `[0, 1]`; `0` when the
/// magnitude range is empty.
pub fn stop_offset(value: f64, magnitude: MagnitudeExtent) -> f32 {
    let span = magnitude.max - magnitude.min;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    let offset = ((value - magnitude.min) / span).clamp(0.0, 1.0);
    if offset.is_nan() {
        0.0
    } else {
        offset as f32
    }
}

/// Sample a sorted `(offset, color)` list at `t`.
fn sample(stops: &[(f32, Color)], t: f32) -> Color {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Color::TRANSPARENT,
    };
    if t < first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }
    // First stop strictly beyond t; the previous one is at or before t.
    let upper = stops.partition_point(|(offset, _)| *offset <= t);
    let (lo_off, lo) = stops[upper - 1];
    let (hi_off, hi) = stops[upper];
    lo.lerp(hi, (t - lo_off) / (hi_off - lo_off))
}

/// Bake color stops into a `width x 1` lookup texture.
///
/// Returns `None` when there are no stops; the surface then tints particles
/// with the flat base color.
pub fn encode_gradient(
    stops: &[ColorStop],
    magnitude: MagnitudeExtent,
    width: u32,
) -> Option<GradientTexture> {
    if stops.is_empty() {
        return None;
    }
    let width = width.max(1);

    let mut placed: Vec<(f32, Color)> = stops
        .iter()
        .map(|stop| (stop_offset(stop.value, magnitude), stop.color))
        .collect();
    // Stable: coincident stops keep insertion order, giving a hard edge.
    placed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let image = RgbaImage::from_fn(width, 1, |x, _| {
        let t = (x as f32 + 0.5) / width as f32;
        Rgba(sample(&placed, t).to_rgba8())
    });

    Some(GradientTexture::new(image))
}
