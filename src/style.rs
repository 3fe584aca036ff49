//! Visual style of a flow view.
//!
//! Built in code with `with_*` methods or loaded from JSON:
//!
//! ```ignore
//! let style = FlowStyle::from_json(r##"{
//!     "color": "#ffffff",
//!     "opacity": 0.8,
//!     "particle_density": 256,
//!     "gradient": [
//!         { "value": 0.0, "color": "#313695" },
//!         { "value": 20.0, "color": "rgba(165, 0, 38, 1)" }
//!     ]
//! }"##)?;
//! ```
//!
//! Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;
use crate::gradient::{Color, ColorStop, DEFAULT_GRADIENT_WIDTH};

/// Default particle grid density per axis.
pub const DEFAULT_PARTICLE_DENSITY: u32 = 128;

/// Tint, opacity, density and speed gradient of a flow view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowStyle {
    /// Base particle tint.
    pub color: Color,
    /// Multiplies the tint's alpha.
    pub opacity: f32,
    /// Particles per axis in the simulation grid.
    pub particle_density: u32,
    /// Magnitude-keyed color stops. Empty means flat tint.
    pub gradient: Vec<ColorStop>,
    /// Width of the baked gradient lookup strip.
    pub gradient_width: u32,
}

impl Default for FlowStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 1.0,
            particle_density: DEFAULT_PARTICLE_DENSITY,
            gradient: Vec::new(),
            gradient_width: DEFAULT_GRADIENT_WIDTH,
        }
    }
}

impl FlowStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a style from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a style from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StyleError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StyleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the opacity, clamped to `0.0..=1.0`.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set the particle density. Zero is raised to one.
    pub fn with_particle_density(mut self, density: u32) -> Self {
        self.particle_density = density.max(1);
        self
    }

    pub fn with_gradient(mut self, stops: Vec<ColorStop>) -> Self {
        self.gradient = stops;
        self
    }

    /// Add a single gradient stop.
    pub fn with_stop(mut self, value: f64, color: Color) -> Self {
        self.gradient.push(ColorStop::new(value, color));
        self
    }

    /// Quad tint: base color with opacity folded into alpha.
    pub fn tint(&self) -> Color {
        self.color.with_opacity(self.opacity)
    }
}
