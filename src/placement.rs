//! Placing the simulation quad on screen.
//!
//! The particle surface is drawn onto a quad that must cover exactly the
//! screen region the data occupies under the host's current coordinate
//! transform. [`compute_placement`] projects the data bounding box through a
//! [`Projector`] and derives the quad's center, half extents, and the
//! resolution the simulation should run at.
//!
//! All four corners are projected: the transform may rotate or bend space,
//! so the two extreme data corners alone do not bound the screen region.

use glam::{DVec2, UVec2, Vec2};

use crate::data::DataBounds;

/// Largest simulation texture dimension. Larger screen regions are simulated
/// at this size and stretched by the quad.
pub const MAX_SIMULATION_RESOLUTION: u32 = 4096;

/// Maps data-space points to screen pixels (origin top-left, y down).
pub trait Projector {
    fn project(&self, point: DVec2) -> Vec2;
}

impl<F> Projector for F
where
    F: Fn(DVec2) -> Vec2,
{
    fn project(&self, point: DVec2) -> Vec2 {
        self(point)
    }
}

/// Host viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_device_pixel_ratio(mut self, dpr: f32) -> Self {
        self.device_pixel_ratio = dpr;
        self
    }
}

/// Screen-space placement of the simulation quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Quad center in render space (origin bottom-left, y up).
    pub center: Vec2,
    /// Half width and half height of the quad.
    pub half_extent: Vec2,
    /// Simulation texture size, each axis in `1..=MAX_SIMULATION_RESOLUTION`.
    pub resolution: UVec2,
}

impl Placement {
    /// Screen-space rectangle `(min, max)` in render space.
    pub fn rect(&self) -> (Vec2, Vec2) {
        (self.center - self.half_extent, self.center + self.half_extent)
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn simulation_size(extent: f32) -> u32 {
    let px = finite_or_zero(extent).round().max(1.0);
    (px.min(MAX_SIMULATION_RESOLUTION as f32)) as u32
}

/// Axis-aligned screen box `(top_left, bottom_right)` around the projected corners.
pub fn projected_bounds(bounds: &DataBounds, projector: &impl Projector) -> (Vec2, Vec2) {
    let corners = bounds.corners().map(|c| projector.project(c));
    let min = corners[1..].iter().fold(corners[0], |acc, p| acc.min(*p));
    let max = corners[1..].iter().fold(corners[0], |acc, p| acc.max(*p));
    (min, max)
}

/// Derive the quad placement for `bounds` under the current projection.
pub fn compute_placement(
    bounds: &DataBounds,
    projector: &impl Projector,
    viewport: &Viewport,
) -> Placement {
    let (top_left, bottom_right) = projected_bounds(bounds, projector);

    let width = finite_or_zero(bottom_right.x - top_left.x);
    let height = finite_or_zero(bottom_right.y - top_left.y);
    let mid = (top_left + bottom_right) * 0.5;

    let center = Vec2::new(
        finite_or_zero(mid.x),
        finite_or_zero(viewport.height - mid.y),
    );
    let resolution = UVec2::new(simulation_size(width), simulation_size(height));

    if width > MAX_SIMULATION_RESOLUTION as f32 || height > MAX_SIMULATION_RESOLUTION as f32 {
        log::debug!(
            "Screen region {}x{} exceeds simulation limit, simulating at {}x{}",
            width,
            height,
            resolution.x,
            resolution.y
        );
    }

    Placement {
        center,
        half_extent: Vec2::new(width, height) * 0.5,
        resolution,
    }
}
