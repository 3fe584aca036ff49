//! The particle simulation surface the view feeds and positions.
//!
//! Particle advection itself lives behind [`SimulationSurface`]: the
//! implementation reads the vector field texture, moves its particles by
//! `dt` seconds each frame, and hands back a texture with the rendered
//! particle layer. This crate only prepares its inputs, sizes it, and
//! drives it.

use crate::textures::{FieldTexture, GradientTexture};

/// A GPU particle surface driven by a vector field.
pub trait SimulationSurface {
    /// Render context needed to touch GPU resources.
    type Context;
    /// Texture handle produced each frame, bound to the display quad.
    type Texture;

    /// The vector field input. Writers replace its pixels and mark it dirty.
    fn vector_field_texture(&mut self) -> &mut FieldTexture;

    /// Particle grid density along each axis.
    fn set_particle_density(&mut self, x: u32, y: u32);

    /// Working resolution of the simulation. Reallocates when it changes.
    fn resize(&mut self, width: u32, height: u32);

    /// Advance the particles by `dt` seconds and return the output texture.
    fn update(&mut self, context: &Self::Context, dt: f32) -> Self::Texture;

    /// Speed color lookup, or `None` for a flat tint.
    fn set_gradient_texture(&mut self, gradient: Option<&GradientTexture>);

    /// Release GPU resources.
    fn dispose(&mut self, context: &Self::Context);
}
