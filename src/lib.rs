//! # vecflow - Vector field particle flow
//!
//! Renders a 2D vector field (wind, ocean currents, any flow data) as a layer
//! of moving particles over a host coordinate system.
//!
//! vecflow handles the parts around the particle simulation: turning
//! scattered samples into a field texture, baking the speed color gradient,
//! keeping the simulation quad aligned with the current pan/zoom, and driving
//! the simulation once per display frame. The particle advection itself is
//! supplied by a [`SimulationSurface`] implementation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Instant;
//! use vecflow::prelude::*;
//!
//! let data: FieldData = samples.into_iter().collect();
//! let style = FlowStyle::new()
//!     .with_opacity(0.8)
//!     .with_stop(0.0, Color::parse("#313695")?)
//!     .with_stop(20.0, Color::parse("#a50026")?);
//!
//! let mut view = FlowView::new(my_surface);
//! view.render(&data, &style, &projector, Viewport::new(800.0, 600.0), Instant::now())?;
//!
//! // Once the render target exists:
//! view.after_render(render_context);
//!
//! // Every display frame:
//! view.frame(Instant::now());
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Scattered samples -> field grid | [`raster`] |
//! | Color stops -> lookup strip | [`gradient`] |
//! | Data bounds -> screen quad | [`placement`] |
//! | Frame loop | [`driver`] |
//! | Lifecycle | [`view`] |

pub mod data;
pub mod driver;
pub mod error;
pub mod gpu;
pub mod gradient;
pub mod placement;
pub mod raster;
pub mod scene;
pub mod style;
pub mod surface;
pub mod textures;
pub mod time;
pub mod view;

pub use bytemuck;
pub use data::{DataBounds, Dim, Extent, FieldData, MagnitudeExtent, Sample};
pub use driver::{DriverState, FrameDriver, TickOutcome};
pub use error::{DataError, GpuError, StyleError, ViewError};
pub use glam::{DVec2, UVec2, Vec2, Vec3};
pub use gradient::{encode_gradient, Color, ColorStop};
pub use placement::{compute_placement, Placement, Projector, Viewport};
pub use raster::{rasterize, FieldGrid, FieldRaster};
pub use scene::{OrthoCamera, Quad, QuadMaterial, Scene};
pub use style::FlowStyle;
pub use surface::SimulationSurface;
pub use textures::{AddressMode, FieldTexture, FilterMode, GradientTexture};
pub use view::FlowView;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use vecflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::data::{Dim, FieldData, Sample};
    pub use crate::driver::TickOutcome;
    pub use crate::gradient::{Color, ColorStop};
    pub use crate::placement::{Projector, Viewport};
    pub use crate::style::FlowStyle;
    pub use crate::surface::SimulationSurface;
    pub use crate::textures::{FieldTexture, GradientTexture};
    pub use crate::view::FlowView;
    pub use crate::{DVec2, Vec2};
}
