//! The flow view: ties rasterizing, placement, gradients and frame driving
//! to the host's lifecycle events.
//!
//! | Host event | Method | Work |
//! |------------|--------|------|
//! | view created | [`FlowView::new`] | scene objects, surface (no context yet) |
//! | new data / style | [`FlowView::render`] | rasterize, place, gradient, re-arm driver |
//! | resize, pan, zoom | [`FlowView::update_layout`] | place only |
//! | render target ready | [`FlowView::after_render`] | store the render context |
//! | display frame | [`FlowView::frame`] | advance surface, rebind output |
//! | view removed | [`FlowView::remove`] | stop driver, detach quad (reusable) |
//! | view destroyed | [`FlowView::dispose`] | also release surface GPU resources |
//!
//! `render` finishes all of its work before returning, so the next frame
//! never sees a half-updated field.

use std::time::Instant;

use crate::data::{DataBounds, FieldData};
use crate::driver::{DriverState, FrameDriver, TickOutcome};
use crate::error::ViewError;
use crate::gradient::encode_gradient;
use crate::placement::{compute_placement, Placement, Projector, Viewport};
use crate::raster::{rasterize, FieldGrid};
use crate::scene::Scene;
use crate::style::FlowStyle;
use crate::surface::SimulationSurface;
use crate::textures::GradientTexture;

/// Renders a vector field dataset as animated particles on a quad.
pub struct FlowView<S: SimulationSurface> {
    surface: S,
    scene: Scene<S::Texture>,
    driver: FrameDriver,
    context: Option<S::Context>,
    gradient: Option<GradientTexture>,
    bounds: Option<DataBounds>,
    placement: Option<Placement>,
    disposed: bool,
}

impl<S: SimulationSurface> FlowView<S> {
    /// Create the view's scene objects around a surface that has no render
    /// context yet.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            scene: Scene::new(),
            driver: FrameDriver::new(),
            context: None,
            gradient: None,
            bounds: None,
            placement: None,
            disposed: false,
        }
    }

    /// Rebuild everything for a new dataset or style and restart the driver.
    pub fn render(
        &mut self,
        data: &FieldData,
        style: &FlowStyle,
        projector: &impl Projector,
        viewport: Viewport,
        now: Instant,
    ) -> Result<(), ViewError> {
        if self.disposed {
            return Err(ViewError::Disposed);
        }
        self.scene.attach();

        let raster = rasterize(data);
        self.upload_field(&raster.grid);

        let bounds = data.bounds();
        self.bounds = Some(bounds);
        self.scene.camera.fit(&viewport);
        self.place(&bounds, projector, &viewport);

        self.gradient = encode_gradient(&style.gradient, raster.magnitude, style.gradient_width);
        self.surface.set_gradient_texture(self.gradient.as_ref());

        let density = style.particle_density;
        self.surface.set_particle_density(density, density);

        self.driver.arm(now);

        self.scene.quad.material.color = style.tint();
        Ok(())
    }

    /// Re-place the quad after the viewport or coordinate transform changed.
    ///
    /// Does nothing before the first `render`.
    pub fn update_layout(&mut self, projector: &impl Projector, viewport: Viewport) {
        if self.disposed {
            return;
        }
        if let Some(bounds) = self.bounds {
            self.scene.camera.fit(&viewport);
            self.place(&bounds, projector, &viewport);
        }
    }

    /// Store the render context once the host's render target exists.
    pub fn after_render(&mut self, context: S::Context) {
        if self.disposed {
            return;
        }
        self.context = Some(context);
    }

    /// Drive one display frame.
    pub fn frame(&mut self, now: Instant) -> TickOutcome {
        self.driver.tick(
            now,
            self.context.as_ref(),
            &mut self.surface,
            &mut self.scene.quad,
        )
    }

    /// Stop animating and take the quad out of the scene. `render` brings it back.
    pub fn remove(&mut self) {
        self.driver.stop();
        self.scene.detach();
    }

    /// Remove the view and release the surface's GPU resources.
    ///
    /// Idempotent. The view cannot render afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.remove();
        if let Some(context) = self.context.take() {
            self.surface.dispose(&context);
        }
        self.disposed = true;
        log::debug!("Flow view disposed");
    }

    fn upload_field(&mut self, grid: &FieldGrid) {
        self.surface.vector_field_texture().upload_grid(grid);
    }

    fn place(&mut self, bounds: &DataBounds, projector: &impl Projector, viewport: &Viewport) {
        let placement = compute_placement(bounds, projector, viewport);
        self.scene.quad.apply_placement(&placement);
        self.surface
            .resize(placement.resolution.x, placement.resolution.y);
        self.placement = Some(placement);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scene(&self) -> &Scene<S::Texture> {
        &self.scene
    }

    /// Placement from the most recent render or layout update.
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Baked gradient lookup, if the style has stops.
    pub fn gradient(&self) -> Option<&GradientTexture> {
        self.gradient.as_ref()
    }

    pub fn context(&self) -> Option<&S::Context> {
        self.context.as_ref()
    }

    pub fn driver_state(&self) -> DriverState {
        self.driver.state()
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
