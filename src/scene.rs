//! Scene objects owned by a flow view: the display quad and its camera.
//!
//! The simulation output is shown on a single unit quad (`[-1, 1]` in x and
//! y) scaled and translated into place. The camera is orthographic over the
//! viewport with the origin at the bottom-left, so quad positions are in
//! render pixels.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::gradient::Color;
use crate::placement::{Placement, Viewport};

/// Material of the display quad: a tint and an optional diffuse texture.
#[derive(Debug, Clone)]
pub struct QuadMaterial<T> {
    /// Multiplied with the diffuse texture (premultiplied by the renderer).
    pub color: Color,
    /// Simulation output bound as the diffuse map.
    pub diffuse_map: Option<T>,
    /// Alpha blending is required for the particle layer.
    pub transparent: bool,
}

impl<T> Default for QuadMaterial<T> {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            diffuse_map: None,
            transparent: true,
        }
    }
}

/// Unit quad positioned in render space.
#[derive(Debug, Clone)]
pub struct Quad<T> {
    pub position: Vec3,
    pub scale: Vec3,
    pub material: QuadMaterial<T>,
}

impl<T> Quad<T> {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            material: QuadMaterial::default(),
        }
    }

    /// Move and scale the quad to cover a placement.
    pub fn apply_placement(&mut self, placement: &Placement) {
        self.position = placement.center.extend(0.0);
        self.scale = placement.half_extent.extend(1.0);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(self.scale)
    }
}

impl<T> Default for Quad<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Orthographic camera spanning the viewport in render pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// Physical viewport size (CSS size times device pixel ratio).
    pub physical_size: Vec2,
}

impl OrthoCamera {
    pub fn new() -> Self {
        Self {
            left: 0.0,
            right: 1.0,
            bottom: 0.0,
            top: 1.0,
            near: 0.0,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 10.0),
            physical_size: Vec2::ONE,
        }
    }

    /// Fit the camera to a viewport.
    pub fn fit(&mut self, viewport: &Viewport) {
        self.left = 0.0;
        self.bottom = 0.0;
        self.right = viewport.width;
        self.top = viewport.height;
        self.near = 0.0;
        self.far = 100.0;
        self.position.z = 10.0;
        self.physical_size =
            Vec2::new(viewport.width, viewport.height) * viewport.device_pixel_ratio;
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Clip-space position of a render-space point.
    pub fn to_clip(&self, point: Vec3) -> Vec4 {
        self.view_projection() * point.extend(1.0)
    }
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene group holding the display quad.
///
/// Detaching keeps the objects alive so the view can attach them again.
#[derive(Debug, Clone)]
pub struct Scene<T> {
    pub quad: Quad<T>,
    pub camera: OrthoCamera,
    attached: bool,
}

impl<T> Scene<T> {
    pub fn new() -> Self {
        Self {
            quad: Quad::new(),
            camera: OrthoCamera::new(),
            attached: true,
        }
    }

    /// Whether the quad is part of the rendered scene.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Remove the quad from the rendered scene and unbind its texture.
    pub fn detach(&mut self) {
        self.attached = false;
        self.quad.material.diffuse_map = None;
    }
}

impl<T> Default for Scene<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec2;

    #[test]
    fn test_quad_follows_placement() {
        let mut quad: Quad<()> = Quad::new();
        quad.apply_placement(&Placement {
            center: Vec2::new(100.0, 50.0),
            half_extent: Vec2::new(100.0, 50.0),
            resolution: UVec2::new(200, 100),
        });
        assert_eq!(quad.position, Vec3::new(100.0, 50.0, 0.0));
        assert_eq!(quad.scale, Vec3::new(100.0, 50.0, 1.0));

        // Unit quad corner (1, 1) lands on the placement's top-right.
        let corner = quad.model_matrix() * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert_eq!(corner.truncate(), Vec3::new(200.0, 100.0, 0.0));
    }

    #[test]
    fn test_camera_maps_viewport_to_clip() {
        let mut camera = OrthoCamera::new();
        camera.fit(&Viewport::new(800.0, 600.0).with_device_pixel_ratio(2.0));
        assert_eq!(camera.physical_size, Vec2::new(1600.0, 1200.0));

        let bottom_left = camera.to_clip(Vec3::ZERO);
        let top_right = camera.to_clip(Vec3::new(800.0, 600.0, 0.0));
        assert!((bottom_left.x + 1.0).abs() < 1e-5 && (bottom_left.y + 1.0).abs() < 1e-5);
        assert!((top_right.x - 1.0).abs() < 1e-5 && (top_right.y - 1.0).abs() < 1e-5);
        // Quad plane at z = 0 sits between near and far.
        assert!(bottom_left.z >= 0.0 && bottom_left.z <= 1.0);
    }

    #[test]
    fn test_detach_unbinds_and_reattaches() {
        let mut scene: Scene<u32> = Scene::new();
        scene.quad.material.diffuse_map = Some(7);
        scene.detach();
        assert!(!scene.is_attached());
        assert!(scene.quad.material.diffuse_map.is_none());
        scene.attach();
        assert!(scene.is_attached());
    }
}
