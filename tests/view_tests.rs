//! Integration tests for the flow view lifecycle.
//!
//! A recording surface stands in for the GPU particle simulation so the
//! tests can check exactly what the view pushed to it and when.

use std::time::{Duration, Instant};

use glam::{DVec2, UVec2, Vec2, Vec3};
use vecflow::prelude::*;
use vecflow::{DriverState, ViewError};

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Density(u32, u32),
    Resize(u32, u32),
    Update(f32),
    Gradient(bool),
    Dispose,
}

#[derive(Default)]
struct RecordingSurface {
    field: FieldTexture,
    calls: Vec<Call>,
    frames: u32,
}

impl RecordingSurface {
    fn updates(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Update(_))).count()
    }

    fn last_gradient(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Gradient(g) => Some(*g),
            _ => None,
        })
    }

    fn last_resize(&self) -> Option<(u32, u32)> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Resize(w, h) => Some((*w, *h)),
            _ => None,
        })
    }
}

/// Render context handle; the id lets tests tell contexts apart.
#[derive(Debug, PartialEq)]
struct Context(u32);

impl SimulationSurface for RecordingSurface {
    type Context = Context;
    type Texture = u32;

    fn vector_field_texture(&mut self) -> &mut FieldTexture {
        &mut self.field
    }

    fn set_particle_density(&mut self, x: u32, y: u32) {
        self.calls.push(Call::Density(x, y));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Resize(width, height));
    }

    fn update(&mut self, _context: &Context, dt: f32) -> u32 {
        self.calls.push(Call::Update(dt));
        self.frames += 1;
        self.frames
    }

    fn set_gradient_texture(&mut self, gradient: Option<&GradientTexture>) {
        self.calls.push(Call::Gradient(gradient.is_some()));
    }

    fn dispose(&mut self, _context: &Context) {
        self.calls.push(Call::Dispose);
    }
}

/// Corners of the unit square with a vector pointing a different way at each.
fn unit_square() -> FieldData {
    vec![
        Sample::new(0.0, 0.0, 1.0, 0.0),
        Sample::new(1.0, 0.0, 0.0, 1.0),
        Sample::new(0.0, 1.0, -1.0, 0.0),
        Sample::new(1.0, 1.0, 0.0, -1.0),
    ]
    .into_iter()
    .collect()
}

/// Data y up, screen y down, `scale` pixels per unit, offset by `origin`.
fn projector(scale: f32, origin: Vec2, viewport_height: f32) -> impl Fn(DVec2) -> Vec2 {
    move |p: DVec2| {
        Vec2::new(
            origin.x + p.x as f32 * scale,
            viewport_height - (origin.y + p.y as f32 * scale),
        )
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ============================================================================
// Render
// ============================================================================

#[test]
fn test_render_pushes_field_placement_and_style() {
    let t0 = Instant::now();
    let viewport = Viewport::new(800.0, 600.0);
    let mut view = FlowView::new(RecordingSurface::default());
    let style = FlowStyle::new()
        .with_color(Color::rgba(1.0, 0.0, 0.0, 1.0))
        .with_opacity(0.5)
        .with_particle_density(64);

    view.render(&unit_square(), &style, &projector(100.0, Vec2::new(50.0, 50.0), 600.0), viewport, t0)
        .unwrap();

    let surface = view.surface();
    assert!(surface.field.is_dirty());
    assert_eq!((surface.field.width(), surface.field.height()), (2, 2));
    assert_eq!(&surface.field.pixels()[..2], &[1.0, 0.5]);

    assert!(surface.calls.contains(&Call::Density(64, 64)));
    assert!(surface.calls.contains(&Call::Gradient(false)));
    assert_eq!(surface.last_resize(), Some((100, 100)));

    let quad = &view.scene().quad;
    assert_eq!(quad.position, Vec3::new(100.0, 100.0, 0.0));
    assert_eq!(quad.scale, Vec3::new(50.0, 50.0, 1.0));
    assert_eq!(quad.material.color, Color::rgba(1.0, 0.0, 0.0, 0.5));
    assert_eq!(view.driver_state(), DriverState::Running);
}

#[test]
fn test_render_with_gradient_stops() {
    let mut view = FlowView::new(RecordingSurface::default());
    let style = FlowStyle::new()
        .with_stop(0.0, Color::rgba(0.0, 0.0, 1.0, 1.0))
        .with_stop(1.0, Color::rgba(1.0, 0.0, 0.0, 1.0));

    view.render(
        &unit_square(),
        &style,
        &projector(10.0, Vec2::ZERO, 100.0),
        Viewport::new(100.0, 100.0),
        Instant::now(),
    )
    .unwrap();

    assert!(view.surface().calls.contains(&Call::Gradient(true)));
    let gradient = view.gradient().unwrap();
    assert_eq!((gradient.width(), gradient.height()), (200, 1));

    // Rendering again without stops falls back to the flat tint.
    view.render(
        &unit_square(),
        &FlowStyle::new(),
        &projector(10.0, Vec2::ZERO, 100.0),
        Viewport::new(100.0, 100.0),
        Instant::now(),
    )
    .unwrap();
    assert!(view.gradient().is_none());
    assert_eq!(view.surface().last_gradient(), Some(false));
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_update_layout_before_render_is_noop() {
    let mut view = FlowView::new(RecordingSurface::default());
    view.update_layout(&projector(1.0, Vec2::ZERO, 10.0), Viewport::new(10.0, 10.0));
    assert!(view.placement().is_none());
    assert!(view.surface().calls.is_empty());
}

#[test]
fn test_update_layout_follows_zoom() {
    let mut view = FlowView::new(RecordingSurface::default());
    let viewport = Viewport::new(800.0, 600.0);
    view.render(&unit_square(), &FlowStyle::new(), &projector(100.0, Vec2::ZERO, 600.0), viewport, Instant::now())
        .unwrap();
    let calls_before = view.surface().calls.len();

    // Zoom in 50x: the on-screen region grows past the simulation limit.
    view.update_layout(&projector(5000.0, Vec2::ZERO, 600.0), viewport);

    let placement = view.placement().unwrap();
    assert_eq!(placement.half_extent, Vec2::new(2500.0, 2500.0));
    assert_eq!(placement.resolution, UVec2::new(4096, 4096));
    assert_eq!(view.surface().last_resize(), Some((4096, 4096)));
    // Layout does not touch the field, gradient or density.
    let new_calls = &view.surface().calls[calls_before..];
    assert_eq!(new_calls, &[Call::Resize(4096, 4096)]);
}

// ============================================================================
// Frame Driving
// ============================================================================

#[test]
fn test_frames_before_context_are_pending() {
    let t0 = Instant::now();
    let mut view = FlowView::new(RecordingSurface::default());
    view.render(&unit_square(), &FlowStyle::new(), &projector(10.0, Vec2::ZERO, 100.0), Viewport::new(100.0, 100.0), t0)
        .unwrap();

    assert!(matches!(view.frame(t0 + ms(16)), TickOutcome::Pending { .. }));
    assert_eq!(view.surface().updates(), 0);

    view.after_render(Context(1));
    assert_eq!(view.context(), Some(&Context(1)));
    match view.frame(t0 + ms(32)) {
        TickOutcome::Advanced { dt } => assert!((dt - 0.016).abs() < 1e-6),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(view.scene().quad.material.diffuse_map, Some(1));
}

#[test]
fn test_rerender_leaves_one_active_driver() {
    let t0 = Instant::now();
    let mut view = FlowView::new(RecordingSurface::default());
    view.after_render(Context(1));
    let p = projector(10.0, Vec2::ZERO, 100.0);
    let viewport = Viewport::new(100.0, 100.0);

    view.render(&unit_square(), &FlowStyle::new(), &p, viewport, t0).unwrap();
    view.render(&unit_square(), &FlowStyle::new(), &p, viewport, t0 + ms(4)).unwrap();

    view.frame(t0 + ms(20));
    assert_eq!(view.surface().updates(), 1);
    view.frame(t0 + ms(36));
    assert_eq!(view.surface().updates(), 2);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_remove_stops_frames_and_is_reusable() {
    let t0 = Instant::now();
    let mut view = FlowView::new(RecordingSurface::default());
    view.after_render(Context(1));
    let p = projector(10.0, Vec2::ZERO, 100.0);
    let viewport = Viewport::new(100.0, 100.0);
    view.render(&unit_square(), &FlowStyle::new(), &p, viewport, t0).unwrap();
    view.frame(t0 + ms(16));

    view.remove();
    view.remove();
    assert!(!view.scene().is_attached());
    assert_eq!(view.frame(t0 + ms(32)), TickOutcome::Stopped);
    assert_eq!(view.surface().updates(), 1);

    view.render(&unit_square(), &FlowStyle::new(), &p, viewport, t0 + ms(40)).unwrap();
    assert!(view.scene().is_attached());
    assert!(matches!(view.frame(t0 + ms(56)), TickOutcome::Advanced { .. }));
}

#[test]
fn test_dispose_releases_once_and_blocks_render() {
    let t0 = Instant::now();
    let mut view = FlowView::new(RecordingSurface::default());
    view.after_render(Context(7));
    let p = projector(10.0, Vec2::ZERO, 100.0);
    let viewport = Viewport::new(100.0, 100.0);
    view.render(&unit_square(), &FlowStyle::new(), &p, viewport, t0).unwrap();

    view.dispose();
    view.dispose();
    let disposals = view.surface().calls.iter().filter(|c| **c == Call::Dispose).count();
    assert_eq!(disposals, 1);
    assert!(view.is_disposed());

    assert_eq!(view.frame(t0 + ms(16)), TickOutcome::Stopped);
    assert_eq!(
        view.render(&unit_square(), &FlowStyle::new(), &p, viewport, t0),
        Err(ViewError::Disposed)
    );
}

#[test]
fn test_dispose_without_context_skips_surface_release() {
    let mut view = FlowView::new(RecordingSurface::default());
    view.dispose();
    assert!(!view.surface().calls.contains(&Call::Dispose));
}
