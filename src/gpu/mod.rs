//! wgpu realisation of the GPU resource layer.
//!
//! The core view is GPU-agnostic; these types are what a wgpu-based
//! [`SimulationSurface`](crate::surface::SimulationSurface) uses to turn the
//! CPU-side textures and quad into device resources.

mod texture;

pub use texture::{check_texture_size, upload_field, upload_gradient, GpuTexture};

use bytemuck::{Pod, Zeroable};

use crate::error::GpuError;
use crate::scene::{OrthoCamera, Quad};

/// Device and queue shared by a surface's resources.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Create a device without a presentation surface.
    pub async fn new_headless() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Flow Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        log::debug!("Using GPU adapter: {}", adapter.get_info().name);
        Ok(Self { device, queue })
    }

    /// Blocking wrapper around [`GpuContext::new_headless`].
    pub fn new_headless_blocking() -> Result<Self, GpuError> {
        pollster::block_on(Self::new_headless())
    }
}

/// Per-draw uniforms for the display quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct QuadUniform {
    pub model_view_proj: [[f32; 4]; 4],
    /// Tint with alpha premultiplied into the color channels.
    pub color: [f32; 4],
}

impl QuadUniform {
    pub fn new<T>(camera: &OrthoCamera, quad: &Quad<T>) -> Self {
        let mvp = camera.view_projection() * quad.model_matrix();
        let c = quad.material.color;
        Self {
            model_view_proj: mvp.to_cols_array_2d(),
            color: [c.r * c.a, c.g * c.a, c.b * c.a, c.a],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
