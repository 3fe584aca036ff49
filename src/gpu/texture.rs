//! Uploading dirty CPU textures to wgpu textures.

use super::GpuContext;
use crate::error::GpuError;
use crate::textures::{AddressMode, FieldTexture, FilterMode, GradientTexture};

/// Vector field format: one `f32` per channel.
pub const FIELD_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
/// Gradient lookup format.
pub const GRADIENT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

impl From<FilterMode> for wgpu::FilterMode {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Linear => wgpu::FilterMode::Linear,
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

impl From<AddressMode> for wgpu::AddressMode {
    fn from(mode: AddressMode) -> Self {
        match mode {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
            AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// A sampled 2D texture on the device.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
}

impl GpuTexture {
    /// Allocate an uninitialised texture.
    pub fn new(
        ctx: &GpuContext,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        filter: FilterMode,
        address_mode: AddressMode,
    ) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let address_mode = address_mode.into();
        let filter = filter.into();
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
            format,
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn matches(&self, width: u32, height: u32, format: wgpu::TextureFormat) -> bool {
        self.width == width && self.height == height && self.format == format
    }

    /// Overwrite the whole texture with tightly packed rows.
    fn write(&self, ctx: &GpuContext, data: &[u8], bytes_per_pixel: u32) {
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * bytes_per_pixel),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Free the device memory now instead of on drop.
    pub fn destroy(self) {
        self.texture.destroy();
    }
}

/// Reject sizes above the device's per-axis texture limit.
pub fn check_texture_size(width: u32, height: u32, max: u32) -> Result<(), GpuError> {
    if width > max || height > max {
        return Err(GpuError::TextureTooLarge { width, height, max });
    }
    Ok(())
}

/// Reuse `slot` when the size still fits, otherwise replace it.
fn ensure<'a>(
    slot: &'a mut Option<GpuTexture>,
    ctx: &GpuContext,
    label: &str,
    size: (u32, u32),
    format: wgpu::TextureFormat,
    filter: FilterMode,
    address_mode: AddressMode,
) -> Result<&'a GpuTexture, GpuError> {
    check_texture_size(size.0, size.1, ctx.device.limits().max_texture_dimension_2d)?;
    let reusable = slot
        .as_ref()
        .is_some_and(|t| t.matches(size.0, size.1, format));
    if !reusable {
        if let Some(old) = slot.take() {
            old.destroy();
        }
        log::debug!("Allocating {} texture {}x{}", label, size.0, size.1);
    }
    Ok(slot.get_or_insert_with(|| {
        GpuTexture::new(ctx, label, size.0, size.1, format, filter, address_mode)
    }))
}

/// Upload the vector field if it changed. Returns whether an upload happened.
///
/// Fails with [`GpuError::TextureTooLarge`] when the grid exceeds the
/// device's 2D texture limit; the field stays dirty in that case.
pub fn upload_field(
    ctx: &GpuContext,
    field: &mut FieldTexture,
    slot: &mut Option<GpuTexture>,
) -> Result<bool, GpuError> {
    if !field.is_dirty() && slot.is_some() {
        return Ok(false);
    }
    let gpu = ensure(
        slot,
        ctx,
        "Vector Field Texture",
        (field.width(), field.height()),
        FIELD_FORMAT,
        field.filter,
        field.address_mode,
    )?;
    gpu.write(ctx, field.as_bytes(), 16);
    field.take_dirty();
    Ok(true)
}

/// Upload the gradient lookup if it changed. Returns whether an upload happened.
pub fn upload_gradient(
    ctx: &GpuContext,
    gradient: &mut GradientTexture,
    slot: &mut Option<GpuTexture>,
) -> Result<bool, GpuError> {
    if !gradient.is_dirty() && slot.is_some() {
        return Ok(false);
    }
    let gpu = ensure(
        slot,
        ctx,
        "Gradient Texture",
        (gradient.width(), gradient.height()),
        GRADIENT_FORMAT,
        gradient.filter,
        gradient.address_mode,
    )?;
    gpu.write(ctx, gradient.as_bytes(), 4);
    gradient.take_dirty();
    Ok(true)
}
