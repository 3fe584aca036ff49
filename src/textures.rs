//! CPU-side texture objects handed to the simulation surface.
//!
//! A texture here owns its pixel buffer plus a dirty flag. Writers replace
//! the pixels and call `mark_dirty`; whoever owns the GPU copy (see
//! [`gpu::GpuTexture`](crate::gpu::GpuTexture)) re-uploads on the next sync
//! and clears the flag.
//!
//! Two kinds are used:
//! - [`FieldTexture`] - the rasterized vector field, RGBA `f32`
//! - [`GradientTexture`] - the `K x 1` speed color lookup strip, RGBA `u8`

use image::RgbaImage;

use crate::raster::FieldGrid;

/// Filter mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default). Good for gradients.
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering.
    Nearest,
}

/// Address mode for texture wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Clamp to edge color (default). Coordinates outside 0-1 use edge pixels.
    #[default]
    ClampToEdge,
    /// Repeat/tile the texture. Coordinates wrap around.
    Repeat,
    /// Mirror the texture at boundaries.
    MirrorRepeat,
}

/// Vector field texture: `width * height` RGBA `f32` pixels.
#[derive(Debug, Clone)]
pub struct FieldTexture {
    pixels: Vec<f32>,
    width: u32,
    height: u32,
    dirty: bool,
    /// Bumped on every `mark_dirty`, lets observers spot rebuilds.
    version: u64,
    pub filter: FilterMode,
    pub address_mode: AddressMode,
}

impl FieldTexture {
    /// Empty 1x1 texture. Nearest filtering keeps `f32` data sampleable
    /// on devices without float filtering.
    pub fn new() -> Self {
        Self {
            pixels: vec![0.0; 4],
            width: 1,
            height: 1,
            dirty: false,
            version: 0,
            filter: FilterMode::Nearest,
            address_mode: AddressMode::ClampToEdge,
        }
    }

    /// Replace the pixel buffer. Does not mark the texture dirty.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height * 4`.
    pub fn set_pixels(&mut self, pixels: Vec<f32>, width: u32, height: u32) {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * 4,
            "RGBA data size mismatch"
        );
        self.pixels = pixels;
        self.width = width;
        self.height = height;
    }

    /// Copy a rasterized grid in and mark the texture dirty.
    pub fn upload_grid(&mut self, grid: &FieldGrid) {
        self.set_pixels(grid.pixels().to_vec(), grid.width(), grid.height());
        self.mark_dirty();
    }

    /// Flag the contents as changed since the last GPU upload.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.version += 1;
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for FieldTexture {
    fn default() -> Self {
        Self::new()
    }
}

/// Speed color lookup texture, a `K x 1` RGBA8 strip.
#[derive(Debug, Clone)]
pub struct GradientTexture {
    image: RgbaImage,
    dirty: bool,
    pub filter: FilterMode,
    pub address_mode: AddressMode,
}

impl GradientTexture {
    /// Wrap a freshly rendered strip. New textures start dirty.
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            dirty: true,
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
