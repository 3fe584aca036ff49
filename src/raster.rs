//! Rasterizing scattered samples into a dense vector field grid.
//!
//! The GPU samples the flow from a regular 2D texture, but the input is an
//! irregular set of points. [`rasterize`] bins every sample into one cell of
//! a grid whose cell count roughly equals the sample count and whose shape
//! follows the data's spatial aspect ratio, so one cell covers about one
//! sample's footprint.
//!
//! # Encoding
//!
//! Each cell holds four `f32` channels:
//!
//! | Channel | Content |
//! |---------|---------|
//! | R | `vx / max_mag * 0.5 + 0.5` |
//! | G | `vy / max_mag * 0.5 + 0.5` |
//! | B, A | reserved, always `0` |
//!
//! Components are shifted from `[-1, 1]` to `[0, 1]` because the texture is
//! sampled as unsigned-normalized data. Cells no sample lands in stay zero.
//! When two samples land in the same cell the later one wins.

use crate::data::{FieldData, MagnitudeExtent};

/// Channels per grid cell.
pub const CHANNELS: usize = 4;

/// Dense RGBA `f32` grid encoding a normalized vector field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGrid {
    width: u32,
    height: u32,
    cells: Vec<[f32; CHANNELS]>,
}

impl FieldGrid {
    /// Zeroed grid of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![[0.0; CHANNELS]; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[[f32; CHANNELS]] {
        &self.cells
    }

    /// Flat channel values, `width * height * 4` floats.
    pub fn pixels(&self) -> &[f32] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Raw bytes for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Raw channels of one cell, or `None` outside the grid.
    pub fn cell(&self, col: u32, row: u32) -> Option<[f32; CHANNELS]> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get((row * self.width + col) as usize).copied()
    }

    /// Normalized vector stored in a cell, mapped back to `[-1, 1]`.
    ///
    /// Multiply by the raster's `max` magnitude to get the original vector.
    pub fn decode(&self, col: u32, row: u32) -> Option<[f32; 2]> {
        self.cell(col, row)
            .map(|c| [(c[0] - 0.5) * 2.0, (c[1] - 0.5) * 2.0])
    }

    fn write(&mut self, index: usize, vx: f32, vy: f32) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell[0] = vx * 0.5 + 0.5;
            cell[1] = vy * 0.5 + 0.5;
        }
    }
}

/// Result of one rasterization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRaster {
    pub grid: FieldGrid,
    /// Magnitude range of the input vectors.
    pub magnitude: MagnitudeExtent,
}

impl FieldRaster {
    /// Recover the vector stored in a cell in data units.
    pub fn vector_at(&self, col: u32, row: u32) -> Option<[f64; 2]> {
        let max = self.magnitude.max;
        self.grid
            .decode(col, row)
            .map(|[x, y]| [x as f64 * max, y as f64 * max])
    }
}

/// Grid dimensions for `count` samples spread over an area of the given aspect ratio.
///
/// Width is `round(sqrt(aspect * count))`, at least 1, and height is
/// `ceil(count / width)`. Very elongated areas can get more columns than
/// samples. A zero-height area puts everything in one row; a zero-width
/// (or zero-sized) area in one column.
pub fn grid_size(aspect: f64, count: usize) -> (u32, u32) {
    if count == 0 {
        return (1, 1);
    }
    let width = if aspect.is_nan() || aspect <= 0.0 {
        1
    } else if aspect.is_infinite() {
        count
    } else {
        ((aspect * count as f64).sqrt().round() as usize).max(1)
    };
    let height = count.div_ceil(width);
    (width as u32, height as u32)
}

/// Bin scattered samples into a [`FieldGrid`].
pub fn rasterize(data: &FieldData) -> FieldRaster {
    let bounds = data.bounds();
    let count = data.count();
    let aspect = bounds.x.span() / bounds.y.span();
    let (width, height) = grid_size(aspect, count);

    let magnitude = data.magnitude_extent();
    let mut grid = FieldGrid::new(width, height);

    if count == 0 {
        log::warn!("Rasterizing an empty dataset; producing a 1x1 empty field");
        return FieldRaster { grid, magnitude };
    }
    if bounds.x.is_degenerate() || bounds.y.is_degenerate() {
        log::warn!(
            "Degenerate spatial extent (x span {}, y span {}); collapsing axis to cell 0",
            bounds.x.span(),
            bounds.y.span()
        );
    }

    let inv_max = if magnitude.max > 0.0 {
        1.0 / magnitude.max
    } else {
        log::warn!("All vectors are zero; encoding a still field");
        0.0
    };

    let max_col = (width - 1) as f64;
    let max_row = (height - 1) as f64;
    for sample in data {
        let col = (bounds.x.normalize(sample.x) * max_col).round().clamp(0.0, max_col) as usize;
        let row = (bounds.y.normalize(sample.y) * max_row).round().clamp(0.0, max_row) as usize;
        let index = row * width as usize + col;
        grid.write(
            index,
            (sample.vx * inv_max) as f32,
            (sample.vy * inv_max) as f32,
        );
    }

    log::debug!(
        "Rasterized {} samples into {}x{} field (max magnitude {})",
        count,
        width,
        height,
        magnitude.max
    );

    FieldRaster { grid, magnitude }
}
