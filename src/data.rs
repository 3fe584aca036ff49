//! Scattered vector samples and the queries the renderer needs from them.
//!
//! A [`FieldData`] is an ordered list of [`Sample`]s, each a data-space
//! position with a 2D vector attached (wind, current, flow velocity).
//! Positions need not lie on any grid.
//!
//! ```ignore
//! use vecflow::data::{FieldData, Sample};
//!
//! let data: FieldData = vec![
//!     Sample::new(0.0, 0.0, 1.0, 0.0),
//!     Sample::new(1.0, 0.0, 0.0, 1.0),
//! ]
//! .into_iter()
//! .collect();
//! assert_eq!(data.count(), 2);
//! ```

use glam::DVec2;

use crate::error::DataError;

/// One scattered data point: a position and the vector measured there.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self { x, y, vx, vy }
    }

    /// Data-space position.
    #[inline]
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Vector components.
    #[inline]
    pub fn vector(&self) -> DVec2 {
        DVec2::new(self.vx, self.vy)
    }

    /// Length of the vector.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.vector().length()
    }

    /// Value of a single logical dimension.
    pub fn get(&self, dim: Dim) -> f64 {
        match dim {
            Dim::X => self.x,
            Dim::Y => self.y,
            Dim::Vx => self.vx,
            Dim::Vy => self.vy,
        }
    }
}

/// Logical dimensions of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    /// First spatial axis (x, longitude).
    X,
    /// Second spatial axis (y, latitude).
    Y,
    /// Horizontal vector component.
    Vx,
    /// Vertical vector component.
    Vy,
}

impl Dim {
    pub const ALL: [Dim; 4] = [Dim::X, Dim::Y, Dim::Vx, Dim::Vy];

    /// Resolve a dimension from the name a host data model uses for it.
    pub fn from_name(name: &str) -> Result<Self, DataError> {
        match name.to_ascii_lowercase().as_str() {
            "x" | "lng" | "lon" => Ok(Dim::X),
            "y" | "lat" => Ok(Dim::Y),
            "vx" => Ok(Dim::Vx),
            "vy" => Ok(Dim::Vy),
            _ => Err(DataError::UnknownDimension(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dim::X => "x",
            Dim::Y => "y",
            Dim::Vx => "vx",
            Dim::Vy => "vy",
        }
    }
}

/// Closed `[min, max]` range of one dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `max - min`. Zero when every value is the same.
    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether all values coincide, so normalizing by the span would divide by zero.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        span.is_nan() || span <= 0.0
    }

    /// Map `value` into `[0, 1]` along this extent; `0` on a degenerate extent.
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (value - self.min) / self.span()
        }
    }

    fn fold(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if min > max {
            Self::new(0.0, 0.0)
        } else {
            Self::new(min, max)
        }
    }
}

/// Smallest and largest vector magnitude in a dataset.
///
/// Used for gradient color mapping only; the field grid normalizes by `max`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MagnitudeExtent {
    pub min: f64,
    pub max: f64,
}

/// Spatial bounding box of a dataset in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    pub x: Extent,
    pub y: Extent,
}

impl DataBounds {
    /// The four corners, in the order (min,min), (max,min), (min,max), (max,max).
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.x.min, self.y.min),
            DVec2::new(self.x.max, self.y.min),
            DVec2::new(self.x.min, self.y.max),
            DVec2::new(self.x.max, self.y.max),
        ]
    }
}

/// An ordered dataset of scattered vector samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldData {
    samples: Vec<Sample>,
}

impl FieldData {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Build a dataset from parallel columns.
    pub fn from_columns(x: &[f64], y: &[f64], vx: &[f64], vy: &[f64]) -> Result<Self, DataError> {
        let expected = x.len();
        for (column, values) in [("y", y), ("vx", vx), ("vy", vy)] {
            if values.len() != expected {
                return Err(DataError::ColumnLengthMismatch {
                    column,
                    expected,
                    found: values.len(),
                });
            }
        }
        let samples = (0..expected)
            .map(|i| Sample::new(x[i], y[i], vx[i], vy[i]))
            .collect();
        Ok(Self { samples })
    }

    /// Number of samples.
    #[inline]
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Extent of one dimension. `(0, 0)` for an empty dataset.
    pub fn extent(&self, dim: Dim) -> Extent {
        Extent::fold(self.samples.iter().map(|s| s.get(dim)))
    }

    /// Spatial bounding box.
    pub fn bounds(&self) -> DataBounds {
        DataBounds {
            x: self.extent(Dim::X),
            y: self.extent(Dim::Y),
        }
    }

    /// Min and max vector magnitude. `(0, 0)` for an empty dataset.
    pub fn magnitude_extent(&self) -> MagnitudeExtent {
        let e = Extent::fold(self.samples.iter().map(Sample::magnitude));
        MagnitudeExtent { min: e.min, max: e.max }
    }
}

impl FromIterator<Sample> for FieldData {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FieldData {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
