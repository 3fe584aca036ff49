//! Error types for vecflow.
//!
//! This module provides error types for GPU initialization, dataset
//! construction, style loading, and view lifecycle misuse.

use std::fmt;

/// Errors from the wgpu resource layer.
#[derive(Debug)]
pub enum GpuError {
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// A texture is larger than the device allows along one axis.
    TextureTooLarge { width: u32, height: u32, max: u32 },
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::TextureTooLarge { width, height, max } => write!(
                f,
                "Texture of {}x{} exceeds the device limit of {} texels per side",
                width, height, max
            ),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter | GpuError::TextureTooLarge { .. } => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when building a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Column lengths passed to `FieldData::from_columns` differ.
    ColumnLengthMismatch {
        /// Name of the offending column.
        column: &'static str,
        /// Length of the `x` column.
        expected: usize,
        /// Length of the offending column.
        found: usize,
    },
    /// A dimension name did not resolve to a known dimension.
    UnknownDimension(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::ColumnLengthMismatch { column, expected, found } => write!(
                f,
                "Column '{}' has {} values, expected {}",
                column, found, expected
            ),
            DataError::UnknownDimension(name) => write!(f, "Unknown dimension '{}'", name),
        }
    }
}

impl std::error::Error for DataError {}

/// Errors that can occur when loading a style.
#[derive(Debug)]
pub enum StyleError {
    /// Failed to read the style file from disk.
    Io(std::io::Error),
    /// The style document is not valid JSON or has the wrong shape.
    Json(serde_json::Error),
    /// A color string could not be parsed.
    InvalidColor(String),
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleError::Io(e) => write!(f, "Failed to read style file: {}", e),
            StyleError::Json(e) => write!(f, "Failed to parse style: {}", e),
            StyleError::InvalidColor(s) => write!(f, "Invalid color '{}'", s),
        }
    }
}

impl std::error::Error for StyleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StyleError::Io(e) => Some(e),
            StyleError::Json(e) => Some(e),
            StyleError::InvalidColor(_) => None,
        }
    }
}

impl From<std::io::Error> for StyleError {
    fn from(e: std::io::Error) -> Self {
        StyleError::Io(e)
    }
}

impl From<serde_json::Error> for StyleError {
    fn from(e: serde_json::Error) -> Self {
        StyleError::Json(e)
    }
}

/// Errors returned by [`FlowView`](crate::view::FlowView) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// The view has been disposed and its surface released.
    Disposed,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::Disposed => write!(f, "View has been disposed and cannot render again"),
        }
    }
}

impl std::error::Error for ViewError {}
