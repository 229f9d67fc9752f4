//! Core types for lithophane panel generation: parameters, the image height
//! field, vector math, face normals and the shared error type.

pub mod error;
pub mod geometry;
pub mod heightfield;
pub mod normal;
pub mod params;

pub use error::{LithoError, Result};
pub use geometry::{Point3d, Vec3, Vertex};
pub use heightfield::{HeightGrid, PixelBuffer, extract_height_grid, height_for_gray, luminance};
pub use normal::{Triangle, face_normal};
pub use params::{DegeneratePolicy, PanelParameters, RadialEdgePolicy, WALL_THICKNESS};

/// Numeric thresholds shared by the generator and its checks.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// A cross product whose length (mm², twice the triangle's area) is at
    /// or below this has no usable normal. Compared against the length, not
    /// its square.
    pub degenerate_normal: f64,
    /// Allowed deviation of a stored normal from unit length.
    pub unit_normal: f64,
    /// Relief below this (mm) is treated as flat.
    pub relief: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            degenerate_normal: 1e-12,
            unit_normal: 1e-5,
            relief: 1e-6,
        }
    }
}

impl Tolerance {
    pub fn is_unit(&self, length: f64) -> bool {
        (length - 1.0).abs() <= self.unit_normal
    }

    pub fn is_flat(&self, relief: f64) -> bool {
        relief.abs() < self.relief
    }
}
