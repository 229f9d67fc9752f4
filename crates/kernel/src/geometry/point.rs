use serde::{Deserialize, Serialize};
use std::ops::Sub;

use super::vector::Vec3;

/// A point in 3D Euclidean space, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Point at radius `r` along the direction `(cos, sin)` and height `z`.
    pub fn from_polar(r: f64, cos: f64, sin: f64, z: f64) -> Self {
        Self {
            x: r * cos,
            y: r * sin,
            z,
        }
    }

    pub fn to_vertex(&self) -> Vertex {
        Vertex::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl Sub for Point3d {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// A mesh vertex as it is stored on disk: three single-precision coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Widen back to double precision for geometric predicates.
    pub fn to_point(&self) -> Point3d {
        Point3d::new(self.x as f64, self.y as f64, self.z as f64)
    }
}
