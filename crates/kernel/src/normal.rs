//! Face normals and the triangle record they are stored in.

use serde::{Deserialize, Serialize};

use crate::Tolerance;
use crate::error::{LithoError, Result};
use crate::geometry::{Point3d, Vec3, Vertex};
use crate::params::DegeneratePolicy;

/// Unit normal of the triangle `(v1, v2, v3)` following the right-hand rule,
/// or `None` if the cross product's length is at or below `min_length`.
pub fn face_normal(v1: &Point3d, v2: &Point3d, v3: &Point3d, min_length: f64) -> Option<Vec3> {
    (*v2 - *v1).cross(&(*v3 - *v1)).normalized_with(min_length)
}

/// A triangle as written to disk: three vertices and one normal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub normal: [f32; 3],
    pub vertices: [Vertex; 3],
}

impl Triangle {
    /// Narrow `corners` to single precision and compute the normal of the
    /// narrowed triangle.
    ///
    /// `index` is only used to name the triangle when `policy` rejects a
    /// degenerate face.
    pub fn from_corners(
        corners: [Point3d; 3],
        policy: DegeneratePolicy,
        tolerance: &Tolerance,
        index: usize,
    ) -> Result<Self> {
        let vertices = corners.map(|p| p.to_vertex());
        let [a, b, c] = vertices.map(|v| v.to_point());
        let normal = match face_normal(&a, &b, &c, tolerance.degenerate_normal) {
            Some(n) => n,
            None => match policy {
                DegeneratePolicy::ZeroNormal => Vec3::ZERO,
                DegeneratePolicy::Reject => {
                    return Err(LithoError::DegenerateGeometry { triangle: index });
                }
            },
        };
        Ok(Self {
            normal: normal.to_f32_array(),
            vertices,
        })
    }

    /// True when the zero-vector sentinel was stored as the normal.
    pub fn is_degenerate(&self) -> bool {
        self.normal == [0.0; 3]
    }

    pub fn normal_length(&self) -> f64 {
        let [x, y, z] = self.normal.map(|c| c as f64);
        (x * x + y * y + z * z).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn test_ccw_triangle_faces_up() {
        let n = face_normal(
            &Point3d::new(0.0, 0.0, 0.0),
            &Point3d::new(1.0, 0.0, 0.0),
            &Point3d::new(0.0, 1.0, 0.0),
            1e-12,
        )
        .unwrap();
        assert_eq!(n, Vec3::Z);
    }

    #[test]
    fn test_threshold_applies_to_cross_product_length() {
        let tiny = |leg: f64| {
            face_normal(
                &Point3d::ORIGIN,
                &Point3d::new(leg, 0.0, 0.0),
                &Point3d::new(0.0, leg, 0.0),
                1e-12,
            )
        };
        // Cross lengths 2.5e-13 and 4e-12; squared, both would fall below.
        assert!(tiny(5e-7).is_none());
        assert_eq!(tiny(2e-6), Some(Vec3::Z));
    }

    #[test]
    fn test_reversed_winding_flips_normal() {
        let corners = [
            Point3d::new(0.0, 0.0, 1.0),
            Point3d::new(0.0, 2.0, 1.0),
            Point3d::new(2.0, 0.0, 1.0),
        ];
        let tri = Triangle::from_corners(corners, DegeneratePolicy::Reject, &tol(), 0).unwrap();
        assert_eq!(tri.normal, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_collinear_gets_zero_sentinel() {
        let corners = [
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 1.0, 1.0),
            Point3d::new(2.0, 2.0, 2.0),
        ];
        let tri = Triangle::from_corners(corners, DegeneratePolicy::ZeroNormal, &tol(), 7).unwrap();
        assert!(tri.is_degenerate());
        assert!(tri.normal.iter().all(|c| !c.is_nan()));
    }

    #[test]
    fn test_duplicate_vertex_rejected_with_index() {
        let p = Point3d::new(5.0, 5.0, 5.0);
        let err = Triangle::from_corners(
            [p, p, Point3d::ORIGIN],
            DegeneratePolicy::Reject,
            &tol(),
            42,
        )
        .unwrap_err();
        assert_eq!(err, LithoError::DegenerateGeometry { triangle: 42 });
    }

    #[test]
    fn test_normal_is_unit_for_skewed_triangle() {
        let corners = [
            Point3d::new(12.5, -3.0, 0.7),
            Point3d::new(13.1, -2.4, 2.9),
            Point3d::new(11.8, -2.2, 1.3),
        ];
        let tri = Triangle::from_corners(corners, DegeneratePolicy::Reject, &tol(), 0).unwrap();
        assert_relative_eq!(tri.normal_length(), 1.0, epsilon = 1e-6);
    }
}
