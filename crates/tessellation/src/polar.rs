//! Named index mapping for the polar grid.
//!
//! Vertex rings are indexed `a ∈ [0, R]` (R + 1 radii, the last one at the
//! outer rim). Angular positions are indexed `b` modulo `R`, so the seam at
//! `θ = 2π` reuses the exact coordinates of `θ = 0`. Height rows are indexed
//! `[0, R)` and the row read for ring `R` depends on [`RadialEdgePolicy`].

use std::f64::consts::TAU;

use litho_kernel::RadialEdgePolicy;

/// Wrap an angular index onto `[0, resolution)`.
#[inline]
pub fn angular_index(b: usize, resolution: usize) -> usize {
    b % resolution
}

/// Height row read for vertex ring `a ∈ [0, resolution]`.
#[inline]
pub fn radial_sample_row(a: usize, resolution: usize, policy: RadialEdgePolicy) -> usize {
    match policy {
        RadialEdgePolicy::Wrap => a % resolution,
        RadialEdgePolicy::Clamp => a.min(resolution - 1),
    }
}

/// Precomputed radii and angle tables for one panel.
#[derive(Debug, Clone)]
pub struct PolarGrid {
    resolution: usize,
    radii: Vec<f64>,
    cos: Vec<f64>,
    sin: Vec<f64>,
    mid: Vec<(f64, f64)>,
}

impl PolarGrid {
    /// Rings interpolate linearly from `inner_radius` (a = 0) to
    /// `outer_radius` (a = resolution). Angles advance by `2π / resolution`.
    pub fn new(resolution: usize, inner_radius: f64, outer_radius: f64) -> Self {
        let step = (outer_radius - inner_radius) / resolution as f64;
        let radii = (0..=resolution)
            .map(|a| {
                if a == resolution {
                    outer_radius
                } else {
                    inner_radius + step * a as f64
                }
            })
            .collect();
        let (cos, sin) = (0..resolution)
            .map(|b| {
                let theta = TAU * b as f64 / resolution as f64;
                (theta.cos(), theta.sin())
            })
            .unzip();
        let mid = (0..resolution)
            .map(|b| {
                let theta = TAU * (b as f64 + 0.5) / resolution as f64;
                (theta.cos(), theta.sin())
            })
            .collect();
        Self {
            resolution,
            radii,
            cos,
            sin,
            mid,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Radius of vertex ring `a`.
    #[inline]
    pub fn ring_radius(&self, a: usize) -> f64 {
        self.radii[a]
    }

    /// `(cos θ, sin θ)` for angular index `b`, wrapped.
    #[inline]
    pub fn direction(&self, b: usize) -> (f64, f64) {
        let b = angular_index(b, self.resolution);
        (self.cos[b], self.sin[b])
    }

    /// `(cos θ, sin θ)` halfway between angular indices `b` and `b + 1`,
    /// wrapped.
    #[inline]
    pub fn mid_direction(&self, b: usize) -> (f64, f64) {
        self.mid[angular_index(b, self.resolution)]
    }

    /// Angle of index `b`, in radians, wrapped into `[0, 2π)`.
    pub fn angle(&self, b: usize) -> f64 {
        TAU * angular_index(b, self.resolution) as f64 / self.resolution as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_rings_span_inner_to_outer() {
        let grid = PolarGrid::new(4, 10.0, 50.0);
        assert_eq!(grid.ring_radius(0), 10.0);
        assert_relative_eq!(grid.ring_radius(2), 30.0);
        assert_eq!(grid.ring_radius(4), 50.0);
    }

    #[test]
    fn test_angular_seam_is_exact() {
        let grid = PolarGrid::new(7, 1.0, 2.0);
        assert_eq!(grid.direction(7), grid.direction(0));
        assert_eq!(grid.direction(0), (1.0, 0.0));
        assert_eq!(grid.angle(7), 0.0);
    }

    #[test]
    fn test_mid_directions_sit_between_vertices() {
        let grid = PolarGrid::new(4, 1.0, 2.0);
        let (c, s) = grid.mid_direction(0);
        assert_relative_eq!(c, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(s, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_eq!(grid.mid_direction(4), grid.mid_direction(0));
    }

    #[test]
    fn test_radial_wrap_reads_first_row() {
        assert_eq!(radial_sample_row(4, 4, RadialEdgePolicy::Wrap), 0);
        assert_eq!(radial_sample_row(3, 4, RadialEdgePolicy::Wrap), 3);
    }

    #[test]
    fn test_radial_clamp_reads_last_row() {
        assert_eq!(radial_sample_row(4, 4, RadialEdgePolicy::Clamp), 3);
        assert_eq!(radial_sample_row(2, 4, RadialEdgePolicy::Clamp), 2);
    }
}
