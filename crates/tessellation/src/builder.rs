//! Polar mesh builder: height grid + panel parameters → ordered triangles.
//!
//! Every quad is split along the diagonal from its low-r/low-θ corner to its
//! high-r/high-θ corner (for walls: low-θ/bottom to high-θ/top). Quads are
//! listed counter-clockwise as seen from outside the solid, so both halves
//! inherit the outward normal.

use tracing::{debug, info, instrument};

use litho_kernel::{
    HeightGrid, LithoError, PanelParameters, Point3d, Result, Tolerance, Triangle, height_for_gray,
};

use crate::control::GenerationControl;
use crate::layout::{Slot, SurfaceKind, TriangleLayout};
use crate::mesh::{Mesh, SurfaceRange};
use crate::polar::{PolarGrid, angular_index, radial_sample_row};

/// Builds one panel mesh. Holds no mutable state, so `triangle` can be
/// called from several threads at once.
#[derive(Debug, Clone)]
pub struct PolarMeshBuilder<'a> {
    grid: &'a HeightGrid,
    params: PanelParameters,
    polar: PolarGrid,
    layout: TriangleLayout,
    tolerance: Tolerance,
}

impl<'a> PolarMeshBuilder<'a> {
    /// Validate `params` and precompute the polar tables. Nothing is
    /// allocated for triangles yet.
    pub fn new(grid: &'a HeightGrid, params: &PanelParameters) -> Result<Self> {
        params.validate()?;
        let resolution = grid.resolution();
        Ok(Self {
            grid,
            params: *params,
            polar: PolarGrid::new(resolution, params.inner_radius(), params.outer_radius()),
            layout: TriangleLayout::new(resolution),
            tolerance: Tolerance::default(),
        })
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn params(&self) -> &PanelParameters {
        &self.params
    }

    pub fn layout(&self) -> TriangleLayout {
        self.layout
    }

    pub fn resolution(&self) -> usize {
        self.layout.resolution()
    }

    /// Triangle count known before generation.
    pub fn predicted_triangle_count(&self) -> usize {
        self.layout.total()
    }

    /// Relief height of vertex ring `a ∈ [0, R]`, angular index `b`.
    pub fn vertex_height(&self, a: usize, b: usize) -> f64 {
        let r = self.resolution();
        let row = radial_sample_row(a, r, self.params.radial_edge);
        let col = angular_index(b, r);
        height_for_gray(
            self.grid.gray(row, col),
            self.params.min_height,
            self.params.max_height,
        )
    }

    fn at(&self, radius: f64, b: usize, z: f64) -> Point3d {
        let (cos, sin) = self.polar.direction(b);
        Point3d::from_polar(radius, cos, sin, z)
    }

    /// Stand vertices sit half a segment off the panel's angles, so the
    /// stand's top face rests on the back plane without sharing an edge
    /// with it.
    fn stand_at(&self, radius: f64, b: usize, z: f64) -> Point3d {
        let (cos, sin) = self.polar.mid_direction(b);
        Point3d::from_polar(radius, cos, sin, z)
    }

    /// Outward-facing quad of a slot, counter-clockwise.
    fn quad(&self, slot: &Slot) -> [Point3d; 4] {
        let (i, j) = (slot.i, slot.j);
        let r = self.resolution();
        let base = self.params.min_height;
        let foot = -self.params.wall_height;
        let stand_in = self.params.stand_inner_radius();
        let stand_out = self.params.stand_outer_radius();

        match slot.kind {
            SurfaceKind::Top => {
                let (r1, r2) = (self.polar.ring_radius(i), self.polar.ring_radius(i + 1));
                [
                    self.at(r1, j, self.vertex_height(i, j)),
                    self.at(r2, j, self.vertex_height(i + 1, j)),
                    self.at(r2, j + 1, self.vertex_height(i + 1, j + 1)),
                    self.at(r1, j + 1, self.vertex_height(i, j + 1)),
                ]
            }
            SurfaceKind::Bottom => {
                let (r1, r2) = (self.polar.ring_radius(i), self.polar.ring_radius(i + 1));
                [
                    self.at(r1, j, base),
                    self.at(r1, j + 1, base),
                    self.at(r2, j + 1, base),
                    self.at(r2, j, base),
                ]
            }
            SurfaceKind::InnerWall => {
                let rim = self.polar.ring_radius(0);
                [
                    self.at(rim, j, base),
                    self.at(rim, j, self.vertex_height(0, j)),
                    self.at(rim, j + 1, self.vertex_height(0, j + 1)),
                    self.at(rim, j + 1, base),
                ]
            }
            SurfaceKind::OuterWall => {
                let rim = self.polar.ring_radius(r);
                [
                    self.at(rim, j, base),
                    self.at(rim, j + 1, base),
                    self.at(rim, j + 1, self.vertex_height(r, j + 1)),
                    self.at(rim, j, self.vertex_height(r, j)),
                ]
            }
            SurfaceKind::StandTop => [
                self.stand_at(stand_in, j, base),
                self.stand_at(stand_out, j, base),
                self.stand_at(stand_out, j + 1, base),
                self.stand_at(stand_in, j + 1, base),
            ],
            SurfaceKind::StandOuter => [
                self.stand_at(stand_out, j, foot),
                self.stand_at(stand_out, j + 1, foot),
                self.stand_at(stand_out, j + 1, base),
                self.stand_at(stand_out, j, base),
            ],
            SurfaceKind::StandInner => [
                self.stand_at(stand_in, j, foot),
                self.stand_at(stand_in, j, base),
                self.stand_at(stand_in, j + 1, base),
                self.stand_at(stand_in, j + 1, foot),
            ],
            SurfaceKind::StandBottom => [
                self.stand_at(stand_in, j, foot),
                self.stand_at(stand_in, j + 1, foot),
                self.stand_at(stand_out, j + 1, foot),
                self.stand_at(stand_out, j, foot),
            ],
        }
    }

    /// Corners of the triangle in `slot`: `(q0, q1, q2)` or `(q0, q2, q3)`.
    pub fn corners(&self, slot: &Slot) -> [Point3d; 3] {
        let [q0, q1, q2, q3] = self.quad(slot);
        if slot.half == 0 { [q0, q1, q2] } else { [q0, q2, q3] }
    }

    fn make(&self, slot: &Slot, index: usize) -> Result<Triangle> {
        Triangle::from_corners(
            self.corners(slot),
            self.params.degenerate,
            &self.tolerance,
            index,
        )
    }

    /// Triangle `k` of the layout, computed independently of all others.
    pub fn triangle(&self, k: usize) -> Result<Triangle> {
        let slot = self.layout.locate(k).ok_or(LithoError::SizeMismatch {
            expected: self.layout.total(),
            actual: k + 1,
        })?;
        self.make(&slot, k)
    }

    pub fn build(&self) -> Result<Mesh> {
        self.build_with(&GenerationControl::default())
    }

    /// Emit every surface in order, polling `control` once per ring.
    ///
    /// The emitted count is checked against the layout before returning; a
    /// difference is a [`LithoError::SizeMismatch`].
    #[instrument(skip(self, control), fields(resolution = self.resolution()))]
    pub fn build_with(&self, control: &GenerationControl) -> Result<Mesh> {
        let r = self.resolution();
        let expected = self.predicted_triangle_count();
        let mut mesh = Mesh::with_capacity(expected);

        for kind in SurfaceKind::ALL {
            let start = mesh.triangles.len();
            let rows = if kind.covers_grid() { r } else { 1 };
            for row in 0..rows {
                control.checkpoint()?;
                let i = if kind.covers_grid() { row } else { kind.fixed_ring(r) };
                for j in 0..r {
                    for half in 0..2 {
                        let slot = Slot { kind, i, j, half };
                        let index = mesh.triangles.len();
                        mesh.triangles.push(self.make(&slot, index)?);
                    }
                }
                control.report(kind.label(), mesh.triangles.len() as f32 / expected as f32);
            }
            mesh.ranges.push(SurfaceRange {
                kind,
                start,
                end: mesh.triangles.len(),
            });
            debug!(surface = kind.label(), triangles = mesh.triangles.len() - start, "surface emitted");
        }

        if mesh.triangle_count() != expected {
            return Err(LithoError::SizeMismatch {
                expected,
                actual: mesh.triangle_count(),
            });
        }
        control.report("complete", 1.0);
        info!(
            triangles = mesh.triangle_count(),
            degenerate = mesh.degenerate_count(),
            "panel mesh built"
        );
        Ok(mesh)
    }
}
