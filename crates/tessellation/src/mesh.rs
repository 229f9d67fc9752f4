use serde::{Deserialize, Serialize};

use litho_kernel::Triangle;

use crate::layout::{Shell, SurfaceKind};

/// Contiguous run of triangles that belong to one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceRange {
    pub kind: SurfaceKind,
    pub start: usize,
    pub end: usize,
}

impl SurfaceRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An ordered triangle soup with per-surface ranges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
    pub ranges: Vec<SurfaceRange>,
}

impl Mesh {
    pub fn with_capacity(triangle_count: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(triangle_count),
            ranges: Vec::with_capacity(SurfaceKind::ALL.len()),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangles of one surface (empty if the surface was never emitted).
    pub fn surface(&self, kind: SurfaceKind) -> &[Triangle] {
        self.ranges
            .iter()
            .find(|r| r.kind == kind)
            .map(|r| &self.triangles[r.start..r.end])
            .unwrap_or(&[])
    }

    /// Triangles of every surface in a shell, in emission order.
    pub fn shell(&self, shell: Shell) -> Vec<Triangle> {
        self.ranges
            .iter()
            .filter(|r| r.kind.shell() == shell)
            .flat_map(|r| self.triangles[r.start..r.end].iter().copied())
            .collect()
    }

    pub fn degenerate_count(&self) -> usize {
        self.triangles.iter().filter(|t| t.is_degenerate()).count()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut vertices = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = vertices.next()?.to_array();
        Some(vertices.fold((first, first), |(mut lo, mut hi), v| {
            for (axis, c) in v.to_array().into_iter().enumerate() {
                lo[axis] = lo[axis].min(c);
                hi[axis] = hi[axis].max(c);
            }
            (lo, hi)
        }))
    }
}
