//! Fixed global ordering of every triangle in a panel mesh.
//!
//! Each triangle has an index known before anything is generated, so byte
//! offsets can be handed out up front and disjoint regions of one output
//! buffer filled independently.

use serde::{Deserialize, Serialize};

/// Binary STL header plus triangle count.
pub const STL_PREAMBLE_LEN: usize = 84;
/// One binary STL triangle record.
pub const STL_RECORD_LEN: usize = 50;

/// Which closed shell a surface belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shell {
    Panel,
    Stand,
}

/// Surfaces in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Relief surface at mapped heights.
    Top,
    /// Flat back at `z = min_height`.
    Bottom,
    /// Bore wall at the inner radius.
    InnerWall,
    /// Rim wall at the outer radius.
    OuterWall,
    /// Stand face resting on the panel's back plane.
    StandTop,
    /// Stand face `WALL_THICKNESS` outside the inner one.
    StandOuter,
    /// Stand face at `wall_distance` (pulled inside the rim if needed).
    StandInner,
    /// Stand face at `z = -wall_height`.
    StandBottom,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 8] = [
        SurfaceKind::Top,
        SurfaceKind::Bottom,
        SurfaceKind::InnerWall,
        SurfaceKind::OuterWall,
        SurfaceKind::StandTop,
        SurfaceKind::StandOuter,
        SurfaceKind::StandInner,
        SurfaceKind::StandBottom,
    ];

    pub fn shell(self) -> Shell {
        match self {
            Self::Top | Self::Bottom | Self::InnerWall | Self::OuterWall => Shell::Panel,
            _ => Shell::Stand,
        }
    }

    /// Top and bottom cover every cell; walls and stand faces one ring.
    pub fn covers_grid(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Radial cell index of a single-ring surface.
    pub fn fixed_ring(self, resolution: usize) -> usize {
        match self {
            Self::OuterWall => resolution - 1,
            _ => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::InnerWall => "inner wall",
            Self::OuterWall => "outer wall",
            Self::StandTop => "stand top",
            Self::StandOuter => "stand outer",
            Self::StandInner => "stand inner",
            Self::StandBottom => "stand bottom",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }
}

/// Address of one triangle: surface, cell and which half of the quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub kind: SurfaceKind,
    /// Radial cell index; fixed for ring surfaces (0 inner, R−1 outer, 0 stand).
    pub i: usize,
    /// Angular segment index.
    pub j: usize,
    /// 0 or 1.
    pub half: usize,
}

/// Index arithmetic for a mesh of a given resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleLayout {
    resolution: usize,
}

impl TriangleLayout {
    pub fn new(resolution: usize) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Triangles contributed by one surface.
    pub fn surface_len(&self, kind: SurfaceKind) -> usize {
        let r = self.resolution;
        if kind.covers_grid() { 2 * r * r } else { 2 * r }
    }

    /// First triangle index of a surface.
    pub fn surface_start(&self, kind: SurfaceKind) -> usize {
        SurfaceKind::ALL[..kind.position()]
            .iter()
            .map(|k| self.surface_len(*k))
            .sum()
    }

    pub fn surface_range(&self, kind: SurfaceKind) -> std::ops::Range<usize> {
        let start = self.surface_start(kind);
        start..start + self.surface_len(kind)
    }

    /// `2R² + 2R² + 2R + 2R + 8R`.
    pub fn total(&self) -> usize {
        let r = self.resolution;
        4 * r * r + 12 * r
    }

    /// Exact binary STL size for this layout.
    pub fn stl_len(&self) -> usize {
        STL_PREAMBLE_LEN + STL_RECORD_LEN * self.total()
    }

    /// Byte offset of triangle `k`'s record.
    pub fn byte_offset(&self, k: usize) -> usize {
        STL_PREAMBLE_LEN + STL_RECORD_LEN * k
    }

    /// Global index of a slot.
    pub fn index_of(&self, slot: Slot) -> usize {
        let cell = if slot.kind.covers_grid() {
            slot.i * self.resolution + slot.j
        } else {
            slot.j
        };
        self.surface_start(slot.kind) + 2 * cell + slot.half
    }

    /// Slot of global index `k`, or `None` past the end.
    pub fn locate(&self, k: usize) -> Option<Slot> {
        let r = self.resolution;
        let mut start = 0;
        for kind in SurfaceKind::ALL {
            let len = self.surface_len(kind);
            if k < start + len {
                let local = k - start;
                let cell = local / 2;
                let half = local % 2;
                let (i, j) = if kind.covers_grid() {
                    (cell / r, cell % r)
                } else {
                    (kind.fixed_ring(r), cell)
                };
                return Some(Slot { kind, i, j, half });
            }
            start += len;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_two_totals() {
        let layout = TriangleLayout::new(2);
        assert_eq!(layout.total(), 40);
        assert_eq!(layout.stl_len(), 2084);
    }

    #[test]
    fn test_surface_ranges_tile_the_mesh() {
        let layout = TriangleLayout::new(5);
        let mut next = 0;
        for kind in SurfaceKind::ALL {
            let range = layout.surface_range(kind);
            assert_eq!(range.start, next, "{kind:?}");
            next = range.end;
        }
        assert_eq!(next, layout.total());
    }

    #[test]
    fn test_locate_inverts_index_of() {
        let layout = TriangleLayout::new(3);
        for k in 0..layout.total() {
            let slot = layout.locate(k).unwrap();
            assert_eq!(layout.index_of(slot), k, "{slot:?}");
        }
        assert!(layout.locate(layout.total()).is_none());
    }

    #[test]
    fn test_outer_wall_slots_sit_on_last_ring() {
        let layout = TriangleLayout::new(4);
        let first = layout.surface_start(SurfaceKind::OuterWall);
        let slot = layout.locate(first + 3).unwrap();
        assert_eq!(slot.kind, SurfaceKind::OuterWall);
        assert_eq!((slot.i, slot.j, slot.half), (3, 1, 1));
    }

    #[test]
    fn test_byte_offsets() {
        let layout = TriangleLayout::new(2);
        assert_eq!(layout.byte_offset(0), 84);
        assert_eq!(layout.byte_offset(39) + STL_RECORD_LEN, layout.stl_len());
    }
}
