//! Plain-text summary of a panel run.
//!
//! Reports are structured text, not JSON, because they are read in test
//! failure output.

use std::fmt;

use litho_tessellation::SurfaceKind;

use crate::oracle::OracleVerdict;
use crate::workflow::PanelRun;

/// Per-surface counts of one mesh.
#[derive(Debug, Clone)]
pub struct SurfaceSummary {
    pub kind: SurfaceKind,
    pub triangles: usize,
    pub degenerate: usize,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct PanelReport {
    pub resolution: usize,
    pub triangle_count: usize,
    pub byte_len: usize,
    pub surfaces: Vec<SurfaceSummary>,
    pub bounding_box: Option<([f32; 3], [f32; 3])>,
    pub oracle_results: Vec<OracleVerdict>,
}

impl PanelReport {
    pub fn from_run(run: &PanelRun) -> Self {
        let surfaces = SurfaceKind::ALL
            .iter()
            .map(|kind| {
                let tris = run.mesh.surface(*kind);
                SurfaceSummary {
                    kind: *kind,
                    triangles: tris.len(),
                    degenerate: tris.iter().filter(|t| t.is_degenerate()).count(),
                }
            })
            .collect();
        Self {
            resolution: run.resolution(),
            triangle_count: run.mesh.triangle_count(),
            byte_len: run.stl.len(),
            surfaces,
            bounding_box: run.mesh.bounding_box(),
            oracle_results: run.verdicts(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.oracle_results.iter().all(|v| v.passed)
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PanelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Lithophane Panel Report ===")?;
        writeln!(
            f,
            "Resolution {}: {} triangles, {} bytes",
            self.resolution, self.triangle_count, self.byte_len
        )?;

        writeln!(f, "\nSurfaces:")?;
        for s in &self.surfaces {
            write!(f, "  {:<13} {:>8}", s.kind.label(), s.triangles)?;
            if s.degenerate > 0 {
                write!(f, "  ({} degenerate)", s.degenerate)?;
            }
            writeln!(f)?;
        }

        if let Some((lo, hi)) = self.bounding_box {
            writeln!(
                f,
                "\nBounding box: [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
                lo[0], lo[1], lo[2], hi[0], hi[1], hi[2]
            )?;
        }

        let passed = self.oracle_results.iter().filter(|v| v.passed).count();
        writeln!(f, "\nOracles ({}/{} passed):", passed, self.oracle_results.len())?;
        for v in &self.oracle_results {
            let mark = if v.passed { "PASS" } else { "FAIL" };
            writeln!(f, "  [{}] {}: {}", mark, v.oracle_name, v.detail)?;
        }
        Ok(())
    }
}
