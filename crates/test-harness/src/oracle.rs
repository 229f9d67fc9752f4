//! Verification oracles — pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures in one pass.

use litho_format::read_stl;
use litho_kernel::{PanelParameters, Tolerance, Triangle};
use litho_tessellation::{Mesh, Shell, SurfaceKind, TriangleLayout};

use crate::helpers::count_edges;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

// ── Count Oracles ───────────────────────────────────────────────────────────

/// `N = 4R² + 12R`.
pub fn check_triangle_count(mesh: &Mesh, resolution: usize) -> OracleVerdict {
    let expected = TriangleLayout::new(resolution).total();
    let actual = mesh.triangle_count();
    if actual == expected {
        OracleVerdict::pass_val(
            "triangle_count",
            format!("{} triangles for resolution {}", actual, resolution),
            actual as f64,
        )
    } else {
        OracleVerdict::fail_val(
            "triangle_count",
            format!("expected {} triangles, got {}", expected, actual),
            actual as f64,
        )
    }
}

/// Buffer length is exactly `84 + 50N`.
pub fn check_stl_len(bytes: &[u8], resolution: usize) -> OracleVerdict {
    let expected = TriangleLayout::new(resolution).stl_len();
    if bytes.len() == expected {
        OracleVerdict::pass_val("stl_len", format!("{} bytes", bytes.len()), bytes.len() as f64)
    } else {
        OracleVerdict::fail_val(
            "stl_len",
            format!("expected {} bytes, got {}", expected, bytes.len()),
            bytes.len() as f64,
        )
    }
}

// ── Mesh Oracles ────────────────────────────────────────────────────────────

/// Every normal is unit length within tolerance or the zero sentinel.
pub fn check_unit_normals(mesh: &Mesh, tolerance: &Tolerance) -> OracleVerdict {
    let bad: Vec<usize> = mesh
        .triangles
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_degenerate() && !tolerance.is_unit(t.normal_length()))
        .map(|(k, _)| k)
        .collect();

    if bad.is_empty() {
        OracleVerdict::pass_val(
            "unit_normals",
            format!(
                "{} unit normals, {} degenerate",
                mesh.triangle_count() - mesh.degenerate_count(),
                mesh.degenerate_count()
            ),
            mesh.degenerate_count() as f64,
        )
    } else {
        OracleVerdict::fail(
            "unit_normals",
            format!(
                "{} non-unit normals (first: {:?})",
                bad.len(),
                &bad[..bad.len().min(5)]
            ),
        )
    }
}

/// Every edge of one shell is shared by exactly two triangles.
pub fn check_edge_manifold(mesh: &Mesh, shell: Shell) -> OracleVerdict {
    let name = format!("edge_manifold_{:?}", shell).to_lowercase();
    paired_edges_verdict(&name, &mesh.shell(shell))
}

/// Every edge of the whole mesh is shared by exactly two triangles. Fails
/// where the stand and the panel meet along an edge.
pub fn check_edge_manifold_mesh(mesh: &Mesh) -> OracleVerdict {
    paired_edges_verdict("edge_manifold_mesh", &mesh.triangles)
}

fn paired_edges_verdict(name: &str, triangles: &[Triangle]) -> OracleVerdict {
    let counts = count_edges(triangles);
    let non_paired: Vec<_> = counts.iter().filter(|(_, c)| **c != 2).collect();

    if non_paired.is_empty() {
        OracleVerdict::pass(name, format!("all {} edges paired", counts.len()))
    } else {
        OracleVerdict::fail_val(
            name,
            format!(
                "{} of {} edges not shared by exactly two triangles (e.g. {:?})",
                non_paired.len(),
                counts.len(),
                non_paired.first()
            ),
            non_paired.len() as f64,
        )
    }
}

/// Relief vertices lie in `[min_height, max_height]`.
pub fn check_relief_band(mesh: &Mesh, params: &PanelParameters) -> OracleVerdict {
    let slack = 1e-5;
    let out_of_band = mesh
        .surface(SurfaceKind::Top)
        .iter()
        .flat_map(|t| t.vertices.iter())
        .filter(|v| {
            let z = v.z as f64;
            z < params.min_height - slack || z > params.max_height + slack
        })
        .count();
    if out_of_band == 0 {
        OracleVerdict::pass(
            "relief_band",
            format!("relief within [{}, {}]", params.min_height, params.max_height),
        )
    } else {
        OracleVerdict::fail_val(
            "relief_band",
            format!("{} relief vertices outside the height band", out_of_band),
            out_of_band as f64,
        )
    }
}

/// Bounds match the outer rim and the stand foot.
pub fn check_bounding_box(mesh: &Mesh, params: &PanelParameters) -> OracleVerdict {
    let Some((lo, hi)) = mesh.bounding_box() else {
        return OracleVerdict::fail("bounding_box", "empty mesh".to_string());
    };
    let tol = 1e-3;
    let rim = params.outer_radius();
    let checks = [
        ((hi[0] as f64 - rim).abs() < tol, "max x at the panel rim"),
        ((lo[2] as f64 + params.wall_height).abs() < tol, "min z at stand foot"),
        (hi[2] as f64 <= params.max_height + tol, "max z within relief"),
    ];
    match checks.iter().find(|(ok, _)| !ok) {
        None => OracleVerdict::pass(
            "bounding_box",
            format!("min {:?} max {:?}", lo, hi),
        ),
        Some((_, what)) => OracleVerdict::fail(
            "bounding_box",
            format!("{} violated: min {:?} max {:?}", what, lo, hi),
        ),
    }
}

/// Reading the bytes back yields the same triangles.
pub fn check_stl_round_trip(bytes: &[u8], mesh: &Mesh) -> OracleVerdict {
    match read_stl(bytes) {
        Ok(triangles) if triangles == mesh.triangles => OracleVerdict::pass(
            "stl_round_trip",
            format!("{} triangles read back", triangles.len()),
        ),
        Ok(triangles) => {
            let first = triangles
                .iter()
                .zip(&mesh.triangles)
                .position(|(a, b)| a != b)
                .unwrap_or(triangles.len().min(mesh.triangle_count()));
            OracleVerdict::fail(
                "stl_round_trip",
                format!("triangles differ from index {}", first),
            )
        }
        Err(e) => OracleVerdict::fail("stl_round_trip", e.to_string()),
    }
}

// ── Composite ───────────────────────────────────────────────────────────────

/// Run every mesh-level oracle.
pub fn run_all_mesh_checks(
    mesh: &Mesh,
    params: &PanelParameters,
    resolution: usize,
) -> Vec<OracleVerdict> {
    vec![
        check_triangle_count(mesh, resolution),
        check_unit_normals(mesh, &Tolerance::default()),
        check_edge_manifold(mesh, Shell::Panel),
        check_edge_manifold(mesh, Shell::Stand),
        check_edge_manifold_mesh(mesh),
        check_relief_band(mesh, params),
        check_bounding_box(mesh, params),
    ]
}
