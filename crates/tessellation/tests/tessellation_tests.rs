//! Integration tests for the polar mesh builder.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use proptest::prelude::*;

use litho_kernel::{HeightGrid, LithoError, PanelParameters, Tolerance, WALL_THICKNESS};
use litho_tessellation::{
    CancelToken, GenerationControl, PolarMeshBuilder, Shell, Slot, SurfaceKind, TriangleLayout,
    build_panel_mesh,
};

fn ramp_grid(resolution: usize) -> HeightGrid {
    let samples = (0..resolution * resolution)
        .map(|k| (k % resolution) as f64 * 200.0 / resolution as f64 + 10.0)
        .collect();
    HeightGrid::from_samples(resolution, samples).unwrap()
}

// ---------------------------------------------------------------------------
// 1. Triangle count and layout
// ---------------------------------------------------------------------------

#[test]
fn resolution_two_has_forty_triangles() {
    let grid = HeightGrid::uniform(2, 128.0).unwrap();
    let mesh = build_panel_mesh(&grid, &PanelParameters::default()).unwrap();
    assert_eq!(mesh.triangle_count(), 40);
    assert_eq!(TriangleLayout::new(2).stl_len(), 2084);
}

#[test]
fn surface_ranges_follow_layout() {
    let grid = ramp_grid(5);
    let builder = PolarMeshBuilder::new(&grid, &PanelParameters::default()).unwrap();
    let mesh = builder.build().unwrap();
    let layout = builder.layout();
    assert_eq!(mesh.ranges.len(), SurfaceKind::ALL.len());
    for range in &mesh.ranges {
        assert_eq!(range.start..range.end, layout.surface_range(range.kind));
    }
    assert_eq!(mesh.shell(Shell::Panel).len(), 2 * 25 * 2 + 2 * 5 * 2);
    assert_eq!(mesh.shell(Shell::Stand).len(), 8 * 5);
}

// ---------------------------------------------------------------------------
// 2. Geometry
// ---------------------------------------------------------------------------

#[test]
fn bounding_box_spans_stand_foot_to_relief() {
    let params = PanelParameters::default();
    let grid = ramp_grid(6);
    let mesh = build_panel_mesh(&grid, &params).unwrap();
    let (lo, hi) = mesh.bounding_box().unwrap();
    assert_relative_eq!(lo[2] as f64, -params.wall_height, epsilon = 1e-5);
    assert!(hi[2] as f64 <= params.max_height + 1e-5);
    assert!(hi[0] as f64 <= params.outer_radius() + 1e-4);
}

#[test]
fn seam_reuses_exact_first_column() {
    let grid = ramp_grid(7);
    let builder = PolarMeshBuilder::new(&grid, &PanelParameters::default()).unwrap();
    let last = builder.corners(&Slot { kind: SurfaceKind::Top, i: 3, j: 6, half: 0 });
    let first = builder.corners(&Slot { kind: SurfaceKind::Top, i: 3, j: 0, half: 0 });
    // (p11, p21, p22): p22 of the last column is p21 of the first.
    assert_eq!(last[2], first[1]);
}

#[test]
fn stand_sits_under_back_plane() {
    let params = PanelParameters::default();
    let grid = ramp_grid(4);
    let mesh = build_panel_mesh(&grid, &params).unwrap();
    for tri in mesh.surface(SurfaceKind::StandTop) {
        for v in &tri.vertices {
            assert_relative_eq!(v.z as f64, params.min_height, epsilon = 1e-6);
            let r = (v.x as f64).hypot(v.y as f64);
            assert!(r > params.wall_distance - 1e-4 && r < params.stand_outer_radius() + 1e-4);
        }
    }
}

#[test]
fn stand_wall_has_fixed_radii_and_height() {
    let params = PanelParameters::default();
    let grid = ramp_grid(4);
    let mesh = build_panel_mesh(&grid, &params).unwrap();
    for tri in mesh.surface(SurfaceKind::StandOuter) {
        for v in &tri.vertices {
            let r = (v.x as f64).hypot(v.y as f64);
            assert_relative_eq!(r, params.wall_distance + WALL_THICKNESS, epsilon = 1e-4);
            assert!(v.z as f64 >= -params.wall_height - 1e-5);
            assert!(v.z as f64 <= params.min_height + 1e-5);
        }
    }
    for tri in mesh.surface(SurfaceKind::StandInner) {
        for v in &tri.vertices {
            let r = (v.x as f64).hypot(v.y as f64);
            assert_relative_eq!(r, params.wall_distance, epsilon = 1e-4);
        }
    }
}

#[test]
fn stand_shares_no_vertex_with_panel() {
    // At R = 4 the default wall distance (30) lies exactly on ring 2.
    let params = PanelParameters::default();
    let grid = ramp_grid(4);
    let mesh = build_panel_mesh(&grid, &params).unwrap();
    let key = |v: &litho_kernel::Vertex| {
        [v.x, v.y, v.z].map(|c| (c as f64 * 1e4).round() as i64)
    };
    let panel: HashSet<[i64; 3]> = mesh
        .shell(Shell::Panel)
        .iter()
        .flat_map(|t| t.vertices.iter().map(key))
        .collect();
    for tri in mesh.shell(Shell::Stand) {
        for v in &tri.vertices {
            assert!(!panel.contains(&key(v)), "{v:?}");
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Control hooks
// ---------------------------------------------------------------------------

#[test]
fn cancelled_token_stops_generation() {
    let grid = ramp_grid(8);
    let token = CancelToken::new();
    token.cancel();
    let control = GenerationControl::new().with_cancel(token);
    let err = PolarMeshBuilder::new(&grid, &PanelParameters::default())
        .unwrap()
        .build_with(&control)
        .unwrap_err();
    assert_eq!(err, LithoError::Cancelled);
}

#[test]
fn progress_is_monotonic_and_finishes() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let control = GenerationControl::new().with_progress(move |stage, fraction| {
        sink.lock().unwrap().push((stage.to_string(), fraction));
    });
    let grid = ramp_grid(4);
    PolarMeshBuilder::new(&grid, &PanelParameters::default())
        .unwrap()
        .build_with(&control)
        .unwrap();

    let seen = seen.lock().unwrap();
    assert!(seen.windows(2).all(|w| w[0].1 <= w[1].1));
    assert_eq!(seen.first().map(|s| s.0.as_str()), Some("top"));
    assert_eq!(seen.last().map(|s| (s.0.as_str(), s.1)), Some(("complete", 1.0)));
}

// ---------------------------------------------------------------------------
// 4. Properties over arbitrary grids
// ---------------------------------------------------------------------------

fn arb_grid() -> impl Strategy<Value = HeightGrid> {
    (1usize..7).prop_flat_map(|r| {
        prop::collection::vec(0.0f64..=255.0, r * r)
            .prop_map(move |samples| HeightGrid::from_samples(r, samples).unwrap())
    })
}

proptest! {
    #[test]
    fn count_is_known_before_generation(grid in arb_grid()) {
        let builder = PolarMeshBuilder::new(&grid, &PanelParameters::default()).unwrap();
        let predicted = builder.predicted_triangle_count();
        let r = grid.resolution();
        prop_assert_eq!(predicted, 4 * r * r + 12 * r);
        prop_assert_eq!(builder.build().unwrap().triangle_count(), predicted);
    }

    #[test]
    fn normals_are_unit_or_sentinel(grid in arb_grid()) {
        let tolerance = Tolerance::default();
        let mesh = build_panel_mesh(&grid, &PanelParameters::default()).unwrap();
        for tri in &mesh.triangles {
            prop_assert!(tri.is_degenerate() || tolerance.is_unit(tri.normal_length()));
        }
    }

    #[test]
    fn relief_stays_in_height_band(grid in arb_grid()) {
        let params = PanelParameters::default();
        let mesh = build_panel_mesh(&grid, &params).unwrap();
        for tri in mesh.surface(SurfaceKind::Top) {
            for v in &tri.vertices {
                let z = v.z as f64;
                prop_assert!(z >= params.min_height - 1e-5 && z <= params.max_height + 1e-5);
            }
        }
    }
}
