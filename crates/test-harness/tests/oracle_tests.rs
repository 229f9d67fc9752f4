//! Tests for verification oracles.

use litho_harness::PanelRun;
use litho_harness::helpers::gradient_rgba;
use litho_harness::oracle::*;
use litho_kernel::{PanelParameters, Tolerance};
use litho_tessellation::{Shell, SurfaceKind};

fn gradient_run() -> PanelRun {
    PanelRun::from_rgba(8, 8, &gradient_rgba(8, 8), &PanelParameters::default()).unwrap()
}

// ── Passing Cases ───────────────────────────────────────────────────────

#[test]
fn all_oracles_pass_for_gradient_panel() {
    let run = gradient_run();
    for verdict in run.verdicts() {
        assert!(verdict.passed, "{}: {}", verdict.oracle_name, verdict.detail);
    }
}

#[test]
fn count_oracle_reports_value() {
    let run = gradient_run();
    let verdict = check_triangle_count(&run.mesh, 8);
    assert!(verdict.passed);
    assert_eq!(verdict.value, Some((4 * 64 + 12 * 8) as f64));
}

// ── Failing Cases ───────────────────────────────────────────────────────

#[test]
fn missing_triangle_breaks_count_and_manifold() {
    let mut run = gradient_run();
    let top = run.mesh.ranges[0];
    assert_eq!(top.kind, SurfaceKind::Top);
    run.mesh.triangles.remove(top.start + 3);
    for range in run.mesh.ranges.iter_mut() {
        if range.start > top.start {
            range.start -= 1;
        }
        range.end -= 1;
    }

    assert!(!check_triangle_count(&run.mesh, 8).passed);
    let manifold = check_edge_manifold(&run.mesh, Shell::Panel);
    assert!(!manifold.passed);
    assert_eq!(manifold.oracle_name, "edge_manifold_panel");
    assert!(check_edge_manifold(&run.mesh, Shell::Stand).passed);
}

#[test]
fn stray_triangle_fails_only_the_whole_mesh_check() {
    let mut run = gradient_run();
    // Outside every surface range, so the per-shell checks never see it.
    let bottom = run.mesh.surface(SurfaceKind::Bottom)[0];
    run.mesh.triangles.push(bottom);

    assert!(check_edge_manifold(&run.mesh, Shell::Panel).passed);
    assert!(check_edge_manifold(&run.mesh, Shell::Stand).passed);
    let whole = check_edge_manifold_mesh(&run.mesh);
    assert!(!whole.passed);
    assert_eq!(whole.value, Some(3.0));
}

#[test]
fn scaled_normal_fails_unit_check() {
    let mut run = gradient_run();
    run.mesh.triangles[5].normal = [0.0, 0.0, 1.1];
    assert!(!check_unit_normals(&run.mesh, &Tolerance::default()).passed);
}

#[test]
fn truncated_bytes_fail_length_and_round_trip() {
    let run = gradient_run();
    let short = &run.stl[..run.stl.len() - 50];
    assert!(!check_stl_len(short, 8).passed);
    assert!(!check_stl_round_trip(short, &run.mesh).passed);
}

#[test]
fn flipped_byte_fails_round_trip() {
    let run = gradient_run();
    let mut bytes = run.stl.clone();
    bytes[84 + 50 * 7 + 20] ^= 0x40;
    let verdict = check_stl_round_trip(&bytes, &run.mesh);
    assert!(!verdict.passed);
    assert!(verdict.detail.contains("index 7"), "{}", verdict.detail);
}

#[test]
fn relief_above_max_height_fails_band() {
    let run = gradient_run();
    let lower = PanelParameters {
        max_height: 1.0,
        ..run.params
    };
    assert!(!check_relief_band(&run.mesh, &lower).passed);
}

#[test]
fn verify_names_the_failing_oracle() {
    let mut run = gradient_run();
    run.stl.truncate(100);
    let err = run.verify().unwrap_err().to_string();
    assert!(err.contains("stl_len"), "{err}");
}
