//! Helper functions: error type, synthetic images, edge bookkeeping.

use std::collections::HashMap;

use litho_format::{ExportError, LoadError};
use litho_kernel::{LithoError, Triangle, Vertex};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("generation failed: {0}")]
    Generation(#[from] LithoError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("reading back failed: {0}")]
    Load(#[from] LoadError),

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },
}

// ── Synthetic Images ────────────────────────────────────────────────────────

/// RGBA8 bytes for a `width × height` image whose pixel `(x, y)` is `f(x, y)`.
pub fn rgba_from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> [u8; 4]) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&f(x, y));
        }
    }
    data
}

/// Opaque image of one gray level.
pub fn uniform_rgba(width: usize, height: usize, gray: u8) -> Vec<u8> {
    rgba_from_fn(width, height, |_, _| [gray, gray, gray, 255])
}

/// Horizontal ramp from near black on the left to light gray on the right.
/// Never pure white, so no wall collapses onto the back plane.
pub fn gradient_rgba(width: usize, height: usize) -> Vec<u8> {
    rgba_from_fn(width, height, |x, _| {
        let g = (10 + x * 230 / width.max(1)) as u8;
        [g, g, g, 255]
    })
}

/// Checkerboard of `cell`-pixel squares alternating between `dark` and `light`.
pub fn checker_rgba(width: usize, height: usize, cell: usize, dark: u8, light: u8) -> Vec<u8> {
    let cell = cell.max(1);
    rgba_from_fn(width, height, |x, y| {
        let g = if (x / cell + y / cell) % 2 == 0 { dark } else { light };
        [g, g, g, 255]
    })
}

// ── Edge Bookkeeping ────────────────────────────────────────────────────────

/// Vertex position quantized to 1e-4 mm so equal f32 coordinates hash alike.
pub type PosKey = (i64, i64, i64);

/// Undirected edge between two quantized positions, smaller key first.
pub type PosEdge = (PosKey, PosKey);

pub fn pos_key(v: &Vertex) -> PosKey {
    fn quantize(c: f32) -> i64 {
        (c as f64 * 10000.0).round() as i64
    }
    (quantize(v.x), quantize(v.y), quantize(v.z))
}

fn make_edge(a: PosKey, b: PosKey) -> PosEdge {
    if a <= b { (a, b) } else { (b, a) }
}

/// Count how many non-degenerate triangles use each edge.
///
/// Triangles carrying the zero-normal sentinel and zero-length edges are
/// skipped: a wall quad collapsed onto the back plane adds nothing.
pub fn count_edges<'a>(triangles: impl IntoIterator<Item = &'a Triangle>) -> HashMap<PosEdge, usize> {
    let mut counts = HashMap::new();
    for tri in triangles {
        if tri.is_degenerate() {
            continue;
        }
        let [a, b, c] = tri.vertices.map(|v| pos_key(&v));
        for (p, q) in [(a, b), (b, c), (c, a)] {
            if p != q {
                *counts.entry(make_edge(p, q)).or_insert(0) += 1;
            }
        }
    }
    counts
}
