//! Binary STL: exact-size buffers, a pure cursor writer, a lock-free parallel
//! fill and a reader for round trips.
//!
//! Layout: an 80-byte zero header, a little-endian `u32` triangle count, then
//! one 50-byte record per triangle (normal, three vertices, `u16` attribute).

use std::sync::Mutex;

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use litho_kernel::{LithoError, Result, Triangle, Vertex};
use litho_tessellation::{
    GenerationControl, Mesh, PolarMeshBuilder, STL_PREAMBLE_LEN, STL_RECORD_LEN,
};

use crate::errors::LoadError;

const HEADER_LEN: usize = 80;

/// Exact file size for `triangle_count` triangles.
pub fn stl_len(triangle_count: usize) -> usize {
    STL_PREAMBLE_LEN + STL_RECORD_LEN * triangle_count
}

/// Write position inside a preallocated STL buffer.
///
/// Each write consumes the cursor and returns the advanced one, so a cursor
/// value always names exactly how much of the buffer has been filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StlCursor {
    offset: usize,
}

impl StlCursor {
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Encode one record at the cursor.
    pub fn write_triangle(self, buf: &mut [u8], triangle: &Triangle) -> Result<StlCursor> {
        let end = self.offset + STL_RECORD_LEN;
        if end > buf.len() {
            return Err(LithoError::SizeMismatch {
                expected: buf.len(),
                actual: end,
            });
        }
        encode_record(&mut buf[self.offset..end], triangle);
        Ok(StlCursor { offset: end })
    }

    /// Succeeds only if every byte of `buf` has been written.
    pub fn finish(self, buf: &[u8]) -> Result<()> {
        if self.offset != buf.len() {
            return Err(LithoError::SizeMismatch {
                expected: buf.len(),
                actual: self.offset,
            });
        }
        Ok(())
    }
}

/// Zero the header, store the count and return a cursor at the first record.
///
/// `buf` must already be exactly [`stl_len`]`(triangle_count)` bytes.
pub fn write_header(buf: &mut [u8], triangle_count: usize) -> Result<StlCursor> {
    let expected = stl_len(triangle_count);
    if buf.len() != expected {
        return Err(LithoError::SizeMismatch {
            expected,
            actual: buf.len(),
        });
    }
    let count = u32::try_from(triangle_count).map_err(|_| LithoError::SizeMismatch {
        expected: u32::MAX as usize,
        actual: triangle_count,
    })?;
    buf[..HEADER_LEN].fill(0);
    buf[HEADER_LEN..STL_PREAMBLE_LEN].copy_from_slice(&count.to_le_bytes());
    Ok(StlCursor {
        offset: STL_PREAMBLE_LEN,
    })
}

/// Fill one 50-byte record.
fn encode_record(record: &mut [u8], triangle: &Triangle) {
    let floats = triangle
        .normal
        .iter()
        .copied()
        .chain(triangle.vertices.iter().flat_map(|v| v.to_array()));
    for (slot, value) in record.chunks_exact_mut(4).zip(floats) {
        slot.copy_from_slice(&value.to_le_bytes());
    }
    record[STL_RECORD_LEN - 2..].fill(0);
}

/// Serialize a finished mesh. The buffer is allocated once at its final size.
#[instrument(skip(mesh), fields(triangles = mesh.triangle_count()))]
pub fn write_stl(mesh: &Mesh) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; stl_len(mesh.triangle_count())];
    let mut cursor = write_header(&mut buf, mesh.triangle_count())?;
    for triangle in &mesh.triangles {
        cursor = cursor.write_triangle(&mut buf, triangle)?;
    }
    cursor.finish(&buf)?;
    debug!(bytes = buf.len(), "binary STL written");
    Ok(buf)
}

/// Generate and serialize straight into one buffer, one ring of records per
/// task.
///
/// Every record's offset is fixed by the layout, so tasks write disjoint
/// slices and need no locking. The bytes equal those of [`write_stl`] over
/// [`PolarMeshBuilder::build`]. Progress is reported under stage `"stl"`
/// as each ring finishes, in increasing order. When triangles are rejected,
/// which offending index is reported depends on scheduling.
#[instrument(skip(builder, control), fields(resolution = builder.resolution()))]
pub fn write_stl_parallel(
    builder: &PolarMeshBuilder<'_>,
    control: &GenerationControl,
) -> Result<Vec<u8>> {
    control.checkpoint()?;
    let layout = builder.layout();
    let total = layout.total();
    let mut buf = vec![0u8; layout.stl_len()];
    write_header(&mut buf, total)?;

    let per_task = layout.resolution().max(1);
    let tasks = total.div_ceil(per_task);
    // Held while reporting so fractions reach the callback in order.
    let finished = Mutex::new(0usize);

    buf[STL_PREAMBLE_LEN..]
        .par_chunks_mut(per_task * STL_RECORD_LEN)
        .enumerate()
        .try_for_each(|(task, records)| {
            control.checkpoint()?;
            for (n, record) in records.chunks_exact_mut(STL_RECORD_LEN).enumerate() {
                let triangle = builder.triangle(task * per_task + n)?;
                encode_record(record, &triangle);
            }
            if let Ok(mut done) = finished.lock() {
                *done += 1;
                control.report("stl", *done as f32 / tasks as f32);
            }
            Ok::<(), LithoError>(())
        })?;

    info!(triangles = total, bytes = buf.len(), "binary STL filled");
    Ok(buf)
}

fn read_f32(record: &[u8], at: usize) -> f32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&record[at..at + 4]);
    f32::from_le_bytes(bytes)
}

/// Parse a binary STL body back into triangles.
///
/// The length must be exactly `84 + 50·N` for the stored count `N`.
pub fn read_stl(bytes: &[u8]) -> std::result::Result<Vec<Triangle>, LoadError> {
    if bytes.len() < STL_PREAMBLE_LEN {
        return Err(LoadError::StlLength {
            triangles: 0,
            expected: STL_PREAMBLE_LEN,
            actual: bytes.len(),
        });
    }
    let mut count = [0u8; 4];
    count.copy_from_slice(&bytes[HEADER_LEN..STL_PREAMBLE_LEN]);
    let triangles = u32::from_le_bytes(count) as usize;
    let expected = stl_len(triangles);
    if bytes.len() != expected {
        return Err(LoadError::StlLength {
            triangles,
            expected,
            actual: bytes.len(),
        });
    }

    Ok(bytes[STL_PREAMBLE_LEN..]
        .chunks_exact(STL_RECORD_LEN)
        .map(|record| {
            let vertex = |at: usize| {
                Vertex::new(
                    read_f32(record, at),
                    read_f32(record, at + 4),
                    read_f32(record, at + 8),
                )
            };
            Triangle {
                normal: [read_f32(record, 0), read_f32(record, 4), read_f32(record, 8)],
                vertices: [vertex(12), vertex(24), vertex(36)],
            }
        })
        .collect())
}
