//! Small ready-made meshes, all in the `z = 0` plane.
//!
//! Cells are split along their `(i, j) -> (i + 1, j + 1)` diagonal, so the
//! lower-right triangle of cell `k` is face `2k` and the upper-left one is
//! face `2k + 1`.

use mg_core::Point3;

use crate::{MeshResult, TriangleMesh, TriangleMeshBuilder};

/// An `nx × ny` grid of square cells of side `cell`, with its lower-left
/// corner at the origin.
pub fn grid(nx: usize, ny: usize, cell: f64) -> MeshResult<TriangleMesh> {
    let mut b = TriangleMeshBuilder::with_capacity((nx + 1) * (ny + 1), 2 * nx * ny);
    for j in 0..=ny {
        for i in 0..=nx {
            b.add_vertex(Point3::new(i as f64 * cell, j as f64 * cell, 0.0));
        }
    }
    let v = |i: usize, j: usize| mg_core::VertexId((j * (nx + 1) + i) as u32);
    for j in 0..ny {
        for i in 0..nx {
            let (a, bb, c, d) = (v(i, j), v(i + 1, j), v(i + 1, j + 1), v(i, j + 1));
            b.add_face(a, bb, c);
            b.add_face(a, c, d);
        }
    }
    b.build()
}

/// The square `[0, side]²` as two triangles.
pub fn square(side: f64) -> MeshResult<TriangleMesh> {
    grid(1, 1, side)
}

/// A `1 × n` row of unit cells along the x axis.
pub fn strip(n: usize) -> MeshResult<TriangleMesh> {
    grid(n, 1, 1.0)
}
