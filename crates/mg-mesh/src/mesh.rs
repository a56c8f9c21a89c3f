//! In-memory triangle mesh and builder.
//!
//! # Data layout
//!
//! Faces are stored as vertex triples indexed by `FaceId`.  Halfedges are
//! implicit (`3f + i`), so the only per-halfedge array is `opposite`.  Each
//! vertex keeps the sorted list of its incident faces, which is what the
//! vertex collision checks iterate.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) of face bounding boxes answers point location.

use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use mg_core::{FaceId, FaceLocation, HalfedgeId, Point3, VertexId};

use crate::complex::{FaceComplex, halfedge_of};
use crate::{MeshError, MeshResult};

/// Relative slack accepted when deciding that a point lies on a face.
const LOCATE_EPS: f64 = 1e-9;

// ── R-tree face entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct FaceEntry {
    envelope: AABB<[f64; 3]>,
    id: FaceId,
}

impl RTreeObject for FaceEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

// ── TriangleMesh ──────────────────────────────────────────────────────────────

/// Triangle mesh with implicit halfedges and a face locator.
///
/// Do not construct directly; use [`TriangleMeshBuilder`].
pub struct TriangleMesh {
    /// Position of each vertex.  Indexed by `VertexId`.
    pub vertex_pos: Vec<Point3>,

    /// Vertex triple of each face.  Indexed by `FaceId`.
    pub faces: Vec<[VertexId; 3]>,

    /// Twin of each halfedge (`None` on the boundary).  Indexed by `HalfedgeId`.
    opposite: Vec<Option<HalfedgeId>>,

    /// Incident faces of each vertex, ascending.
    vertex_faces: Vec<Vec<FaceId>>,

    vertex_on_border: Vec<bool>,

    border_tolerance: f64,

    spatial_idx: RTree<FaceEntry>,
}

impl TriangleMesh {
    pub fn border_tolerance(&self) -> f64 {
        self.border_tolerance
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Total surface area.
    pub fn area(&self) -> f64 {
        (0..self.faces.len()).map(|f| self.face_area(FaceId(f as u32))).sum()
    }

    /// Number of halfedges without a twin.
    pub fn border_halfedge_count(&self) -> usize {
        self.opposite.iter().filter(|o| o.is_none()).count()
    }

    /// Clamp slightly negative weights, renormalize, then snap to the border.
    fn clean_location(&self, loc: FaceLocation) -> FaceLocation {
        let mut c = loc.coords.map(|w| w.max(0.0));
        let sum: f64 = c.iter().sum();
        if sum > 0.0 && sum != 1.0 {
            c = c.map(|w| w / sum);
        }
        FaceLocation::new(loc.face, c).snapped_to_border(self.border_tolerance)
    }
}

impl FaceComplex for TriangleMesh {
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex_count(&self) -> usize {
        self.vertex_pos.len()
    }

    #[inline]
    fn face_vertices(&self, face: FaceId) -> [VertexId; 3] {
        self.faces[face.index()]
    }

    #[inline]
    fn vertex_position(&self, v: VertexId) -> Point3 {
        self.vertex_pos[v.index()]
    }

    #[inline]
    fn opposite(&self, h: HalfedgeId) -> Option<HalfedgeId> {
        self.opposite[h.index()]
    }

    fn faces_around_vertex(&self, v: VertexId) -> &[FaceId] {
        &self.vertex_faces[v.index()]
    }

    fn is_border_vertex(&self, v: VertexId) -> bool {
        self.vertex_on_border[v.index()]
    }

    /// Find the face holding `p`.
    ///
    /// Among candidate faces the one where `p` is deepest inside wins; ties go
    /// to the lowest face id.  The result is snapped to the face border.
    fn locate(&self, p: Point3) -> MeshResult<FaceLocation> {
        let e = LOCATE_EPS;
        let query = AABB::from_corners([p.x - e, p.y - e, p.z - e], [p.x + e, p.y + e, p.z + e]);

        let mut candidates: Vec<FaceId> = self
            .spatial_idx
            .locate_in_envelope_intersecting(&query)
            .map(|entry| entry.id)
            .collect();
        candidates.sort_unstable();

        let mut best: Option<(f64, FaceLocation)> = None;
        for face in candidates {
            let loc = self.locate_in_face(face, p);
            let depth = loc.coords.iter().copied().fold(f64::INFINITY, f64::min);
            if depth < -LOCATE_EPS {
                continue;
            }
            let [a, b, c] = self.face_points(face);
            let scale = a.distance(b).max(b.distance(c)).max(c.distance(a)).max(1.0);
            let off_plane = (p - a).dot(self.face_normal(face)).abs();
            if off_plane > LOCATE_EPS * scale {
                continue;
            }
            if best.as_ref().is_none_or(|(d, _)| depth > *d) {
                best = Some((depth, loc));
            }
        }

        best.map(|(_, loc)| self.clean_location(loc))
            .ok_or(MeshError::PointOutsideMesh(p))
    }
}

// ── TriangleMeshBuilder ───────────────────────────────────────────────────────

/// Construct a [`TriangleMesh`] from vertices and consistently oriented
/// triangles, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use mg_core::Point3;
/// use mg_mesh::{FaceComplex, TriangleMeshBuilder};
///
/// let mut b = TriangleMeshBuilder::new();
/// let v0 = b.add_vertex(Point3::new(0.0, 0.0, 0.0));
/// let v1 = b.add_vertex(Point3::new(1.0, 0.0, 0.0));
/// let v2 = b.add_vertex(Point3::new(1.0, 1.0, 0.0));
/// let v3 = b.add_vertex(Point3::new(0.0, 1.0, 0.0));
/// b.add_face(v0, v1, v2);
/// b.add_face(v0, v2, v3);
/// let mesh = b.build().unwrap();
/// assert_eq!(mesh.face_count(), 2);
/// ```
pub struct TriangleMeshBuilder {
    vertices: Vec<Point3>,
    faces: Vec<[VertexId; 3]>,
    border_tolerance: f64,
}

impl TriangleMeshBuilder {
    pub fn new() -> Self {
        Self { vertices: Vec::new(), faces: Vec::new(), border_tolerance: 1e-12 }
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
            border_tolerance: 1e-12,
        }
    }

    /// Tolerance used to snap located points onto face borders.
    pub fn border_tolerance(mut self, tol: f64) -> Self {
        self.border_tolerance = tol;
        self
    }

    /// Add a vertex and return its `VertexId` (sequential from 0).
    pub fn add_vertex(&mut self, pos: Point3) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(pos);
        id
    }

    /// Add a counter-clockwise triangle and return its `FaceId`.
    pub fn add_face(&mut self, a: VertexId, b: VertexId, c: VertexId) -> FaceId {
        let id = FaceId(self.faces.len() as u32);
        self.faces.push([a, b, c]);
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Validate connectivity, pair halfedges, and bulk-load the face locator.
    pub fn build(self) -> MeshResult<TriangleMesh> {
        if self.faces.is_empty() {
            return Err(MeshError::Empty);
        }
        let n_vertices = self.vertices.len();

        let mut vertex_faces: Vec<Vec<FaceId>> = vec![Vec::new(); n_vertices];
        let mut directed: FxHashMap<(VertexId, VertexId), HalfedgeId> = FxHashMap::default();

        for (f, tri) in self.faces.iter().enumerate() {
            let face = FaceId(f as u32);
            for &v in tri {
                if v.index() >= n_vertices {
                    return Err(MeshError::VertexNotFound { face, vertex: v });
                }
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[2] == tri[0] {
                return Err(MeshError::DegenerateFace(face));
            }
            let [a, b, c] = tri.map(|v| self.vertices[v.index()]);
            if (b - a).cross(c - a).is_zero() {
                return Err(MeshError::DegenerateFace(face));
            }

            for i in 0..3 {
                let from = tri[i];
                let to = tri[(i + 1) % 3];
                if directed.insert((from, to), halfedge_of(face, i)).is_some() {
                    return Err(MeshError::NonManifoldEdge { from, to });
                }
                vertex_faces[from.index()].push(face);
            }
        }

        let mut opposite = vec![None; self.faces.len() * 3];
        let mut vertex_on_border = vec![false; n_vertices];
        for (&(from, to), &h) in &directed {
            match directed.get(&(to, from)) {
                Some(&o) => opposite[h.index()] = Some(o),
                None => {
                    vertex_on_border[from.index()] = true;
                    vertex_on_border[to.index()] = true;
                }
            }
        }

        let entries: Vec<FaceEntry> = self
            .faces
            .iter()
            .enumerate()
            .map(|(f, tri)| {
                let ps = tri.map(|v| self.vertices[v.index()]);
                let lo = [
                    ps[0].x.min(ps[1].x).min(ps[2].x),
                    ps[0].y.min(ps[1].y).min(ps[2].y),
                    ps[0].z.min(ps[1].z).min(ps[2].z),
                ];
                let hi = [
                    ps[0].x.max(ps[1].x).max(ps[2].x),
                    ps[0].y.max(ps[1].y).max(ps[2].y),
                    ps[0].z.max(ps[1].z).max(ps[2].z),
                ];
                FaceEntry { envelope: AABB::from_corners(lo, hi), id: FaceId(f as u32) }
            })
            .collect();

        Ok(TriangleMesh {
            vertex_pos: self.vertices,
            faces: self.faces,
            opposite,
            vertex_faces,
            vertex_on_border,
            border_tolerance: self.border_tolerance,
            spatial_idx: RTree::bulk_load(entries),
        })
    }
}

impl Default for TriangleMeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}
