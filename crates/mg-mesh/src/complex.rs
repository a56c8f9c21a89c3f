//! The face-complex abstraction consumed by the tracer.
//!
//! # Conventions
//!
//! - Faces are triangles with vertices `[v0, v1, v2]`; a [`FaceLocation`]'s
//!   weights follow that order.
//! - Face `f` owns halfedges `3f`, `3f + 1`, `3f + 2`.  Halfedge `3f + i`
//!   runs from `v_i` to `v_{(i + 1) % 3}`.
//! - A location lies on halfedge `i` iff weight `(i + 2) % 3` is zero, and on
//!   vertex `i` iff weight `i` is one.
//!
//! Only the primitive queries are required; everything the tracer needs on
//! top (descriptors, sibling locations, common faces) is provided in terms
//! of them.

use mg_core::{FaceId, FaceLocation, HalfedgeId, Point3, Vector3, VertexId};

use crate::MeshResult;

/// The simplex a location lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Descriptor {
    Vertex(VertexId),
    Halfedge(HalfedgeId),
    Face(FaceId),
}

/// Local index (0..3) of a halfedge within its face.
#[inline]
pub fn local_index(h: HalfedgeId) -> usize {
    (h.0 % 3) as usize
}

/// Halfedge `i` of `face`.
#[inline]
pub fn halfedge_of(face: FaceId, i: usize) -> HalfedgeId {
    HalfedgeId(face.0 * 3 + (i % 3) as u32)
}

/// Triangulated, orientable 2-manifold (with boundary) the agents drive on.
pub trait FaceComplex {
    // ── Required ──────────────────────────────────────────────────────────

    fn face_count(&self) -> usize;

    fn vertex_count(&self) -> usize;

    fn face_vertices(&self, face: FaceId) -> [VertexId; 3];

    fn vertex_position(&self, v: VertexId) -> Point3;

    /// The twin of `h` in the adjacent face, `None` on the mesh boundary.
    fn opposite(&self, h: HalfedgeId) -> Option<HalfedgeId>;

    /// Faces incident to `v`, in ascending id order.
    fn faces_around_vertex(&self, v: VertexId) -> &[FaceId];

    /// `true` if `v` touches the mesh boundary.
    fn is_border_vertex(&self, v: VertexId) -> bool;

    /// Locate a 3D point on the surface.
    fn locate(&self, p: Point3) -> MeshResult<FaceLocation>;

    // ── Provided ──────────────────────────────────────────────────────────

    #[inline]
    fn face_of(&self, h: HalfedgeId) -> FaceId {
        FaceId(h.0 / 3)
    }

    fn face_halfedges(&self, face: FaceId) -> [HalfedgeId; 3] {
        [halfedge_of(face, 0), halfedge_of(face, 1), halfedge_of(face, 2)]
    }

    /// `(source, target)` vertices of `h`.
    fn halfedge_vertices(&self, h: HalfedgeId) -> (VertexId, VertexId) {
        let vs = self.face_vertices(self.face_of(h));
        let i = local_index(h);
        (vs[i], vs[(i + 1) % 3])
    }

    #[inline]
    fn is_border_halfedge(&self, h: HalfedgeId) -> bool {
        self.opposite(h).is_none()
    }

    fn face_points(&self, face: FaceId) -> [Point3; 3] {
        let [a, b, c] = self.face_vertices(face);
        [self.vertex_position(a), self.vertex_position(b), self.vertex_position(c)]
    }

    /// Unit normal of `face` (zero for a degenerate face).
    fn face_normal(&self, face: FaceId) -> Vector3 {
        let [a, b, c] = self.face_points(face);
        let n = (b - a).cross(c - a);
        let len = n.length();
        if len == 0.0 { n } else { n * (1.0 / len) }
    }

    fn face_area(&self, face: FaceId) -> f64 {
        let [a, b, c] = self.face_points(face);
        0.5 * (b - a).cross(c - a).length()
    }

    /// Barycentric weights of `p` projected onto the plane of `face`.
    ///
    /// Weights may be negative when the projection falls outside the face.
    fn locate_in_face(&self, face: FaceId, p: Point3) -> FaceLocation {
        let [a, b, c] = self.face_points(face);
        let e0 = b - a;
        let e1 = c - a;
        let d = p - a;
        let d00 = e0.dot(e0);
        let d01 = e0.dot(e1);
        let d11 = e1.dot(e1);
        let d20 = d.dot(e0);
        let d21 = d.dot(e1);
        let denom = d00 * d11 - d01 * d01;
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        FaceLocation::new(face, [1.0 - v - w, v, w])
    }

    fn location_to_point(&self, loc: &FaceLocation) -> Point3 {
        Point3::weighted(self.face_points(loc.face), loc.coords)
    }

    /// The lowest-dimensional simplex holding `loc`.
    fn descriptor(&self, loc: &FaceLocation) -> Descriptor {
        if let Some(i) = loc.vertex_index() {
            return Descriptor::Vertex(self.face_vertices(loc.face)[i]);
        }
        match loc.coords.iter().position(|&w| w == 0.0) {
            // Zero weight k is opposite halfedge (k + 1) % 3.
            Some(k) => Descriptor::Halfedge(halfedge_of(loc.face, (k + 1) % 3)),
            None => Descriptor::Face(loc.face),
        }
    }

    /// `true` if `loc` lies on the closed halfedge `h` (either side).
    fn is_on_halfedge(&self, loc: &FaceLocation, h: HalfedgeId) -> bool {
        let on = |h: HalfedgeId| {
            self.face_of(h) == loc.face && loc.coords[(local_index(h) + 2) % 3] == 0.0
        };
        on(h) || self.opposite(h).is_some_and(on)
    }

    /// `true` if `loc` lies on the boundary of the mesh.
    fn is_on_border(&self, loc: &FaceLocation) -> bool {
        match self.descriptor(loc) {
            Descriptor::Vertex(v) => self.is_border_vertex(v),
            Descriptor::Halfedge(h) => self.is_border_halfedge(h),
            Descriptor::Face(_) => false,
        }
    }

    /// Faces in which `loc` can be expressed, in ascending order.
    fn incident_faces(&self, loc: &FaceLocation) -> Vec<FaceId> {
        match self.descriptor(loc) {
            Descriptor::Vertex(v) => self.faces_around_vertex(v).to_vec(),
            Descriptor::Halfedge(h) => {
                let mut faces = vec![loc.face];
                if let Some(o) = self.opposite(h) {
                    faces.push(self.face_of(o));
                }
                faces.sort_unstable();
                faces
            }
            Descriptor::Face(f) => vec![f],
        }
    }

    /// The same point expressed in `face`, if `loc` lies on `face`.
    fn sibling_location(&self, loc: &FaceLocation, face: FaceId) -> Option<FaceLocation> {
        if loc.face == face {
            return Some(*loc);
        }
        match self.descriptor(loc) {
            Descriptor::Vertex(v) => {
                let j = self.face_vertices(face).iter().position(|&u| u == v)?;
                Some(FaceLocation::vertex(face, j))
            }
            Descriptor::Halfedge(h) => {
                let o = self.opposite(h)?;
                if self.face_of(o) != face {
                    return None;
                }
                // h runs v_i -> v_{i+1}; o runs the other way, so its source
                // carries the weight of v_{i+1}.
                let i = local_index(h);
                let j = local_index(o);
                let mut coords = [0.0; 3];
                coords[j] = loc.coords[(i + 1) % 3];
                coords[(j + 1) % 3] = loc.coords[i];
                Some(FaceLocation::new(face, coords))
            }
            Descriptor::Face(_) => None,
        }
    }

    /// Halfedge of `fa` whose twin lies in `fb`.
    fn common_halfedge(&self, fa: FaceId, fb: FaceId) -> Option<HalfedgeId> {
        self.face_halfedges(fa)
            .into_iter()
            .find(|&h| self.opposite(h).is_some_and(|o| self.face_of(o) == fb))
    }

    /// Express `loc` and `reference` in a common face, preferring the face of
    /// `reference`, then the lowest face id.
    fn locate_in_common_face(
        &self,
        loc: &FaceLocation,
        reference: &FaceLocation,
    ) -> Option<(FaceLocation, FaceLocation)> {
        if loc.face == reference.face {
            return Some((*loc, *reference));
        }
        if let Some(l) = self.sibling_location(loc, reference.face) {
            return Some((l, *reference));
        }
        let theirs = self.incident_faces(reference);
        self.incident_faces(loc)
            .into_iter()
            .filter(|f| theirs.contains(f))
            .find_map(|f| {
                Some((self.sibling_location(loc, f)?, self.sibling_location(reference, f)?))
            })
    }
}
