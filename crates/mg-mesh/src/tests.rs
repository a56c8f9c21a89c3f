//! Unit tests for mg-mesh.
//!
//! Most tests use the unit square split along its diagonal:
//!
//! ```text
//!   v3 ---- v2
//!   |  F1 /  |
//!   |   /    |
//!   | /  F0  |
//!   v0 ---- v1
//! ```
//!
//! F0 = [v0, v1, v2] owns h0 (v0→v1), h1 (v1→v2), h2 (v2→v0);
//! F1 = [v0, v2, v3] owns h3 (v0→v2), h4 (v2→v3), h5 (v3→v0).

#[cfg(test)]
mod helpers {
    use crate::{TriangleMesh, shapes};

    pub fn unit_square() -> TriangleMesh {
        shapes::square(1.0).unwrap()
    }

    pub fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-12)
    }
}

// ── Builder & connectivity ────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use mg_core::{FaceId, HalfedgeId, Point3, VertexId};

    use super::helpers::unit_square;
    use crate::{FaceComplex, MeshError, TriangleMeshBuilder};

    #[test]
    fn square_connectivity() {
        let mesh = unit_square();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.border_halfedge_count(), 4);
        assert_eq!(mesh.opposite(HalfedgeId(2)), Some(HalfedgeId(3)));
        assert_eq!(mesh.opposite(HalfedgeId(3)), Some(HalfedgeId(2)));
        assert!(mesh.is_border_halfedge(HalfedgeId(0)));
        assert_eq!(mesh.common_halfedge(FaceId(0), FaceId(1)), Some(HalfedgeId(2)));
        assert_eq!(mesh.common_halfedge(FaceId(1), FaceId(0)), Some(HalfedgeId(3)));
    }

    #[test]
    fn faces_around_vertices_are_sorted() {
        let mesh = unit_square();
        assert_eq!(mesh.faces_around_vertex(VertexId(0)), &[FaceId(0), FaceId(1)]);
        assert_eq!(mesh.faces_around_vertex(VertexId(1)), &[FaceId(0)]);
        assert!(mesh.is_border_vertex(VertexId(2)));
    }

    #[test]
    fn halfedge_vertices_follow_face_order() {
        let mesh = unit_square();
        assert_eq!(mesh.halfedge_vertices(HalfedgeId(2)), (VertexId(2), VertexId(0)));
        assert_eq!(mesh.halfedge_vertices(HalfedgeId(3)), (VertexId(0), VertexId(2)));
    }

    #[test]
    fn area_and_normal() {
        let mesh = unit_square();
        assert!((mesh.area() - 1.0).abs() < 1e-15);
        let n = mesh.face_normal(FaceId(0));
        assert_eq!((n.x, n.y, n.z), (0.0, 0.0, 1.0));
    }

    #[test]
    fn empty_mesh_rejected() {
        assert!(matches!(TriangleMeshBuilder::new().build(), Err(MeshError::Empty)));
    }

    #[test]
    fn degenerate_face_rejected() {
        let mut b = TriangleMeshBuilder::new();
        let a = b.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let c = b.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let d = b.add_vertex(Point3::new(2.0, 0.0, 0.0));
        b.add_face(a, c, d);
        assert!(matches!(b.build(), Err(MeshError::DegenerateFace(FaceId(0)))));
    }

    #[test]
    fn duplicated_orientation_rejected() {
        let mut b = TriangleMeshBuilder::new();
        let a = b.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let c = b.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let d = b.add_vertex(Point3::new(0.0, 1.0, 0.0));
        b.add_face(a, c, d);
        b.add_face(a, c, d);
        assert!(matches!(b.build(), Err(MeshError::NonManifoldEdge { .. })));
    }

    #[test]
    fn missing_vertex_rejected() {
        let mut b = TriangleMeshBuilder::new();
        let a = b.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let c = b.add_vertex(Point3::new(1.0, 0.0, 0.0));
        b.add_face(a, c, VertexId(9));
        assert!(matches!(b.build(), Err(MeshError::VertexNotFound { .. })));
    }

    #[test]
    fn strip_dimensions() {
        let mesh = crate::shapes::strip(3).unwrap();
        assert_eq!(mesh.face_count(), 6);
        assert!((mesh.area() - 3.0).abs() < 1e-12);
        assert_eq!(mesh.border_halfedge_count(), 8);
    }
}

// ── Point location ────────────────────────────────────────────────────────────

#[cfg(test)]
mod locate {
    use mg_core::{FaceId, FaceLocation, HalfedgeId, Point3, VertexId};

    use super::helpers::{close, unit_square};
    use crate::{Descriptor, FaceComplex, MeshError};

    #[test]
    fn interior_point() {
        let mesh = unit_square();
        let loc = mesh.locate(Point3::new(0.75, 0.25, 0.0)).unwrap();
        assert_eq!(loc.face, FaceId(0));
        assert!(close(loc.coords, [0.25, 0.5, 0.25]));
        assert_eq!(mesh.descriptor(&loc), Descriptor::Face(FaceId(0)));
    }

    #[test]
    fn point_on_shared_edge_goes_to_lowest_face() {
        let mesh = unit_square();
        let loc = mesh.locate(Point3::new(0.25, 0.25, 0.0)).unwrap();
        assert_eq!(loc.face, FaceId(0));
        assert_eq!(loc.coords[1], 0.0);
        assert_eq!(mesh.descriptor(&loc), Descriptor::Halfedge(HalfedgeId(2)));
        assert!(!mesh.is_on_border(&loc));
    }

    #[test]
    fn point_on_vertex() {
        let mesh = unit_square();
        let loc = mesh.locate(Point3::new(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(mesh.descriptor(&loc), Descriptor::Vertex(VertexId(2)));
        assert!(mesh.is_on_border(&loc));
    }

    #[test]
    fn point_off_mesh() {
        let mesh = unit_square();
        assert!(matches!(
            mesh.locate(Point3::new(2.0, 0.5, 0.0)),
            Err(MeshError::PointOutsideMesh(_))
        ));
        assert!(mesh.locate(Point3::new(0.5, 0.25, 1.0)).is_err());
    }

    #[test]
    fn location_to_point_inverts_locate() {
        let mesh = unit_square();
        let p = Point3::new(0.1, 0.7, 0.0);
        let loc = mesh.locate(p).unwrap();
        let q = mesh.location_to_point(&loc);
        assert!(p.distance(q) < 1e-12);
    }

    #[test]
    fn border_edge_detection() {
        let mesh = unit_square();
        let bottom = FaceLocation::new(FaceId(0), [0.5, 0.5, 0.0]);
        assert_eq!(mesh.descriptor(&bottom), Descriptor::Halfedge(HalfedgeId(0)));
        assert!(mesh.is_on_border(&bottom));
    }
}

// ── Siblings & common faces ───────────────────────────────────────────────────

#[cfg(test)]
mod siblings {
    use mg_core::{FaceId, FaceLocation, HalfedgeId};

    use super::helpers::unit_square;
    use crate::FaceComplex;

    #[test]
    fn edge_sibling_swaps_weights() {
        let mesh = unit_square();
        let loc = FaceLocation::new(FaceId(0), [0.75, 0.0, 0.25]);
        let sib = mesh.sibling_location(&loc, FaceId(1)).unwrap();
        assert_eq!(sib.coords, [0.75, 0.25, 0.0]);
        let p = mesh.location_to_point(&loc);
        let q = mesh.location_to_point(&sib);
        assert!(p.distance(q) < 1e-15);
        // And back again.
        assert_eq!(mesh.sibling_location(&sib, FaceId(0)).unwrap().coords, loc.coords);
    }

    #[test]
    fn vertex_sibling() {
        let mesh = unit_square();
        let v2 = FaceLocation::vertex(FaceId(0), 2);
        let sib = mesh.sibling_location(&v2, FaceId(1)).unwrap();
        assert_eq!(sib.coords, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn interior_and_foreign_faces_have_no_sibling() {
        let mesh = unit_square();
        let inside = FaceLocation::new(FaceId(0), [0.2, 0.3, 0.5]);
        assert!(mesh.sibling_location(&inside, FaceId(1)).is_none());
        let v1 = FaceLocation::vertex(FaceId(0), 1);
        assert!(mesh.sibling_location(&v1, FaceId(1)).is_none());
    }

    #[test]
    fn on_halfedge_checks_both_sides() {
        let mesh = unit_square();
        let diag = FaceLocation::new(FaceId(0), [0.5, 0.0, 0.5]);
        assert!(mesh.is_on_halfedge(&diag, HalfedgeId(2)));
        assert!(mesh.is_on_halfedge(&diag, HalfedgeId(3)));
        assert!(!mesh.is_on_halfedge(&diag, HalfedgeId(0)));
    }

    #[test]
    fn common_face_of_vertex_and_interior() {
        let mesh = unit_square();
        let v0 = FaceLocation::vertex(FaceId(0), 0);
        let inside = FaceLocation::new(FaceId(1), [0.2, 0.3, 0.5]);
        let (a, b) = mesh.locate_in_common_face(&v0, &inside).unwrap();
        assert_eq!(a.face, FaceId(1));
        assert_eq!(a.coords, [1.0, 0.0, 0.0]);
        assert_eq!(b, inside);
    }

    #[test]
    fn no_common_face_between_interiors() {
        let mesh = unit_square();
        let a = FaceLocation::new(FaceId(0), [0.2, 0.3, 0.5]);
        let b = FaceLocation::new(FaceId(1), [0.2, 0.3, 0.5]);
        assert!(mesh.locate_in_common_face(&a, &b).is_none());
    }
}

// ── Random sampling ───────────────────────────────────────────────────────────

#[cfg(test)]
mod random {
    use mg_core::TraceRng;

    use crate::{FaceComplex, RandomPointsInMesh, shapes};

    #[test]
    fn samples_lie_on_mesh() {
        let mesh = shapes::grid(3, 2, 0.5).unwrap();
        let sampler = RandomPointsInMesh::new(&mesh);
        assert!((sampler.total_area() - 1.5).abs() < 1e-12);
        let mut rng = TraceRng::new(11);
        for _ in 0..200 {
            let loc = sampler.sample(&mut rng).unwrap();
            assert!(loc.face.index() < mesh.face_count());
            assert!(loc.is_inside(1e-12));
            let p = mesh.location_to_point(&loc);
            assert!((0.0..=1.5).contains(&p.x) && (0.0..=1.0).contains(&p.y));
        }
    }

    #[test]
    fn sampling_is_deterministic() {
        let mesh = shapes::square(2.0).unwrap();
        let sampler = RandomPointsInMesh::new(&mesh);
        let mut a = TraceRng::new(5);
        let mut b = TraceRng::new(5);
        for _ in 0..20 {
            assert_eq!(sampler.sample(&mut a), sampler.sample(&mut b));
        }
    }
}
