//! Unit tests for mg-dictionary.
//!
//! All tests run on the unit square (F0 = [v0, v1, v2], F1 = [v0, v2, v3],
//! shared diagonal v0–v2).

#[cfg(test)]
mod helpers {
    use mg_core::{FaceId, FaceLocation, TracerConfig};
    use mg_mesh::{TriangleMesh, shapes};

    use crate::Dictionary;

    pub fn setup() -> (TriangleMesh, Dictionary) {
        (shapes::square(1.0).unwrap(), Dictionary::new(&TracerConfig::default()))
    }

    pub fn at(face: u32, c: [f64; 3]) -> FaceLocation {
        FaceLocation::new(FaceId(face), c)
    }
}

// ── Insertion & lookup ────────────────────────────────────────────────────────

#[cfg(test)]
mod insertion {
    use mg_core::FaceId;

    use super::helpers::{at, setup};

    #[test]
    fn insertion_is_idempotent() {
        let (mesh, mut dict) = setup();
        let (a, new_a) = dict.insert(&at(0, [0.2, 0.3, 0.5]), &mesh);
        let (b, new_b) = dict.insert(&at(0, [0.2, 0.3, 0.5]), &mesh);
        assert!(new_a);
        assert!(!new_b);
        assert_eq!(a, b);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.point_count(), 1);
    }

    #[test]
    fn edge_location_gets_sibling() {
        let (mesh, mut dict) = setup();
        let (e, _) = dict.insert(&at(0, [0.75, 0.0, 0.25]), &mesh);
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.point_count(), 1);

        let s = dict.get_sibling(e, FaceId(1)).unwrap();
        assert_ne!(s, e);
        assert!(dict.is_sibling(e, s));
        assert_eq!(dict.location(s).coords, [0.75, 0.25, 0.0]);
        assert_eq!(dict.get_sibling(e, FaceId(0)), Some(e));
        assert_eq!(dict.get_sibling(s, FaceId(0)), Some(e));
        assert_eq!(dict.get_sibling(s, FaceId(1)), Some(s));

        // Inserting the sibling location returns the sibling entry.
        let (again, is_new) = dict.insert(&at(1, [0.75, 0.25, 0.0]), &mesh);
        assert_eq!(again, s);
        assert!(!is_new);
    }

    #[test]
    fn vertex_location_gets_entry_per_incident_face() {
        let (mesh, mut dict) = setup();
        let (e, _) = dict.insert(&at(1, [1.0, 0.0, 0.0]), &mesh);
        assert_eq!(dict.face(e), FaceId(1));
        assert_eq!(dict.len(), 2);
        assert!(dict.get_sibling(e, FaceId(0)).is_some());
        // v1 only touches F0.
        let (v1, _) = dict.insert(&at(0, [0.0, 1.0, 0.0]), &mesh);
        assert!(dict.get_sibling(v1, FaceId(1)).is_none());
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn interior_location_has_no_sibling() {
        let (mesh, mut dict) = setup();
        let (e, _) = dict.insert(&at(0, [0.2, 0.3, 0.5]), &mesh);
        assert!(dict.get_sibling(e, FaceId(1)).is_none());
    }

    #[test]
    fn find_uses_snapped_location() {
        let (mesh, mut dict) = setup();
        let (e, _) = dict.insert(&at(0, [0.5, 0.5, 0.0]), &mesh);
        assert_eq!(dict.find(&at(0, [0.5, 0.5, 1e-15])), Some(e));
        assert_eq!(dict.find(&at(0, [0.5, 0.5, -0.0])), Some(e));
        assert_eq!(dict.find(&at(0, [0.4, 0.6, 0.0])), None);
    }

    #[test]
    fn nearby_location_snaps_to_existing_entry() {
        let (mesh, mut dict) = setup();
        let (a, _) = dict.insert(&at(0, [0.2, 0.3, 0.5]), &mesh);
        let (b, is_new) = dict.insert(&at(0, [0.2 + 1e-10, 0.3, 0.5 - 1e-10]), &mesh);
        assert_eq!(a, b);
        assert!(!is_new);
        let (c, is_new) = dict.insert(&at(0, [0.2 + 1e-3, 0.3, 0.5 - 1e-3]), &mesh);
        assert_ne!(a, c);
        assert!(is_new);
    }

    #[test]
    fn snapping_prefers_lowest_entry() {
        let (mesh, mut dict) = setup();
        let (a, _) = dict.insert(&at(0, [0.2, 0.3, 0.5]), &mesh);
        let (b, _) = dict.insert(&at(0, [0.2 + 1e-3, 0.3, 0.5 - 1e-3]), &mesh);
        assert!(a < b);
        let probe = at(0, [0.2 + 5e-4, 0.3, 0.5 - 5e-4]);
        let p = mg_mesh::FaceComplex::location_to_point(&mesh, &probe);
        assert_eq!(dict.snap_to_existing(&probe, p, 1e-4), Some(a));
        assert_eq!(dict.snap_to_existing(&probe, p, 1e-12), None);
    }

    #[test]
    fn entries_iterate_in_creation_order() {
        let (mesh, mut dict) = setup();
        dict.insert(&at(0, [0.2, 0.3, 0.5]), &mesh);
        dict.insert(&at(1, [0.2, 0.3, 0.5]), &mesh);
        let faces: Vec<u32> = dict.entries().map(|(_, e)| e.location.face.0).collect();
        assert_eq!(faces, vec![0, 1]);
        // Restartable.
        assert_eq!(dict.entries().count(), 2);
    }
}

// ── Visits & blocking ─────────────────────────────────────────────────────────

#[cfg(test)]
mod visits {
    use mg_core::{AgentId, FaceId};

    use super::helpers::{at, setup};
    use crate::DictionaryError;

    #[test]
    fn visits_are_shared_between_siblings() {
        let (mesh, mut dict) = setup();
        let (e, _) = dict
            .insert_visited(&at(0, [0.75, 0.0, 0.25]), &mesh, AgentId(3), 1.5)
            .unwrap();
        let s = dict.get_sibling(e, FaceId(1)).unwrap();
        assert_eq!(dict.visit_time(s, AgentId(3)), Some(1.5));
        dict.block(s);
        assert!(dict.is_blocked(e));
    }

    #[test]
    fn inconsistent_visit_is_rejected() {
        let (mesh, mut dict) = setup();
        let loc = at(0, [0.2, 0.3, 0.5]);
        dict.insert_visited(&loc, &mesh, AgentId(0), 1.0).unwrap();
        // Same time within tolerance is fine.
        dict.insert_visited(&loc, &mesh, AgentId(0), 1.0 + f64::EPSILON / 2.0).unwrap();
        assert!(matches!(
            dict.insert_visited(&loc, &mesh, AgentId(0), 2.0),
            Err(DictionaryError::InconsistentVisit { .. })
        ));
    }

    #[test]
    fn visit_queries() {
        let (mesh, mut dict) = setup();
        let (e, _) = dict.insert(&at(0, [0.2, 0.3, 0.5]), &mesh);
        dict.add_visit(e, AgentId(2), 3.0).unwrap();
        dict.add_visit(e, AgentId(1), 3.0).unwrap();
        dict.add_visit(e, AgentId(0), 5.0).unwrap();

        assert_eq!(dict.earliest_visit(e), Some((AgentId(1), 3.0)));
        assert_eq!(dict.visit_in_range(e, AgentId(0), 4.0, 5.0), Some(5.0));
        assert_eq!(dict.visit_in_range(e, AgentId(0), 0.0, 4.9), None);
        assert_eq!(dict.simultaneous_visitor(e, AgentId(2), 3.0, 0.0), Some(AgentId(1)));
        assert_eq!(dict.simultaneous_visitor(e, AgentId(0), 5.0, 0.1), None);
        assert_eq!(dict.visitors(e).count(), 3);
    }

    #[test]
    fn removing_a_visit() {
        let (mesh, mut dict) = setup();
        let (e, _) = dict.insert(&at(0, [0.2, 0.3, 0.5]), &mesh);
        dict.add_visit(e, AgentId(0), 1.0).unwrap();
        assert_eq!(dict.remove_visit(e, AgentId(0)), Some(1.0));
        assert_eq!(dict.remove_visit(e, AgentId(0)), None);
        assert_eq!(dict.earliest_visit(e), None);
        // Now a different time is accepted.
        dict.add_visit(e, AgentId(0), 2.0).unwrap();
    }

    #[test]
    fn fresh_points_are_unblocked() {
        let (mesh, mut dict) = setup();
        let (e, _) = dict.insert(&at(1, [0.1, 0.1, 0.8]), &mesh);
        assert!(!dict.is_blocked(e));
    }
}
