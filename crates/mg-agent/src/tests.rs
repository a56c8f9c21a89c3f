//! Unit tests for mg-agent.

#[cfg(test)]
mod helpers {
    use mg_core::{AgentId, EntryId, Point3, TracerConfig, Vector3};
    use mg_dictionary::Dictionary;
    use mg_mesh::{FaceComplex, TriangleMesh};

    use crate::{AgentSpec, Motorcycle};

    pub fn dict() -> Dictionary {
        Dictionary::new(&TracerConfig::default())
    }

    pub fn moving_east(id: u32) -> Motorcycle {
        let spec = AgentSpec::from_point(Point3::new(0.5, 0.25, 0.0)).towards(Vector3::new(1.0, 0.0, 0.0));
        Motorcycle::new(AgentId(id), spec).unwrap()
    }

    /// Motorcycle placed at `p` (located on `mesh`) at its start time.
    pub fn placed_at(
        mesh: &TriangleMesh,
        dict: &mut Dictionary,
        p: Point3,
        direction: Vector3,
    ) -> (Motorcycle, EntryId) {
        let spec = AgentSpec::from_point(p).towards(direction);
        let mut mc = Motorcycle::new(AgentId(0), spec).unwrap();
        let loc = mesh.locate(p).unwrap();
        let (e, _) = dict.insert(&loc, mesh);
        mc.place_at_source(e);
        (mc, e)
    }

    pub fn close(a: Point3, b: Point3) -> bool {
        a.distance(b) < 1e-9
    }
}

// ── AgentSpec ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spec_tests {
    use mg_core::{FaceId, FaceLocation, Point3, PointOrLocation, Vector3};

    use crate::AgentSpec;

    #[test]
    fn defaults() {
        let spec = AgentSpec::from_point(Point3::new(0.2, 0.1, 0.0));
        assert_eq!(spec.speed, 1.0);
        assert_eq!(spec.start_time, 0.0);
        assert!(spec.is_final);
        assert!(spec.destination.is_none());
        assert!(spec.direction.is_none());
    }

    #[test]
    fn builder_methods_chain() {
        let loc = FaceLocation::new(FaceId(1), [0.2, 0.3, 0.5]);
        let spec = AgentSpec::from_location(loc)
            .to_point(Point3::new(1.0, 0.5, 0.0))
            .towards(Vector3::new(1.0, 0.0, 0.0))
            .with_speed(3.0)
            .starting_at(2.0)
            .continue_past_destination();
        assert_eq!(spec.source, PointOrLocation::Location(loc));
        assert_eq!(spec.destination, Some(PointOrLocation::Point(Point3::new(1.0, 0.5, 0.0))));
        assert_eq!(spec.speed, 3.0);
        assert_eq!(spec.start_time, 2.0);
        assert!(!spec.is_final);
    }
}

// ── Motorcycle ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod motorcycle_tests {
    use mg_core::{AgentId, EntryId, FaceId, FaceLocation, Point3, Vector3};
    use mg_mesh::shapes;
    use mg_schedule::Scheduled;

    use super::helpers::{dict, moving_east};
    use crate::{AgentError, AgentSpec, Motorcycle, NextPath};

    #[test]
    fn rejects_invalid_inputs() {
        let p = Point3::new(0.5, 0.5, 0.0);
        let zero_speed = AgentSpec::from_point(p).with_speed(0.0);
        assert!(matches!(
            Motorcycle::new(AgentId(0), zero_speed),
            Err(AgentError::InvalidSpeed { .. })
        ));

        let nan_start = AgentSpec::from_point(p).starting_at(f64::NAN);
        assert!(matches!(
            Motorcycle::new(AgentId(1), nan_start),
            Err(AgentError::InvalidStartTime { .. })
        ));

        let zero_dir = AgentSpec::from_point(p).towards(Vector3::new(0.0, 0.0, 0.0));
        assert!(matches!(
            Motorcycle::new(AgentId(2), zero_dir),
            Err(AgentError::InvalidDirection(AgentId(2)))
        ));
    }

    #[test]
    fn fresh_motorcycle_is_departing() {
        let mc = moving_east(4);
        assert_eq!(mc.id(), AgentId(4));
        assert!(mc.is_departing());
        assert!(!mc.is_crashed());
        assert_eq!(mc.closest_target(), None);
        assert_eq!(mc.next_event_time(), None);
    }

    #[test]
    fn targets_stay_sorted() {
        let mut mc = moving_east(0);
        let v0 = mc.version();
        mc.add_target(EntryId(3), 2.0).unwrap();
        mc.add_target(EntryId(1), 1.0).unwrap();
        assert_eq!(mc.targets(), &[(EntryId(1), 1.0), (EntryId(3), 2.0)]);
        assert!(mc.version() > v0);
        assert_eq!(mc.next_event_time(), Some(1.0));
        assert_eq!(mc.has_target_at_time(2.0), Some(EntryId(3)));
        assert_eq!(mc.has_target_in_range(1.5, 3.0), Some((EntryId(3), 2.0)));
        assert!(mc.has_target(EntryId(1)));
        assert!(!mc.has_target(EntryId(2)));
    }

    #[test]
    fn same_time_target_is_ignored() {
        let mut mc = moving_east(0);
        mc.add_target(EntryId(1), 1.0).unwrap();
        let v = mc.version();
        mc.add_target(EntryId(5), 1.0).unwrap();
        assert_eq!(mc.targets(), &[(EntryId(1), 1.0)]);
        assert_eq!(mc.version(), v);
    }

    #[test]
    fn past_target_is_rejected() {
        let mut mc = moving_east(0);
        assert!(matches!(
            mc.add_target(EntryId(1), -0.5),
            Err(AgentError::TargetInPast { .. })
        ));
    }

    #[test]
    fn advance_confirms_track() {
        let mut mc = moving_east(0);
        mc.add_target(EntryId(1), 1.0).unwrap();
        mc.add_target(EntryId(2), 2.0).unwrap();

        assert_eq!(mc.advance_to_closest_target().unwrap(), (EntryId(1), 1.0));
        assert_eq!(mc.current_position(), EntryId(1));
        assert_eq!(mc.current_time(), 1.0);
        assert!(!mc.is_departing());

        // Re-queueing the current point does not duplicate it in the track.
        mc.add_target(EntryId(1), 1.0).unwrap();
        mc.advance_to_closest_target().unwrap();
        assert_eq!(mc.track(), &[(EntryId(1), 1.0)]);

        mc.advance_to_closest_target().unwrap();
        assert_eq!(mc.track(), &[(EntryId(1), 1.0), (EntryId(2), 2.0)]);
        assert!(matches!(mc.advance_to_closest_target(), Err(AgentError::NoTarget(_))));
    }

    #[test]
    fn track_insertion_keeps_arrival_order() {
        let mut mc = moving_east(0);
        mc.insert_into_track(EntryId(7), 1.0);
        mc.insert_into_track(EntryId(2), 0.5);
        mc.insert_into_track(EntryId(9), 1.0);
        assert_eq!(mc.track(), &[(EntryId(2), 0.5), (EntryId(7), 1.0), (EntryId(9), 1.0)]);
    }

    #[test]
    fn clear_targets_drops_future_visits() {
        let mesh = shapes::square(1.0).unwrap();
        let mut dict = dict();
        let mut mc = moving_east(0);
        let (here, _) = dict.insert(&FaceLocation::new(FaceId(0), [0.5, 0.3, 0.2]), &mesh);
        let (ahead, _) = dict.insert(&FaceLocation::new(FaceId(0), [0.2, 0.6, 0.2]), &mesh);
        mc.place_at_source(here);

        dict.add_visit(here, mc.id(), 0.0).unwrap();
        dict.add_visit(ahead, mc.id(), 2.0).unwrap();
        mc.add_target(here, 0.0).unwrap();
        mc.add_target(ahead, 2.0).unwrap();

        mc.clear_targets(&mut dict);
        assert!(mc.targets().is_empty());
        assert_eq!(dict.visit_time(here, mc.id()), Some(0.0));
        assert_eq!(dict.visit_time(ahead, mc.id()), None);
    }

    #[test]
    fn crash_is_idempotent() {
        let mut dict = dict();
        let mut mc = moving_east(0);
        mc.add_target(EntryId(0), 1.0).unwrap();
        mc.crash(&mut dict);
        let v = mc.version();
        assert!(mc.is_crashed());
        assert_eq!(mc.next_event_time(), None);
        assert!(!mc.is_departing());

        mc.crash(&mut dict);
        assert_eq!(mc.version(), v);
    }

    #[test]
    fn start_path_queues_source_first() {
        let mut mc = moving_east(0);
        mc.place_at_source(EntryId(0));
        let path = NextPath {
            source: EntryId(0),
            destination: EntryId(1),
            time_at_destination: 1.5,
            is_final: true,
        };
        mc.start_path(&path).unwrap();
        assert_eq!(mc.targets(), &[(EntryId(0), 0.0), (EntryId(1), 1.5)]);
        assert_eq!(mc.destination(), EntryId(1));
        assert!(mc.is_destination_final());
        assert_eq!(mc.time_at_source(), 0.0);
    }

    #[test]
    fn relocate_source_moves_unstarted_motorcycle() {
        let mut mc = moving_east(0);
        mc.place_at_source(EntryId(0));
        mc.relocate_source(EntryId(4));
        assert_eq!(mc.source(), EntryId(4));
        assert_eq!(mc.current_position(), EntryId(4));
    }
}

// ── Tracers ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tracer_tests {
    use mg_core::{Point3, Vector3};
    use mg_mesh::shapes;

    use super::helpers::{close, dict, placed_at};
    use crate::{StopAtDestination, StraightTracer, Tracer};

    #[test]
    fn straight_tracer_crosses_to_next_face() {
        let mesh = shapes::strip(3).unwrap();
        let mut dict = dict();
        let (mc, _) = placed_at(&mesh, &mut dict, Point3::new(0.5, 0.25, 0.0), Vector3::new(1.0, 0.0, 0.0));

        let path = StraightTracer.next_path(&mc, &mut dict, &mesh).unwrap().unwrap();
        assert!(close(dict.position(path.destination), Point3::new(1.0, 0.25, 0.0)));
        assert!((path.time_at_destination - 0.5).abs() < 1e-12);
        assert!(!path.is_final);
        assert_eq!(dict.face(path.source), dict.face(path.destination));
    }

    #[test]
    fn straight_tracer_marks_border_exit_final() {
        let mesh = shapes::square(1.0).unwrap();
        let mut dict = dict();
        let (mc, _) = placed_at(&mesh, &mut dict, Point3::new(0.5, 0.25, 0.0), Vector3::new(2.0, 0.0, 0.0));

        let path = StraightTracer.next_path(&mc, &mut dict, &mesh).unwrap().unwrap();
        assert!(close(dict.position(path.destination), Point3::new(1.0, 0.25, 0.0)));
        assert!(path.is_final);
    }

    #[test]
    fn straight_tracer_respects_speed() {
        let mesh = shapes::square(1.0).unwrap();
        let mut dict = dict();
        let spec = crate::AgentSpec::from_point(Point3::new(0.5, 0.25, 0.0))
            .towards(Vector3::new(1.0, 0.0, 0.0))
            .with_speed(2.0);
        let mut mc = crate::Motorcycle::new(mg_core::AgentId(0), spec).unwrap();
        let loc = mg_mesh::FaceComplex::locate(&mesh, Point3::new(0.5, 0.25, 0.0)).unwrap();
        let (e, _) = dict.insert(&loc, &mesh);
        mc.place_at_source(e);

        let path = StraightTracer.next_path(&mc, &mut dict, &mesh).unwrap().unwrap();
        assert!((path.time_at_destination - 0.25).abs() < 1e-12);
    }

    #[test]
    fn straight_tracer_stops_at_mesh_border() {
        let mesh = shapes::square(1.0).unwrap();
        let mut dict = dict();
        let (mc, _) = placed_at(&mesh, &mut dict, Point3::new(1.0, 0.25, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(StraightTracer.next_path(&mc, &mut dict, &mesh).unwrap().is_none());
    }

    #[test]
    fn straight_tracer_ignores_perpendicular_direction() {
        let mesh = shapes::square(1.0).unwrap();
        let mut dict = dict();
        let (mc, _) = placed_at(&mesh, &mut dict, Point3::new(0.5, 0.25, 0.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(StraightTracer.next_path(&mc, &mut dict, &mesh).unwrap().is_none());
    }

    #[test]
    fn stop_at_destination_never_continues() {
        let mesh = shapes::square(1.0).unwrap();
        let mut dict = dict();
        let (mc, _) = placed_at(&mesh, &mut dict, Point3::new(0.5, 0.25, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(mc.compute_next_destination(&StopAtDestination, &mut dict, &mesh).unwrap().is_none());
    }
}

// ── TrackSegmentStore ────────────────────────────────────────────────────────

#[cfg(test)]
mod segment_tests {
    use mg_core::{AgentId, FaceId, FaceLocation};
    use mg_mesh::shapes;

    use super::helpers::dict;
    use crate::{SegmentError, TrackSegmentStore};

    #[test]
    fn segments_are_indexed_by_face() {
        let mesh = shapes::square(1.0).unwrap();
        let mut dict = dict();
        let (a, _) = dict.insert(&FaceLocation::new(FaceId(1), [0.6, 0.2, 0.2]), &mesh);
        let (b, _) = dict.insert(&FaceLocation::new(FaceId(1), [0.2, 0.2, 0.6]), &mesh);
        let (c, _) = dict.insert(&FaceLocation::new(FaceId(0), [0.6, 0.2, 0.2]), &mesh);

        let mut store = TrackSegmentStore::new();
        assert!(store.is_empty());
        store.add(FaceId(1), AgentId(0), a, 0.0, b, 1.0, &dict).unwrap();
        store.add(FaceId(0), AgentId(1), c, 0.5, c, 0.5, &dict).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.faces(), vec![FaceId(0), FaceId(1)]);
        assert_eq!(store.segments_in(FaceId(1))[0].destination, b);
        assert_eq!(store.iter().next().map(|s| s.agent), Some(AgentId(1)));
        assert!(store.segments_in(FaceId(7)).is_empty());
    }

    #[test]
    fn rejects_inconsistent_segments() {
        let mesh = shapes::square(1.0).unwrap();
        let mut dict = dict();
        let (a, _) = dict.insert(&FaceLocation::new(FaceId(1), [0.6, 0.2, 0.2]), &mesh);
        let (b, _) = dict.insert(&FaceLocation::new(FaceId(1), [0.2, 0.2, 0.6]), &mesh);

        let mut store = TrackSegmentStore::new();
        assert!(matches!(
            store.add(FaceId(1), AgentId(0), a, 2.0, b, 1.0, &dict),
            Err(SegmentError::TimeReversed { .. })
        ));
        assert!(matches!(
            store.add(FaceId(0), AgentId(0), a, 0.0, b, 1.0, &dict),
            Err(SegmentError::EntryNotInFace { .. })
        ));
        assert!(store.is_empty());
    }
}
