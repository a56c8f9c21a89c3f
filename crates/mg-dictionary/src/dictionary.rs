//! The point dictionary.
//!
//! # Data layout
//!
//! Two arenas: `entries` (one per face representation, indexed by `EntryId`)
//! and `points` (one per surface point, indexed by `PointId`).  Entries are
//! created on first reference and never removed, so ids are stable and
//! creation order is iteration order.
//!
//! # Lookup
//!
//! - Exact: an `FxHashMap` keyed by the bit pattern of the border-snapped
//!   location.
//! - Proximity: an R-tree of entry positions.  Among entries of the queried
//!   face within the snapping radius the lowest `EntryId` wins.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use tracing::debug;

use mg_core::{AgentId, EntryId, FaceId, FaceLocation, LocationKey, Point3, PointId, TracerConfig};
use mg_mesh::FaceComplex;

use crate::entry::{DictionaryEntry, PointRecord};
use crate::{DictionaryError, DictionaryResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct IndexedEntry {
    point: [f64; 3],
    face: FaceId,
    id: EntryId,
}

impl RTreeObject for IndexedEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── Dictionary ────────────────────────────────────────────────────────────────

pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
    points: Vec<PointRecord>,
    by_location: FxHashMap<LocationKey, EntryId>,
    spatial_idx: RTree<IndexedEntry>,
    snapping_tolerance: f64,
    border_tolerance: f64,
    time_tolerance: f64,
}

impl Dictionary {
    pub fn new(config: &TracerConfig) -> Self {
        Self {
            entries: Vec::new(),
            points: Vec::new(),
            by_location: FxHashMap::default(),
            spatial_idx: RTree::new(),
            snapping_tolerance: config.snapping_tolerance,
            border_tolerance: config.border_tolerance,
            time_tolerance: config.time_tolerance,
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn entry(&self, id: EntryId) -> &DictionaryEntry {
        &self.entries[id.index()]
    }

    #[inline]
    pub fn location(&self, id: EntryId) -> FaceLocation {
        self.entries[id.index()].location
    }

    #[inline]
    pub fn face(&self, id: EntryId) -> FaceId {
        self.entries[id.index()].location.face
    }

    #[inline]
    pub fn point_of(&self, id: EntryId) -> PointId {
        self.entries[id.index()].point
    }

    #[inline]
    pub fn record(&self, id: EntryId) -> &PointRecord {
        &self.points[self.point_of(id).index()]
    }

    #[inline]
    fn record_mut(&mut self, id: EntryId) -> &mut PointRecord {
        let p = self.point_of(id);
        &mut self.points[p.index()]
    }

    /// Position of the entry on the embedded surface.
    #[inline]
    pub fn position(&self, id: EntryId) -> Point3 {
        self.record(id).position
    }

    /// All entries in creation order.  Restartable: call again to rewind.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &DictionaryEntry)> + '_ {
        self.entries.iter().enumerate().map(|(i, e)| (EntryId(i as u32), e))
    }

    /// All shared points in creation order.
    pub fn points(&self) -> impl Iterator<Item = (PointId, &PointRecord)> + '_ {
        self.points.iter().enumerate().map(|(i, p)| (PointId(i as u32), p))
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Exact lookup of the border-snapped location.
    pub fn find(&self, location: &FaceLocation) -> Option<EntryId> {
        let loc = location.snapped_to_border(self.border_tolerance);
        self.by_location.get(&loc.key()).copied()
    }

    /// Representation of `entry`'s point in `face`, if the point lies on it.
    pub fn get_sibling(&self, entry: EntryId, face: FaceId) -> Option<EntryId> {
        if self.face(entry) == face {
            return Some(entry);
        }
        self.record(entry).entry_in(face)
    }

    /// `true` if both entries represent the same point.
    #[inline]
    pub fn is_sibling(&self, a: EntryId, b: EntryId) -> bool {
        self.point_of(a) == self.point_of(b)
    }

    /// Lowest-index entry of `location.face` whose position lies within
    /// squared distance `tol` of `point`.
    pub fn snap_to_existing(
        &self,
        location: &FaceLocation,
        point: Point3,
        tol: f64,
    ) -> Option<EntryId> {
        self.spatial_idx
            .locate_within_distance(point.to_array(), tol)
            .filter(|e| e.face == location.face)
            .map(|e| e.id)
            .min()
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Insert `location`, or return the entry already standing for it.
    ///
    /// The boolean is `true` when a new point was created.  Locations on a
    /// vertex or an edge get an entry in every incident face.
    pub fn insert<M: FaceComplex>(&mut self, location: &FaceLocation, mesh: &M) -> (EntryId, bool) {
        let loc = location.snapped_to_border(self.border_tolerance);
        if let Some(&id) = self.by_location.get(&loc.key()) {
            return (id, false);
        }

        let position = mesh.location_to_point(&loc);
        if let Some(id) = self.snap_to_existing(&loc, position, self.snapping_tolerance) {
            debug!(entry = %id, location = %loc, "location snapped to existing entry");
            return (id, false);
        }

        let point = PointId(self.points.len() as u32);
        self.points.push(PointRecord::new(position));

        let mut requested = EntryId::INVALID;
        for face in mesh.incident_faces(&loc) {
            let Some(sibling) = mesh.sibling_location(&loc, face) else {
                continue;
            };
            if self.by_location.contains_key(&sibling.key()) {
                continue;
            }
            let id = self.push_entry(sibling, point, position);
            if face == loc.face {
                requested = id;
            }
        }
        if requested == EntryId::INVALID {
            requested = self.push_entry(loc, point, position);
        }
        (requested, true)
    }

    fn push_entry(&mut self, location: FaceLocation, point: PointId, position: Point3) -> EntryId {
        let id = EntryId(self.entries.len() as u32);
        self.entries.push(DictionaryEntry { location, point });
        self.by_location.insert(location.key(), id);
        self.spatial_idx.insert(IndexedEntry {
            point: position.to_array(),
            face: location.face,
            id,
        });
        let record = &mut self.points[point.index()];
        let at = record.entries.partition_point(|&(f, _)| f < location.face);
        record.entries.insert(at, (location.face, id));
        id
    }

    /// [`insert`](Self::insert) and record that `agent` visits the point at `time`.
    pub fn insert_visited<M: FaceComplex>(
        &mut self,
        location: &FaceLocation,
        mesh: &M,
        agent: AgentId,
        time: f64,
    ) -> DictionaryResult<(EntryId, bool)> {
        let (id, is_new) = self.insert(location, mesh);
        self.add_visit(id, agent, time)?;
        Ok((id, is_new))
    }

    // ── Visits ────────────────────────────────────────────────────────────

    /// Record a visit.  A visit within the time tolerance of an existing one
    /// by the same agent is a no-op; a different time is an error.
    pub fn add_visit(&mut self, entry: EntryId, agent: AgentId, time: f64) -> DictionaryResult<()> {
        let tol = self.time_tolerance;
        let record = self.record_mut(entry);
        match record.visits.get(&agent) {
            Some(&existing) if (existing - time).abs() <= tol => Ok(()),
            Some(&existing) => Err(DictionaryError::InconsistentVisit {
                agent,
                entry,
                existing,
                requested: time,
            }),
            None => {
                record.visits.insert(agent, time);
                Ok(())
            }
        }
    }

    /// Drop `agent`'s visit of the point, returning the removed time.
    pub fn remove_visit(&mut self, entry: EntryId, agent: AgentId) -> Option<f64> {
        self.record_mut(entry).visits.remove(&agent)
    }

    pub fn visit_time(&self, entry: EntryId, agent: AgentId) -> Option<f64> {
        self.record(entry).visits.get(&agent).copied()
    }

    /// Visit time of `agent`, if it lies in `[lo, hi]`.
    pub fn visit_in_range(&self, entry: EntryId, agent: AgentId, lo: f64, hi: f64) -> Option<f64> {
        self.visit_time(entry, agent).filter(|&t| lo <= t && t <= hi)
    }

    pub fn earliest_visit(&self, entry: EntryId) -> Option<(AgentId, f64)> {
        self.record(entry).earliest_visit()
    }

    /// Lowest-id agent other than `agent` visiting within `tol` of `time`.
    pub fn simultaneous_visitor(
        &self,
        entry: EntryId,
        agent: AgentId,
        time: f64,
        tol: f64,
    ) -> Option<AgentId> {
        self.record(entry)
            .visits
            .iter()
            .find(|&(&a, &t)| a != agent && (t - time).abs() <= tol)
            .map(|(&a, _)| a)
    }

    pub fn visitors(&self, entry: EntryId) -> impl Iterator<Item = (AgentId, f64)> + '_ {
        self.record(entry).visits.iter().map(|(&a, &t)| (a, t))
    }

    // ── Blocking ──────────────────────────────────────────────────────────

    pub fn block(&mut self, entry: EntryId) {
        self.record_mut(entry).blocked = true;
    }

    pub fn is_blocked(&self, entry: EntryId) -> bool {
        self.record(entry).blocked
    }
}
