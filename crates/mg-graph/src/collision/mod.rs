//! Collision detection on a tentative track.
//!
//! The tentative track of a motorcycle runs from its current position to its
//! closest target, inside one face.  [`CollisionDetector::find`] returns the
//! earliest collision on it with
//!
//! 1. confirmed track segments of the same face,
//! 2. tracks of motorcycles currently driving in the same face,
//! 3. tracks in neighbouring faces, when the tentative track touches the
//!    border of its face.
//!
//! All predicates work in the barycentric chart of a face (first two
//! weights).  The detector only reads the graph state; the caller applies
//! the returned [`CollisionCandidate`].

mod candidate;
mod collinear;
mod foreign;
mod same_face;

pub use candidate::{Collision, CollisionCandidate};

use mg_agent::{Motorcycle, TrackSegment, TrackSegmentStore};
use mg_core::geometry::Segment2;
use mg_core::{AgentId, EntryId, FaceId, FaceLocation, Point2, TracerConfig};
use mg_dictionary::Dictionary;
use mg_mesh::FaceComplex;

use crate::{GraphError, GraphResult};

/// A foreign track segment, confirmed or still being driven.
#[derive(Copy, Clone, Debug)]
pub(crate) struct TrackView {
    pub agent: AgentId,
    pub face: FaceId,
    pub source: EntryId,
    pub time_at_source: f64,
    pub destination: EntryId,
    pub time_at_destination: f64,
    /// The foreign motorcycle is still driving along it.
    pub moving: bool,
}

impl TrackView {
    fn confirmed(segment: &TrackSegment) -> Self {
        Self {
            agent: segment.agent,
            face: segment.face,
            source: segment.source,
            time_at_source: segment.time_at_source,
            destination: segment.destination,
            time_at_destination: segment.time_at_destination,
            moving: false,
        }
    }

    /// Source to closest target of a live motorcycle.
    fn live(mc: &Motorcycle, dict: &Dictionary) -> Option<Self> {
        Some(Self {
            agent: mc.id(),
            face: dict.face(mc.source()),
            source: mc.source(),
            time_at_source: mc.time_at_source(),
            destination: mc.closest_target()?,
            time_at_destination: mc.time_at_closest_target()?,
            moving: true,
        })
    }
}

/// The tentative track being checked.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Tentative {
    pub face: FaceId,
    pub current: EntryId,
    pub current_time: f64,
    pub target: EntryId,
    pub target_time: f64,
    /// `current -> target` in the chart of `face`.
    pub segment: Segment2,
}

pub struct CollisionDetector<'a, M: FaceComplex> {
    mesh: &'a M,
    dict: &'a Dictionary,
    segments: &'a TrackSegmentStore,
    motorcycles: &'a [Motorcycle],
    mc: &'a Motorcycle,
    config: &'a TracerConfig,
}

impl<'a, M: FaceComplex> CollisionDetector<'a, M> {
    pub fn new(
        mesh: &'a M,
        dict: &'a Dictionary,
        segments: &'a TrackSegmentStore,
        motorcycles: &'a [Motorcycle],
        mc: &'a Motorcycle,
        config: &'a TracerConfig,
    ) -> Self {
        Self { mesh, dict, segments, motorcycles, mc, config }
    }

    /// Earliest collision between the current position and the closest
    /// target of the motorcycle.
    pub fn find(&self) -> GraphResult<CollisionCandidate> {
        let mc = self.mc;
        if mc.is_crashed() {
            return Err(GraphError::Invariant(format!(
                "collision search for crashed motorcycle {}",
                mc.id()
            )));
        }
        let (Some(target), Some(target_time)) = (mc.closest_target(), mc.time_at_closest_target())
        else {
            return Err(GraphError::Invariant(format!(
                "collision search for motorcycle {} without target",
                mc.id()
            )));
        };
        let current = mc.current_position();
        let face = self.dict.face(current);
        if self.dict.face(target) != face {
            return Err(GraphError::Invariant(format!(
                "tentative track of motorcycle {} spans faces {} and {}",
                mc.id(),
                face,
                self.dict.face(target)
            )));
        }

        let mut cand = CollisionCandidate::new(target_time);
        let t = Tentative {
            face,
            current,
            current_time: mc.current_time(),
            target,
            target_time,
            segment: Segment2::new(self.p2(current), self.p2(target)),
        };
        if t.segment.is_degenerate() {
            return Ok(cand);
        }

        for segment in self.segments.segments_in(face) {
            self.between_tracks(&t, &TrackView::confirmed(segment), &mut cand);
            if cand.snapped {
                return Ok(cand);
            }
        }

        for fmc in self.motorcycles {
            if fmc.id() == mc.id()
                || fmc.is_crashed()
                || self.dict.face(fmc.current_position()) != face
            {
                continue;
            }
            if let Some(track) = TrackView::live(fmc, self.dict) {
                self.between_tracks(&t, &track, &mut cand);
                if cand.snapped {
                    return Ok(cand);
                }
            }
        }

        self.foreign_collisions(&t, &mut cand);
        Ok(cand)
    }

    // ── Shared helpers ────────────────────────────────────────────────────

    #[inline]
    fn agent(&self, id: AgentId) -> &Motorcycle {
        &self.motorcycles[id.index()]
    }

    #[inline]
    fn location(&self, e: EntryId) -> FaceLocation {
        self.dict.location(e)
    }

    #[inline]
    fn p2(&self, e: EntryId) -> Point2 {
        self.dict.location(e).point2()
    }

    /// Euclidean distance between two dictionary points.
    #[inline]
    fn distance(&self, a: EntryId, b: EntryId) -> f64 {
        self.dict.position(a).distance(self.dict.position(b))
    }

    /// Visit of `agent` at the point of `e` within `time_tolerance` of `time`.
    fn visit_near(&self, e: EntryId, agent: AgentId, time: f64) -> Option<f64> {
        let tol = self.config.time_tolerance;
        self.dict.visit_in_range(e, agent, time - tol, time + tol)
    }

    /// Live motorcycles (other than `mc`) currently driving in `face`.
    fn live_tracks_in(&self, face: FaceId) -> impl Iterator<Item = TrackView> + '_ {
        self.motorcycles
            .iter()
            .filter(move |fmc| {
                fmc.id() != self.mc.id()
                    && !fmc.is_crashed()
                    && self.dict.face(fmc.current_position()) == face
            })
            .filter_map(|fmc| TrackView::live(fmc, self.dict))
    }
}
