//! Collisions with tracks in neighbouring faces.
//!
//! Only the border of the face matters here: a foreign track can meet the
//! tentative track at its closest target (on a vertex or an edge), or along
//! the whole tentative track when it runs on an edge shared with the
//! foreign face.  Crossings at the current position are ignored; they
//! would have stopped the motorcycle already.

use mg_core::geometry::{Segment2, collinear_strictly_ordered};
use mg_core::{AgentId, EntryId, FaceId, HalfedgeId};
use mg_mesh::{Descriptor, FaceComplex};

use super::{Collision, CollisionCandidate, CollisionDetector, Tentative, TrackView};

impl<M: FaceComplex> CollisionDetector<'_, M> {
    pub(super) fn foreign_collisions(&self, t: &Tentative, cand: &mut CollisionCandidate) {
        let cur_loc = self.location(t.current);
        let ct_loc = self.location(t.target);
        let target_dv = self.mesh.descriptor(&ct_loc);
        if matches!(target_dv, Descriptor::Face(_)) {
            return;
        }

        if matches!(self.mesh.descriptor(&cur_loc), Descriptor::Face(_)) {
            // Anything found inside the face comes before the border.
            if cand.time < t.target_time {
                return;
            }
            return self.target_on_border(t, target_dv, cand);
        }

        let shared = self
            .mesh
            .face_halfedges(t.face)
            .into_iter()
            .find(|&h| self.mesh.is_on_halfedge(&cur_loc, h) && self.mesh.is_on_halfedge(&ct_loc, h));
        match shared {
            Some(h) => {
                self.track_on_border(t, h, cand);
                if cand.snapped {
                    return;
                }
                if matches!(target_dv, Descriptor::Vertex(_)) {
                    self.target_on_border(t, target_dv, cand);
                }
            }
            None => self.target_on_border(t, target_dv, cand),
        }
    }

    // ── Closest target on the border ──────────────────────────────────────

    fn target_on_border(&self, t: &Tentative, dv: Descriptor, cand: &mut CollisionCandidate) {
        let faces: Vec<FaceId> = match dv {
            Descriptor::Vertex(v) => self
                .mesh
                .faces_around_vertex(v)
                .iter()
                .copied()
                .filter(|&f| f != t.face)
                .collect(),
            Descriptor::Halfedge(h) => match self.mesh.opposite(h) {
                Some(o) => vec![self.mesh.face_of(o)],
                None => return,
            },
            Descriptor::Face(_) => return,
        };

        for ffd in faces {
            for segment in self.segments.segments_in(ffd) {
                self.track_at_target(t, dv, &TrackView::confirmed(segment), cand);
                if cand.snapped {
                    return;
                }
            }
            for track in self.live_tracks_in(ffd) {
                self.track_at_target(t, dv, &track, cand);
                if cand.snapped {
                    return;
                }
            }
        }
    }

    /// Does the foreign track pass through the closest target?
    fn track_at_target(
        &self,
        t: &Tentative,
        dv: Descriptor,
        track: &TrackView,
        cand: &mut CollisionCandidate,
    ) {
        let ffd = track.face;
        if let Some(ft) = self.dict.visit_in_range(
            t.target,
            track.agent,
            track.time_at_source,
            track.time_at_destination,
        ) {
            cand.offer(Collision::Entry(t.target), t.target_time, track.agent, ft, Some(ffd));
            return;
        }

        // On a vertex, only the foreign extremities can meet the target, and
        // those carry a visit.
        let Descriptor::Halfedge(h) = dv else {
            return;
        };
        let Some(ct_in_ffd) = self.mesh.sibling_location(&self.location(t.target), ffd) else {
            return;
        };

        let fsrc_loc = self.location(track.source);
        let fdst_loc = self.location(track.destination);
        let on_same_halfedge = self.mesh.face_halfedges(ffd).into_iter().find(|&fh| {
            self.mesh.is_on_halfedge(&fsrc_loc, fh) && self.mesh.is_on_halfedge(&fdst_loc, fh)
        });
        if on_same_halfedge.is_none() || on_same_halfedge != self.mesh.opposite(h) {
            return;
        }

        if !collinear_strictly_ordered(fsrc_loc.point2(), ct_in_ffd.point2(), fdst_loc.point2()) {
            return;
        }
        let fmc = self.agent(track.agent);
        let ft = track.time_at_source + self.distance(track.source, t.target) / fmc.speed();
        cand.offer(Collision::Entry(t.target), t.target_time, track.agent, ft, Some(ffd));
    }

    // ── Tentative track along a shared halfedge ───────────────────────────

    fn track_on_border(&self, t: &Tentative, h: HalfedgeId, cand: &mut CollisionCandidate) {
        let Some(opp) = self.mesh.opposite(h) else {
            return;
        };
        let ffd = self.mesh.face_of(opp);

        for segment in self.segments.segments_in(ffd) {
            self.track_along_halfedge(t, opp, &TrackView::confirmed(segment), cand);
            if cand.snapped {
                return;
            }
        }
        for track in self.live_tracks_in(ffd) {
            self.track_along_halfedge(t, opp, &track, cand);
            if cand.snapped {
                return;
            }
        }
    }

    fn track_along_halfedge(
        &self,
        t: &Tentative,
        opp: HalfedgeId,
        track: &TrackView,
        cand: &mut CollisionCandidate,
    ) {
        let ffd = track.face;
        let (Some(cur), Some(ct)) = (
            self.mesh.sibling_location(&self.location(t.current), ffd),
            self.mesh.sibling_location(&self.location(t.target), ffd),
        ) else {
            return;
        };
        let mcs = Segment2::new(cur.point2(), ct.point2());

        let src_on = self.mesh.is_on_halfedge(&self.location(track.source), opp);
        let dst_on = self.mesh.is_on_halfedge(&self.location(track.destination), opp);
        match (src_on, dst_on) {
            (true, true) => self.collinear_tracks(t, &mcs, track, cand),
            (true, false) => self.extremity_on_track(
                t,
                &mcs,
                ffd,
                track.agent,
                track.source,
                track.time_at_source,
                cand,
            ),
            (false, true) => self.extremity_on_track(
                t,
                &mcs,
                ffd,
                track.agent,
                track.destination,
                track.time_at_destination,
                cand,
            ),
            (false, false) => {}
        }
    }

    /// A single foreign extremity `e` lies on the shared halfedge.
    #[allow(clippy::too_many_arguments)]
    fn extremity_on_track(
        &self,
        t: &Tentative,
        mcs: &Segment2,
        ffd: FaceId,
        foreign: AgentId,
        e: EntryId,
        ft: f64,
        cand: &mut CollisionCandidate,
    ) {
        let p = self.p2(e);
        if p == mcs.source {
            return;
        }
        if p == mcs.target {
            cand.offer(Collision::Entry(t.target), t.target_time, foreign, ft, Some(ffd));
            return;
        }
        if !collinear_strictly_ordered(mcs.source, p, mcs.target) {
            return;
        }
        let time = t.current_time + self.distance(t.current, e) / self.mc.speed();
        cand.offer(Collision::Entry(e), time, foreign, ft, Some(ffd));
    }
}
