//! Collision between the tentative track and a track lying in the same face.

use mg_core::geometry::{
    Segment2, collinear, collinear_strictly_ordered, intersection_point, segments_intersect,
};
use mg_core::location::are_logically_collinear_on_border;
use mg_core::FaceLocation;
use mg_mesh::FaceComplex;

use super::{Collision, CollisionCandidate, CollisionDetector, Tentative, TrackView};

impl<M: FaceComplex> CollisionDetector<'_, M> {
    pub(super) fn between_tracks(
        &self,
        t: &Tentative,
        track: &TrackView,
        cand: &mut CollisionCandidate,
    ) {
        let mcs = &t.segment;
        let fmc = self.agent(track.agent);
        let fmcs = Segment2::new(self.p2(track.source), self.p2(track.destination));

        let cur_loc = self.location(t.current);
        let ct_loc = self.location(t.target);
        let fsrc_loc = self.location(track.source);
        let fdst_loc = self.location(track.destination);

        if fmcs.is_degenerate() {
            if track.source == t.current {
                return;
            }
            if are_logically_collinear_on_border(&cur_loc, &fsrc_loc, &ct_loc) {
                return self.collinear_tracks(t, mcs, track, cand);
            }
        } else if collinear(mcs.source, mcs.target, fmcs.source)
            && collinear(mcs.source, mcs.target, fmcs.target)
        {
            return self.collinear_tracks(t, mcs, track, cand);
        }

        let span = (track.time_at_source, track.time_at_destination);

        // The current position is already a known crossing of both tracks.
        if self
            .dict
            .visit_in_range(t.current, track.agent, span.0, span.1)
            .is_some()
        {
            return;
        }

        // So is the closest target.
        if let Some(ft) = self.dict.visit_in_range(t.target, track.agent, span.0, span.1) {
            cand.offer(Collision::Entry(t.target), t.target_time, track.agent, ft, None);
            return;
        }

        // The closest target lies on the foreign track, both sharing a side.
        if are_logically_collinear_on_border(&fsrc_loc, &ct_loc, &fdst_loc) {
            if collinear_strictly_ordered(fmcs.source, mcs.target, fmcs.target) {
                let ft = track.time_at_source + self.distance(track.source, t.target) / fmc.speed();
                cand.offer(Collision::Entry(t.target), t.target_time, track.agent, ft, None);
            }
            return;
        }

        // A foreign extremity lies on the tentative track, both sharing a side.
        for (extremity, ext_loc, ft) in [
            (track.destination, &fdst_loc, track.time_at_destination),
            (track.source, &fsrc_loc, track.time_at_source),
        ] {
            if are_logically_collinear_on_border(ext_loc, &ct_loc, &cur_loc) {
                if collinear_strictly_ordered(mcs.source, ext_loc.point2(), mcs.target) {
                    let time = t.current_time + self.distance(t.current, extremity) / self.mc.speed();
                    cand.offer(Collision::Entry(extremity), time, track.agent, ft, None);
                }
                return;
            }
        }

        if fmcs.is_degenerate() || !segments_intersect(mcs, &fmcs) {
            return;
        }
        let Some(p) = intersection_point(mcs, &fmcs) else {
            return;
        };
        let loc = FaceLocation::from_point2(t.face, p).snapped_to_border(self.config.border_tolerance);

        if let Some(e) = self.dict.find(&loc) {
            let time = if e == t.target {
                t.target_time
            } else if e == t.current {
                t.current_time
            } else {
                t.current_time + self.distance(t.current, e) / self.mc.speed()
            };
            if time <= cand.time {
                let ft = self
                    .dict
                    .visit_in_range(e, track.agent, span.0, span.1)
                    .unwrap_or_else(|| {
                        track.time_at_source + self.distance(track.source, e) / fmc.speed()
                    });
                cand.offer(Collision::Entry(e), time, track.agent, ft, None);
            }
            return;
        }

        let position = self.mesh.location_to_point(&loc);
        let time =
            t.current_time + self.dict.position(t.current).distance(position) / self.mc.speed();
        let ft =
            track.time_at_source + self.dict.position(track.source).distance(position) / fmc.speed();
        if !cand.is_earlier(time, ft) {
            return;
        }

        // Snap onto a target reached at the very same time.
        let same_time = self
            .mc
            .has_target_at_time(time)
            .or_else(|| fmc.has_target_at_time(ft))
            .filter(|&e| self.dict.face(e) == t.face);
        if let Some(e) = same_time {
            cand.set(Collision::Entry(e), time, track.agent, ft, None);
            return;
        }

        // Snap onto a nearby point.
        if let Some(e) = self
            .dict
            .snap_to_existing(&loc, position, self.config.snapping_tolerance)
        {
            let vt = self.visit_near(e, self.mc.id(), time).unwrap_or(time);
            if vt <= cand.time {
                let fvt = self.visit_near(e, track.agent, ft).unwrap_or(ft);
                cand.set_snapped(e, vt, track.agent, fvt, None);
            }
            return;
        }

        cand.set(Collision::Location(loc), time, track.agent, ft, None);
    }
}
