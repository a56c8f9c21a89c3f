//! Collision between two tracks on a common supporting line.
//!
//! Both tracks are given in the chart of the foreign face; when the faces
//! differ, the tentative track has been re-expressed there and both lie on
//! the shared halfedge.
//!
//! On the line oriented from the current position to the closest target:
//!
//! - same direction: `mc` can only run into the foreign source, if it lies
//!   ahead of it;
//! - opposite directions, foreign track confirmed: `mc` runs into its
//!   destination;
//! - opposite directions, foreign motorcycle still driving: they meet
//!   head-on, both at the same time.

use mg_core::geometry::{Angle, Segment2, angle, collinear_strictly_ordered};
use mg_core::FaceLocation;
use mg_mesh::FaceComplex;

use super::{Collision, CollisionCandidate, CollisionDetector, Tentative, TrackView};

impl<M: FaceComplex> CollisionDetector<'_, M> {
    pub(super) fn collinear_tracks(
        &self,
        t: &Tentative,
        mcs: &Segment2,
        track: &TrackView,
        cand: &mut CollisionCandidate,
    ) {
        let fmcs = Segment2::new(self.p2(track.source), self.p2(track.destination));
        if mcs.source == fmcs.source {
            // Equal sources in the same direction crash at initialization.
            return;
        }
        let ffd = (track.face != t.face).then_some(track.face);
        let speed = self.mc.speed();

        let same_direction = fmcs.is_degenerate()
            || angle(mcs.source, mcs.target, fmcs.source, fmcs.target) == Angle::Acute;

        if same_direction {
            let time = if mcs.target == fmcs.source {
                t.target_time
            } else if collinear_strictly_ordered(mcs.source, fmcs.source, mcs.target) {
                t.current_time + self.distance(t.current, track.source) / speed
            } else {
                return;
            };
            cand.offer(
                Collision::Entry(track.source),
                time,
                track.agent,
                track.time_at_source,
                ffd,
            );
            return;
        }

        if collinear_strictly_ordered(fmcs.source, mcs.source, mcs.target) {
            return;
        }
        if mcs.target != fmcs.target
            && collinear_strictly_ordered(mcs.target, fmcs.target, fmcs.source)
        {
            return;
        }

        if !track.moving {
            let time = if mcs.target == fmcs.target {
                t.target_time
            } else if mcs.source == fmcs.target {
                t.current_time
            } else if collinear_strictly_ordered(mcs.source, fmcs.target, mcs.target) {
                t.current_time + self.distance(t.current, track.destination) / speed
            } else {
                return;
            };
            cand.offer(
                Collision::Entry(track.destination),
                time,
                track.agent,
                track.time_at_destination,
                ffd,
            );
            return;
        }

        // Head-on: both reach the meeting point at the same time.
        let fmc = self.agent(track.agent);
        let gap = self.distance(t.current, track.source);
        let time = (t.current_time
            + (gap - fmc.speed() * (t.current_time - track.time_at_source)) / (speed + fmc.speed()))
        .max(t.current_time)
        .max(track.time_at_source);
        if !cand.is_earlier(time, time) {
            return;
        }

        if let Some(e) = self
            .mc
            .has_target_at_time(time)
            .or_else(|| fmc.has_target_at_time(time))
        {
            cand.set(Collision::Entry(e), time, track.agent, time, ffd);
            return;
        }

        let ratio = (time - t.current_time) / (t.target_time - t.current_time);
        let p = mcs.source + mcs.vector() * ratio;
        let loc = FaceLocation::from_point2(track.face, p)
            .snapped_to_border(self.config.border_tolerance);

        if let Some(e) = self.dict.find(&loc) {
            let vt = self
                .visit_near(e, self.mc.id(), time)
                .or_else(|| self.visit_near(e, track.agent, time))
                .unwrap_or(time);
            cand.set(Collision::Entry(e), vt, track.agent, vt, ffd);
            return;
        }

        let position = self.mesh.location_to_point(&loc);
        if let Some(e) = self
            .dict
            .snap_to_existing(&loc, position, self.config.snapping_tolerance)
        {
            let vt = self
                .visit_near(e, self.mc.id(), time)
                .or_else(|| self.visit_near(e, track.agent, time))
                .unwrap_or(time);
            cand.set_snapped(e, vt, track.agent, vt, ffd);
            return;
        }

        cand.set(Collision::Location(loc), time, track.agent, time, ffd);
    }
}

