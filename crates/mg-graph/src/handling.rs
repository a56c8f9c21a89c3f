//! Recording a collision on both tracks.

use tracing::{debug, trace, warn};

use mg_agent::Tracer;
use mg_core::{AgentId, EntryId, FaceId};
use mg_mesh::FaceComplex;

use crate::{Collision, CollisionCandidate, GraphError, GraphResult, MotorcycleGraph};

impl<M: FaceComplex, T: Tracer> MotorcycleGraph<M, T> {
    /// Record the collision `cand` found on the tentative track of `id`.
    ///
    /// The collision point (and a halving point before it) becomes a target
    /// of `mc`.  The foreign motorcycle learns about the point too: as a
    /// target if it has yet to reach it, or as a blocked point of its
    /// confirmed track otherwise.
    pub(crate) fn treat_collision(&mut self, id: AgentId, cand: &CollisionCandidate) -> GraphResult<()> {
        let collision = match cand.collision {
            Some(Collision::Entry(e)) => e,
            Some(Collision::Location(loc)) => {
                let (e, is_new) = self.dictionary.insert(&loc, &self.mesh);
                if !is_new {
                    warn!(agent = %id, entry = %e, location = %loc, "collision location already known");
                }
                e
            }
            None => return Ok(()),
        };

        let fid = cand.foreign;
        let fd = self.dictionary.face(self.motorcycles[id.index()].current_position());
        let ffd = cand.foreign_face.unwrap_or(fd);
        let c = self.sibling(collision, fd)?;
        let fc = self.sibling(collision, ffd)?;
        let (t, ft) = (cand.time, cand.foreign_time);
        let tol = self.config.time_tolerance;
        debug!(agent = %id, foreign = %fid, entry = %c, time = t, foreign_time = ft, "collision");

        let mc = &self.motorcycles[id.index()];
        let (current, current_time) = (mc.current_position(), mc.current_time());
        let before_target = mc.time_at_closest_target().is_some_and(|ct| t <= ct);
        let is_target = mc.closest_target() == Some(c);
        let foreign_knows = self.dictionary.visit_in_range(fc, fid, ft - tol, ft + tol).is_some();
        if !before_target || (is_target && foreign_knows) {
            return Ok(());
        }

        if c != current && self.dictionary.visit_in_range(c, id, t - tol, t + tol).is_none() {
            let halving = self.halving_point(id, current, current_time, c, t)?;
            let mc = &mut self.motorcycles[id.index()];
            mc.add_target(c, t)?;
            self.dictionary.add_visit(c, id, t)?;
            if let Some((h, th)) = halving {
                mc.add_target(h, th)?;
                self.dictionary.add_visit(h, id, th)?;
            }
        }

        if !foreign_knows {
            self.record_on_foreign(fid, fc, ffd, ft)?;
        }

        // At the current position: examined again only if the foreign visit
        // now stops the motorcycle there.
        if c == current && self.is_crashing_point(id) {
            self.motorcycles[id.index()].add_target(c, current_time)?;
        }
        Ok(())
    }

    /// Let the foreign motorcycle know about the collision point `fc`.
    fn record_on_foreign(&mut self, fid: AgentId, fc: EntryId, ffd: FaceId, ft: f64) -> GraphResult<()> {
        let fmc = &self.motorcycles[fid.index()];
        let foreign_reaches = fmc.is_crashed() || fmc.time_at_closest_target().is_some_and(|ct| ft <= ct);
        if !foreign_reaches {
            return Ok(());
        }

        self.dictionary.add_visit(fc, fid, ft)?;
        let fmc = &self.motorcycles[fid.index()];
        if !fmc.is_crashed() && ft > fmc.current_time() {
            let (fcur, fcur_time) = (fmc.current_position(), fmc.current_time());
            let halving = match self.dictionary.get_sibling(fcur, ffd) {
                Some(fcur) => self.halving_point(fid, fcur, fcur_time, fc, ft)?,
                None => None,
            };
            let fmc = &mut self.motorcycles[fid.index()];
            fmc.add_target(fc, ft)?;
            if let Some((h, th)) = halving {
                fmc.add_target(h, th)?;
                self.dictionary.add_visit(h, fid, th)?;
            }
            self.queue.update(&self.motorcycles[fid.index()]);
        } else {
            // Already behind the foreign motorcycle.
            self.dictionary.block(fc);
            self.motorcycles[fid.index()].insert_into_track(fc, ft);
        }
        Ok(())
    }

    /// Record a collision snapped onto an existing point, without moving
    /// either motorcycle.
    ///
    /// Both motorcycles get the point as a target (when still ahead of them)
    /// and their current position re-queued, so that their tentative tracks
    /// are examined again with the new point known.  Returns `false` when
    /// both already knew the point; the motorcycle then drives on as if no
    /// collision had been found.
    pub(crate) fn visit_snapped(&mut self, id: AgentId, cand: &CollisionCandidate) -> GraphResult<bool> {
        let Some(Collision::Entry(collision)) = cand.collision else {
            return Err(GraphError::Invariant(format!(
                "snapped collision of {id} is not an existing point"
            )));
        };
        let fid = cand.foreign;
        let tol = self.config.time_tolerance;
        let (mut t, mut ft) = (cand.time, cand.foreign_time);

        let mc_visit = self.dictionary.visit_in_range(collision, id, t - tol, t + tol);
        let fmc_visit = self.dictionary.visit_in_range(collision, fid, ft - tol, ft + tol);
        let equal_times = (ft - t).abs() <= tol;
        if equal_times {
            match (mc_visit, fmc_visit) {
                (None, Some(fv)) => t = fv,
                (Some(v), None) => ft = v,
                _ => {}
            }
        }

        let fd = self.dictionary.face(self.motorcycles[id.index()].current_position());
        let c = self.sibling(collision, fd)?;
        let ffd = self.dictionary.face(self.motorcycles[fid.index()].current_position());
        let fc = self.dictionary.get_sibling(collision, ffd);

        let mut changed = false;
        let mc = &mut self.motorcycles[id.index()];
        match mc_visit {
            Some(v) => {
                if c != mc.current_position() && !mc.has_target(c) && v >= mc.current_time() {
                    mc.add_target(c, v)?;
                    changed = true;
                }
            }
            None => {
                mc.add_target(c, t)?;
                self.dictionary.add_visit(c, id, t)?;
                changed = true;
            }
        }

        let fmc = &mut self.motorcycles[fid.index()];
        match fmc_visit {
            Some(fv) => {
                if let Some(fc) = fc {
                    if !fmc.is_crashed()
                        && fc != fmc.current_position()
                        && !fmc.has_target(fc)
                        && fv >= fmc.current_time()
                    {
                        fmc.add_target(fc, fv)?;
                        changed = true;
                    }
                }
            }
            None => {
                if !fmc.is_crashed() && ft >= fmc.current_time() {
                    let Some(fc) = fc else {
                        return Err(GraphError::Invariant(format!(
                            "snapped collision {collision} is not in the face of {fid}"
                        )));
                    };
                    fmc.add_target(fc, ft)?;
                }
                self.dictionary.add_visit(collision, fid, ft)?;
                if ft <= fmc.current_time() {
                    self.dictionary.block(collision);
                }
                changed = true;
            }
        }
        if !changed {
            trace!(agent = %id, foreign = %fid, entry = %collision, "snapped collision already known");
            return Ok(false);
        }

        // Re-examine both tentative tracks from the current positions.
        let mc = &mut self.motorcycles[id.index()];
        if c != mc.current_position() {
            mc.add_target(mc.current_position(), mc.current_time())?;
        }
        self.queue.update(&self.motorcycles[id.index()]);

        let fmc = &mut self.motorcycles[fid.index()];
        if !fmc.is_crashed() {
            let fcur = fmc.current_position();
            if fc.is_some_and(|fc| fmc.has_target(fc) && fc != fcur) {
                fmc.add_target(fcur, fmc.current_time())?;
            }
            self.queue.update(&self.motorcycles[fid.index()]);
        }
        debug!(agent = %id, foreign = %fid, entry = %collision, time = t, foreign_time = ft, "snapped collision");
        Ok(true)
    }

    /// Representation of `entry` in `face`; a missing one breaks the
    /// collision bookkeeping.
    fn sibling(&self, entry: EntryId, face: FaceId) -> GraphResult<EntryId> {
        self.dictionary.get_sibling(entry, face).ok_or_else(|| {
            GraphError::Invariant(format!("entry {entry} has no representation in face {face}"))
        })
    }

    /// Midpoint of `[p, q]` at the mean time, inserted into the dictionary.
    ///
    /// `None` when the midpoint collapses onto an extremity, or `agent`
    /// already has a target or a different visit there.
    fn halving_point(
        &mut self,
        agent: AgentId,
        p: EntryId,
        p_time: f64,
        q: EntryId,
        q_time: f64,
    ) -> GraphResult<Option<(EntryId, f64)>> {
        let (pl, ql) = (self.dictionary.location(p), self.dictionary.location(q));
        if pl.face != ql.face {
            return Err(GraphError::Invariant(format!(
                "halving point between {p} and {q} in different faces"
            )));
        }
        let time = 0.5 * (p_time + q_time);
        let (h, _) = self.dictionary.insert(&pl.midpoint(&ql), &self.mesh);
        if self.dictionary.is_sibling(h, p) || self.dictionary.is_sibling(h, q) {
            return Ok(None);
        }
        if self.motorcycles[agent.index()].has_target_at_time(time).is_some() {
            return Ok(None);
        }
        let tol = self.config.time_tolerance;
        if self
            .dictionary
            .visit_time(h, agent)
            .is_some_and(|v| (v - time).abs() > tol)
        {
            return Ok(None);
        }
        Ok(Some((h, time)))
    }
}
