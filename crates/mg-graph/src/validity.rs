//! Brute-force check of a traced graph.

use mg_agent::Tracer;
use mg_core::geometry::{Segment2, segments_intersect};
use mg_core::{AgentId, EntryId};
use mg_mesh::FaceComplex;

use crate::{GraphError, GraphResult, MotorcycleGraph};

impl<M: FaceComplex, T: Tracer> MotorcycleGraph<M, T> {
    /// Check that no two confirmed tracks cross without a recorded collision.
    ///
    /// Every pair of track pieces lying in the same face may only meet at a
    /// single extremity.  A motorcycle reaching such a meeting point no
    /// earlier than the other one must have stopped there.
    ///
    /// Quadratic in the total track length; meant for tests and debugging.
    pub fn is_valid(&self) -> GraphResult<()> {
        for mc in &self.motorcycles {
            let track = mc.track();
            if track.len() < 2 {
                continue;
            }
            for (k, w) in track.windows(2).enumerate() {
                let ((cur, _), (next, t_next)) = (w[0], w[1]);
                if cur == next || self.dictionary.face(cur) != self.dictionary.face(next) {
                    continue;
                }
                let s = self.chart_segment(cur, next);
                let rest = &track[k + 2..];

                for fmc in &self.motorcycles {
                    if fmc.id() == mc.id() {
                        continue;
                    }
                    let ftrack = fmc.track();
                    if let [(only, _)] = ftrack {
                        if self.same_face(cur, *only)
                            && segments_intersect(&s, &self.chart_segment(*only, *only))
                            && (cur == *only) == (next == *only)
                        {
                            return Err(self.overlap(mc.id(), fmc.id(), next));
                        }
                        continue;
                    }

                    for fw in ftrack.windows(2) {
                        let ((fcur, ft_cur), (fnext, ft_next)) = (fw[0], fw[1]);
                        if !self.same_face(cur, fcur) || !self.same_face(fcur, fnext) {
                            continue;
                        }
                        if !segments_intersect(&s, &self.chart_segment(fcur, fnext)) {
                            continue;
                        }

                        let at_one_extremity = if fcur == fnext {
                            (cur == fcur) != (next == fcur)
                        } else {
                            [cur == fcur, cur == fnext, next == fcur, next == fnext]
                                .into_iter()
                                .filter(|&b| b)
                                .count()
                                == 1
                        };
                        if !at_one_extremity {
                            return Err(self.overlap(mc.id(), fmc.id(), next));
                        }

                        // Reached no earlier than the foreign motorcycle: the
                        // track must end there.
                        let yields = (next == fcur && t_next >= ft_cur)
                            || (next == fnext && t_next >= ft_next);
                        if yields && !rest.iter().all(|&(e, _)| self.dictionary.is_sibling(e, next)) {
                            return Err(GraphError::InvalidGraph(format!(
                                "{} drives on after reaching {next} (t = {t_next}) behind {}",
                                mc.id(),
                                fmc.id()
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn chart_segment(&self, a: EntryId, b: EntryId) -> Segment2 {
        Segment2::new(
            self.dictionary.location(a).point2(),
            self.dictionary.location(b).point2(),
        )
    }

    fn same_face(&self, a: EntryId, b: EntryId) -> bool {
        self.dictionary.face(a) == self.dictionary.face(b)
    }

    fn overlap(&self, agent: AgentId, foreign: AgentId, near: EntryId) -> GraphError {
        GraphError::InvalidGraph(format!(
            "tracks of {agent} and {foreign} overlap near {near} without a recorded collision"
        ))
    }
}
