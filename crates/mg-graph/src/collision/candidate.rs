use mg_core::{AgentId, EntryId, FaceId, FaceLocation};

/// Where a collision happens.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Collision {
    /// A point already in the dictionary.
    Entry(EntryId),
    /// A new point, inserted when the collision is handled.
    Location(FaceLocation),
}

/// Best collision found so far on a tentative track.
///
/// Candidates are compared by the time `mc` reaches them, then by the time
/// the foreign motorcycle does.  Nothing later than `max_time` (the time at
/// the closest target) is accepted.
#[derive(Clone, Debug)]
pub struct CollisionCandidate {
    pub collision: Option<Collision>,
    pub time: f64,
    pub foreign: AgentId,
    pub foreign_time: f64,
    /// Face of the foreign track, when it differs from the face of `mc`.
    pub foreign_face: Option<FaceId>,
    /// The collision was snapped onto an existing point: record the visits
    /// without moving either motorcycle.
    pub snapped: bool,
    max_time: f64,
}

impl CollisionCandidate {
    pub fn new(max_time: f64) -> Self {
        Self {
            collision: None,
            time: f64::MAX,
            foreign: AgentId::INVALID,
            foreign_time: f64::MAX,
            foreign_face: None,
            snapped: false,
            max_time,
        }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        self.collision.is_some()
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    /// `true` if a collision at (`time`, `foreign_time`) beats the current best.
    pub fn is_earlier(&self, time: f64, foreign_time: f64) -> bool {
        if time > self.max_time {
            return false;
        }
        time < self.time || (time == self.time && foreign_time < self.foreign_time)
    }

    /// Replace the current best unconditionally.
    pub(crate) fn set(
        &mut self,
        collision: Collision,
        time: f64,
        foreign: AgentId,
        foreign_time: f64,
        foreign_face: Option<FaceId>,
    ) {
        self.collision = Some(collision);
        self.time = time;
        self.foreign = foreign;
        self.foreign_time = foreign_time;
        self.foreign_face = foreign_face;
        self.snapped = false;
    }

    /// [`set`](Self::set) if the collision is earlier than the current best.
    pub(crate) fn offer(
        &mut self,
        collision: Collision,
        time: f64,
        foreign: AgentId,
        foreign_time: f64,
        foreign_face: Option<FaceId>,
    ) -> bool {
        if !self.is_earlier(time, foreign_time) {
            return false;
        }
        self.set(collision, time, foreign, foreign_time, foreign_face);
        true
    }

    pub(crate) fn set_snapped(
        &mut self,
        entry: EntryId,
        time: f64,
        foreign: AgentId,
        foreign_time: f64,
        foreign_face: Option<FaceId>,
    ) {
        self.set(Collision::Entry(entry), time, foreign, foreign_time, foreign_face);
        self.snapped = true;
    }
}
