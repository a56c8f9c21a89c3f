//! Per-motorcycle state.
//!
//! # Targets and track
//!
//! `targets` holds the points the motorcycle still has to reach, ascending by
//! time: its destination, collision points, and halving points in between.
//! `track` holds the points it has confirmed (reached), also ascending by
//! time.  Both are small sorted `Vec`s of `(EntryId, time)`.
//!
//! # Versioning
//!
//! Every change to the targets or the crash state bumps `version`, which the
//! [`EventQueue`](mg_schedule::EventQueue) compares against the version it
//! saw when the motorcycle was last queued.

use mg_core::{AgentId, EntryId, PointOrLocation, Vector3};
use mg_dictionary::Dictionary;
use mg_mesh::FaceComplex;
use mg_schedule::Scheduled;

use crate::{AgentError, AgentResult, AgentSpec, NextPath, Tracer};

#[derive(Clone, Debug)]
pub struct Motorcycle {
    id: AgentId,
    input_source: PointOrLocation,
    input_destination: Option<PointOrLocation>,
    direction: Option<Vector3>,
    speed: f64,
    start_time: f64,
    is_final_on_input: bool,

    source: EntryId,
    time_at_source: f64,
    destination: EntryId,
    is_destination_final: bool,

    current: EntryId,
    current_time: f64,

    targets: Vec<(EntryId, f64)>,
    track: Vec<(EntryId, f64)>,

    crashed: bool,
    version: u64,
}

impl Motorcycle {
    /// Validate `spec` and create an unplaced motorcycle.
    pub fn new(id: AgentId, spec: AgentSpec) -> AgentResult<Self> {
        if !(spec.speed.is_finite() && spec.speed > 0.0) {
            return Err(AgentError::InvalidSpeed { agent: id, speed: spec.speed });
        }
        if !spec.start_time.is_finite() {
            return Err(AgentError::InvalidStartTime { agent: id, time: spec.start_time });
        }
        if let Some(d) = spec.direction {
            let finite = d.x.is_finite() && d.y.is_finite() && d.z.is_finite();
            if !finite || d.is_zero() {
                return Err(AgentError::InvalidDirection(id));
            }
        }

        Ok(Self {
            id,
            input_source: spec.source,
            input_destination: spec.destination,
            direction: spec.direction,
            speed: spec.speed,
            start_time: spec.start_time,
            is_final_on_input: spec.is_final,
            source: EntryId::INVALID,
            time_at_source: spec.start_time,
            destination: EntryId::INVALID,
            is_destination_final: spec.is_final,
            current: EntryId::INVALID,
            current_time: spec.start_time,
            targets: Vec::new(),
            track: Vec::new(),
            crashed: false,
            version: 0,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn input_source(&self) -> &PointOrLocation {
        &self.input_source
    }

    pub fn input_destination(&self) -> Option<&PointOrLocation> {
        self.input_destination.as_ref()
    }

    pub fn direction(&self) -> Option<Vector3> {
        self.direction
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// `false` if the motorcycle keeps driving past an explicit destination.
    pub fn stops_at_input_destination(&self) -> bool {
        self.is_final_on_input
    }

    #[inline]
    pub fn source(&self) -> EntryId {
        self.source
    }

    #[inline]
    pub fn time_at_source(&self) -> f64 {
        self.time_at_source
    }

    #[inline]
    pub fn destination(&self) -> EntryId {
        self.destination
    }

    pub fn is_destination_final(&self) -> bool {
        self.is_destination_final
    }

    #[inline]
    pub fn current_position(&self) -> EntryId {
        self.current
    }

    #[inline]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[inline]
    pub fn is_crashed(&self) -> bool {
        self.crashed
    }

    /// Still at its own source at its start time, before any move.
    pub fn is_departing(&self) -> bool {
        !self.crashed && self.current_time == self.start_time
    }

    pub fn targets(&self) -> &[(EntryId, f64)] {
        &self.targets
    }

    pub fn track(&self) -> &[(EntryId, f64)] {
        &self.track
    }

    pub fn closest_target(&self) -> Option<EntryId> {
        self.targets.first().map(|&(e, _)| e)
    }

    pub fn time_at_closest_target(&self) -> Option<f64> {
        self.targets.first().map(|&(_, t)| t)
    }

    // ── Targets ───────────────────────────────────────────────────────────

    /// Queue `entry` to be reached at `time`.  A target already queued at
    /// exactly `time` is kept and the call is a no-op.
    pub fn add_target(&mut self, entry: EntryId, time: f64) -> AgentResult<()> {
        if time < self.current_time {
            return Err(AgentError::TargetInPast {
                agent: self.id,
                time,
                current: self.current_time,
            });
        }
        if self.targets.iter().any(|&(_, t)| t == time) {
            return Ok(());
        }
        let at = self.targets.partition_point(|&(_, t)| t < time);
        self.targets.insert(at, (entry, time));
        self.version += 1;
        Ok(())
    }

    pub fn has_target(&self, entry: EntryId) -> bool {
        self.targets.iter().any(|&(e, _)| e == entry)
    }

    /// Target queued at exactly `time`.
    pub fn has_target_at_time(&self, time: f64) -> Option<EntryId> {
        self.targets.iter().find(|&&(_, t)| t == time).map(|&(e, _)| e)
    }

    /// First target with a time in `[lo, hi]`.
    pub fn has_target_in_range(&self, lo: f64, hi: f64) -> Option<(EntryId, f64)> {
        self.targets.iter().find(|&&(_, t)| lo <= t && t <= hi).copied()
    }

    /// Pop the closest target and make it the current position.
    pub fn advance_to_closest_target(&mut self) -> AgentResult<(EntryId, f64)> {
        if self.targets.is_empty() {
            return Err(AgentError::NoTarget(self.id));
        }
        let (entry, time) = self.targets.remove(0);
        self.current = entry;
        self.current_time = time;
        if self.track.last() != Some(&(entry, time)) {
            self.insert_into_track(entry, time);
        }
        self.version += 1;
        Ok((entry, time))
    }

    /// Drop all targets.  Visits recorded for points the motorcycle will now
    /// never reach are removed from `dict`.
    pub fn clear_targets(&mut self, dict: &mut Dictionary) {
        for (entry, _) in self.targets.drain(..) {
            if dict.visit_time(entry, self.id).is_some_and(|t| t > self.current_time) {
                dict.remove_visit(entry, self.id);
            }
        }
        self.version += 1;
    }

    /// Stop for good.  Idempotent.
    pub fn crash(&mut self, dict: &mut Dictionary) {
        if self.crashed {
            return;
        }
        self.clear_targets(dict);
        self.crashed = true;
        self.version += 1;
    }

    // ── Paths ─────────────────────────────────────────────────────────────

    /// Put the motorcycle at its source entry at its start time.
    pub fn place_at_source(&mut self, source: EntryId) {
        self.source = source;
        self.current = source;
        self.time_at_source = self.start_time;
        self.current_time = self.start_time;
        self.version += 1;
    }

    /// Switch the source to another representation of the same point.
    pub fn relocate_source(&mut self, source: EntryId) {
        if self.current == self.source {
            self.current = source;
        }
        self.source = source;
    }

    /// Start driving along `path` from the current time.
    ///
    /// The path source is queued at the current time, so the new path is
    /// examined before anything else the motorcycle might do.
    pub fn start_path(&mut self, path: &NextPath) -> AgentResult<()> {
        self.source = path.source;
        self.time_at_source = self.current_time;
        self.current = path.source;
        self.destination = path.destination;
        self.is_destination_final = path.is_final;
        if path.source != path.destination {
            self.add_target(path.destination, path.time_at_destination)?;
        }
        self.add_target(path.source, self.current_time)?;
        self.version += 1;
        Ok(())
    }

    /// Ask `tracer` where to go from the current position.
    pub fn compute_next_destination<T, M>(
        &self,
        tracer: &T,
        dict: &mut Dictionary,
        mesh: &M,
    ) -> AgentResult<Option<NextPath>>
    where
        T: Tracer,
        M: FaceComplex,
    {
        tracer.next_path(self, dict, mesh)
    }

    pub fn set_direction(&mut self, direction: Vector3) {
        if !direction.is_zero() {
            self.direction = Some(direction);
        }
    }

    /// Insert into the confirmed track, after any entry at the same time.
    pub fn insert_into_track(&mut self, entry: EntryId, time: f64) {
        let at = self.track.partition_point(|&(_, t)| t <= time);
        self.track.insert(at, (entry, time));
    }
}

impl Scheduled for Motorcycle {
    fn id(&self) -> AgentId {
        self.id
    }

    fn next_event_time(&self) -> Option<f64> {
        if self.crashed { None } else { self.time_at_closest_target() }
    }

    fn version(&self) -> u64 {
        self.version
    }
}
