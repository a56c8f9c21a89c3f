//! The `MotorcycleGraph` struct and its event loop.

use tracing::{debug, info, trace, warn};

use mg_agent::{Motorcycle, NextPath, StraightTracer, Tracer, TrackSegmentStore};
use mg_core::geometry::scalar_product;
use mg_core::{AgentId, CoreError, EntryId, PointOrLocation, TracerConfig, Vector2};
use mg_dictionary::Dictionary;
use mg_mesh::{Descriptor, FaceComplex};
use mg_schedule::EventQueue;

use crate::collision::CollisionDetector;
use crate::{GraphError, GraphObserver, GraphResult, NoopObserver};

/// Relative distance from the direction ray above which an explicit
/// destination is reported.
const RAY_EPS: f64 = 1e-9;

/// The motorcycle graph of a set of agents on a mesh.
///
/// Owns the mesh, the point dictionary, the motorcycles and the confirmed
/// track segments.  [`trace`](Self::trace) runs the whole event loop;
/// [`step`](Self::step) processes one event at a time.
///
/// Create via [`MotorcycleGraphBuilder`](crate::MotorcycleGraphBuilder).
pub struct MotorcycleGraph<M: FaceComplex, T: Tracer = StraightTracer> {
    pub(crate) mesh: M,
    pub(crate) config: TracerConfig,
    pub(crate) tracer: T,
    pub(crate) dictionary: Dictionary,
    pub(crate) segments: TrackSegmentStore,
    /// Indexed by `AgentId`.
    pub(crate) motorcycles: Vec<Motorcycle>,
    pub(crate) queue: EventQueue,
    pub(crate) initialized: bool,
    pub(crate) events: u64,
}

impl<M: FaceComplex, T: Tracer> MotorcycleGraph<M, T> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn segments(&self) -> &TrackSegmentStore {
        &self.segments
    }

    pub fn motorcycles(&self) -> &[Motorcycle] {
        &self.motorcycles
    }

    pub fn motorcycle(&self, id: AgentId) -> GraphResult<&Motorcycle> {
        self.motorcycles
            .get(id.index())
            .ok_or_else(|| CoreError::AgentNotFound(id).into())
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Number of events processed so far.
    pub fn event_count(&self) -> u64 {
        self.events
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Trace the graph until every motorcycle has crashed.
    ///
    /// Initializes the graph first if needed, and runs
    /// [`is_valid`](Self::is_valid) at the end when
    /// `config.check_validity` is set.
    pub fn trace<O: GraphObserver>(&mut self, observer: &mut O) -> GraphResult<()> {
        if !self.initialized {
            self.initialize()?;
        }
        observer.on_initialized(self);
        info!(
            motorcycles = self.motorcycles.len(),
            queued = self.queue.len(),
            "tracing started"
        );

        while self.process_next_event(observer)? {}

        if self.config.check_validity {
            self.is_valid()?;
        }
        info!(
            events = self.events,
            points = self.dictionary.point_count(),
            segments = self.segments.len(),
            "tracing finished"
        );
        observer.on_finished(self);
        Ok(())
    }

    /// Process a single event.  Returns `false` once the queue is empty.
    pub fn step(&mut self) -> GraphResult<bool> {
        if !self.initialized {
            self.initialize()?;
        }
        self.process_next_event(&mut NoopObserver)
    }

    /// Place every motorcycle, compute its first path and fill the queue.
    ///
    /// Pairs of motorcycles leaving the same source in the same direction
    /// crash right away.  Calling it twice is an error.
    pub fn initialize(&mut self) -> GraphResult<()> {
        if self.initialized {
            return Err(GraphError::Invariant("graph already initialized".into()));
        }
        for i in 0..self.motorcycles.len() {
            self.initialize_motorcycle(i)?;
        }
        self.queue = EventQueue::initialize(&self.motorcycles);
        self.crash_motorcycles_with_same_source_and_direction();
        self.initialized = true;
        info!(
            motorcycles = self.motorcycles.len(),
            points = self.dictionary.point_count(),
            "motorcycles initialized"
        );
        Ok(())
    }

    // ── Event processing ──────────────────────────────────────────────────

    pub(crate) fn process_next_event<O: GraphObserver>(
        &mut self,
        observer: &mut O,
    ) -> GraphResult<bool> {
        let Some(id) = self.queue.top_checked(&self.motorcycles)? else {
            return Ok(false);
        };
        let i = id.index();
        let (current, time) = self.motorcycles[i].advance_to_closest_target()?;
        self.events += 1;
        observer.on_event(id, time);
        debug!(agent = %id, entry = %current, time, "reached target");

        let mc = &self.motorcycles[i];
        let face = self.dictionary.face(current);

        if current == mc.destination() {
            self.segments.add(
                face,
                id,
                mc.source(),
                mc.time_at_source(),
                current,
                time,
                &self.dictionary,
            )?;

            if mc.is_destination_final() || self.is_crashing_point(id) {
                if self.crash(id) {
                    observer.on_crash(id, time);
                }
                return Ok(true);
            }

            self.motorcycles[i].clear_targets(&mut self.dictionary);
            if self.compute_next_path(id)? {
                // The new path starts here: the point stays open.
                self.queue.update(&self.motorcycles[i]);
            } else if self.crash(id) {
                observer.on_crash(id, time);
            }
            return Ok(true);
        }

        if self.is_crashing_point(id) {
            self.segments.add(
                face,
                id,
                mc.source(),
                mc.time_at_source(),
                current,
                time,
                &self.dictionary,
            )?;
            if self.crash(id) {
                observer.on_crash(id, time);
            }
            return Ok(true);
        }

        let cand = CollisionDetector::new(
            &self.mesh,
            &self.dictionary,
            &self.segments,
            &self.motorcycles,
            &self.motorcycles[i],
            &self.config,
        )
        .find()?;

        if cand.snapped {
            observer.on_collision(id, cand.foreign, cand.time);
            if self.visit_snapped(id, &cand)? {
                return Ok(true);
            }
        } else if cand.is_found() {
            observer.on_collision(id, cand.foreign, cand.time);
            self.treat_collision(id, &cand)?;
        }
        self.queue.update(&self.motorcycles[i]);
        self.dictionary.block(current);
        Ok(true)
    }

    /// Has the motorcycle reached a point it cannot go past?
    ///
    /// It has if another motorcycle visits the point strictly earlier or at
    /// the same time (within `time_tolerance`).  Every blocked point carries
    /// the visit of whoever blocked it, so a point blocked by the motorcycle
    /// itself does not stop it.  While departing, a motorcycle ignores others
    /// leaving the same source at the same instant.
    pub(crate) fn is_crashing_point(&self, id: AgentId) -> bool {
        let mc = &self.motorcycles[id.index()];
        let here = mc.current_position();
        let now = mc.current_time();
        let tol = self.config.time_tolerance;
        let departing = mc.is_departing();

        self.dictionary.visitors(here).any(|(agent, t)| {
            if agent == id {
                return false;
            }
            let simultaneous = (t - now).abs() <= tol;
            if simultaneous && departing && self.departs_from(agent, here, now) {
                return false;
            }
            t < now || simultaneous
        })
    }

    /// Does `agent` start at the point of `here` at `time`?
    fn departs_from(&self, agent: AgentId, here: EntryId, time: f64) -> bool {
        let fmc = &self.motorcycles[agent.index()];
        (fmc.start_time() - time).abs() <= self.config.time_tolerance
            && fmc
                .track()
                .first()
                .is_some_and(|&(e, _)| self.dictionary.is_sibling(e, here))
    }

    /// Crash `id` and drop it from the queue.  Returns `false` if it had
    /// already crashed.
    pub(crate) fn crash(&mut self, id: AgentId) -> bool {
        let mc = &mut self.motorcycles[id.index()];
        if mc.is_crashed() {
            return false;
        }
        mc.crash(&mut self.dictionary);
        self.queue.erase(id);
        debug!(agent = %id, time = mc.current_time(), entry = %mc.current_position(), "crashed");
        true
    }

    /// Ask the tracer for the next path and start it.  `false` when there is
    /// nowhere to go.
    fn compute_next_path(&mut self, id: AgentId) -> GraphResult<bool> {
        let Self { motorcycles, tracer, dictionary, mesh, .. } = self;
        let mc = &mut motorcycles[id.index()];

        let Some(path) = mc.compute_next_destination(&*tracer, dictionary, &*mesh)? else {
            trace!(agent = %id, "no next path");
            return Ok(false);
        };
        if !dictionary.is_sibling(path.source, mc.current_position()) {
            return Err(GraphError::Invariant(format!(
                "next path of {id} starts at {} instead of {}",
                path.source,
                mc.current_position()
            )));
        }
        if path.source != path.destination {
            dictionary.add_visit(path.destination, id, path.time_at_destination)?;
        }
        mc.start_path(&path)?;
        debug!(
            agent = %id,
            source = %path.source,
            destination = %path.destination,
            time_at_destination = path.time_at_destination,
            is_final = path.is_final,
            "next path"
        );
        Ok(true)
    }

    // ── Initialization ────────────────────────────────────────────────────

    fn initialize_motorcycle(&mut self, i: usize) -> GraphResult<()> {
        let border_tol = self.config.border_tolerance;
        let mc = &self.motorcycles[i];
        let id = mc.id();
        let t0 = mc.start_time();

        let source_loc = match *mc.input_source() {
            PointOrLocation::Point(p) => self.mesh.locate(p)?,
            PointOrLocation::Location(loc) => loc,
        }
        .snapped_to_border(border_tol);
        let (source, _) = self
            .dictionary
            .insert_visited(&source_loc, &self.mesh, id, t0)?;
        self.motorcycles[i].place_at_source(source);

        let path = match self.motorcycles[i].input_destination().copied() {
            None => self.first_path_from_tracer(i)?,
            Some(input) => self.first_path_to(i, input)?,
        };
        let mc = &mut self.motorcycles[i];
        mc.start_path(&path)?;
        mc.insert_into_track(path.source, t0);

        let from = self.dictionary.position(path.source);
        let to = self.dictionary.position(path.destination);
        match mc.direction() {
            None => mc.set_direction(to - from),
            Some(d) if path.source != path.destination => {
                let v = to - from;
                let off_ray = v.cross(d).length() > RAY_EPS * v.length() * d.length();
                if off_ray || v.dot(d) < 0.0 {
                    warn!(agent = %id, "destination is not on the direction ray");
                }
            }
            Some(_) => {}
        }
        trace!(
            agent = %id,
            source = %path.source,
            destination = %path.destination,
            time_at_destination = path.time_at_destination,
            "motorcycle placed"
        );
        Ok(())
    }

    /// First path of a motorcycle without an explicit destination.
    fn first_path_from_tracer(&mut self, i: usize) -> GraphResult<NextPath> {
        let Self { motorcycles, tracer, dictionary, mesh, .. } = self;
        let mc = &mut motorcycles[i];
        let source = mc.source();

        let Some(path) = mc.compute_next_destination(&*tracer, dictionary, &*mesh)? else {
            // Nowhere to go: a degenerate, final track.
            return Ok(NextPath {
                source,
                destination: source,
                time_at_destination: mc.start_time(),
                is_final: true,
            });
        };
        if path.source != source {
            warn!(agent = %mc.id(), from = %source, to = %path.source, "source relocated to the face of its path");
            mc.relocate_source(path.source);
        }
        if path.source != path.destination {
            dictionary.add_visit(path.destination, mc.id(), path.time_at_destination)?;
        }
        Ok(path)
    }

    /// First path of a motorcycle towards an explicit destination.
    fn first_path_to(&mut self, i: usize, input: PointOrLocation) -> GraphResult<NextPath> {
        let border_tol = self.config.border_tolerance;
        let mc = &self.motorcycles[i];
        let id = mc.id();
        let source = mc.source();
        let source_loc = self.dictionary.location(source);

        let located = match input {
            PointOrLocation::Point(p) => {
                if matches!(self.mesh.descriptor(&source_loc), Descriptor::Face(_)) {
                    let loc = self.mesh.locate_in_face(source_loc.face, p).snapped_to_border(border_tol);
                    loc.is_inside(border_tol).then_some((source_loc, loc))
                } else {
                    let loc = self.mesh.locate(p)?.snapped_to_border(border_tol);
                    self.mesh.locate_in_common_face(&source_loc, &loc)
                }
            }
            PointOrLocation::Location(loc) => {
                let loc = loc.snapped_to_border(border_tol);
                self.mesh.locate_in_common_face(&source_loc, &loc)
            }
        };
        let Some((source_loc, dest_loc)) = located else {
            return Err(GraphError::Invariant(format!(
                "source and destination of {id} share no face"
            )));
        };

        let source = if source_loc.face != self.dictionary.face(source) {
            let (relocated, _) = self.dictionary.insert(&source_loc, &self.mesh);
            warn!(agent = %id, from = %source, to = %relocated, "source relocated to a face shared with its destination");
            self.motorcycles[i].relocate_source(relocated);
            relocated
        } else {
            source
        };

        let (destination, _) = self.dictionary.insert(&dest_loc, &self.mesh);
        let mc = &self.motorcycles[i];
        let time_at_destination = mc.start_time()
            + self.dictionary.position(source).distance(self.dictionary.position(destination))
                / mc.speed();
        let is_final = mc.stops_at_input_destination();
        if destination != source {
            self.dictionary.add_visit(destination, id, time_at_destination)?;
        }
        Ok(NextPath { source, destination, time_at_destination, is_final })
    }

    /// Motorcycles leaving the same source along the same direction would
    /// share a track: crash both.
    fn crash_motorcycles_with_same_source_and_direction(&mut self) {
        let tol = self.config.same_direction_tolerance;
        let n = self.motorcycles.len();
        for i in 0..n {
            let mc = &self.motorcycles[i];
            if mc.source() == mc.destination() || mc.is_crashed() {
                continue;
            }
            let u = self.chart_vector(mc.source(), mc.destination());
            let mut partner = None;
            for j in 0..n {
                let fmc = &self.motorcycles[j];
                // Crashed partners still count, for three or more motorcycles.
                if i == j || fmc.source() == fmc.destination() || fmc.source() != mc.source() {
                    continue;
                }
                let v = self.chart_vector(fmc.source(), fmc.destination());
                let sp = scalar_product(u, v);
                let norms = u.squared_length() * v.squared_length();
                if sp > 0.0 && (1.0 - sp * sp / norms).abs() < tol {
                    partner = Some(fmc.id());
                    break;
                }
            }
            if let Some(j) = partner {
                let id = self.motorcycles[i].id();
                debug!(agent = %id, other = %j, "same source and direction");
                self.crash(id);
                self.crash(j);
            }
        }
    }

    fn chart_vector(&self, from: EntryId, to: EntryId) -> Vector2 {
        self.dictionary.location(to).point2() - self.dictionary.location(from).point2()
    }
}
