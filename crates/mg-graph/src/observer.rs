//! Tracer observer trait for progress reporting and data collection.

use mg_agent::Tracer;
use mg_core::AgentId;
use mg_mesh::FaceComplex;

use crate::MotorcycleGraph;

/// Callbacks invoked by [`MotorcycleGraph::trace`] at key points of the
/// event loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: crash counter
///
/// ```rust,ignore
/// struct CrashCounter(usize);
///
/// impl GraphObserver for CrashCounter {
///     fn on_crash(&mut self, _agent: AgentId, _time: f64) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait GraphObserver {
    /// Called once all motorcycles are placed and queued, before the first
    /// event.  Motorcycles crashed during initialization are already marked.
    fn on_initialized<M: FaceComplex, T: Tracer>(&mut self, _graph: &MotorcycleGraph<M, T>) {}

    /// Called after `agent` reached its closest target at `time`.
    fn on_event(&mut self, _agent: AgentId, _time: f64) {}

    /// Called when a collision between `agent` and `foreign` is recorded.
    fn on_collision(&mut self, _agent: AgentId, _foreign: AgentId, _time: f64) {}

    fn on_crash(&mut self, _agent: AgentId, _time: f64) {}

    /// Called once the queue is empty (and the graph validated, if enabled).
    fn on_finished<M: FaceComplex, T: Tracer>(&mut self, _graph: &MotorcycleGraph<M, T>) {}
}

/// A [`GraphObserver`] that does nothing.
pub struct NoopObserver;

impl GraphObserver for NoopObserver {}
