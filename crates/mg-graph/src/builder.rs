//! Fluent builder for constructing a [`MotorcycleGraph`].

use mg_agent::{AgentSpec, Motorcycle, StraightTracer, Tracer, TrackSegmentStore};
use mg_core::{AgentId, TracerConfig};
use mg_dictionary::Dictionary;
use mg_mesh::{FaceComplex, MeshError};
use mg_schedule::EventQueue;

use crate::{GraphError, GraphResult, MotorcycleGraph};

/// Fluent builder for [`MotorcycleGraph<M, T>`].
///
/// # Required inputs
///
/// - `M: FaceComplex`, the mesh the motorcycles drive on
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                      |
/// |-------------------|------------------------------|
/// | `.config(c)`      | `TracerConfig::default()`    |
/// | `.tracer(t)`      | [`StraightTracer`]           |
/// | `.add_agent(s)`   | no motorcycles               |
/// | `.agents(iter)`   | no motorcycles               |
///
/// Agent ids follow insertion order: the first spec becomes `AgentId(0)`.
///
/// # Example
///
/// ```rust,ignore
/// let mut graph = MotorcycleGraphBuilder::new(mesh)
///     .config(TracerConfig { check_validity: true, ..TracerConfig::default() })
///     .tracer(StopAtDestination)
///     .agents(specs)
///     .build()?;
/// graph.trace(&mut NoopObserver)?;
/// ```
pub struct MotorcycleGraphBuilder<M: FaceComplex, T: Tracer = StraightTracer> {
    mesh: M,
    config: Option<TracerConfig>,
    tracer: T,
    agents: Vec<AgentSpec>,
}

impl<M: FaceComplex> MotorcycleGraphBuilder<M, StraightTracer> {
    pub fn new(mesh: M) -> Self {
        Self { mesh, config: None, tracer: StraightTracer, agents: Vec::new() }
    }
}

impl<M: FaceComplex, T: Tracer> MotorcycleGraphBuilder<M, T> {
    pub fn config(mut self, config: TracerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the path strategy used when a motorcycle has no explicit
    /// destination, or keeps driving past it.
    pub fn tracer<U: Tracer>(self, tracer: U) -> MotorcycleGraphBuilder<M, U> {
        MotorcycleGraphBuilder {
            mesh: self.mesh,
            config: self.config,
            tracer,
            agents: self.agents,
        }
    }

    pub fn add_agent(mut self, spec: AgentSpec) -> Self {
        self.agents.push(spec);
        self
    }

    pub fn agents(mut self, specs: impl IntoIterator<Item = AgentSpec>) -> Self {
        self.agents.extend(specs);
        self
    }

    /// Validate the inputs and return a graph ready to be initialized.
    ///
    /// Nothing is located on the mesh yet; that happens in
    /// [`MotorcycleGraph::initialize`].
    pub fn build(self) -> GraphResult<MotorcycleGraph<M, T>> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        if self.mesh.face_count() == 0 {
            return Err(MeshError::Empty.into());
        }

        let motorcycles = self
            .agents
            .into_iter()
            .enumerate()
            .map(|(i, spec)| {
                let id = AgentId::try_from(i)
                    .map_err(|_| GraphError::Invariant(format!("too many motorcycles ({i})")))?;
                Ok(Motorcycle::new(id, spec)?)
            })
            .collect::<GraphResult<Vec<_>>>()?;

        Ok(MotorcycleGraph {
            dictionary: Dictionary::new(&config),
            segments: TrackSegmentStore::new(),
            queue: EventQueue::new(),
            mesh: self.mesh,
            config,
            tracer: self.tracer,
            motorcycles,
            initialized: false,
            events: 0,
        })
    }
}
