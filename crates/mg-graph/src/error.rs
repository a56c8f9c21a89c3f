use thiserror::Error;

use mg_agent::{AgentError, SegmentError};
use mg_core::CoreError;
use mg_dictionary::DictionaryError;
use mg_mesh::MeshError;
use mg_schedule::ScheduleError;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A structural assumption of the tracer does not hold; the run is aborted.
    #[error("tracer invariant violated: {0}")]
    Invariant(String),

    /// Two confirmed tracks overlap without a recorded collision.
    #[error("invalid motorcycle graph: {0}")]
    InvalidGraph(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type GraphResult<T> = Result<T, GraphError>;
