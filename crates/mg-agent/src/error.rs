//! Agent and track-segment error types.

use thiserror::Error;

use mg_core::{AgentId, EntryId, FaceId};
use mg_dictionary::DictionaryError;
use mg_mesh::MeshError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {agent}: target at t = {time} is before the current time {current}")]
    TargetInPast { agent: AgentId, time: f64, current: f64 },

    #[error("agent {agent}: speed must be positive and finite, got {speed}")]
    InvalidSpeed { agent: AgentId, speed: f64 },

    #[error("agent {agent}: start time must be finite, got {time}")]
    InvalidStartTime { agent: AgentId, time: f64 },

    #[error("agent {0}: direction must be a finite, non-zero vector")]
    InvalidDirection(AgentId),

    #[error("agent {0} has no target left")]
    NoTarget(AgentId),

    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

pub type AgentResult<T> = Result<T, AgentError>;

#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("track segment of {agent} ends before it starts ({time_at_source} > {time_at_destination})")]
    TimeReversed {
        agent: AgentId,
        time_at_source: f64,
        time_at_destination: f64,
    },

    #[error("track segment of {agent}: entry {entry} does not lie in face {face}")]
    EntryNotInFace { agent: AgentId, entry: EntryId, face: FaceId },
}

pub type SegmentResult<T> = Result<T, SegmentError>;
