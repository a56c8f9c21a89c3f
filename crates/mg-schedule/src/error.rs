use thiserror::Error;

use mg_core::AgentId;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("agent {agent} changed since it was queued (queued version {queued}, now {current})")]
    Stale { agent: AgentId, queued: u64, current: u64 },

    #[error("agent {0} is queued but unknown")]
    UnknownAgent(AgentId),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
