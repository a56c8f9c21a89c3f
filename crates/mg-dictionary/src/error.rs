//! Dictionary error type.

use thiserror::Error;

use mg_core::{AgentId, EntryId};

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("agent {agent} already visits {entry} at t = {existing}, cannot also visit at t = {requested}")]
    InconsistentVisit {
        agent: AgentId,
        entry: EntryId,
        existing: f64,
        requested: f64,
    },
}

pub type DictionaryResult<T> = Result<T, DictionaryError>;
