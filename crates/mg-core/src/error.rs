//! Base error type.
//!
//! Every `mg-*` crate defines its own error enum and wraps `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::{AgentId, FaceId};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("face {0} not found")]
    FaceNotFound(FaceId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `mg-core`.
pub type CoreResult<T> = Result<T, CoreError>;
