//! Mesh error type.

use thiserror::Error;

use mg_core::{CoreError, FaceId, Point3, VertexId};

/// Errors produced by `mg-mesh`.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("point ({0}) is not on the mesh")]
    PointOutsideMesh(Point3),

    #[error("face {face} references missing vertex {vertex}")]
    VertexNotFound { face: FaceId, vertex: VertexId },

    #[error("face {0} is degenerate")]
    DegenerateFace(FaceId),

    #[error("edge {from} -> {to} is used twice with the same orientation")]
    NonManifoldEdge { from: VertexId, to: VertexId },

    #[error("mesh has no faces")]
    Empty,

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type MeshResult<T> = Result<T, MeshError>;
