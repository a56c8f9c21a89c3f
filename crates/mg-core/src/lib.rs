//! `mg-core` — foundational types for the motorcycle-graph workspace.
//!
//! This crate is a dependency of every other `mg-*` crate.  It has no `mg-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `FaceId`, `VertexId`, `HalfedgeId`, `EntryId`, `PointId` |
//! | [`geometry`]    | 2D/3D points and vectors, segment predicates               |
//! | [`location`]    | `FaceLocation`, barycentric helpers, `PointOrLocation`     |
//! | [`config`]      | `TracerConfig` (tolerances, validity check)                |
//! | [`rng`]         | `TraceRng` (seeded, stream-mixed)                          |
//! | [`error`]       | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod location;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::TracerConfig;
pub use error::{CoreError, CoreResult};
pub use geometry::{Angle, Point2, Point3, Segment2, Vector2, Vector3};
pub use ids::{AgentId, EntryId, FaceId, HalfedgeId, PointId, VertexId};
pub use location::{Barycentric, FaceLocation, LocationKey, PointOrLocation};
pub use rng::TraceRng;
