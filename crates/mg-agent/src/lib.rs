//! `mg-agent` — the motorcycles and the tracks they leave behind.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`spec`]       | `AgentSpec` (fluent description of one motorcycle)         |
//! | [`motorcycle`] | `Motorcycle` (targets, confirmed track, crash state)       |
//! | [`tracer`]     | `Tracer` trait, `NextPath`, `StraightTracer`, `StopAtDestination` |
//! | [`segments`]   | `TrackSegment`, `TrackSegmentStore` (per-face index)       |
//! | [`error`]      | `AgentError`, `SegmentError`, `AgentResult<T>`             |
//!
//! A `Motorcycle` only knows dictionary entry ids.  Everything positional
//! (faces, coordinates, visits) is looked up in the
//! [`Dictionary`](mg_dictionary::Dictionary) owned by the graph.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on specs and segments.   |

pub mod error;
pub mod motorcycle;
pub mod segments;
pub mod spec;
pub mod tracer;

#[cfg(test)]
mod tests;

pub use error::{AgentError, AgentResult, SegmentError, SegmentResult};
pub use motorcycle::Motorcycle;
pub use segments::{TrackSegment, TrackSegmentStore};
pub use spec::AgentSpec;
pub use tracer::{NextPath, StopAtDestination, StraightTracer, Tracer};
