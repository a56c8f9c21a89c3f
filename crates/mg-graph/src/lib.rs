//! `mg-graph` — the event-driven motorcycle graph tracer.
//!
//! # Event loop
//!
//! ```text
//! initialize:
//!   locate sources, compute first paths, queue every motorcycle,
//!   crash pairs leaving the same source in the same direction.
//!
//! while the queue is not empty:
//!   ① Drive     — pop the earliest motorcycle, move it to its closest target.
//!   ② Arrival   — at its destination: record the track segment, then crash
//!                 (final destination, blocked point) or ask the tracer for
//!                 the next path.
//!   ③ Crash     — elsewhere, crash on a blocked or simultaneously reached point.
//!   ④ Collision — otherwise look for the first collision on the tentative
//!                 track (current position → closest target), record it on
//!                 both tracks, requeue and block the current position.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mg_agent::AgentSpec;
//! use mg_core::{Point3, Vector3};
//! use mg_graph::{MotorcycleGraphBuilder, NoopObserver};
//! use mg_mesh::shapes;
//!
//! let mut graph = MotorcycleGraphBuilder::new(shapes::square(1.0)?)
//!     .add_agent(AgentSpec::from_point(Point3::new(0.1, 0.5, 0.0)).towards(Vector3::new(1.0, 0.0, 0.0)))
//!     .add_agent(AgentSpec::from_point(Point3::new(0.5, 0.1, 0.0)).towards(Vector3::new(0.0, 1.0, 0.0)))
//!     .build()?;
//! graph.trace(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod collision;
pub mod error;
pub mod graph;
mod handling;
pub mod observer;
mod validity;


pub use builder::MotorcycleGraphBuilder;
pub use collision::{Collision, CollisionCandidate};
pub use error::{GraphError, GraphResult};
pub use graph::MotorcycleGraph;
pub use observer::{GraphObserver, NoopObserver};
