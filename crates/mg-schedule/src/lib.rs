//! `mg-schedule` — which motorcycle moves next.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`event_queue`] | `EventQueue` (ordered set + per-agent slots), `Scheduled` |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                  |
//!
//! # Ordering
//!
//! Agents are ordered by the time of their closest target, ties by id.  The
//! queue does not observe agents; after any change to an agent's targets the
//! caller must call [`EventQueue::update`] (or [`EventQueue::erase`]).  Each
//! slot remembers the agent's `version` at that moment, and
//! [`EventQueue::top_checked`] refuses to hand out an agent that changed
//! since.

pub mod error;
pub mod event_queue;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use event_queue::{EventQueue, Scheduled};
