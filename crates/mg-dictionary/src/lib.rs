//! `mg-dictionary` — every location the tracer has ever referenced.
//!
//! A location is stored once per face it can be expressed in: a point on a
//! shared edge has two entries, a point on a vertex one per incident face.
//! Sibling entries share a single [`PointRecord`] holding the visit times and
//! the blocked flag, so what happens to a point in one face is seen from all
//! of them.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`entry`]      | `DictionaryEntry`, `PointRecord`                      |
//! | [`dictionary`] | `Dictionary` (arenas + hash map + R-tree)             |
//! | [`error`]      | `DictionaryError`, `DictionaryResult<T>`              |

pub mod dictionary;
pub mod entry;
pub mod error;

#[cfg(test)]
mod tests;

pub use dictionary::Dictionary;
pub use entry::{DictionaryEntry, PointRecord};
pub use error::{DictionaryError, DictionaryResult};
