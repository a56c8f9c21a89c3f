//! The `TrackWriter` trait implemented by track dump backends.

use crate::{OutputResult, TrackRow};

/// Sink for confirmed tracks.
///
/// Errors are stored by [`DumpObserver`](crate::DumpObserver) and retrieved
/// with [`take_error`](crate::DumpObserver::take_error).
pub trait TrackWriter {
    /// Write a batch of track rows.
    fn write_tracks(&mut self, rows: &[TrackRow]) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
