//! `DumpObserver<W>` — bridges `GraphObserver` to the dump writers.

use std::path::{Path, PathBuf};

use tracing::debug;

use mg_agent::Tracer;
use mg_graph::{GraphObserver, MotorcycleGraph};
use mg_mesh::FaceComplex;

use crate::writer::TrackWriter;
use crate::{OutputError, OutputResult, TrackRow, xyz};

/// A [`GraphObserver`] dumping a run into one directory.
///
/// Sources and destinations are written once the graph is initialized; the
/// confirmed tracks (through `W`) and the dictionary points once the trace
/// is finished.
///
/// Errors are stored internally because `GraphObserver` methods have no
/// return value.  After `graph.trace()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct DumpObserver<W: TrackWriter> {
    writer:     W,
    dir:        PathBuf,
    last_error: Option<OutputError>,
}

impl<W: TrackWriter> DumpObserver<W> {
    pub fn new(writer: W, dir: &Path) -> Self {
        Self { writer, dir: dir.to_path_buf(), last_error: None }
    }

    /// Take the stored write error (if any) after `graph.trace()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TrackWriter> GraphObserver for DumpObserver<W> {
    fn on_initialized<M: FaceComplex, T: Tracer>(&mut self, graph: &MotorcycleGraph<M, T>) {
        let result = xyz::write_sources_and_destinations(graph, &self.dir);
        self.store_err(result);
    }

    fn on_finished<M: FaceComplex, T: Tracer>(&mut self, graph: &MotorcycleGraph<M, T>) {
        let dict = graph.dictionary();
        let rows: Vec<TrackRow> = graph
            .motorcycles()
            .iter()
            .flat_map(|mc| TrackRow::of_track(mc, dict))
            .collect();
        let result = self.writer.write_tracks(&rows).and_then(|()| self.writer.finish());
        self.store_err(result);

        let result = xyz::write_dictionary_points(dict, &self.dir.join(xyz::DICTIONARY_FILE));
        if let Ok(points) = &result {
            debug!(dir = %self.dir.display(), rows = rows.len(), points, "dump written");
        }
        self.store_err(result.map(|_| ()));
    }
}
