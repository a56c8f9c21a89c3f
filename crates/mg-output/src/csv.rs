//! CSV track backend.
//!
//! Creates `tracks.csv` in the configured output directory.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TrackWriter;
use crate::{OutputResult, TrackRow};

pub const TRACKS_FILE: &str = "tracks.csv";

pub const TRACK_HEADER: [&str; 10] =
    ["agent_id", "step", "face", "b0", "b1", "b2", "x", "y", "z", "time"];

/// Writes confirmed tracks to `tracks.csv`, one row per track point.
pub struct TrackCsvWriter {
    tracks:   Writer<File>,
    rows:     usize,
    finished: bool,
}

impl TrackCsvWriter {
    /// Open (or create) `tracks.csv` in `dir` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut tracks = Writer::from_path(dir.join(TRACKS_FILE))?;
        tracks.write_record(TRACK_HEADER)?;
        Ok(Self { tracks, rows: 0, finished: false })
    }

    /// Rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }
}

impl TrackWriter for TrackCsvWriter {
    fn write_tracks(&mut self, rows: &[TrackRow]) -> OutputResult<()> {
        for row in rows {
            self.tracks.write_record(&[
                row.agent_id.to_string(),
                row.step.to_string(),
                row.face.to_string(),
                row.coords[0].to_string(),
                row.coords[1].to_string(),
                row.coords[2].to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.z.to_string(),
                row.time.to_string(),
            ])?;
        }
        self.rows += rows.len();
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.tracks.flush()?;
        Ok(())
    }
}
