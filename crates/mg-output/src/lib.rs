//! `mg-output` — debug dumps of a traced motorcycle graph.
//!
//! | Function / type                    | Files created                                              |
//! |------------------------------------|------------------------------------------------------------|
//! | [`write_dictionary_points`]        | one `x y z` line per dictionary point                      |
//! | [`write_sources_and_destinations`] | `motorcycles_sources.xyz`, `motorcycles_destinations.xyz`  |
//! | [`TrackCsvWriter`]                 | `tracks.csv`                                               |
//!
//! [`DumpObserver`] implements `mg_graph::GraphObserver` and writes all of
//! the above into one directory: the sources and destinations once the graph
//! is initialized, the tracks and the dictionary points at the end.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mg_output::{DumpObserver, TrackCsvWriter};
//!
//! let writer = TrackCsvWriter::new(Path::new("./dump")).unwrap();
//! let mut obs = DumpObserver::new(writer, Path::new("./dump"));
//! graph.trace(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("dump error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;
pub mod xyz;


pub use csv::TrackCsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::DumpObserver;
pub use row::TrackRow;
pub use writer::TrackWriter;
pub use xyz::{
    DESTINATIONS_FILE, DICTIONARY_FILE, SOURCES_FILE, write_dictionary_points,
    write_sources_and_destinations, write_xyz,
};
