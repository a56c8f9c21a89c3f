//! `.xyz` point clouds: one `x y z` line per point.
//!
//! Coordinates are written with the shortest representation that reads back
//! to the same `f64`.

use std::path::Path;

use csv::WriterBuilder;

use mg_agent::Tracer;
use mg_core::Point3;
use mg_dictionary::Dictionary;
use mg_graph::MotorcycleGraph;
use mg_mesh::FaceComplex;

use crate::OutputResult;

pub const DICTIONARY_FILE: &str = "dictionary_points.xyz";
pub const SOURCES_FILE: &str = "motorcycles_sources.xyz";
pub const DESTINATIONS_FILE: &str = "motorcycles_destinations.xyz";

/// Write `points` to `path`.  Returns the number of lines written.
pub fn write_xyz<I>(path: &Path, points: I) -> OutputResult<usize>
where
    I: IntoIterator<Item = Point3>,
{
    let mut w = WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .from_path(path)?;
    let mut n = 0;
    for p in points {
        w.write_record(&[p.x.to_string(), p.y.to_string(), p.z.to_string()])?;
        n += 1;
    }
    w.flush()?;
    Ok(n)
}

/// Every distinct surface point of the dictionary, once per point (not per
/// face representation).
pub fn write_dictionary_points(dict: &Dictionary, path: &Path) -> OutputResult<usize> {
    write_xyz(path, dict.points().map(|(_, record)| record.position))
}

/// Initial source and current destination of every motorcycle, written to
/// [`SOURCES_FILE`] and [`DESTINATIONS_FILE`] in `dir`.
pub fn write_sources_and_destinations<M: FaceComplex, T: Tracer>(
    graph: &MotorcycleGraph<M, T>,
    dir: &Path,
) -> OutputResult<()> {
    let dict = graph.dictionary();
    let sources = graph.motorcycles().iter().map(|mc| {
        let first = mc.track().first().map_or(mc.source(), |&(e, _)| e);
        dict.position(first)
    });
    write_xyz(&dir.join(SOURCES_FILE), sources)?;

    let destinations = graph
        .motorcycles()
        .iter()
        .map(|mc| dict.position(mc.destination()));
    write_xyz(&dir.join(DESTINATIONS_FILE), destinations)?;
    Ok(())
}
