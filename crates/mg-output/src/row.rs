//! Plain data rows written by the track writers.

use mg_agent::Motorcycle;
use mg_dictionary::Dictionary;

/// One point of a confirmed track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackRow {
    pub agent_id: u32,
    /// Index of the point within the track of `agent_id`.
    pub step:     u32,
    pub face:     u32,
    pub coords:   [f64; 3],
    pub x:        f64,
    pub y:        f64,
    pub z:        f64,
    pub time:     f64,
}

impl TrackRow {
    /// Rows of the confirmed track of `mc`, in driving order.
    pub fn of_track(mc: &Motorcycle, dict: &Dictionary) -> Vec<TrackRow> {
        mc.track()
            .iter()
            .enumerate()
            .map(|(step, &(entry, time))| {
                let loc = dict.location(entry);
                let p = dict.position(entry);
                TrackRow {
                    agent_id: mc.id().0,
                    step:     step as u32,
                    face:     loc.face.0,
                    coords:   loc.coords,
                    x:        p.x,
                    y:        p.y,
                    z:        p.z,
                    time,
                }
            })
            .collect()
    }
}
