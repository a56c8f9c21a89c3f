//! Dictionary records.

use std::collections::BTreeMap;

use mg_core::{AgentId, EntryId, FaceId, FaceLocation, Point3, PointId};

/// One location, expressed in one face.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DictionaryEntry {
    pub location: FaceLocation,
    /// The surface point shared with sibling entries.
    pub point: PointId,
}

/// State shared by all representations of one surface point.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointRecord {
    pub position: Point3,
    /// Visit time of each agent passing through (or planning to).
    pub visits: BTreeMap<AgentId, f64>,
    pub blocked: bool,
    /// Sibling entries, ascending by face.
    pub entries: Vec<(FaceId, EntryId)>,
}

impl PointRecord {
    pub fn new(position: Point3) -> Self {
        Self { position, ..Self::default() }
    }

    /// Earliest visit, ties broken by agent id.
    pub fn earliest_visit(&self) -> Option<(AgentId, f64)> {
        self.visits
            .iter()
            .map(|(&a, &t)| (a, t))
            .min_by(|x, y| x.1.total_cmp(&y.1).then(x.0.cmp(&y.0)))
    }

    pub fn entry_in(&self, face: FaceId) -> Option<EntryId> {
        self.entries.iter().find(|(f, _)| *f == face).map(|&(_, e)| e)
    }
}
