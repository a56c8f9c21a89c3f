//! Confirmed track segments, indexed by face.
//!
//! A segment is appended when a motorcycle finishes a straight path, either
//! at its destination or where it crashed.  Segments are never modified or
//! removed; collision detection walks the segments of one face at a time.

use rustc_hash::FxHashMap;

use mg_core::{AgentId, EntryId, FaceId};
use mg_dictionary::Dictionary;

use crate::{SegmentError, SegmentResult};

/// A piece of confirmed track lying in a single face.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSegment {
    pub face: FaceId,
    pub agent: AgentId,
    pub source: EntryId,
    pub time_at_source: f64,
    pub destination: EntryId,
    pub time_at_destination: f64,
}

#[derive(Clone, Debug, Default)]
pub struct TrackSegmentStore {
    by_face: FxHashMap<FaceId, Vec<TrackSegment>>,
    len: usize,
}

impl TrackSegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment after checking it against `dict`.
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &mut self,
        face: FaceId,
        agent: AgentId,
        source: EntryId,
        time_at_source: f64,
        destination: EntryId,
        time_at_destination: f64,
        dict: &Dictionary,
    ) -> SegmentResult<()> {
        if time_at_source > time_at_destination {
            return Err(SegmentError::TimeReversed { agent, time_at_source, time_at_destination });
        }
        for entry in [source, destination] {
            if dict.face(entry) != face {
                return Err(SegmentError::EntryNotInFace { agent, entry, face });
            }
        }
        self.by_face.entry(face).or_default().push(TrackSegment {
            face,
            agent,
            source,
            time_at_source,
            destination,
            time_at_destination,
        });
        self.len += 1;
        Ok(())
    }

    /// Segments of `face` in insertion order; empty for a face without any.
    pub fn segments_in(&self, face: FaceId) -> &[TrackSegment] {
        self.by_face.get(&face).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Faces holding at least one segment, ascending.
    pub fn faces(&self) -> Vec<FaceId> {
        let mut faces: Vec<FaceId> = self.by_face.keys().copied().collect();
        faces.sort_unstable();
        faces
    }

    /// Every segment, face by face in ascending face order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackSegment> + '_ {
        self.faces().into_iter().flat_map(move |f| self.segments_in(f).iter())
    }
}
