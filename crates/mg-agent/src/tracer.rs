//! The `Tracer` trait: where a motorcycle goes once it reaches a destination.
//!
//! A tracer turns the current position of a motorcycle into the next
//! straight path, expressed in a single face: a source entry (the current
//! point, possibly in another incident face) and a destination entry on the
//! border of that face.

use tracing::trace;

use mg_core::{Barycentric, EntryId, FaceId, FaceLocation, Point3, Vector3};
use mg_dictionary::Dictionary;
use mg_mesh::FaceComplex;

use crate::{AgentResult, Motorcycle};

/// Relative threshold under which a barycentric displacement counts as zero.
const DIRECTION_EPS: f64 = 1e-12;

/// The next straight path of a motorcycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NextPath {
    /// The current point, expressed in the face the path runs through.
    pub source: EntryId,
    pub destination: EntryId,
    pub time_at_destination: f64,
    /// Crash on arrival instead of asking for another path.
    pub is_final: bool,
}

/// Pluggable path strategy.
///
/// `None` means there is nowhere to go; the motorcycle crashes where it is.
///
/// # Example
///
/// ```rust,ignore
/// struct Nowhere;
///
/// impl Tracer for Nowhere {
///     fn next_path<M: FaceComplex>(&self, _: &Motorcycle, _: &mut Dictionary, _: &M)
///         -> AgentResult<Option<NextPath>>
///     {
///         Ok(None)
///     }
/// }
/// ```
pub trait Tracer {
    fn next_path<M: FaceComplex>(
        &self,
        mc: &Motorcycle,
        dict: &mut Dictionary,
        mesh: &M,
    ) -> AgentResult<Option<NextPath>>;
}

// ── StopAtDestination ─────────────────────────────────────────────────────────

/// A [`Tracer`] that never continues: motorcycles crash at their first
/// destination.
#[derive(Copy, Clone, Debug, Default)]
pub struct StopAtDestination;

impl Tracer for StopAtDestination {
    fn next_path<M: FaceComplex>(
        &self,
        _mc: &Motorcycle,
        _dict: &mut Dictionary,
        _mesh: &M,
    ) -> AgentResult<Option<NextPath>> {
        Ok(None)
    }
}

// ── StraightTracer ────────────────────────────────────────────────────────────

/// Follow the motorcycle's direction across faces.
///
/// From the current point, the path runs through the incident face the
/// direction (projected onto that face's plane) enters, up to where the ray
/// leaves the face.  When the ray leaves the mesh there, the destination is
/// final.
#[derive(Copy, Clone, Debug, Default)]
pub struct StraightTracer;

impl Tracer for StraightTracer {
    fn next_path<M: FaceComplex>(
        &self,
        mc: &Motorcycle,
        dict: &mut Dictionary,
        mesh: &M,
    ) -> AgentResult<Option<NextPath>> {
        let Some(direction) = mc.direction() else {
            return Ok(None);
        };
        let here = mc.current_position();
        let location = dict.location(here);
        let position = dict.position(here);

        let Some((start, exit)) = exit_of_entered_face(mesh, &location, position, direction)
        else {
            trace!(agent = %mc.id(), "direction leaves the mesh");
            return Ok(None);
        };

        let (source, _) = dict.insert(&start, mesh);
        let (destination, _) = dict.insert(&exit, mesh);
        if source == destination {
            return Ok(None);
        }

        let exit_position = dict.position(destination);
        let time_at_destination = mc.current_time() + position.distance(exit_position) / mc.speed();
        let is_final = exit_of_entered_face(mesh, &dict.location(destination), exit_position, direction)
            .is_none();

        Ok(Some(NextPath { source, destination, time_at_destination, is_final }))
    }
}

/// Barycentric displacement of `direction` projected onto `face`.
fn barycentric_direction<M: FaceComplex>(
    mesh: &M,
    face: FaceId,
    origin: Point3,
    direction: Vector3,
) -> Barycentric {
    let a = mesh.locate_in_face(face, origin).coords;
    let b = mesh.locate_in_face(face, origin + direction).coords;
    [b[0] - a[0], b[1] - a[1], b[2] - a[2]]
}

/// Where the ray from `location` along `direction` leaves the face it enters.
///
/// Returns the starting location expressed in that face, and the exit
/// location.  Faces are tried with the location's own face first, then by
/// ascending id.
pub fn exit_of_entered_face<M: FaceComplex>(
    mesh: &M,
    location: &FaceLocation,
    position: Point3,
    direction: Vector3,
) -> Option<(FaceLocation, FaceLocation)> {
    let mut faces = mesh.incident_faces(location);
    if let Some(i) = faces.iter().position(|&f| f == location.face) {
        faces.remove(i);
        faces.insert(0, location.face);
    }

    faces.into_iter().find_map(|face| {
        let start = mesh.sibling_location(location, face)?;
        let n = mesh.face_normal(face);
        let planar = direction - n * direction.dot(n);
        if planar.length() <= DIRECTION_EPS * direction.length() {
            return None;
        }
        let delta = barycentric_direction(mesh, face, position, direction);
        let exit = exit_along(&start, delta)?;
        Some((start, exit))
    })
}

/// Exit point of `start + s * delta` (s > 0) from its face, if the ray enters
/// the face at all.
fn exit_along(start: &FaceLocation, delta: Barycentric) -> Option<FaceLocation> {
    let scale = delta.iter().fold(0.0_f64, |m, d| m.max(d.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let eps = DIRECTION_EPS * scale;
    let c = start.coords;

    // A zero weight that would turn negative means the ray points outside.
    if (0..3).any(|i| c[i] == 0.0 && delta[i] < -eps) {
        return None;
    }

    let mut limit: Option<(usize, f64)> = None;
    for i in 0..3 {
        if delta[i] < -eps {
            let s = -c[i] / delta[i];
            if limit.is_none_or(|(_, best)| s < best) {
                limit = Some((i, s));
            }
        }
    }
    let (k, s) = limit?;
    if s * scale <= DIRECTION_EPS {
        return None;
    }

    let mut coords = [c[0] + s * delta[0], c[1] + s * delta[1], c[2] + s * delta[2]];
    coords[k] = 0.0;
    for w in coords.iter_mut() {
        if *w < 0.0 {
            *w = 0.0;
        }
    }
    let sum: f64 = coords.iter().sum();
    if sum <= 0.0 {
        return None;
    }
    for w in coords.iter_mut() {
        *w /= sum;
    }
    Some(FaceLocation::new(start.face, coords))
}
