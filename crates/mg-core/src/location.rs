//! Locations on the face complex.
//!
//! A [`FaceLocation`] is a face plus barycentric weights `(b0, b1, b2)` with
//! respect to that face's three vertices, in the face's vertex order.  A zero
//! weight means the location lies on the opposite side of the triangle, two
//! zeros mean it is a vertex.
//!
//! Collision geometry works in the 2D chart `(b0, b1)` of a face; see
//! [`FaceLocation::point2`].

use crate::geometry::Point2;
use crate::ids::FaceId;
use crate::Point3;

/// Barycentric weights of a location within its face.
pub type Barycentric = [f64; 3];

/// A point of the surface expressed in one of its incident faces.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceLocation {
    pub face: FaceId,
    pub coords: Barycentric,
}

/// Bit-exact hash key of a [`FaceLocation`].  `-0.0` and `0.0` map to the same key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocationKey {
    face: FaceId,
    bits: [u64; 3],
}

#[inline]
fn canonical_bits(x: f64) -> u64 {
    if x == 0.0 { 0 } else { x.to_bits() }
}

impl FaceLocation {
    #[inline]
    pub const fn new(face: FaceId, coords: Barycentric) -> Self {
        Self { face, coords }
    }

    /// Location of the `i`-th vertex of `face`.
    pub fn vertex(face: FaceId, i: usize) -> Self {
        let mut coords = [0.0; 3];
        coords[i % 3] = 1.0;
        Self { face, coords }
    }

    /// 2D chart used by the collision predicates.
    #[inline]
    pub fn point2(&self) -> Point2 {
        Point2::new(self.coords[0], self.coords[1])
    }

    /// Inverse of [`point2`](Self::point2).
    #[inline]
    pub fn from_point2(face: FaceId, p: Point2) -> Self {
        Self { face, coords: [p.x, p.y, 1.0 - p.x - p.y] }
    }

    pub fn key(&self) -> LocationKey {
        LocationKey {
            face: self.face,
            bits: [
                canonical_bits(self.coords[0]),
                canonical_bits(self.coords[1]),
                canonical_bits(self.coords[2]),
            ],
        }
    }

    /// Snap weights within `tol` of 0 or 1 to exactly 0 or 1.
    ///
    /// Surviving weights are rescaled so the three still sum to one.  A
    /// location snapped onto a vertex has exactly one weight equal to 1.
    pub fn snapped_to_border(&self, tol: f64) -> Self {
        let mut c = self.coords;
        for w in c.iter_mut() {
            if w.abs() <= tol {
                *w = 0.0;
            } else if (1.0 - *w).abs() <= tol {
                *w = 1.0;
            }
        }

        if let Some(i) = c.iter().position(|&w| w == 1.0) {
            let mut v = [0.0; 3];
            v[i] = 1.0;
            return Self { face: self.face, coords: v };
        }

        let zeros = c.iter().filter(|&&w| w == 0.0).count();
        if zeros == 2 {
            // Only one weight left; it must be the vertex.
            for w in c.iter_mut() {
                *w = if *w == 0.0 { 0.0 } else { 1.0 };
            }
        } else if zeros == 1 {
            let sum: f64 = c.iter().sum();
            if sum > 0.0 && sum != 1.0 {
                for w in c.iter_mut() {
                    *w /= sum;
                }
            }
        }
        Self { face: self.face, coords: c }
    }

    /// Number of weights that are exactly zero.
    #[inline]
    pub fn zero_count(&self) -> usize {
        self.coords.iter().filter(|&&w| w == 0.0).count()
    }

    /// Index of the vertex this location sits on, if any.
    pub fn vertex_index(&self) -> Option<usize> {
        if self.zero_count() >= 2 {
            self.coords.iter().position(|&w| w != 0.0)
        } else {
            None
        }
    }

    /// `true` if the location lies on the boundary of its face.
    #[inline]
    pub fn is_on_face_border(&self) -> bool {
        self.zero_count() > 0
    }

    /// `true` if all weights are within `[-tol, 1 + tol]`.
    pub fn is_inside(&self, tol: f64) -> bool {
        self.coords.iter().all(|&w| w >= -tol && w <= 1.0 + tol)
    }

    /// Component-wise mean of two locations in the same face.
    pub fn midpoint(&self, other: &FaceLocation) -> FaceLocation {
        FaceLocation {
            face: self.face,
            coords: [
                0.5 * (self.coords[0] + other.coords[0]),
                0.5 * (self.coords[1] + other.coords[1]),
                0.5 * (self.coords[2] + other.coords[2]),
            ],
        }
    }
}

impl std::fmt::Display for FaceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}, {}, {}]",
            self.face, self.coords[0], self.coords[1], self.coords[2]
        )
    }
}

/// `true` if the three locations share a zero weight, i.e. they all lie on
/// the same side of their (common) face.
pub fn are_logically_collinear_on_border(
    a: &FaceLocation,
    b: &FaceLocation,
    c: &FaceLocation,
) -> bool {
    if a.face != b.face || a.face != c.face {
        return false;
    }
    (0..3).any(|i| a.coords[i] == 0.0 && b.coords[i] == 0.0 && c.coords[i] == 0.0)
}

/// Input form for agent sources and destinations.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointOrLocation {
    Point(Point3),
    Location(FaceLocation),
}

impl From<Point3> for PointOrLocation {
    fn from(p: Point3) -> Self {
        PointOrLocation::Point(p)
    }
}

impl From<FaceLocation> for PointOrLocation {
    fn from(l: FaceLocation) -> Self {
        PointOrLocation::Location(l)
    }
}
