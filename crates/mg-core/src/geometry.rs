//! Geometry primitives used by the tracer.
//!
//! Collision tests run in the barycentric coordinate system of a single face:
//! a location `(b0, b1, b2)` is mapped to the 2D point `(b0, b1)` and the
//! usual planar predicates apply.  Times and distances are measured on the
//! embedded surface with [`Point3`].
//!
//! Predicates are evaluated in plain `f64`.  The collinearity test carries a
//! small relative tolerance; the ordering test compares coordinates directly
//! and is therefore exact for the inputs it is given.

use std::ops::{Add, Mul, Neg, Sub};

/// Relative tolerance for [`collinear`], scaled by the lengths involved.
const COLLINEAR_EPS: f64 = 1e-12;

// ── 2D ────────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Vector2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn squared_length(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// z-component of the 3D cross product.
    #[inline]
    pub fn cross(self, other: Vector2) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Sub for Point2 {
    type Output = Vector2;
    #[inline]
    fn sub(self, rhs: Point2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector2> for Point2 {
    type Output = Point2;
    #[inline]
    fn add(self, rhs: Vector2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;
    #[inline]
    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

/// A directed 2D segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment2 {
    pub source: Point2,
    pub target: Point2,
}

impl Segment2 {
    #[inline]
    pub const fn new(source: Point2, target: Point2) -> Self {
        Self { source, target }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.source == self.target
    }

    #[inline]
    pub fn vector(&self) -> Vector2 {
        self.target - self.source
    }
}

/// Result of comparing the directions of two vectors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Angle {
    Acute,
    Right,
    Obtuse,
}

/// Dot product of two 2D vectors.
#[inline]
pub fn scalar_product(u: Vector2, v: Vector2) -> f64 {
    u.x * v.x + u.y * v.y
}

#[inline]
pub fn squared_distance(p: Point2, q: Point2) -> f64 {
    (q - p).squared_length()
}

/// Angle between `q - p` and `s - r`.
pub fn angle(p: Point2, q: Point2, r: Point2, s: Point2) -> Angle {
    let sp = scalar_product(q - p, s - r);
    if sp > 0.0 {
        Angle::Acute
    } else if sp < 0.0 {
        Angle::Obtuse
    } else {
        Angle::Right
    }
}

/// Signed area test of `(p, q, r)`.
#[inline]
fn orientation(p: Point2, q: Point2, r: Point2) -> f64 {
    (q - p).cross(r - p)
}

/// `true` if `p`, `q` and `r` lie on a common line.
pub fn collinear(p: Point2, q: Point2, r: Point2) -> bool {
    let u = q - p;
    let v = r - p;
    let scale = (u.squared_length() * v.squared_length()).sqrt();
    u.cross(v).abs() <= COLLINEAR_EPS * scale
}

/// `true` if `q` lies strictly between `p` and `r`, assuming the three points
/// are collinear.  Equal points are never strictly ordered.
pub fn collinear_strictly_ordered(p: Point2, q: Point2, r: Point2) -> bool {
    if p.x < r.x {
        p.x < q.x && q.x < r.x
    } else if r.x < p.x {
        r.x < q.x && q.x < p.x
    } else if p.y < r.y {
        p.y < q.y && q.y < r.y
    } else if r.y < p.y {
        r.y < q.y && q.y < p.y
    } else {
        false
    }
}

/// `true` if `q` lies on the closed segment `[p, r]`, assuming collinearity.
fn collinear_between(p: Point2, q: Point2, r: Point2) -> bool {
    q == p || q == r || collinear_strictly_ordered(p, q, r)
}

/// Closed segment intersection test.
pub fn segments_intersect(a: &Segment2, b: &Segment2) -> bool {
    if a.is_degenerate() && b.is_degenerate() {
        return a.source == b.source;
    }
    if a.is_degenerate() {
        return collinear(b.source, b.target, a.source)
            && collinear_between(b.source, a.source, b.target);
    }
    if b.is_degenerate() {
        return collinear(a.source, a.target, b.source)
            && collinear_between(a.source, b.source, a.target);
    }

    let o1 = orientation(a.source, a.target, b.source);
    let o2 = orientation(a.source, a.target, b.target);
    let o3 = orientation(b.source, b.target, a.source);
    let o4 = orientation(b.source, b.target, a.target);

    if collinear(a.source, a.target, b.source) && collinear(a.source, a.target, b.target) {
        return collinear_between(a.source, b.source, a.target)
            || collinear_between(a.source, b.target, a.target)
            || collinear_between(b.source, a.source, b.target);
    }

    let straddles = |x: f64, y: f64| (x <= 0.0 && y >= 0.0) || (x >= 0.0 && y <= 0.0);
    straddles(o1, o2) && straddles(o3, o4)
}

/// Intersection point of two non-parallel segments known to intersect.
///
/// The line parameters are clamped to `[0, 1]` on both segments so the
/// returned point never leaves either segment, whatever the rounding.
pub fn intersection_point(a: &Segment2, b: &Segment2) -> Option<Point2> {
    let d1 = a.vector();
    let d2 = b.vector();
    let denom = d1.cross(d2);
    if denom == 0.0 {
        return None;
    }
    let w = b.source - a.source;
    let s = (w.cross(d2) / denom).clamp(0.0, 1.0);
    let t = (w.cross(d1) / denom).clamp(0.0, 1.0);

    let on_a = a.source + d1 * s;
    let on_b = b.source + d2 * t;
    Some(Point2::new(0.5 * (on_a.x + on_b.x), 0.5 * (on_a.y + on_b.y)))
}

// ── 3D ────────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn squared_distance(self, other: Point3) -> f64 {
        (other - self).squared_length()
    }

    #[inline]
    pub fn distance(self, other: Point3) -> f64 {
        self.squared_distance(other).sqrt()
    }

    /// Barycentric combination of three points.
    #[inline]
    pub fn weighted(points: [Point3; 3], w: [f64; 3]) -> Point3 {
        Point3::new(
            w[0] * points[0].x + w[1] * points[1].x + w[2] * points[2].x,
            w[0] * points[0].y + w[1] * points[1].y + w[2] * points[2].y,
            w[0] * points[0].z + w[1] * points[1].z + w[2] * points[2].z,
        )
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(a: [f64; 3]) -> Self {
        Point3::new(a[0], a[1], a[2])
    }
}

impl std::fmt::Display for Point3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl Vector3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn squared_length(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.squared_length().sqrt()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl Sub for Point3 {
    type Output = Vector3;
    #[inline]
    fn sub(self, rhs: Point3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add<Vector3> for Point3 {
    type Output = Point3;
    #[inline]
    fn add(self, rhs: Vector3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    #[inline]
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    #[inline]
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;
    #[inline]
    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    #[inline]
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for Vector3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
