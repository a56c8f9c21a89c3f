//! Fluent description of a motorcycle, before it is placed on the mesh.
//!
//! # Usage
//!
//! ```rust
//! use mg_agent::AgentSpec;
//! use mg_core::{Point3, Vector3};
//!
//! let spec = AgentSpec::from_point(Point3::new(0.1, 0.1, 0.0))
//!     .towards(Vector3::new(1.0, 0.0, 0.0))
//!     .with_speed(2.0)
//!     .starting_at(0.5);
//!
//! assert_eq!(spec.speed, 2.0);
//! assert!(spec.destination.is_none());
//! ```

use mg_core::{FaceLocation, Point3, PointOrLocation, Vector3};

/// Inputs of one motorcycle.
///
/// | Field           | Default                                       |
/// |-----------------|-----------------------------------------------|
/// | `destination`   | none: the tracer decides                      |
/// | `direction`     | none: `destination - source`                  |
/// | `speed`         | `1.0`                                         |
/// | `start_time`    | `0.0`                                         |
/// | `is_final`      | `true`; an explicit destination ends the run  |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSpec {
    pub source: PointOrLocation,
    pub destination: Option<PointOrLocation>,
    pub direction: Option<Vector3>,
    pub speed: f64,
    pub start_time: f64,
    /// Whether reaching an explicit destination ends the motorcycle's run.
    pub is_final: bool,
}

impl AgentSpec {
    fn new(source: PointOrLocation) -> Self {
        Self {
            source,
            destination: None,
            direction: None,
            speed: 1.0,
            start_time: 0.0,
            is_final: true,
        }
    }

    /// Start at a point of space; it is located on the mesh at initialization.
    pub fn from_point(p: Point3) -> Self {
        Self::new(PointOrLocation::Point(p))
    }

    pub fn from_location(loc: FaceLocation) -> Self {
        Self::new(PointOrLocation::Location(loc))
    }

    pub fn to_point(mut self, p: Point3) -> Self {
        self.destination = Some(PointOrLocation::Point(p));
        self
    }

    pub fn to_location(mut self, loc: FaceLocation) -> Self {
        self.destination = Some(PointOrLocation::Location(loc));
        self
    }

    /// Driving direction.  Without a destination the tracer follows it until
    /// the motorcycle leaves the mesh or crashes.
    pub fn towards(mut self, direction: Vector3) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn starting_at(mut self, time: f64) -> Self {
        self.start_time = time;
        self
    }

    /// Keep driving along the direction once the destination is reached.
    pub fn continue_past_destination(mut self) -> Self {
        self.is_final = false;
        self
    }
}
