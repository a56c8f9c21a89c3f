//! Area-weighted uniform sampling of points on a mesh.

use mg_core::{FaceId, FaceLocation, Point3, TraceRng};

use crate::FaceComplex;

/// Draws locations uniformly with respect to surface area.
pub struct RandomPointsInMesh {
    /// Running sum of face areas, indexed by `FaceId`.
    cumulative: Vec<f64>,
}

impl RandomPointsInMesh {
    pub fn new<M: FaceComplex>(mesh: &M) -> Self {
        let mut total = 0.0;
        let cumulative = (0..mesh.face_count())
            .map(|f| {
                total += mesh.face_area(FaceId(f as u32));
                total
            })
            .collect();
        Self { cumulative }
    }

    pub fn total_area(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Draw one location.  Returns `None` for a mesh without area.
    pub fn sample(&self, rng: &mut TraceRng) -> Option<FaceLocation> {
        let total = self.total_area();
        if total <= 0.0 {
            return None;
        }
        let x = rng.gen_range(0.0..total);
        let f = self.cumulative.partition_point(|&c| c <= x).min(self.cumulative.len() - 1);

        let mut r1: f64 = rng.gen_range(0.0..1.0);
        let mut r2: f64 = rng.gen_range(0.0..1.0);
        if r1 + r2 > 1.0 {
            r1 = 1.0 - r1;
            r2 = 1.0 - r2;
        }
        Some(FaceLocation::new(FaceId(f as u32), [1.0 - r1 - r2, r1, r2]))
    }

    pub fn sample_point<M: FaceComplex>(&self, mesh: &M, rng: &mut TraceRng) -> Option<Point3> {
        self.sample(rng).map(|loc| mesh.location_to_point(&loc))
    }
}
