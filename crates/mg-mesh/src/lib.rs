//! `mg-mesh` — the surface the motorcycles drive on.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`complex`] | `FaceComplex` trait, `Descriptor`                            |
//! | [`mesh`]    | `TriangleMesh` (half-edges + R-tree), `TriangleMeshBuilder`  |
//! | [`shapes`]  | Small ready-made meshes (square, strip, grid)                |
//! | [`random`]  | `RandomPointsInMesh` (area-weighted uniform sampling)        |
//! | [`error`]   | `MeshError`, `MeshResult<T>`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod complex;
pub mod error;
pub mod mesh;
pub mod random;
pub mod shapes;

#[cfg(test)]
mod tests;

pub use complex::{Descriptor, FaceComplex};
pub use error::{MeshError, MeshResult};
pub use mesh::{TriangleMesh, TriangleMeshBuilder};
pub use random::RandomPointsInMesh;
