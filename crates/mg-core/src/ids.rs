//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements.  Agents, mesh elements and dictionary records all live
//! in arenas (`Vec`s), so every ID is an index; prefer `.index()` over `.0`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a motorcycle in the graph's agent arena.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a triangular face of the face complex.
    pub struct FaceId(u32);
}

typed_id! {
    /// Index of a mesh vertex.
    pub struct VertexId(u32);
}

typed_id! {
    /// Index of a halfedge.  Face `f` owns halfedges `3f`, `3f + 1`, `3f + 2`.
    pub struct HalfedgeId(u32);
}

typed_id! {
    /// Index of a dictionary entry (one location in one face).
    pub struct EntryId(u32);
}

typed_id! {
    /// Index of a shared dictionary point (all sibling entries of a location).
    pub struct PointId(u32);
}
