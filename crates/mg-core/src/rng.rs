//! Deterministic RNG wrapper for scenario generation.
//!
//! A run is reproduced by its seed alone.  Independent streams (one for
//! sources, one for directions, ...) are derived as
//!
//!   seed = global_seed XOR (stream * MIXING_CONSTANT)
//!
//! so that adding a stream never perturbs the others.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct TraceRng(SmallRng);

impl TraceRng {
    pub fn new(seed: u64) -> Self {
        TraceRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed an independent stream from the run's global seed.
    pub fn for_stream(global_seed: u64, stream: u64) -> Self {
        let seed = global_seed ^ stream.wrapping_mul(MIXING_CONSTANT);
        TraceRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child RNG; `offset` distinguishes siblings.
    pub fn child(&mut self, offset: u64) -> TraceRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        TraceRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
