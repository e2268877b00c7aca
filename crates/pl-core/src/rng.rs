//! Deterministic simulation-level RNG.
//!
//! The solver and the runtime are fully deterministic; randomness only enters
//! through scenario generation (initial positions, task placement).  Every
//! generator is a `SmallRng` seeded from the run's master seed, so the same
//! seed always reproduces the same scenario.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Point;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation-level RNG for scenario generation.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent child generator, e.g. one for planes and one
    /// for tasks, so adding tasks does not move the planes.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// A point uniformly distributed in the `width × height` rectangle
    /// anchored at the origin.
    pub fn point_in(&mut self, width: f64, height: f64) -> Point {
        Point::new(self.0.gen_range(0.0..width), self.0.gen_range(0.0..height))
    }
}
