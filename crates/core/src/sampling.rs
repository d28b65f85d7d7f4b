//! Bounded uniform sampling used by placement, jitter, and turbulence.
//!
//! The simulation holds exactly one generator for its lifetime instead of
//! constructing a fresh engine per draw. Entropy seeding is the default; the
//! seeded constructor exists so tests can replay a run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::core_types::Vec3;

/// Owned pseudo-random generator for all simulation draws.
#[derive(Debug)]
pub struct UniformSampler {
    rng: StdRng,
}

impl UniformSampler {
    /// Seed from system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        UniformSampler {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic seeding for reproducible tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        UniformSampler {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in `[min, max)`. A degenerate or inverted range returns
    /// `min` instead of panicking.
    #[inline]
    pub fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.random_range(min..max)
        } else {
            min
        }
    }

    /// Per-axis symmetric jitter, each component uniform in `[-mag, mag)`.
    pub fn jitter(&mut self, mag: f32) -> Vec3 {
        Vec3::new(
            self.uniform(-mag, mag),
            self.uniform(-mag, mag),
            self.uniform(-mag, mag),
        )
    }

    /// Random phase angle in `[0, 2*pi)`.
    #[inline]
    pub fn phase(&mut self) -> f32 {
        self.uniform(0.0, TAU)
    }
}
