//! Seeded random source shared by setup and the engine.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Distribution};

use crate::error::ConfigurationError;

/// Seeded pseudo-random generator.
///
/// Created once per run from the configured seed and handed down by
/// `&mut` to agent initialization, network generation and cross-linking.
/// Two sources built from the same seed yield identical draw sequences.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    rng: SmallRng,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in [0, 1).
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Bernoulli trial: true with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// Draw from a pre-built beta distribution.
    pub fn beta(&mut self, dist: &OpinionShape) -> f64 {
        dist.beta.sample(&mut self.rng)
    }

    /// Uniformly chosen element, or `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

/// Validated Beta(alpha, beta) opinion distribution.
#[derive(Debug, Clone)]
pub struct OpinionShape {
    beta: Beta<f64>,
}

impl OpinionShape {
    pub fn new(alpha: f64, beta: f64) -> Result<Self, ConfigurationError> {
        let invalid = ConfigurationError::InvalidOpinionShape { alpha, beta };
        if !(alpha.is_finite() && beta.is_finite() && alpha > 0.0 && beta > 0.0) {
            return Err(invalid);
        }
        let dist = Beta::new(alpha, beta).map_err(|_| invalid)?;
        Ok(Self { beta: dist })
    }
}
