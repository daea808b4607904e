//! Injectable randomness for the telemetry generator.
//!
//! The generator never touches a global RNG. Production code passes a
//! [`RandomSource`] wrapping any `rand` generator; tests can seed it or swap in
//! a [`PinnedSource`] that removes randomness entirely.

use crate::core::SensorField;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, StandardNormal};

/// Primitive draws the generator is built from.
pub trait NoiseSource {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Gaussian draw with the given mean and standard deviation.
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64;

    /// `count` distinct fields chosen uniformly at random.
    fn pick_fields(&mut self, count: usize) -> Vec<SensorField>;

    /// Bernoulli trial with success probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

/// [`NoiseSource`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSource<StdRng> {
    /// Reproducible source for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> NoiseSource for RandomSource<R> {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(normal) => normal.sample(&mut self.rng),
            // Only reachable with a non-finite std dev; fall back to a standard draw.
            Err(_) => mean + self.rng.sample::<f64, _>(StandardNormal),
        }
    }

    fn pick_fields(&mut self, count: usize) -> Vec<SensorField> {
        let count = count.min(SensorField::ALL.len());
        rand::seq::index::sample(&mut self.rng, SensorField::ALL.len(), count)
            .into_iter()
            .map(|i| SensorField::ALL[i])
            .collect()
    }
}

/// Deterministic [`NoiseSource`]: every Gaussian draw returns its mean and
/// every uniform draw returns the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedSource {
    unit: f64,
}

impl PinnedSource {
    /// Uniform draws sit just below 1, so no Bernoulli trial with `p < 1` succeeds.
    pub fn quiet() -> Self {
        Self { unit: 1.0 - f64::EPSILON }
    }

    /// Uniform draws return `unit`, clamped into `[0, 1)`.
    pub fn with_unit(unit: f64) -> Self {
        Self { unit: unit.clamp(0.0, 1.0 - f64::EPSILON) }
    }
}

impl Default for PinnedSource {
    fn default() -> Self {
        Self::quiet()
    }
}

impl NoiseSource for PinnedSource {
    fn unit(&mut self) -> f64 {
        self.unit
    }

    fn gaussian(&mut self, mean: f64, _std_dev: f64) -> f64 {
        mean
    }

    fn pick_fields(&mut self, count: usize) -> Vec<SensorField> {
        SensorField::ALL.into_iter().take(count).collect()
    }
}
