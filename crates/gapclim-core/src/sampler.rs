//! Standard-normal variate sources for the stochastic weather generator.
//!
//! The weather generator never owns a random number generator. Callers pass a
//! [`StandardNormalSource`] per simulation replicate, which keeps draw order
//! (and therefore the simulated weather) reproducible for a seeded source.

use crate::errors::{GapClimError, GapClimResult};
use rand::Rng;
use rand_distr::StandardNormal;

/// A supply of independent standard-normal variates.
pub trait StandardNormalSource {
    fn next_standard_normal(&mut self) -> f64;

    /// Draw two variates, first then second.
    fn next_pair(&mut self) -> [f64; 2] {
        let first = self.next_standard_normal();
        let second = self.next_standard_normal();
        [first, second]
    }
}

impl<S: StandardNormalSource + ?Sized> StandardNormalSource for &mut S {
    fn next_standard_normal(&mut self) -> f64 {
        (**self).next_standard_normal()
    }
}

/// Standard normals drawn from any [`rand::Rng`].
///
/// # Example
/// ```
/// use gapclim_core::sampler::{RngNormalSource, StandardNormalSource};
/// use rand::SeedableRng;
///
/// let mut a = RngNormalSource::new(rand::rngs::StdRng::seed_from_u64(1));
/// let mut b = RngNormalSource::new(rand::rngs::StdRng::seed_from_u64(1));
/// assert_eq!(a.next_pair(), b.next_pair());
/// ```
#[derive(Debug, Clone)]
pub struct RngNormalSource<R> {
    rng: R,
}

impl<R: Rng> RngNormalSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> StandardNormalSource for RngNormalSource<R> {
    fn next_standard_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

/// Replays a fixed sequence of draws, cycling once exhausted.
///
/// Used to reproduce a recorded run or to force specific weather in tests.
#[derive(Debug, Clone)]
pub struct ReplayNormalSource {
    draws: Vec<f64>,
    position: usize,
}

impl ReplayNormalSource {
    pub fn new(draws: Vec<f64>) -> GapClimResult<Self> {
        if draws.is_empty() {
            return Err(GapClimError::Error(
                "A replayed normal source needs at least one draw".to_string(),
            ));
        }
        Ok(Self { draws, position: 0 })
    }

    /// A source that always returns `value`; `0.0` reproduces the climate normals.
    pub fn constant(value: f64) -> Self {
        Self {
            draws: vec![value],
            position: 0,
        }
    }

    /// Number of draws served so far.
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl StandardNormalSource for ReplayNormalSource {
    fn next_standard_normal(&mut self) -> f64 {
        let value = self.draws[self.position % self.draws.len()];
        self.position += 1;
        value
    }
}
