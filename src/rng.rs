//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct wraps the `rand` crate's `StdRng` and exposes
//! the handful of draws the search needs: inclusive integer ranges, Bernoulli
//! trials, distinct samples and index picks.
//!
//! ## Example
//!
//! ```rust
//! use tradega::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let gene = rng.uniform_inclusive(2, 16);
//! assert!((2..=16).contains(&gene));
//!
//! let hours = rng.sample_distinct(&[3u8, 4, 5, 6], 2);
//! assert_eq!(hours.len(), 2);
//! assert_ne!(hours[0], hours[1]);
//! ```

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

/// A wrapper around the `rand` crate's `StdRng` with the draws used by the
/// population generator, the genetic operators and breeding.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks. Note that a seed only
    /// fixes the engine's own draws; trainer results still vary between runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a uniform integer in `[low, high]`.
    pub fn uniform_inclusive(&mut self, low: i64, high: i64) -> i64 {
        self.rng.gen_range(low..=high)
    }

    /// Returns `true` with the given probability.
    ///
    /// Probabilities outside `[0, 1]` are clamped.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Picks a uniform index in `0..len`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Picks two distinct uniform indices in `0..len`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is smaller than two.
    pub fn pick_two_distinct(&mut self, len: usize) -> (usize, usize) {
        let picked = index::sample(&mut self.rng, len, 2);
        (picked.index(0), picked.index(1))
    }

    /// Samples `amount` distinct elements of `pool` without replacement.
    ///
    /// `amount` is clamped to the pool size.
    pub fn sample_distinct<T: Copy>(&mut self, pool: &[T], amount: usize) -> Vec<T> {
        let amount = amount.min(pool.len());
        index::sample(&mut self.rng, pool.len(), amount)
            .into_iter()
            .map(|i| pool[i])
            .collect()
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
