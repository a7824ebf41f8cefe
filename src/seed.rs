// Seeded randomness for producers.
// A `Seed` owns the full generator state, so threading it through
// `Producer::sample` is pure: the same seed always yields the same
// value and the same successor seed.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    rng: ChaCha8Rng,
}

impl Seed {
    pub fn new(seed: u64) -> Seed {
        Seed {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Seed {
        Seed {
            rng: ChaCha8Rng::from_seed(bytes),
        }
    }

    /// Derive an independent seed, advancing this one.
    ///
    /// Use this to hand each thread its own seed when sampling
    /// concurrently.
    pub fn split(&mut self) -> Seed {
        let mut bytes = [0u8; 32];
        self.rng.fill_bytes(&mut bytes);
        Seed::from_bytes(bytes)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    pub fn int_in_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }

    pub fn float_in_range(&mut self, min: f64, max: f64) -> f64 {
        self.rng.gen_range(min..=max)
    }

    pub fn char_in_range(&mut self, min: char, max: char) -> char {
        self.rng.gen_range(min..=max)
    }

    /// Uniform over all Unicode scalar values.
    pub fn any_char(&mut self) -> char {
        self.rng.gen()
    }
}
