//! Seeded randomness.
//!
//! All stochastic behavior in the engine draws from a [`SimRng`]. Sub-streams
//! for parallel work are derived from `(seed, label, index)` so that results do
//! not depend on scheduling order.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use uuid::Uuid;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Deterministic generator wrapping ChaCha8
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Independent stream for one unit of work (e.g. one profile in one step)
    pub fn derive(seed: u64, label: &str, index: u64) -> Self {
        let mut h = FNV_OFFSET;
        for &b in label.as_bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(FNV_PRIME);
        }
        Self::seeded(mix64(seed ^ mix64(h ^ index)))
    }

    /// Gaussian draw; a non-positive or non-finite std collapses to the mean
    pub fn normal(&mut self, mean: f64, std: f64) -> f64 {
        if std.is_nan() || std <= 0.0 || std.is_infinite() {
            return mean;
        }
        match Normal::new(mean, std) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => mean,
        }
    }

    /// Uniform draw in [0, 1)
    pub fn uniform(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Random (version 4 layout) uuid drawn from this stream
    pub fn next_uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.inner.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// splitmix64 finalizer
pub fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}
