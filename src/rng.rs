// src/rng.rs
//! Seeded random streams for demo data
//!
//! Every demo payload is drawn from its own stream, derived from a base seed
//! and a payload index, so the same `(seed, index)` always yields the same
//! payload regardless of generation order or thread count.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// splitmix64 finaliser, spreads consecutive indices across the seed space
fn mix(seed: u64, stream: u64) -> u64 {
    let mut z = seed.wrapping_add(stream.wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Factory for independent, reproducible streams
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Stream for one payload index
    pub fn stream(&self, index: u64) -> StdRng {
        StdRng::seed_from_u64(mix(self.base_seed, index))
    }
}
