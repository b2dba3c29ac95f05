//! RNG module - deterministic tile kind sampling
//!
//! A simple LCG drives all randomness so a board is fully reproducible
//! from a u32 seed. The sampler draws kinds uniformly from the configured
//! alphabet, or per the configured spawn weights.

use crate::types::{BoardConfig, TileKind};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Current internal state (usable as a continuation seed)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Draws tile kinds from the configured alphabet, uniformly or per the
/// configured weighting, via a cumulative weight table.
#[derive(Debug, Clone)]
pub struct KindSampler {
    rng: SimpleRng,
    /// cumulative[i] = sum of weights for kinds 0..=i
    cumulative: Vec<u32>,
    total: u32,
}

impl KindSampler {
    /// Build a sampler from a validated configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration carries a mismatched or all-zero weight
    /// table; `BoardConfig::validate` rejects those up front.
    pub fn new(config: &BoardConfig) -> Self {
        let weights: Vec<u32> = match &config.weights {
            Some(weights) => {
                assert_eq!(weights.len(), config.kinds as usize);
                weights.clone()
            }
            None => vec![1; config.kinds as usize],
        };

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0u32;
        for w in weights {
            total += w;
            cumulative.push(total);
        }
        assert!(total > 0, "spawn weights sum to zero");

        Self {
            rng: SimpleRng::new(config.seed),
            cumulative,
            total,
        }
    }

    /// Draw the next tile kind
    pub fn draw(&mut self) -> TileKind {
        let r = self.rng.next_range(self.total);
        // First cumulative bucket strictly above r owns the draw
        let idx = self
            .cumulative
            .iter()
            .position(|&c| r < c)
            .unwrap_or(self.cumulative.len() - 1);
        TileKind(idx as u8)
    }

    /// Number of kinds in the alphabet
    pub fn alphabet_len(&self) -> usize {
        self.cumulative.len()
    }
}
