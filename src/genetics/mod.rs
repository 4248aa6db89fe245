//! Genetic material of a snake and the behaviour parameters derived from it.
//!
//! - **Genome**: fixed-length vector of floats in [0, 1]
//! - **Color**: inherited body color
//! - **Crossover**: midpoint recombination, per-gene mutation, color blending

pub mod color;
pub mod crossover;

pub use color::Color;
pub use crossover::{inherit_color, recombine};

use crate::config::GeneScaling;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Vision range used when the genome is too short to carry gene 0
pub const DEFAULT_VISION: u32 = 3;
/// Low energy threshold used when gene 1 is missing
pub const DEFAULT_LOW_THRESHOLD: f32 = 50.0;
/// High energy threshold used when gene 2 is missing
pub const DEFAULT_HIGH_THRESHOLD: f32 = 150.0;

/// Gene vector. Only the first three genes drive behaviour; the rest are
/// carried along and inherited.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<f32>,
}

impl Genome {
    /// Wrap an explicit gene vector, clamping values into [0, 1]
    pub fn new(genes: Vec<f32>) -> Self {
        Self {
            genes: genes.into_iter().map(|g| g.clamp(0.0, 1.0)).collect(),
        }
    }

    /// Uniformly random genome of the given length
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self {
            genes: (0..len).map(|_| rng.gen::<f32>()).collect(),
        }
    }

    #[inline]
    pub fn genes(&self) -> &[f32] {
        &self.genes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Perception radius in Manhattan distance: `max(1, floor(sqrt(g0) * max_vision))`
    pub fn vision_range(&self, scaling: &GeneScaling) -> u32 {
        match self.genes.first() {
            Some(&g) => ((g.sqrt() * scaling.max_vision as f32) as u32).max(1),
            None => DEFAULT_VISION,
        }
    }

    /// Below this energy the snake looks for food
    pub fn low_energy_threshold(&self, scaling: &GeneScaling) -> f32 {
        match self.genes.get(1) {
            Some(&g) => g * scaling.max_energy_scale,
            None => DEFAULT_LOW_THRESHOLD,
        }
    }

    /// Above this energy the snake looks for a mate. Never below the low threshold.
    pub fn high_energy_threshold(&self, scaling: &GeneScaling) -> f32 {
        match self.genes.get(2) {
            Some(&g) => (g * scaling.max_energy_scale).max(self.low_energy_threshold(scaling)),
            None => DEFAULT_HIGH_THRESHOLD,
        }
    }

    /// First `n` genes rounded to two decimals, for display
    pub fn display_prefix(&self, n: usize) -> Vec<f32> {
        self.genes
            .iter()
            .take(n)
            .map(|g| (g * 100.0).round() / 100.0)
            .collect()
    }
}
