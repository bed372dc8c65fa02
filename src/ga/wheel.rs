//! Fitness normalization and the roulette wheel.
//!
//! Fitness-proportionate mating and selection share one representation:
//! fitness is shifted so the worst individual sits at zero, scaled to sum
//! to one, and accumulated into a cumulative distribution ("wheel").
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection Algorithm"

use super::types::{FitnessValue, PopulationFitness, PopulationIndex};
use crate::error::{GeneError, Result};
use rand::Rng;

/// Maps raw fitness into a probability distribution.
///
/// Each value becomes `(f - min) / Σ(f - min)`: all outputs are
/// non-negative and sum to 1. When that is undefined (every value equal,
/// or a non-finite shifted sum), every individual gets `1 / n`.
///
/// ```
/// use u_gene::ga::normalize;
///
/// let p = normalize(&[1.0, 2.0, 3.0]);
/// assert_eq!(p, vec![0.0, 1.0 / 3.0, 2.0 / 3.0]);
///
/// // degenerate input falls back to the uniform distribution
/// assert_eq!(normalize(&[5.0, 5.0]), vec![0.5, 0.5]);
/// ```
pub fn normalize(fitness: &[FitnessValue]) -> PopulationFitness {
    let n = fitness.len();
    if n == 0 {
        return Vec::new();
    }

    let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
    let shifted_total: f64 = fitness.iter().map(|&f| f - min).sum();

    if !shifted_total.is_finite() || shifted_total <= 0.0 {
        return vec![1.0 / n as f64; n];
    }

    fitness.iter().map(|&f| (f - min) / shifted_total).collect()
}

/// Cumulative-probability-to-index mapping.
///
/// Slots are ordered by normalized fitness, ascending; each slot stores
/// the running total up to and including its individual. Individual `i`
/// owns the half-open interval `[previous total, own total)`, so an
/// individual with zero normalized fitness is never drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Wheel {
    slots: Vec<(f64, PopulationIndex)>,
}

impl Wheel {
    /// Builds the wheel for a fitness vector.
    ///
    /// Ties in normalized fitness keep population order.
    pub fn compute(fitness: &[FitnessValue]) -> Result<Self> {
        if fitness.is_empty() {
            return Err(GeneError::EmptyPopulation);
        }

        let normalized = normalize(fitness);
        let mut order: Vec<PopulationIndex> = (0..normalized.len()).collect();
        order.sort_by(|&a, &b| {
            normalized[a]
                .partial_cmp(&normalized[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut accumulated = 0.0;
        let slots = order
            .into_iter()
            .map(|index| {
                accumulated += normalized[index];
                (accumulated, index)
            })
            .collect();

        Ok(Self { slots })
    }

    /// Returns the individual whose bucket contains `p`.
    ///
    /// Points beyond the last cumulative value (rounding just below 1.0)
    /// map to the last slot.
    pub fn first_at_or_above(&self, p: f64) -> PopulationIndex {
        let pos = self.slots.partition_point(|&(cumulative, _)| cumulative <= p);
        let last = self.slots.len() - 1;
        self.slots[pos.min(last)].1
    }

    /// Spins the wheel once with a uniform point in `[0, 1)`.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> PopulationIndex {
        self.first_at_or_above(rng.random::<f64>())
    }

    /// Largest cumulative value; 1.0 up to rounding.
    pub fn total(&self) -> f64 {
        self.slots.last().map_or(0.0, |&(cumulative, _)| cumulative)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `(cumulative probability, population index)` pairs in wheel order.
    pub fn slots(&self) -> &[(f64, PopulationIndex)] {
        &self.slots
    }
}
