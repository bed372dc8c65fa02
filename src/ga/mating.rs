//! Mating strategies.
//!
//! A mating strategy turns a population (and its fitness) into a list of
//! [`MatingEntry`] values. Both strategies here are configured with the
//! number of entries to produce per call; that number is independent of
//! the population size.

use super::types::{check_fitness, Individual, MatingEntry, MatingStrategy};
use super::wheel::Wheel;
use crate::error::{GeneError, Result};
use crate::random::{create_rng, entropy_rng};
use rand::rngs::StdRng;
use rand::Rng;

/// Pairs parents uniformly at random, with replacement.
///
/// Every entry produces one child.
///
/// ```
/// use u_gene::ga::RandomMating;
///
/// let mating = RandomMating::new(10).with_seed(42);
/// assert_eq!(mating.offspring_count(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct RandomMating {
    offspring_count: usize,
    rng: StdRng,
}

impl RandomMating {
    pub fn new(offspring_count: usize) -> Self {
        Self {
            offspring_count,
            rng: entropy_rng(),
        }
    }

    /// Reseeds the internal random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn offspring_count(&self) -> usize {
        self.offspring_count
    }
}

impl<P, G> MatingStrategy<P, G> for RandomMating {
    fn mating(
        &mut self,
        population: &[Individual<P, G>],
        _fitness: &[f64],
    ) -> Result<Vec<MatingEntry>> {
        let n = population.len();
        if self.offspring_count == 0 {
            return Ok(Vec::new());
        }
        if n == 0 {
            return Err(GeneError::EmptyPopulation);
        }

        let rng = &mut self.rng;
        Ok((0..self.offspring_count)
            .map(|_| MatingEntry::new(rng.random_range(0..n), rng.random_range(0..n), 1))
            .collect())
    }
}

/// Roulette-wheel mating: each parent is drawn with probability
/// proportional to its normalized fitness.
///
/// The wheel is computed once per call; every entry spins it twice,
/// independently, and produces one child.
#[derive(Debug, Clone)]
pub struct FitnessProportionateMating {
    offspring_count: usize,
    rng: StdRng,
}

impl FitnessProportionateMating {
    pub fn new(offspring_count: usize) -> Self {
        Self {
            offspring_count,
            rng: entropy_rng(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }

    pub fn offspring_count(&self) -> usize {
        self.offspring_count
    }
}

impl<P, G> MatingStrategy<P, G> for FitnessProportionateMating {
    fn mating(
        &mut self,
        population: &[Individual<P, G>],
        fitness: &[f64],
    ) -> Result<Vec<MatingEntry>> {
        check_fitness(fitness, population.len())?;
        if self.offspring_count == 0 {
            return Ok(Vec::new());
        }

        let wheel = Wheel::compute(fitness)?;
        let rng = &mut self.rng;
        Ok((0..self.offspring_count)
            .map(|_| MatingEntry::new(wheel.spin(rng), wheel.spin(rng), 1))
            .collect())
    }
}
