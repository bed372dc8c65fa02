//! Mutation rates and composite mutation operators.

use super::mix::WeightedDispatch;
use super::types::{
    evaluate_population, fittest, Codec, FitnessFunction, Individual, MutationRate,
    MutationStrategy,
};
use crate::error::{GeneError, Result};
use crate::random::{create_rng, entropy_rng};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

/// Same mutation probability for every individual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantMutationRate {
    rate: f64,
}

impl ConstantMutationRate {
    /// Fails with [`GeneError::Config`] unless `rate` is within `[0, 1]`.
    pub fn new(rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(GeneError::Config(format!(
                "mutation rate {rate} is outside [0, 1]"
            )));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl<P, G> MutationRate<P, G> for ConstantMutationRate {
    fn probabilities(&self, population: &[Individual<P, G>]) -> Vec<f64> {
        vec![self.rate; population.len()]
    }
}

/// Weighted mixture of mutation operators.
///
/// Dispatch works like [`CombinationMix`](super::CombinationMix): weights
/// in the given order, summing to at most 1, residual mass to the first.
pub struct MutationMix<P, G> {
    operators: Vec<Box<dyn MutationStrategy<P, G>>>,
    dispatch: WeightedDispatch,
    rng: StdRng,
}

impl<P, G> MutationMix<P, G> {
    pub fn new(weighted: Vec<(f64, Box<dyn MutationStrategy<P, G>>)>) -> Result<Self> {
        let dispatch = WeightedDispatch::new(weighted.iter().map(|(w, _)| *w))?;
        Ok(Self {
            operators: weighted.into_iter().map(|(_, op)| op).collect(),
            dispatch,
            rng: entropy_rng(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }
}

impl<P, G> MutationStrategy<P, G> for MutationMix<P, G> {
    fn mutate(
        &mut self,
        individual: &Individual<P, G>,
        codec: &dyn Codec<P, G>,
    ) -> Result<Individual<P, G>> {
        let k = self.dispatch.pick(self.rng.random::<f64>());
        self.operators[k].mutate(individual, codec)
    }
}

/// Local search over a mutation operator: mutates the same individual
/// `candidates` times and keeps the fittest result.
pub struct LocalSearchMutation<P, G> {
    mutation: Box<dyn MutationStrategy<P, G>>,
    fitness: Arc<dyn FitnessFunction<P, G>>,
    candidates: usize,
}

impl<P, G> LocalSearchMutation<P, G> {
    pub fn new<M>(
        mutation: M,
        fitness: Arc<dyn FitnessFunction<P, G>>,
        candidates: usize,
    ) -> Result<Self>
    where
        M: MutationStrategy<P, G> + 'static,
    {
        if candidates == 0 {
            return Err(GeneError::Config(
                "local search needs at least one candidate".into(),
            ));
        }
        Ok(Self {
            mutation: Box::new(mutation),
            fitness,
            candidates,
        })
    }
}

impl<P, G> MutationStrategy<P, G> for LocalSearchMutation<P, G> {
    fn mutate(
        &mut self,
        individual: &Individual<P, G>,
        codec: &dyn Codec<P, G>,
    ) -> Result<Individual<P, G>> {
        let mut candidates = Vec::with_capacity(self.candidates);
        for _ in 0..self.candidates {
            candidates.push(self.mutation.mutate(individual, codec)?);
        }

        let fitness = evaluate_population(&*self.fitness, &candidates)?;
        let best = fittest(&fitness).ok_or(GeneError::EmptyPopulation)?;
        Ok(candidates.swap_remove(best))
    }
}
