//! Composite combination (crossover) operators.
//!
//! Concrete crossover schemes live in [`operators`](super::operators); the
//! types here wrap other [`CombinationStrategy`] implementations.

use super::mix::WeightedDispatch;
use super::types::{
    evaluate_population, fittest, Codec, CombinationStrategy, FitnessFunction, Individual,
};
use crate::error::{GeneError, Result};
use crate::random::{create_rng, entropy_rng};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

/// Weighted mixture of combination operators.
///
/// Each call draws a uniform point and dispatches to the operator whose
/// cumulative-weight bucket contains it. Weights are taken in the order
/// given and must sum to at most 1; the residual mass goes to the first
/// operator.
///
/// ```
/// use u_gene::ga::{CombinationMix, CombinationStrategy, NPointCrossover, UniformCrossover};
///
/// let mut mix = CombinationMix::new(vec![
///     (0.3, Box::new(NPointCrossover::new(1)) as Box<dyn CombinationStrategy<Vec<u8>>>),
///     (0.7, Box::new(UniformCrossover::new(0.5).unwrap()) as Box<dyn CombinationStrategy<Vec<u8>>>),
/// ])
/// .unwrap()
/// .with_seed(42);
///
/// let child = mix.combine(&vec![0; 8], &vec![1; 8]).unwrap();
/// assert_eq!(child.len(), 8);
/// ```
pub struct CombinationMix<G> {
    operators: Vec<Box<dyn CombinationStrategy<G>>>,
    dispatch: WeightedDispatch,
    rng: StdRng,
}

impl<G> CombinationMix<G> {
    /// Builds the mixture from `(weight, operator)` pairs.
    ///
    /// Fails with [`GeneError::Config`] when the weights sum above 1, a
    /// weight is negative, or no operator is given.
    pub fn new(weighted: Vec<(f64, Box<dyn CombinationStrategy<G>>)>) -> Result<Self> {
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

impl<G> CombinationStrategy<G> for CombinationMix<G> {
    fn combine(&mut self, first: &G, second: &G) -> Result<G> {
        let k = self.dispatch.pick(self.rng.random::<f64>());
        self.operators[k].combine(first, second)
    }
}

/// Local search over a combination operator.
///
/// Generates `candidates` children from the same parents and keeps the
/// fittest one. Only useful when the wrapped operator is stochastic; a
/// deterministic one yields the same child every time.
pub struct LocalSearchCombination<P, G> {
    combination: Box<dyn CombinationStrategy<G>>,
    codec: Arc<dyn Codec<P, G>>,
    fitness: Arc<dyn FitnessFunction<P, G>>,
    candidates: usize,
}

impl<P, G> LocalSearchCombination<P, G> {
    pub fn new<C>(
        combination: C,
        codec: Arc<dyn Codec<P, G>>,
        fitness: Arc<dyn FitnessFunction<P, G>>,
        candidates: usize,
    ) -> Result<Self>
    where
        C: CombinationStrategy<G> + 'static,
    {
        if candidates == 0 {
            return Err(GeneError::Config(
                "local search needs at least one candidate".into(),
            ));
        }
        Ok(Self {
            combination: Box::new(combination),
            codec,
            fitness,
            candidates,
        })
    }
}

impl<P, G> CombinationStrategy<G> for LocalSearchCombination<P, G> {
    fn combine(&mut self, first: &G, second: &G) -> Result<G> {
        let mut children = Vec::with_capacity(self.candidates);
        for _ in 0..self.candidates {
            let genotype = self.combination.combine(first, second)?;
            children.push(Individual::decode(genotype, &*self.codec)?);
        }

        let fitness = evaluate_population(&*self.fitness, &children)?;
        let best = fittest(&fitness).ok_or(GeneError::EmptyPopulation)?;
        Ok(children.swap_remove(best).into_genotype())
    }
}
