//! Survival policies: which individuals make up the next generation.
//!
//! Both policies delegate the choice of indices to a
//! [`SelectionAlgorithm`]; they differ in the pool they select from.
//!
//! | Policy | Pool | ES notation |
//! |---|---|---|
//! | [`Generational`] | offspring only | (μ, λ) |
//! | [`Pooled`] | parents + offspring | (μ + λ) |

use super::selection::take_survivors;
use super::types::{
    evaluate_population, FitnessFunction, Generation, Population, SelectionAlgorithm,
    SurvivalPolicy,
};
use crate::error::Result;

/// Generational replacement: parents die, survivors are selected among
/// the offspring.
///
/// The target size must not exceed the number of offspring.
#[derive(Debug, Clone, Default)]
pub struct Generational<S> {
    selection: S,
}

impl<S: SelectionAlgorithm> Generational<S> {
    pub fn new(selection: S) -> Self {
        Self { selection }
    }
}

impl<P: Clone, G: Clone, S: SelectionAlgorithm> SurvivalPolicy<P, G> for Generational<S> {
    fn survivors(
        &mut self,
        fitness: &dyn FitnessFunction<P, G>,
        generation: Generation<P, G>,
        target_size: usize,
    ) -> Result<Population<P, G>> {
        let offspring_fitness = evaluate_population(fitness, &generation.offspring)?;
        let chosen = self.selection.select(&offspring_fitness, target_size)?;
        take_survivors(generation.offspring, &chosen)
    }
}

/// Parents and offspring compete together for the next generation.
///
/// Parent fitness from the start of the generation is reused; only the
/// offspring are evaluated.
#[derive(Debug, Clone, Default)]
pub struct Pooled<S> {
    selection: S,
}

impl<S: SelectionAlgorithm> Pooled<S> {
    pub fn new(selection: S) -> Self {
        Self { selection }
    }
}

impl<P: Clone, G: Clone, S: SelectionAlgorithm> SurvivalPolicy<P, G> for Pooled<S> {
    fn survivors(
        &mut self,
        fitness: &dyn FitnessFunction<P, G>,
        generation: Generation<P, G>,
        target_size: usize,
    ) -> Result<Population<P, G>> {
        let Generation {
            mut parents,
            mut parent_fitness,
            offspring,
        } = generation;

        let offspring_fitness = evaluate_population(fitness, &offspring)?;
        parents.extend(offspring);
        parent_fitness.extend(offspring_fitness);

        let chosen = self.selection.select(&parent_fitness, target_size)?;
        take_survivors(parents, &chosen)
    }
}
