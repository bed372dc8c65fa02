//! The generational engine.
//!
//! [`GeneticAlgorithm`] owns one instance of every policy and turns a
//! population into the next one with [`iterate`](GeneticAlgorithm::iterate).
//! It keeps no population or fitness between calls; the caller owns the
//! population and the control loop (or uses
//! [`EvolutionRunner`](super::EvolutionRunner)).

use super::config::EvolutionConfig;
use super::selection::truncate;
use super::types::{
    evaluate_population, fittest, Codec, CombinationStrategy, FitnessFunction, Generation,
    Individual, MatingEntry, MatingStrategy, MutationRate, MutationStrategy, Population,
    PopulationFitness, SurvivalPolicy,
};
use crate::error::{GeneError, Result};
use crate::random::{create_rng, entropy_rng};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use std::sync::Arc;

/// A configured generational engine.
///
/// Built with [`GeneticAlgorithm::builder`]:
///
/// ```
/// use u_gene::ga::*;
/// use u_gene::Result;
///
/// struct Bits;
/// impl Codec<usize, Vec<bool>> for Bits {
///     fn decode(&self, genes: &Vec<bool>) -> Result<usize> {
///         Ok(genes.iter().filter(|&&b| b).count())
///     }
///     fn encode(&self, ones: &usize) -> Vec<bool> {
///         (0..16).map(|i| i < *ones).collect()
///     }
/// }
///
/// let mut engine: GeneticAlgorithm<usize, Vec<bool>> = GeneticAlgorithm::builder()
///     .codec(Bits)
///     .fitness(FitnessAdapter::new(|ones: &usize| *ones as f64))
///     .mating(RandomMating::new(20).with_seed(1))
///     .combination(UniformCrossover::new(0.5).unwrap().with_seed(2))
///     .mutation(SwapMutation::new().with_seed(3))
///     .mutation_rate(ConstantMutationRate::new(0.1).unwrap())
///     .survival(Pooled::new(TruncationSelection))
///     .config(EvolutionConfig::default().with_seed(4))
///     .build()
///     .unwrap();
///
/// let population: Population<usize, Vec<bool>> = (0..10)
///     .map(|n| Individual::encode(&(n % 4), engine.codec()).unwrap())
///     .collect();
/// let next = engine.iterate(population).unwrap();
/// assert_eq!(next.len(), 10);
/// ```
pub struct GeneticAlgorithm<P, G> {
    codec: Arc<dyn Codec<P, G>>,
    fitness: Arc<dyn FitnessFunction<P, G>>,
    mutation: Box<dyn MutationStrategy<P, G>>,
    mutation_rate: Box<dyn MutationRate<P, G>>,
    mating: Box<dyn MatingStrategy<P, G>>,
    combination: Box<dyn CombinationStrategy<G>>,
    survival: Box<dyn SurvivalPolicy<P, G>>,
    config: EvolutionConfig,
    rng: StdRng,
}

impl<P, G> GeneticAlgorithm<P, G> {
    pub fn builder() -> GeneticAlgorithmBuilder<P, G> {
        GeneticAlgorithmBuilder::new()
    }

    pub fn codec(&self) -> &dyn Codec<P, G> {
        &*self.codec
    }

    pub fn fitness_function(&self) -> &dyn FitnessFunction<P, G> {
        &*self.fitness
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Evaluates `population` with the configured fitness function.
    pub fn evaluate(&self, population: &[Individual<P, G>]) -> Result<PopulationFitness> {
        evaluate_population(&*self.fitness, population)
    }
}

impl<P, G> GeneticAlgorithm<P, G>
where
    P: Clone + Send + Sync,
    G: Clone + Send + Sync,
{
    /// Runs one generation and returns the next population.
    ///
    /// Phases, in order: evaluate the incoming population, hold out the
    /// elites (a share of `generation_size`, at most the whole incoming
    /// population), mate, combine and decode the offspring, mutate them, let
    /// the survival policy pick `generation_size - elites` individuals,
    /// then append the elites.
    ///
    /// Any error aborts the call; no partial generation is returned.
    ///
    /// # Errors
    ///
    /// - [`GeneError::EmptyPopulation`] for an empty input.
    /// - [`GeneError::Config`] when elites would fill the generation, a
    ///   mutation probability is invalid, or the survival policy returns
    ///   the wrong number of individuals.
    /// - [`GeneError::IndexOutOfRange`] when a mating entry references a
    ///   missing parent.
    /// - Codec and fitness errors unchanged.
    pub fn iterate(&mut self, population: Population<P, G>) -> Result<Population<P, G>> {
        if population.is_empty() {
            return Err(GeneError::EmptyPopulation);
        }
        let size = population.len();
        let generation_size = self.config.generation_size.unwrap_or(size);
        let elite_count = self.config.elite_count(generation_size).min(size);
        if elite_count >= generation_size {
            return Err(GeneError::Config(format!(
                "{elite_count} elites fill a generation of {generation_size}"
            )));
        }
        let target_size = generation_size - elite_count;

        let fitness = self.evaluate(&population)?;
        trace!("evaluated {size} parents");

        let elites: Population<P, G> = truncate(&fitness, elite_count)?
            .into_iter()
            .map(|i| population[i].clone())
            .collect();

        let entries = self.mating.mating(&population, &fitness)?;
        check_entries(&entries, size)?;
        trace!("mating produced {} entries", entries.len());

        let mut genotypes = Vec::with_capacity(entries.iter().map(|e| e.offspring).sum());
        for entry in &entries {
            let first = population[entry.first].genotype();
            let second = population[entry.second].genotype();
            for _ in 0..entry.offspring {
                genotypes.push(self.combination.combine(first, second)?);
            }
        }
        let offspring = self.decode_all(genotypes)?;
        trace!("decoded {} offspring", offspring.len());

        let (offspring, mutated) = self.mutate_all(offspring)?;
        let offspring_count = offspring.len();

        let best = fittest(&fitness).map(|i| fitness[i]).unwrap_or(f64::NAN);
        let generation = Generation {
            parents: population,
            parent_fitness: fitness,
            offspring,
        };
        let mut next = self
            .survival
            .survivors(&*self.fitness, generation, target_size)?;
        if next.len() != target_size {
            return Err(GeneError::Config(format!(
                "survival policy returned {} individuals, expected {target_size}",
                next.len()
            )));
        }
        next.extend(elites);

        debug!(
            "generation: {size} parents (best {best:.6}), {offspring_count} offspring, \
             {mutated} mutated, {elite_count} elites, {} survivors",
            next.len()
        );
        Ok(next)
    }

    fn decode_all(&self, genotypes: Vec<G>) -> Result<Population<P, G>> {
        let codec = &*self.codec;
        if self.config.parallel {
            genotypes
                .into_par_iter()
                .map(|g| Individual::decode(g, codec))
                .collect()
        } else {
            genotypes
                .into_iter()
                .map(|g| Individual::decode(g, codec))
                .collect()
        }
    }

    /// One Bernoulli trial per offspring against its mutation probability.
    fn mutate_all(&mut self, offspring: Population<P, G>) -> Result<(Population<P, G>, usize)> {
        let probabilities = self.mutation_rate.probabilities(&offspring);
        if probabilities.len() != offspring.len() {
            return Err(GeneError::Config(format!(
                "mutation rate gave {} probabilities for {} offspring",
                probabilities.len(),
                offspring.len()
            )));
        }
        if let Some(p) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(GeneError::Config(format!(
                "mutation probability {p} is outside [0, 1]"
            )));
        }

        let mut mutated = 0;
        let mut result = Vec::with_capacity(offspring.len());
        for (individual, p) in offspring.into_iter().zip(probabilities) {
            if self.rng.random_bool(p) {
                result.push(self.mutation.mutate(&individual, &*self.codec)?);
                mutated += 1;
            } else {
                result.push(individual);
            }
        }
        Ok((result, mutated))
    }
}

fn check_entries(entries: &[MatingEntry], size: usize) -> Result<()> {
    for entry in entries {
        for index in [entry.first, entry.second] {
            if index >= size {
                return Err(GeneError::IndexOutOfRange { index, size });
            }
        }
    }
    Ok(())
}

// ============================================================================
// Builder
// ============================================================================

/// Collects the components of a [`GeneticAlgorithm`].
///
/// Every policy is required; `config` defaults to
/// [`EvolutionConfig::default`].
pub struct GeneticAlgorithmBuilder<P, G> {
    codec: Option<Arc<dyn Codec<P, G>>>,
    fitness: Option<Arc<dyn FitnessFunction<P, G>>>,
    mutation: Option<Box<dyn MutationStrategy<P, G>>>,
    mutation_rate: Option<Box<dyn MutationRate<P, G>>>,
    mating: Option<Box<dyn MatingStrategy<P, G>>>,
    combination: Option<Box<dyn CombinationStrategy<G>>>,
    survival: Option<Box<dyn SurvivalPolicy<P, G>>>,
    config: EvolutionConfig,
}

impl<P, G> Default for GeneticAlgorithmBuilder<P, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, G> GeneticAlgorithmBuilder<P, G> {
    pub fn new() -> Self {
        Self {
            codec: None,
            fitness: None,
            mutation: None,
            mutation_rate: None,
            mating: None,
            combination: None,
            survival: None,
            config: EvolutionConfig::default(),
        }
    }

    pub fn codec<C: Codec<P, G> + 'static>(self, codec: C) -> Self {
        self.shared_codec(Arc::new(codec))
    }

    /// Uses a codec that other components (e.g. local search) also hold.
    pub fn shared_codec(mut self, codec: Arc<dyn Codec<P, G>>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn fitness<F: FitnessFunction<P, G> + 'static>(self, fitness: F) -> Self {
        self.shared_fitness(Arc::new(fitness))
    }

    pub fn shared_fitness(mut self, fitness: Arc<dyn FitnessFunction<P, G>>) -> Self {
        self.fitness = Some(fitness);
        self
    }

    pub fn mutation<M: MutationStrategy<P, G> + 'static>(mut self, mutation: M) -> Self {
        self.mutation = Some(Box::new(mutation));
        self
    }

    pub fn mutation_rate<R: MutationRate<P, G> + 'static>(mut self, rate: R) -> Self {
        self.mutation_rate = Some(Box::new(rate));
        self
    }

    pub fn mating<M: MatingStrategy<P, G> + 'static>(mut self, mating: M) -> Self {
        self.mating = Some(Box::new(mating));
        self
    }

    pub fn combination<C: CombinationStrategy<G> + 'static>(mut self, combination: C) -> Self {
        self.combination = Some(Box::new(combination));
        self
    }

    pub fn survival<S: SurvivalPolicy<P, G> + 'static>(mut self, survival: S) -> Self {
        self.survival = Some(Box::new(survival));
        self
    }

    pub fn config(mut self, config: EvolutionConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the configuration and assembles the engine.
    ///
    /// Fails with [`GeneError::Config`] when a component is missing or the
    /// configuration is invalid.
    pub fn build(self) -> Result<GeneticAlgorithm<P, G>> {
        self.config.validate()?;
        let rng = match self.config.seed {
            Some(seed) => create_rng(seed),
            None => entropy_rng(),
        };
        Ok(GeneticAlgorithm {
            codec: required(self.codec, "codec")?,
            fitness: required(self.fitness, "fitness function")?,
            mutation: required(self.mutation, "mutation strategy")?,
            mutation_rate: required(self.mutation_rate, "mutation rate")?,
            mating: required(self.mating, "mating strategy")?,
            combination: required(self.combination, "combination strategy")?,
            survival: required(self.survival, "survival policy")?,
            config: self.config,
            rng,
        })
    }
}

fn required<T>(component: Option<T>, name: &str) -> Result<T> {
    component.ok_or_else(|| GeneError::Config(format!("missing {name}")))
}

// ============================================================================
// Tests
// ============================================================================
