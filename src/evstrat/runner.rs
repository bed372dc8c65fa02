//! Evolution Strategies driver on top of the generational engine.

use super::config::{EsConfig, EsSurvival};
use super::operators::{
    EsFitness, LocalRecombination, MuCommaLambda, MuPlusLambda, UncorrelatedNSteps,
    UncorrelatedOneStep,
};
use super::types::{EsPopulation, EvolutionParams, NullCodec};
use crate::error::Result;
use crate::ga::{
    CombinationStrategy, ConstantMutationRate, EvolutionConfig, EvolutionResult, EvolutionRunner,
    FitnessFunction, GeneticAlgorithm, Individual, MutationStrategy, RandomMating,
    SurvivalPolicy,
};
use crate::random::{create_rng, entropy_rng, fork};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// A (μ + λ) or (μ, λ) evolution strategy.
///
/// Each generation draws λ random parent pairs, recombines each pair into
/// one child, mutates every child (probability 1) and keeps μ survivors.
/// There is no elitism beyond what (μ + λ) survival implies.
///
/// ```
/// use u_gene::evstrat::{random_population, EsConfig, EvolutionStrategies};
/// use u_gene::random::create_rng;
///
/// let config = EsConfig::new(3).with_max_generations(30).with_seed(7);
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
///
/// let mut es = EvolutionStrategies::new(config.clone(), sphere).unwrap();
/// let population = random_population(&config, &mut create_rng(7)).unwrap();
/// let result = es.run(population).unwrap();
/// assert!(-result.best_fitness < 1.0);
/// ```
pub struct EvolutionStrategies {
    engine: GeneticAlgorithm<(), EvolutionParams>,
}

impl EvolutionStrategies {
    /// Builds the standard strategy for minimizing `objective`: self-adaptive
    /// mutation with `config.num_sigmas` step sizes, local recombination and
    /// the configured survival.
    pub fn new<F>(config: EsConfig, objective: F) -> Result<Self>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        config.validate()?;
        let mut seeds = seed_source(&config);

        let mutation: Box<dyn MutationStrategy<(), EvolutionParams>> = if config.num_sigmas == 1 {
            Box::new(UncorrelatedOneStep::new(&config)?.with_rng(fork(&mut seeds)))
        } else {
            Box::new(UncorrelatedNSteps::new(&config)?.with_rng(fork(&mut seeds)))
        };
        let combination = LocalRecombination::new().with_rng(fork(&mut seeds));
        let survival: Box<dyn SurvivalPolicy<(), EvolutionParams>> = match config.survival {
            EsSurvival::Plus => Box::new(MuPlusLambda::default()),
            EsSurvival::Comma => Box::new(MuCommaLambda::default()),
        };

        Self::assemble(
            config,
            &mut seeds,
            EsFitness::new(objective),
            mutation,
            combination,
            survival,
        )
    }

    /// Builds a strategy from custom components.
    ///
    /// Mating is random with `config.lambda` offspring and the engine
    /// keeps `config.mu` survivors.
    pub fn with_components<F, M, C, S>(
        config: EsConfig,
        fitness: F,
        mutation: M,
        combination: C,
        survival: S,
    ) -> Result<Self>
    where
        F: FitnessFunction<(), EvolutionParams> + 'static,
        M: MutationStrategy<(), EvolutionParams> + 'static,
        C: CombinationStrategy<EvolutionParams> + 'static,
        S: SurvivalPolicy<(), EvolutionParams> + 'static,
    {
        config.validate()?;
        let mut seeds = seed_source(&config);
        Self::assemble(config, &mut seeds, fitness, mutation, combination, survival)
    }

    fn assemble<F, M, C, S>(
        config: EsConfig,
        seeds: &mut StdRng,
        fitness: F,
        mutation: M,
        combination: C,
        survival: S,
    ) -> Result<Self>
    where
        F: FitnessFunction<(), EvolutionParams> + 'static,
        M: MutationStrategy<(), EvolutionParams> + 'static,
        C: CombinationStrategy<EvolutionParams> + 'static,
        S: SurvivalPolicy<(), EvolutionParams> + 'static,
    {
        let engine_config = EvolutionConfig::default()
            .with_generation_size(config.mu)
            .with_elite_ratio(0.0)
            .with_parallel(false)
            .with_max_generations(config.max_generations)
            .with_stagnation_limit(config.stagnation_limit)
            .with_seed(seeds.random());

        let engine = GeneticAlgorithm::builder()
            .codec(NullCodec)
            .fitness(fitness)
            .mutation(mutation)
            .mutation_rate(ConstantMutationRate::new(1.0)?)
            .mating(RandomMating::new(config.lambda).with_rng(fork(seeds)))
            .combination(combination)
            .survival(survival)
            .config(engine_config)
            .build()?;

        debug!(
            "evolution strategy: dimension {}, mu {}, lambda {}, {:?} survival",
            config.dimension, config.mu, config.lambda, config.survival
        );
        Ok(Self { engine })
    }

    /// Runs one generation.
    pub fn iterate(&mut self, population: EsPopulation) -> Result<EsPopulation> {
        self.engine.iterate(population)
    }

    /// Runs until `max_generations` or the stagnation limit.
    ///
    /// `best_fitness` in the result is the negated objective value.
    pub fn run(&mut self, population: EsPopulation) -> Result<EvolutionResult<(), EvolutionParams>> {
        EvolutionRunner::run(&mut self.engine, population)
    }

    pub fn engine(&self) -> &GeneticAlgorithm<(), EvolutionParams> {
        &self.engine
    }
}

fn seed_source(config: &EsConfig) -> StdRng {
    match config.seed {
        Some(seed) => create_rng(seed),
        None => entropy_rng(),
    }
}

/// `config.mu` individuals with values uniform in `[min, max)` and
/// `config.num_sigmas` step sizes of `config.initial_sigma`.
pub fn random_population<R: Rng>(config: &EsConfig, rng: &mut R) -> Result<EsPopulation> {
    config.validate()?;
    (0..config.mu)
        .map(|_| {
            let value = (0..config.dimension)
                .map(|_| rng.random_range(config.min_value..config.max_value))
                .collect();
            let sigma = vec![config.initial_sigma; config.num_sigmas];
            Individual::decode(EvolutionParams::new(value, sigma), &NullCodec)
        })
        .collect()
}
