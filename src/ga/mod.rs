//! Generational genetic algorithm engine.
//!
//! A generic engine over a phenotype `P` and a genotype `G`. The embedding
//! application supplies a [`Codec`] and a [`FitnessFunction`]; every other
//! step of a generation is a pluggable policy.
//!
//! # Core Traits
//!
//! - [`Codec`]: genotype ↔ phenotype conversion, the only way to build an [`Individual`]
//! - [`FitnessFunction`]: one fitness value per individual, higher is better
//! - [`MatingStrategy`]: which parents pair up and how many children they have
//! - [`CombinationStrategy`]: child genotype from two parent genotypes
//! - [`MutationStrategy`] and [`MutationRate`]: gated per-offspring mutation
//! - [`SelectionAlgorithm`] and [`SurvivalPolicy`]: next generation membership
//!
//! # Key Types
//!
//! - [`GeneticAlgorithm`]: one generation per [`iterate`](GeneticAlgorithm::iterate) call
//! - [`EvolutionConfig`]: sizes, elitism, seeding, termination (presets)
//! - [`EvolutionRunner`]: optional control loop returning an [`EvolutionResult`]
//! - [`Wheel`]: cumulative distribution for fitness-proportionate sampling
//!
//! # Submodules
//!
//! - [`operators`]: crossover and mutation operators for `Vec<T>` genotypes
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection Algorithm"

mod combination;
mod config;
mod engine;
mod fitness;
mod mating;
mod mix;
mod mutation;
pub mod operators;
mod runner;
mod selection;
mod survival;
mod types;
mod wheel;

pub use combination::{CombinationMix, LocalSearchCombination};
pub use config::EvolutionConfig;
pub use engine::{GeneticAlgorithm, GeneticAlgorithmBuilder};
pub use fitness::FitnessAdapter;
pub use mating::{FitnessProportionateMating, RandomMating};
pub use mutation::{ConstantMutationRate, LocalSearchMutation, MutationMix};
pub use operators::{GaussianMutation, NPointCrossover, SwapMutation, UniformCrossover};
pub use runner::{EvolutionResult, EvolutionRunner};
pub use selection::{
    take_survivors, truncate, FitnessProportionateSelection, StochasticUniversalSampling,
    TournamentSelection, TruncationSelection,
};
pub use survival::{Generational, Pooled};
pub use types::{
    evaluate_population, Codec, CombinationStrategy, FitnessFunction, FitnessValue, Generation,
    Individual, MatingEntry, MatingStrategy, MutationRate, MutationStrategy, Population,
    PopulationFitness, PopulationIndex, SelectionAlgorithm, SurvivalPolicy, Survivors,
};
pub use wheel::{normalize, Wheel};
