//! Evolution Strategies.
//!
//! Real-valued minimization with self-adaptive step sizes, expressed as a
//! policy set for the generational engine: genotypes are
//! [`EvolutionParams`], phenotypes are empty ([`NullCodec`]), every
//! offspring is mutated, and survival is (μ + λ) or (μ, λ) truncation.
//!
//! # Key Types
//!
//! - [`EvolutionStrategies`]: configured strategy with `iterate` and `run`
//! - [`EsConfig`]: dimension, bounds, learning rates, μ and λ
//! - [`UncorrelatedOneStep`] / [`UncorrelatedNSteps`]: self-adaptive mutation
//! - [`LocalRecombination`]: discrete values, intermediate step sizes
//!
//! # References
//!
//! - Rechenberg (1973), *Evolutionsstrategie*
//! - Beyer & Schwefel (2002), "Evolution strategies: A comprehensive introduction"

mod config;
mod operators;
mod runner;
mod types;

pub use config::{EsConfig, EsSurvival};
pub use operators::{
    EsFitness, LocalRecombination, MuCommaLambda, MuPlusLambda, UncorrelatedNSteps,
    UncorrelatedOneStep,
};
pub use runner::{random_population, EvolutionStrategies};
pub use types::{EsIndividual, EsPopulation, EvolutionParams, NullCodec};
