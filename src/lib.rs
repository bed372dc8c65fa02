//! Generic generational evolution engine.
//!
//! Provides an evolutionary search loop over any pair of phenotype and
//! genotype types:
//!
//! - **Genetic Algorithm (GA)**: a generational engine whose every step is
//!   a pluggable policy: codec, fitness, mating, combination, mutation
//!   rate, mutation and survival. Includes fitness-proportionate, SUS,
//!   tournament and truncation selection, weighted operator mixtures,
//!   local-search operators and elitism.
//! - **Evolution Strategies (ES)**: (μ + λ) and (μ, λ) strategies with
//!   self-adaptive step sizes, built from the same policies.
//!
//! # Architecture
//!
//! The crate contains no domain concepts. The embedding application
//! supplies a [`ga::Codec`] and a [`ga::FitnessFunction`] and owns the
//! population between generations; every stochastic component owns a
//! seedable random source, so a run is reproducible end to end.

pub mod error;
pub mod evstrat;
pub mod ga;
pub mod random;

pub use error::{GeneError, Result};
