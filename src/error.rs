//! Error types shared by every algorithm family in the crate.

use thiserror::Error;

/// Errors raised while configuring or running an evolutionary search.
///
/// Every failure inside one generation aborts that generation: the engine
/// never returns a partially built population.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneError {
    /// Invalid parameters, detected at construction or at the start of a call.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A selection algorithm was asked for more survivors than it can draw from.
    #[error("cannot select {requested} survivors from a population of {available}")]
    TargetExceedsPopulation { requested: usize, available: usize },

    #[error("population is empty")]
    EmptyPopulation,

    #[error("fitness has {actual} values for a population of {expected}")]
    FitnessLength { expected: usize, actual: usize },

    /// Domain error reported by a fitness function.
    #[error("fitness evaluation failed: {0}")]
    Fitness(String),

    /// The codec could not turn a genotype into a phenotype.
    #[error("decode failed: {0}")]
    Decode(String),

    /// A mating entry or survivor set referenced a missing individual.
    #[error("index {index} is outside a population of {size}")]
    IndexOutOfRange { index: usize, size: usize },
}

pub type Result<T> = std::result::Result<T, GeneError>;
