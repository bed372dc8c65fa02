//! Genotype and codec of the Evolution Strategies family.

use crate::error::Result;
use crate::ga::{Codec, Individual, Population};

/// Object variables and their mutation step sizes.
///
/// `sigma` holds either one shared step size or one per coordinate of
/// `value`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionParams {
    pub value: Vec<f64>,
    pub sigma: Vec<f64>,
}

impl EvolutionParams {
    pub fn new(value: Vec<f64>, sigma: Vec<f64>) -> Self {
        Self { value, sigma }
    }
}

/// ES individuals carry no phenotype: the fitness function reads the
/// object variables straight from the genotype.
pub type EsIndividual = Individual<(), EvolutionParams>;

pub type EsPopulation = Population<(), EvolutionParams>;

/// Codec with an empty phenotype.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCodec;

impl Codec<(), EvolutionParams> for NullCodec {
    fn decode(&self, _genotype: &EvolutionParams) -> Result<()> {
        Ok(())
    }

    fn encode(&self, _phenotype: &()) -> EvolutionParams {
        EvolutionParams::default()
    }
}
