//! Self-adaptive mutation, recombination and survival for evolution
//! strategies.
//!
//! Step sizes travel with the object variables and are mutated first, so
//! good step sizes survive together with the solutions they produced.
//!
//! # References
//!
//! - Schwefel (1995), *Evolution and Optimum Seeking*
//! - Eiben & Smith (2015), *Introduction to Evolutionary Computing*, ch. 6

use super::config::EsConfig;
use super::types::{EsIndividual, EvolutionParams};
use crate::error::{GeneError, Result};
use crate::ga::{
    Codec, CombinationStrategy, FitnessFunction, Generational, Individual, MutationStrategy,
    Pooled, PopulationFitness, TruncationSelection,
};
use crate::random::{create_rng, entropy_rng};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;

/// (μ + λ) survival: the best μ of parents and offspring.
pub type MuPlusLambda = Pooled<TruncationSelection>;

/// (μ, λ) survival: the best μ offspring.
pub type MuCommaLambda = Generational<TruncationSelection>;

/// Box and step-size limits shared by both mutations.
#[derive(Debug, Clone, Copy)]
struct Limits {
    min: f64,
    max: f64,
    epsilon0: f64,
    max_sigma: f64,
}

impl Limits {
    fn from_config(config: &EsConfig) -> Self {
        Self {
            min: config.min_value,
            max: config.max_value,
            epsilon0: config.epsilon0,
            max_sigma: config.max_sigma(),
        }
    }

    fn sigma(&self, sigma: f64) -> f64 {
        sigma.max(self.epsilon0).min(self.max_sigma)
    }

    fn value(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}

fn check_shape(params: &EvolutionParams, dimension: usize, sigmas: usize) -> Result<()> {
    if params.value.len() != dimension || params.sigma.len() != sigmas {
        return Err(GeneError::Config(format!(
            "expected {dimension} values and {sigmas} step sizes, got {} and {}",
            params.value.len(),
            params.sigma.len()
        )));
    }
    Ok(())
}

/// Uncorrelated mutation with one shared step size.
///
/// `σ' = σ · exp(τ · N(0,1))` with `τ = c / √n`, bounded to
/// `[ε0, (max - min) / 2]`; then `x'ᵢ = xᵢ + σ' · Nᵢ(0,1)` clamped to the box.
#[derive(Debug, Clone)]
pub struct UncorrelatedOneStep {
    dimension: usize,
    tau: f64,
    limits: Limits,
    rng: StdRng,
}

impl UncorrelatedOneStep {
    pub fn new(config: &EsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dimension: config.dimension,
            tau: config.tau_proportionality / (config.dimension as f64).sqrt(),
            limits: Limits::from_config(config),
            rng: entropy_rng(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }

    /// Uses `rng` as the internal random source.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }
}

impl MutationStrategy<(), EvolutionParams> for UncorrelatedOneStep {
    fn mutate(
        &mut self,
        individual: &EsIndividual,
        codec: &dyn Codec<(), EvolutionParams>,
    ) -> Result<EsIndividual> {
        let params = individual.genotype();
        check_shape(params, self.dimension, 1)?;

        let z: f64 = self.rng.sample(StandardNormal);
        let sigma = self.limits.sigma(params.sigma[0] * (self.tau * z).exp());
        let value = params
            .value
            .iter()
            .map(|&x| {
                let z: f64 = self.rng.sample(StandardNormal);
                self.limits.value(x + sigma * z)
            })
            .collect();

        Individual::decode(EvolutionParams::new(value, vec![sigma]), codec)
    }
}

/// Uncorrelated mutation with one step size per coordinate.
///
/// `σ'ᵢ = σᵢ · exp(τ' · N(0,1) + τ · Nᵢ(0,1))` where the first draw is
/// shared by all coordinates, `τ = c / √(2n)` and `τ' = c / √(2√n)`.
#[derive(Debug, Clone)]
pub struct UncorrelatedNSteps {
    dimension: usize,
    tau: f64,
    tau_prime: f64,
    limits: Limits,
    rng: StdRng,
}

impl UncorrelatedNSteps {
    pub fn new(config: &EsConfig) -> Result<Self> {
        config.validate()?;
        let n = config.dimension as f64;
        let c = config.tau_proportionality;
        Ok(Self {
            dimension: config.dimension,
            tau: c / (2.0 * n).sqrt(),
            tau_prime: c / (2.0 * n.sqrt()).sqrt(),
            limits: Limits::from_config(config),
            rng: entropy_rng(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }

    /// Uses `rng` as the internal random source.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }
}

impl MutationStrategy<(), EvolutionParams> for UncorrelatedNSteps {
    fn mutate(
        &mut self,
        individual: &EsIndividual,
        codec: &dyn Codec<(), EvolutionParams>,
    ) -> Result<EsIndividual> {
        let params = individual.genotype();
        check_shape(params, self.dimension, self.dimension)?;

        let base: f64 = self.tau_prime * self.rng.sample::<f64, _>(StandardNormal);
        let mut value = Vec::with_capacity(self.dimension);
        let mut sigma = Vec::with_capacity(self.dimension);
        for (&x, &s) in params.value.iter().zip(&params.sigma) {
            let own: f64 = self.tau * self.rng.sample::<f64, _>(StandardNormal);
            let s = self.limits.sigma(s * (base + own).exp());
            let z: f64 = self.rng.sample(StandardNormal);
            value.push(self.limits.value(x + s * z));
            sigma.push(s);
        }

        Individual::decode(EvolutionParams::new(value, sigma), codec)
    }
}

/// Local recombination: discrete for object variables (coin flip per
/// coordinate), intermediate for step sizes (mean of the parents).
#[derive(Debug, Clone)]
pub struct LocalRecombination {
    rng: StdRng,
}

impl LocalRecombination {
    pub fn new() -> Self {
        Self { rng: entropy_rng() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }

    /// Uses `rng` as the internal random source.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }
}

impl Default for LocalRecombination {
    fn default() -> Self {
        Self::new()
    }
}

impl CombinationStrategy<EvolutionParams> for LocalRecombination {
    fn combine(
        &mut self,
        first: &EvolutionParams,
        second: &EvolutionParams,
    ) -> Result<EvolutionParams> {
        check_shape(second, first.value.len(), first.sigma.len())?;

        let value = first
            .value
            .iter()
            .zip(&second.value)
            .map(|(&a, &b)| if self.rng.random_bool(0.5) { a } else { b })
            .collect();
        let sigma = first
            .sigma
            .iter()
            .zip(&second.sigma)
            .map(|(a, b)| (a + b) / 2.0)
            .collect();
        Ok(EvolutionParams::new(value, sigma))
    }
}

/// Minimizes `objective` over the object variables by reporting
/// `-objective(x)` as fitness.
#[derive(Debug, Clone)]
pub struct EsFitness<F> {
    objective: F,
}

impl<F> EsFitness<F> {
    pub fn new(objective: F) -> Self {
        Self { objective }
    }
}

impl<F> FitnessFunction<(), EvolutionParams> for EsFitness<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, population: &[EsIndividual]) -> Result<PopulationFitness> {
        Ok(population
            .iter()
            .map(|i| -(self.objective)(&i.genotype().value))
            .collect())
    }
}
