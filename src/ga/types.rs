//! Core type and trait definitions for the generational engine.
//!
//! The engine is generic over two independent type parameters: the
//! phenotype `P` (what the fitness function looks at) and the genotype `G`
//! (what the genetic operators manipulate). [`Codec`] is the only bridge
//! between the two, and [`Individual`] can only be built through it, so a
//! phenotype can never drift away from its genotype.

use crate::error::{GeneError, Result};

/// Fitness of one individual. Higher is better; values may be negative.
pub type FitnessValue = f64;

/// Fitness of every individual of a population, by population index.
pub type PopulationFitness = Vec<FitnessValue>;

/// Position of an individual inside its population.
pub type PopulationIndex = usize;

/// Indices chosen by a [`SelectionAlgorithm`]. May contain repeats.
pub type Survivors = Vec<PopulationIndex>;

/// Ordered collection of individuals processed together in one generation.
pub type Population<P, G> = Vec<Individual<P, G>>;

/// A decoded candidate solution: a genotype and the phenotype it decodes to.
///
/// Fields are private. The only constructors go through a [`Codec`], which
/// guarantees `phenotype == codec.decode(genotype)` for every individual.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual<P, G> {
    phenotype: P,
    genotype: G,
}

impl<P, G> Individual<P, G> {
    /// Builds an individual by decoding `genotype`.
    pub fn decode<C>(genotype: G, codec: &C) -> Result<Self>
    where
        C: Codec<P, G> + ?Sized,
    {
        let phenotype = codec.decode(&genotype)?;
        Ok(Self {
            phenotype,
            genotype,
        })
    }

    /// Builds an individual from a phenotype.
    ///
    /// The phenotype is encoded and then decoded again, so the stored
    /// phenotype is always the one the codec derives from the genotype.
    pub fn encode<C>(phenotype: &P, codec: &C) -> Result<Self>
    where
        C: Codec<P, G> + ?Sized,
    {
        Self::decode(codec.encode(phenotype), codec)
    }

    pub fn phenotype(&self) -> &P {
        &self.phenotype
    }

    pub fn genotype(&self) -> &G {
        &self.genotype
    }

    pub fn into_genotype(self) -> G {
        self.genotype
    }

    pub fn into_parts(self) -> (P, G) {
        (self.phenotype, self.genotype)
    }
}

/// One pairing decided by a [`MatingStrategy`].
///
/// `first == second` (self-pairing) is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatingEntry {
    pub first: PopulationIndex,
    pub second: PopulationIndex,
    /// Number of children this pair produces.
    pub offspring: usize,
}

impl MatingEntry {
    pub fn new(first: PopulationIndex, second: PopulationIndex, offspring: usize) -> Self {
        Self {
            first,
            second,
            offspring,
        }
    }
}

/// Converts between genotypes and phenotypes.
///
/// Supplied by the embedding application. `decode` must be deterministic.
///
/// # Implementing
///
/// ```
/// use u_gene::ga::Codec;
/// use u_gene::{GeneError, Result};
///
/// /// Reads a bit vector as an unsigned integer.
/// struct BinaryCodec;
///
/// impl Codec<u32, Vec<bool>> for BinaryCodec {
///     fn decode(&self, bits: &Vec<bool>) -> Result<u32> {
///         if bits.len() > 32 {
///             return Err(GeneError::Decode(format!("{} bits do not fit a u32", bits.len())));
///         }
///         Ok(bits.iter().fold(0, |acc, &b| (acc << 1) | b as u32))
///     }
///
///     fn encode(&self, value: &u32) -> Vec<bool> {
///         (0..32).rev().map(|i| (value >> i) & 1 == 1).collect()
///     }
/// }
/// ```
pub trait Codec<P, G>: Send + Sync {
    fn decode(&self, genotype: &G) -> Result<P>;
    fn encode(&self, phenotype: &P) -> G;
}

/// Maps a population to one fitness value per individual.
///
/// Called once per generation on the incoming population, and again by
/// survival policies and local-search operators on freshly built
/// individuals. Implementations must not keep fitness between calls.
pub trait FitnessFunction<P, G>: Send + Sync {
    fn evaluate(&self, population: &[Individual<P, G>]) -> Result<PopulationFitness>;
}

/// Produces a child genotype from two parent genotypes.
///
/// Implementations own their random source and must not modify the parents.
pub trait CombinationStrategy<G> {
    fn combine(&mut self, first: &G, second: &G) -> Result<G>;
}

/// Produces a mutated copy of an individual.
///
/// The result must be built through `codec` (see [`Individual::decode`]).
pub trait MutationStrategy<P, G> {
    fn mutate(
        &mut self,
        individual: &Individual<P, G>,
        codec: &dyn Codec<P, G>,
    ) -> Result<Individual<P, G>>;
}

/// Per-individual probability that mutation is applied.
pub trait MutationRate<P, G> {
    /// Returns one probability in `[0, 1]` per individual of `population`.
    fn probabilities(&self, population: &[Individual<P, G>]) -> Vec<f64>;
}

/// Decides which individuals pair up and how many children each pair has.
pub trait MatingStrategy<P, G> {
    fn mating(
        &mut self,
        population: &[Individual<P, G>],
        fitness: &[FitnessValue],
    ) -> Result<Vec<MatingEntry>>;
}

/// Picks `target_size` population indices from a fitness vector.
///
/// The population size is `fitness.len()`. Asking for more survivors than
/// that is [`GeneError::TargetExceedsPopulation`].
pub trait SelectionAlgorithm {
    fn select(&mut self, fitness: &[FitnessValue], target_size: usize) -> Result<Survivors>;
}

/// Everything a survival policy may draw the next generation from.
#[derive(Debug, Clone)]
pub struct Generation<P, G> {
    /// The population the generation started from.
    pub parents: Population<P, G>,
    /// Fitness of `parents`, evaluated at the start of the generation.
    pub parent_fitness: PopulationFitness,
    /// Mutated offspring, not yet evaluated.
    pub offspring: Population<P, G>,
}

/// Decides the membership of the next generation.
pub trait SurvivalPolicy<P, G> {
    /// Returns exactly `target_size` individuals.
    fn survivors(
        &mut self,
        fitness: &dyn FitnessFunction<P, G>,
        generation: Generation<P, G>,
        target_size: usize,
    ) -> Result<Population<P, G>>;
}

// Boxed policies are policies too, so builders accept a `Box<dyn ...>`
// chosen at run time.

impl<P, G, T: Codec<P, G> + ?Sized> Codec<P, G> for Box<T> {
    fn decode(&self, genotype: &G) -> Result<P> {
        (**self).decode(genotype)
    }
    fn encode(&self, phenotype: &P) -> G {
        (**self).encode(phenotype)
    }
}

impl<P, G, T: FitnessFunction<P, G> + ?Sized> FitnessFunction<P, G> for Box<T> {
    fn evaluate(&self, population: &[Individual<P, G>]) -> Result<PopulationFitness> {
        (**self).evaluate(population)
    }
}

impl<P, G, T: MutationRate<P, G> + ?Sized> MutationRate<P, G> for Box<T> {
    fn probabilities(&self, population: &[Individual<P, G>]) -> Vec<f64> {
        (**self).probabilities(population)
    }
}

impl<T: SelectionAlgorithm + ?Sized> SelectionAlgorithm for Box<T> {
    fn select(&mut self, fitness: &[FitnessValue], target_size: usize) -> Result<Survivors> {
        (**self).select(fitness, target_size)
    }
}

impl<G, T: CombinationStrategy<G> + ?Sized> CombinationStrategy<G> for Box<T> {
    fn combine(&mut self, first: &G, second: &G) -> Result<G> {
        (**self).combine(first, second)
    }
}

impl<P, G, T: MutationStrategy<P, G> + ?Sized> MutationStrategy<P, G> for Box<T> {
    fn mutate(
        &mut self,
        individual: &Individual<P, G>,
        codec: &dyn Codec<P, G>,
    ) -> Result<Individual<P, G>> {
        (**self).mutate(individual, codec)
    }
}

impl<P, G, T: MatingStrategy<P, G> + ?Sized> MatingStrategy<P, G> for Box<T> {
    fn mating(
        &mut self,
        population: &[Individual<P, G>],
        fitness: &[FitnessValue],
    ) -> Result<Vec<MatingEntry>> {
        (**self).mating(population, fitness)
    }
}

impl<P, G, T: SurvivalPolicy<P, G> + ?Sized> SurvivalPolicy<P, G> for Box<T> {
    fn survivors(
        &mut self,
        fitness: &dyn FitnessFunction<P, G>,
        generation: Generation<P, G>,
        target_size: usize,
    ) -> Result<Population<P, G>> {
        (**self).survivors(fitness, generation, target_size)
    }
}

/// Evaluates `population` and checks the result: one value per individual,
/// no NaN.
pub fn evaluate_population<P, G, F>(
    fitness: &F,
    population: &[Individual<P, G>],
) -> Result<PopulationFitness>
where
    F: FitnessFunction<P, G> + ?Sized,
{
    let values = fitness.evaluate(population)?;
    check_fitness(&values, population.len())?;
    Ok(values)
}

pub(crate) fn check_fitness(fitness: &[FitnessValue], expected: usize) -> Result<()> {
    if fitness.len() != expected {
        return Err(GeneError::FitnessLength {
            expected,
            actual: fitness.len(),
        });
    }
    if let Some(index) = fitness.iter().position(|f| f.is_nan()) {
        return Err(GeneError::Fitness(format!(
            "fitness of individual {index} is NaN"
        )));
    }
    Ok(())
}

/// Index of the highest fitness; the lowest index wins ties.
pub(crate) fn fittest(fitness: &[FitnessValue]) -> Option<PopulationIndex> {
    let mut best: Option<PopulationIndex> = None;
    for (i, &f) in fitness.iter().enumerate() {
        match best {
            Some(b) if fitness[b] >= f => {}
            _ => best = Some(i),
        }
    }
    best
}
