//! Encoding-agnostic operators for vector genotypes.
//!
//! These work on any `Vec<T>` genotype and leave the meaning of each gene
//! to the codec.
//!
//! # Crossover Operators
//!
//! - [`NPointCrossover`]: alternate parent segments between `n` random cut points
//! - [`UniformCrossover`]: pick each gene from either parent independently
//!
//! # Mutation Operators
//!
//! - [`SwapMutation`]: exchange two random positions, O(1)
//! - [`GaussianMutation`]: add normal noise to real-valued genes, O(n)
//!
//! # References
//!
//! - De Jong (1975), "An Analysis of the Behavior of a Class of Genetic
//!   Adaptive Systems" (n-point crossover)
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use super::types::{Codec, CombinationStrategy, Individual, MutationStrategy};
use crate::error::{GeneError, Result};
use crate::random::{create_rng, entropy_rng};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;

// ============================================================================
// Crossover operators
// ============================================================================

/// N-point crossover.
///
/// Picks `points` distinct cut positions and builds the child from
/// alternating segments, starting with the first parent. Genotypes shorter
/// than `points + 1` genes use every possible cut.
///
/// # Complexity
/// O(n) time, O(n) space
#[derive(Debug, Clone)]
pub struct NPointCrossover {
    points: usize,
    rng: StdRng,
}

impl NPointCrossover {
    pub fn new(points: usize) -> Self {
        Self {
            points,
            rng: entropy_rng(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }
}

impl<T: Clone> CombinationStrategy<Vec<T>> for NPointCrossover {
    fn combine(&mut self, first: &Vec<T>, second: &Vec<T>) -> Result<Vec<T>> {
        check_same_length(first, second)?;
        let n = first.len();
        if n < 2 || self.points == 0 {
            return Ok(first.clone());
        }

        let k = self.points.min(n - 1);
        let mut cuts: Vec<usize> = rand::seq::index::sample(&mut self.rng, n - 1, k)
            .into_iter()
            .map(|c| c + 1)
            .collect();
        cuts.sort_unstable();

        let mut child = Vec::with_capacity(n);
        let mut from_first = true;
        let mut start = 0;
        for end in cuts.into_iter().chain(std::iter::once(n)) {
            let source = if from_first { first } else { second };
            child.extend_from_slice(&source[start..end]);
            from_first = !from_first;
            start = end;
        }
        Ok(child)
    }
}

/// Uniform crossover: each gene comes from the second parent with
/// probability `swap_probability`, otherwise from the first.
#[derive(Debug, Clone)]
pub struct UniformCrossover {
    swap_probability: f64,
    rng: StdRng,
}

impl UniformCrossover {
    pub fn new(swap_probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&swap_probability) {
            return Err(GeneError::Config(format!(
                "swap probability {swap_probability} is outside [0, 1]"
            )));
        }
        Ok(Self {
            swap_probability,
            rng: entropy_rng(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }
}

impl<T: Clone> CombinationStrategy<Vec<T>> for UniformCrossover {
    fn combine(&mut self, first: &Vec<T>, second: &Vec<T>) -> Result<Vec<T>> {
        check_same_length(first, second)?;
        Ok(first
            .iter()
            .zip(second)
            .map(|(a, b)| {
                if self.rng.random_bool(self.swap_probability) {
                    b.clone()
                } else {
                    a.clone()
                }
            })
            .collect())
    }
}

fn check_same_length<T>(first: &[T], second: &[T]) -> Result<()> {
    if first.len() != second.len() {
        return Err(GeneError::Config(format!(
            "parents have different lengths ({} and {})",
            first.len(),
            second.len()
        )));
    }
    Ok(())
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Exchanges two random positions of the genotype.
///
/// The two positions may coincide, leaving the genotype unchanged.
#[derive(Debug, Clone)]
pub struct SwapMutation {
    rng: StdRng,
}

impl SwapMutation {
    pub fn new() -> Self {
        Self { rng: entropy_rng() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }
}

impl Default for SwapMutation {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T: Clone> MutationStrategy<P, Vec<T>> for SwapMutation {
    fn mutate(
        &mut self,
        individual: &Individual<P, Vec<T>>,
        codec: &dyn Codec<P, Vec<T>>,
    ) -> Result<Individual<P, Vec<T>>> {
        let mut genes = individual.genotype().clone();
        let n = genes.len();
        if n >= 2 {
            let i = self.rng.random_range(0..n);
            let j = self.rng.random_range(0..n);
            genes.swap(i, j);
        }
        Individual::decode(genes, codec)
    }
}

/// Adds `sigma · N(0, 1)` to each real-valued gene with probability
/// `gene_rate`.
#[derive(Debug, Clone)]
pub struct GaussianMutation {
    sigma: f64,
    gene_rate: f64,
    rng: StdRng,
}

impl GaussianMutation {
    pub fn new(sigma: f64, gene_rate: f64) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(GeneError::Config(format!(
                "sigma {sigma} must be finite and positive"
            )));
        }
        if !(0.0..=1.0).contains(&gene_rate) {
            return Err(GeneError::Config(format!(
                "gene rate {gene_rate} is outside [0, 1]"
            )));
        }
        Ok(Self {
            sigma,
            gene_rate,
            rng: entropy_rng(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }
}

impl<P> MutationStrategy<P, Vec<f64>> for GaussianMutation {
    fn mutate(
        &mut self,
        individual: &Individual<P, Vec<f64>>,
        codec: &dyn Codec<P, Vec<f64>>,
    ) -> Result<Individual<P, Vec<f64>>> {
        let mut genes = individual.genotype().clone();
        for gene in genes.iter_mut() {
            if self.rng.random_bool(self.gene_rate) {
                let z: f64 = self.rng.sample(StandardNormal);
                *gene += self.sigma * z;
            }
        }
        Individual::decode(genes, codec)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;

    impl<T: Clone + Send + Sync> Codec<Vec<T>, Vec<T>> for Identity {
        fn decode(&self, genotype: &Vec<T>) -> Result<Vec<T>> {
            Ok(genotype.clone())
        }
        fn encode(&self, phenotype: &Vec<T>) -> Vec<T> {
            phenotype.clone()
        }
    }

    // ---- N-point crossover ----

    #[test]
    fn test_one_point_crossover_is_prefix_suffix() {
        let p1 = vec![0u8; 10];
        let p2 = vec![1u8; 10];
        let mut op = NPointCrossover::new(1).with_seed(42);
        for _ in 0..50 {
            let child = op.combine(&p1, &p2).unwrap();
            assert_eq!(child.len(), 10);
            assert_eq!(child[0], 0);
            assert_eq!(child[9], 1);
            // exactly one switch from 0 to 1
            let switches = child.windows(2).filter(|w| w[0] != w[1]).count();
            assert_eq!(switches, 1, "child: {child:?}");
        }
    }

    #[test]
    fn test_n_point_crossover_switch_count() {
        let p1 = vec![0u8; 20];
        let p2 = vec![1u8; 20];
        let mut op = NPointCrossover::new(3).with_seed(7);
        for _ in 0..50 {
            let child = op.combine(&p1, &p2).unwrap();
            let switches = child.windows(2).filter(|w| w[0] != w[1]).count();
            assert_eq!(switches, 3);
        }
    }

    #[test]
    fn test_n_point_crossover_caps_points() {
        let mut op = NPointCrossover::new(10).with_seed(1);
        let child = op.combine(&vec![0, 0, 0], &vec![1, 1, 1]).unwrap();
        assert_eq!(child, vec![0, 1, 0]);
    }

    #[test]
    fn test_crossover_leaves_parents_untouched() {
        let p1 = vec![1, 2, 3, 4];
        let p2 = vec![5, 6, 7, 8];
        let mut op = NPointCrossover::new(2).with_seed(3);
        let _ = op.combine(&p1, &p2).unwrap();
        assert_eq!(p1, vec![1, 2, 3, 4]);
        assert_eq!(p2, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_crossover_length_mismatch() {
        let mut op = NPointCrossover::new(1);
        assert!(matches!(
            op.combine(&vec![1, 2], &vec![1, 2, 3]),
            Err(GeneError::Config(_))
        ));
    }

    // ---- Uniform crossover ----

    #[test]
    fn test_uniform_crossover_takes_genes_in_place() {
        let p1: Vec<u32> = (0..50).collect();
        let p2: Vec<u32> = (100..150).collect();
        let mut op = UniformCrossover::new(0.5).unwrap().with_seed(42);
        let child = op.combine(&p1, &p2).unwrap();
        for (i, &g) in child.iter().enumerate() {
            assert!(g == p1[i] || g == p2[i]);
        }
        let from_second = child.iter().filter(|&&g| g >= 100).count();
        assert!(from_second > 10 && from_second < 40, "got {from_second}");
    }

    #[test]
    fn test_uniform_crossover_extremes() {
        let p1 = vec![0u8; 8];
        let p2 = vec![1u8; 8];
        let mut never = UniformCrossover::new(0.0).unwrap();
        let mut always = UniformCrossover::new(1.0).unwrap();
        assert_eq!(never.combine(&p1, &p2).unwrap(), p1);
        assert_eq!(always.combine(&p1, &p2).unwrap(), p2);
        assert!(UniformCrossover::new(1.5).is_err());
    }

    // ---- Mutations ----

    #[test]
    fn test_swap_mutation_preserves_multiset() {
        let start = Individual::decode(vec![1, 2, 3, 4, 5], &Identity).unwrap();
        let mut op = SwapMutation::new().with_seed(42);
        for _ in 0..50 {
            let mutated = op.mutate(&start, &Identity).unwrap();
            let mut sorted = mutated.genotype().clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
            assert_eq!(mutated.phenotype(), mutated.genotype());
        }
        assert_eq!(*start.genotype(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_swap_mutation_single_gene() {
        let start = Individual::decode(vec![9], &Identity).unwrap();
        let mutated = SwapMutation::new().mutate(&start, &Identity).unwrap();
        assert_eq!(*mutated.genotype(), vec![9]);
    }

    #[test]
    fn test_gaussian_mutation_perturbs_genes() {
        let start = Individual::decode(vec![0.0; 10], &Identity).unwrap();
        let mut op = GaussianMutation::new(0.5, 1.0).unwrap().with_seed(42);
        let mutated = op.mutate(&start, &Identity).unwrap();
        assert!(mutated.genotype().iter().all(|&g| g != 0.0));
        assert_eq!(mutated.phenotype(), mutated.genotype());
    }

    #[test]
    fn test_gaussian_mutation_zero_rate_is_identity() {
        let start = Individual::decode(vec![1.5, -2.0], &Identity).unwrap();
        let mut op = GaussianMutation::new(1.0, 0.0).unwrap();
        assert_eq!(op.mutate(&start, &Identity).unwrap(), start);
    }

    #[test]
    fn test_gaussian_mutation_validation() {
        assert!(GaussianMutation::new(0.0, 0.5).is_err());
        assert!(GaussianMutation::new(1.0, -0.5).is_err());
    }
}
