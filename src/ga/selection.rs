//! Survivor selection algorithms.
//!
//! Each algorithm picks `target_size` population indices from a fitness
//! vector (higher fitness is better). Asking for more survivors than the
//! population holds is an error for every algorithm, including the ones
//! that sample with replacement.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection Algorithm"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::{FitnessValue, Individual, Population, SelectionAlgorithm, Survivors};
use super::wheel::Wheel;
use crate::error::{GeneError, Result};
use crate::random::{create_rng, entropy_rng};
use rand::rngs::StdRng;
use rand::Rng;

/// Keeps the `target_size` fittest individuals.
///
/// Deterministic. Ties keep population order.
///
/// ```
/// use u_gene::ga::{SelectionAlgorithm, TruncationSelection};
///
/// let survivors = TruncationSelection.select(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
/// assert_eq!(survivors, vec![3, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TruncationSelection;

impl SelectionAlgorithm for TruncationSelection {
    fn select(&mut self, fitness: &[FitnessValue], target_size: usize) -> Result<Survivors> {
        truncate(fitness, target_size)
    }
}

/// Indices of the `target_size` highest fitness values, best first.
pub fn truncate(fitness: &[FitnessValue], target_size: usize) -> Result<Survivors> {
    check_target(fitness.len(), target_size)?;

    let mut order: Vec<usize> = (0..fitness.len()).collect();
    // stable sort, so equal fitness keeps population order
    order.sort_by(|&a, &b| {
        fitness[b]
            .partial_cmp(&fitness[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(target_size);
    Ok(order)
}

/// Roulette-wheel selection: `target_size` independent spins, with
/// replacement.
///
/// **Warning**: susceptible to super-individual dominance when fitness
/// variance is high. The least fit individual normalizes to zero weight.
#[derive(Debug, Clone)]
pub struct FitnessProportionateSelection {
    rng: StdRng,
}

impl FitnessProportionateSelection {
    pub fn new() -> Self {
        Self { rng: entropy_rng() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }
}

impl Default for FitnessProportionateSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionAlgorithm for FitnessProportionateSelection {
    fn select(&mut self, fitness: &[FitnessValue], target_size: usize) -> Result<Survivors> {
        check_target(fitness.len(), target_size)?;
        if target_size == 0 {
            return Ok(Vec::new());
        }

        let wheel = Wheel::compute(fitness)?;
        Ok((0..target_size).map(|_| wheel.spin(&mut self.rng)).collect())
    }
}

/// Stochastic Universal Sampling (Baker, 1987).
///
/// One random offset in `[0, 1/target_size)`, then `target_size` equally
/// spaced pointers on the wheel. Every individual is selected either
/// `floor` or `ceil` of its expected count, which gives far lower variance
/// than independent spins.
#[derive(Debug, Clone)]
pub struct StochasticUniversalSampling {
    rng: StdRng,
}

impl StochasticUniversalSampling {
    pub fn new() -> Self {
        Self { rng: entropy_rng() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }
}

impl Default for StochasticUniversalSampling {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionAlgorithm for StochasticUniversalSampling {
    fn select(&mut self, fitness: &[FitnessValue], target_size: usize) -> Result<Survivors> {
        check_target(fitness.len(), target_size)?;
        if target_size == 0 {
            return Ok(Vec::new());
        }

        let wheel = Wheel::compute(fitness)?;
        let spacing = 1.0 / target_size as f64;
        let start = self.rng.random_range(0.0..spacing);
        Ok((0..target_size)
            .map(|k| wheel.first_at_or_above(start + k as f64 * spacing))
            .collect())
    }
}

/// Tournament selection.
///
/// Each tournament draws `tournament_size` distinct participants and the
/// fittest one survives (lowest index on ties). Tournaments repeat until
/// `target_size` winners are collected; an individual can win more than
/// one tournament.
///
/// Higher `tournament_size` = stronger selection pressure.
/// - 2: light pressure (good for diversity)
/// - 3–5: moderate pressure (typical default)
/// - >5: strong pressure (risk of premature convergence)
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
    rng: StdRng,
}

impl TournamentSelection {
    /// Fails with [`GeneError::Config`] when `tournament_size` is zero.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size == 0 {
            return Err(GeneError::Config(
                "tournament_size must be at least 1".into(),
            ));
        }
        Ok(Self {
            tournament_size,
            rng: entropy_rng(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = create_rng(seed);
        self
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }
}

impl SelectionAlgorithm for TournamentSelection {
    fn select(&mut self, fitness: &[FitnessValue], target_size: usize) -> Result<Survivors> {
        let n = fitness.len();
        check_target(n, target_size)?;
        if target_size == 0 {
            return Ok(Vec::new());
        }
        if self.tournament_size > n {
            return Err(GeneError::Config(format!(
                "tournament_size {} exceeds population of {n}",
                self.tournament_size
            )));
        }

        let mut winners = Vec::with_capacity(target_size);
        for _ in 0..target_size {
            let participants = rand::seq::index::sample(&mut self.rng, n, self.tournament_size);
            let mut best: Option<usize> = None;
            for idx in participants {
                best = match best {
                    Some(b) if fitness[b] > fitness[idx] => Some(b),
                    Some(b) if fitness[b] == fitness[idx] && b < idx => Some(b),
                    _ => Some(idx),
                };
            }
            if let Some(winner) = best {
                winners.push(winner);
            }
        }
        Ok(winners)
    }
}

/// Materializes survivors from a population, consuming it.
///
/// Individuals chosen more than once are cloned; the last occurrence is
/// moved.
pub fn take_survivors<P: Clone, G: Clone>(
    population: Population<P, G>,
    survivors: &[usize],
) -> Result<Population<P, G>> {
    let size = population.len();
    let mut remaining = vec![0usize; size];
    for &index in survivors {
        if index >= size {
            return Err(GeneError::IndexOutOfRange { index, size });
        }
        remaining[index] += 1;
    }

    let mut slots: Vec<Option<Individual<P, G>>> = population.into_iter().map(Some).collect();
    let mut result = Vec::with_capacity(survivors.len());
    for &index in survivors {
        remaining[index] -= 1;
        let individual = if remaining[index] == 0 {
            slots[index].take()
        } else {
            slots[index].clone()
        };
        result.push(individual.ok_or(GeneError::IndexOutOfRange { index, size })?);
    }
    Ok(result)
}

fn check_target(available: usize, requested: usize) -> Result<()> {
    if requested > available {
        return Err(GeneError::TargetExceedsPopulation {
            requested,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::types::Codec;

    #[test]
    fn test_truncation_picks_best() {
        let survivors = TruncationSelection.select(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(survivors, vec![3, 2]);
    }

    #[test]
    fn test_truncation_is_deterministic() {
        let fitness = [0.5, -1.0, 7.0, 7.0, 2.0, -3.0];
        let first = TruncationSelection.select(&fitness, 4).unwrap();
        for _ in 0..10 {
            assert_eq!(TruncationSelection.select(&fitness, 4).unwrap(), first);
        }
    }

    #[test]
    fn test_truncation_ties_keep_population_order() {
        let survivors = truncate(&[2.0, 5.0, 2.0, 5.0], 3).unwrap();
        assert_eq!(survivors, vec![1, 3, 0]);
    }

    #[test]
    fn test_all_algorithms_reject_oversized_target() {
        let fitness = [1.0, 2.0, 3.0];
        let expected = GeneError::TargetExceedsPopulation {
            requested: 4,
            available: 3,
        };
        let mut algorithms: Vec<Box<dyn SelectionAlgorithm>> = vec![
            Box::new(TruncationSelection),
            Box::new(FitnessProportionateSelection::new().with_seed(1)),
            Box::new(StochasticUniversalSampling::new().with_seed(1)),
            Box::new(TournamentSelection::new(2).unwrap().with_seed(1)),
        ];
        for algorithm in algorithms.iter_mut() {
            assert_eq!(algorithm.select(&fitness, 4), Err(expected.clone()));
        }
    }

    #[test]
    fn test_all_algorithms_handle_zero_target() {
        let mut algorithms: Vec<Box<dyn SelectionAlgorithm>> = vec![
            Box::new(TruncationSelection),
            Box::new(FitnessProportionateSelection::new()),
            Box::new(StochasticUniversalSampling::new()),
            Box::new(TournamentSelection::new(3).unwrap()),
        ];
        for algorithm in algorithms.iter_mut() {
            assert!(algorithm.select(&[1.0, 2.0], 0).unwrap().is_empty());
            assert!(algorithm.select(&[], 0).unwrap().is_empty());
        }
    }

    #[test]
    fn test_all_algorithms_handle_ties() {
        let fitness = [4.0; 5];
        let mut algorithms: Vec<Box<dyn SelectionAlgorithm>> = vec![
            Box::new(TruncationSelection),
            Box::new(FitnessProportionateSelection::new().with_seed(2)),
            Box::new(StochasticUniversalSampling::new().with_seed(2)),
            Box::new(TournamentSelection::new(2).unwrap().with_seed(2)),
        ];
        for algorithm in algorithms.iter_mut() {
            let survivors = algorithm.select(&fitness, 5).unwrap();
            assert_eq!(survivors.len(), 5);
            assert!(survivors.iter().all(|&i| i < 5));
        }
    }

    #[test]
    fn test_proportionate_samples_with_replacement() {
        let mut selection = FitnessProportionateSelection::new().with_seed(42);
        let survivors = selection.select(&[0.0, 0.0, 10.0], 3).unwrap();
        // only the last individual has non-zero weight
        assert_eq!(survivors, vec![2, 2, 2]);
    }

    #[test]
    fn test_sus_counts_match_expectation() {
        // normalized: [0, 0.1, 0.2, 0.3, 0.4] -> expected counts for 10 pointers: 0,1,2,3,4
        let fitness = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut sus = StochasticUniversalSampling::new().with_seed(7);
        for _ in 0..100 {
            let survivors = sus.select(&fitness, 10).unwrap();
            let mut counts = [0usize; 5];
            for i in survivors {
                counts[i] += 1;
            }
            for (k, &c) in counts.iter().enumerate() {
                assert!(c.abs_diff(k) <= 1, "counts: {counts:?}");
            }
        }
    }

    #[test]
    fn test_sus_has_lower_variance_than_proportionate() {
        let fitness = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let best = 7;
        let target = 8;
        let trials = 2000;

        let variance = |algorithm: &mut dyn SelectionAlgorithm| {
            let counts: Vec<f64> = (0..trials)
                .map(|_| {
                    algorithm
                        .select(&fitness, target)
                        .unwrap()
                        .iter()
                        .filter(|&&i| i == best)
                        .count() as f64
                })
                .collect();
            let mean = counts.iter().sum::<f64>() / trials as f64;
            counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / trials as f64
        };

        let sus_var = variance(&mut StochasticUniversalSampling::new().with_seed(11));
        let roulette_var = variance(&mut FitnessProportionateSelection::new().with_seed(11));
        assert!(
            sus_var < roulette_var,
            "sus variance {sus_var} should be below roulette variance {roulette_var}"
        );
    }

    #[test]
    fn test_tournament_full_size_always_picks_best() {
        let fitness = [10.0, 5.0, 1.0, 8.0];
        let mut tournament = TournamentSelection::new(4).unwrap().with_seed(42);
        let survivors = tournament.select(&fitness, 4).unwrap();
        assert_eq!(survivors, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_tournament_favors_fit() {
        let fitness = [10.0, 5.0, 1.0, 8.0];
        let mut tournament = TournamentSelection::new(2).unwrap().with_seed(42);
        let mut counts = [0u32; 4];
        for _ in 0..2500 {
            for i in tournament.select(&fitness, 4).unwrap() {
                counts[i] += 1;
            }
        }
        // the worst individual can never win a tournament of two distinct participants
        assert_eq!(counts[2], 0);
        assert!(counts[0] > counts[3] && counts[3] > counts[1], "counts: {counts:?}");
    }

    #[test]
    fn test_tournament_size_validation() {
        assert!(matches!(
            TournamentSelection::new(0),
            Err(GeneError::Config(_))
        ));
        let mut tournament = TournamentSelection::new(5).unwrap();
        assert!(matches!(
            tournament.select(&[1.0, 2.0, 3.0], 2),
            Err(GeneError::Config(_))
        ));
    }

    struct Identity;

    impl Codec<u32, u32> for Identity {
        fn decode(&self, genotype: &u32) -> Result<u32> {
            Ok(*genotype)
        }
        fn encode(&self, phenotype: &u32) -> u32 {
            *phenotype
        }
    }

    #[test]
    fn test_take_survivors_clones_repeats() {
        let pop: Vec<Individual<u32, u32>> = (10..14)
            .map(|g| Individual::decode(g, &Identity).unwrap())
            .collect();
        let taken = take_survivors(pop, &[3, 1, 3]).unwrap();
        let genotypes: Vec<u32> = taken.iter().map(|i| *i.genotype()).collect();
        assert_eq!(genotypes, vec![13, 11, 13]);
    }

    #[test]
    fn test_take_survivors_out_of_range() {
        let pop: Vec<Individual<u32, u32>> = vec![Individual::decode(1, &Identity).unwrap()];
        assert_eq!(
            take_survivors(pop, &[1]),
            Err(GeneError::IndexOutOfRange { index: 1, size: 1 })
        );
    }
}
