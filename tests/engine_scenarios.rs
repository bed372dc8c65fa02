//! End-to-end behavior of the public engine API.

use u_gene::ga::{
    normalize, Codec, CombinationMix, CombinationStrategy, ConstantMutationRate, EvolutionConfig,
    EvolutionRunner, FitnessAdapter, FitnessProportionateSelection, GeneticAlgorithm, Individual,
    MatingStrategy, MutationStrategy, NPointCrossover, Pooled, Population, RandomMating,
    SelectionAlgorithm, StochasticUniversalSampling, TournamentSelection, TruncationSelection,
    Wheel,
};
use u_gene::random::create_rng;
use u_gene::{GeneError, Result};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Reads a bit string as the number of set bits.
struct CountOnes;

impl Codec<usize, Vec<bool>> for CountOnes {
    fn decode(&self, genes: &Vec<bool>) -> Result<usize> {
        Ok(genes.iter().filter(|&&b| b).count())
    }
    fn encode(&self, ones: &usize) -> Vec<bool> {
        (0..32).map(|i| i < *ones).collect()
    }
}

/// Flips every bit; used to detect mutation.
struct Invert;

impl MutationStrategy<usize, Vec<bool>> for Invert {
    fn mutate(
        &mut self,
        individual: &Individual<usize, Vec<bool>>,
        codec: &dyn Codec<usize, Vec<bool>>,
    ) -> Result<Individual<usize, Vec<bool>>> {
        let genes = individual.genotype().iter().map(|b| !b).collect();
        Individual::decode(genes, codec)
    }
}

/// Records every genotype it produces.
struct Recording {
    inner: NPointCrossover,
    produced: std::sync::Arc<std::sync::Mutex<Vec<Vec<bool>>>>,
}

impl CombinationStrategy<Vec<bool>> for Recording {
    fn combine(&mut self, first: &Vec<bool>, second: &Vec<bool>) -> Result<Vec<bool>> {
        let child = self.inner.combine(first, second)?;
        if let Ok(mut produced) = self.produced.lock() {
            produced.push(child.clone());
        }
        Ok(child)
    }
}

fn bit_population(size: usize, seed: u64) -> Population<usize, Vec<bool>> {
    use rand::Rng;
    let mut rng = create_rng(seed);
    (0..size)
        .map(|_| {
            let genes: Vec<bool> = (0..32).map(|_| rng.random_bool(0.5)).collect();
            Individual::decode(genes, &CountOnes).unwrap()
        })
        .collect()
}

#[test]
fn test_truncation_picks_two_best() {
    let fitness = [1.0, 2.0, 3.0, 4.0];
    let mut truncation = TruncationSelection;
    let first = truncation.select(&fitness, 2).unwrap();
    assert_eq!(first, vec![3, 2]);
    // deterministic
    assert_eq!(truncation.select(&fitness, 2).unwrap(), first);
}

#[test]
fn test_random_mating_entry_count_and_range() {
    let population = bit_population(5, 1);
    let fitness = vec![0.0; 5];
    for seed in 0..20 {
        let mut mating = RandomMating::new(3).with_seed(seed);
        let entries = mating.mating(&population, &fitness).unwrap();
        assert_eq!(entries.len(), 3);
        for entry in entries {
            assert_eq!(entry.offspring, 1);
            assert!(entry.first < 5 && entry.second < 5);
        }
    }
}

/// Returns its tag, ignoring the parents.
struct Tag(char);

impl CombinationStrategy<char> for Tag {
    fn combine(&mut self, _first: &char, _second: &char) -> Result<char> {
        Ok(self.0)
    }
}

#[test]
fn test_mixture_dispatch_reproducible_with_seed() {
    let dispatches = |seed: u64| -> Vec<char> {
        let mut mix = CombinationMix::new(vec![
            (0.3, Box::new(Tag('A')) as Box<dyn CombinationStrategy<char>>),
            (0.7, Box::new(Tag('B')) as Box<dyn CombinationStrategy<char>>),
        ])
        .unwrap()
        .with_seed(seed);
        (0..100).map(|_| mix.combine(&'x', &'y').unwrap()).collect()
    };
    let run = dispatches(2024);
    assert_eq!(run, dispatches(2024));
    assert!(run.contains(&'A') && run.contains(&'B'));
}

#[test]
fn test_zero_mutation_rate_leaves_offspring_untouched() {
    init_logger();
    let produced = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut engine = GeneticAlgorithm::builder()
        .codec(CountOnes)
        .fitness(FitnessAdapter::new(|ones: &usize| *ones as f64))
        .mutation(Invert)
        .mutation_rate(ConstantMutationRate::new(0.0).unwrap())
        .mating(RandomMating::new(12).with_seed(5))
        .combination(Recording {
            inner: NPointCrossover::new(2).with_seed(6),
            produced: produced.clone(),
        })
        .survival(u_gene::ga::Generational::new(TruncationSelection))
        .config(
            EvolutionConfig::default()
                .with_generation_size(12)
                .with_elite_ratio(0.0)
                .with_seed(7),
        )
        .build()
        .unwrap();

    let next = engine.iterate(bit_population(8, 3)).unwrap();
    let produced = produced.lock().unwrap().clone();

    assert_eq!(next.len(), 12);
    assert_eq!(produced.len(), 12);
    let mut survivors: Vec<Vec<bool>> = next.iter().map(|i| i.genotype().clone()).collect();
    let mut expected = produced;
    survivors.sort();
    expected.sort();
    assert_eq!(survivors, expected);
}

#[test]
fn test_wheel_lookups_never_overflow() {
    let fitness = [-3.0, 0.5, 7.25, 7.25, 100.0];
    let wheel = Wheel::compute(&fitness).unwrap();
    for p in [0.0, 0.25, 0.999_999_999, 1.0, 1.5] {
        assert!(wheel.first_at_or_above(p) < fitness.len());
    }
    let total: f64 = normalize(&fitness).iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_sus_has_lower_variance_than_roulette() {
    let fitness = [1.0, 2.0, 3.0, 4.0, 10.0];
    let best_counts = |selection: &mut dyn SelectionAlgorithm| -> Vec<f64> {
        (0..500)
            .map(|_| {
                let chosen = selection.select(&fitness, 5).unwrap();
                chosen.iter().filter(|&&i| i == 4).count() as f64
            })
            .collect()
    };
    let variance = |xs: &[f64]| {
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / xs.len() as f64
    };

    let sus = best_counts(&mut StochasticUniversalSampling::new().with_seed(1));
    let roulette = best_counts(&mut FitnessProportionateSelection::new().with_seed(1));
    assert!(variance(&sus) < variance(&roulette));
}

#[test]
fn test_target_above_population_is_error_for_every_algorithm() {
    let fitness = [1.0, 2.0];
    let mut algorithms: Vec<Box<dyn SelectionAlgorithm>> = vec![
        Box::new(TruncationSelection),
        Box::new(FitnessProportionateSelection::new()),
        Box::new(StochasticUniversalSampling::new()),
        Box::new(TournamentSelection::new(2).unwrap()),
    ];
    for algorithm in algorithms.iter_mut() {
        assert_eq!(
            algorithm.select(&fitness, 3),
            Err(GeneError::TargetExceedsPopulation {
                requested: 3,
                available: 2
            })
        );
    }
}

#[test]
fn test_onemax_run_with_elitism() {
    init_logger();
    let mut engine = GeneticAlgorithm::builder()
        .codec(CountOnes)
        .fitness(FitnessAdapter::new(|ones: &usize| *ones as f64).parallel(true))
        .mutation(u_gene::ga::SwapMutation::new().with_seed(1))
        .mutation_rate(ConstantMutationRate::new(0.2).unwrap())
        .mating(u_gene::ga::FitnessProportionateMating::new(40).with_seed(2))
        .combination(u_gene::ga::UniformCrossover::new(0.5).unwrap().with_seed(3))
        .survival(Pooled::new(TournamentSelection::new(2).unwrap().with_seed(4)))
        .config(
            EvolutionConfig::default()
                .with_generation_size(40)
                .with_elite_ratio(0.1)
                .with_max_generations(60)
                .with_stagnation_limit(0)
                .with_seed(5),
        )
        .build()
        .unwrap();

    let population = bit_population(40, 9);
    let initial_best = population
        .iter()
        .map(|i| *i.phenotype())
        .max()
        .unwrap_or(0) as f64;

    let result = EvolutionRunner::run(&mut engine, population).unwrap();
    assert_eq!(result.population.len(), 40);
    assert_eq!(result.generations, 60);
    assert!(result.best_fitness >= initial_best);
    assert!(result.fitness_history.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(*result.best.phenotype(), CountOnes.decode(result.best.genotype()).unwrap());
}
