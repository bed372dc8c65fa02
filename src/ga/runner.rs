//! Control loop around [`GeneticAlgorithm::iterate`].
//!
//! [`EvolutionRunner`] repeats generations until one of the termination
//! criteria of the engine's [`EvolutionConfig`](super::EvolutionConfig)
//! fires: generation budget, stagnation, wall-clock limit or an external
//! cancellation flag.

use super::engine::GeneticAlgorithm;
use super::types::{fittest, FitnessValue, Individual, Population};
use crate::error::{GeneError, Result};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Result of a run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<P, G> {
    /// The fittest individual seen during the entire run.
    pub best: Individual<P, G>,

    /// Fitness of `best`.
    pub best_fitness: FitnessValue,

    /// The last population.
    pub population: Population<P, G>,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run stopped on the stagnation limit.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped on the wall-clock limit.
    pub timed_out: bool,

    /// Best-so-far fitness, starting with the initial population.
    pub fitness_history: Vec<f64>,
}

/// Executes the evolutionary loop.
///
/// The runner evaluates each new population once more to track the best
/// individual, since the engine keeps no fitness between calls.
///
/// # Usage
///
/// ```ignore
/// let mut engine = GeneticAlgorithm::builder()/* ... */.build()?;
/// let result = EvolutionRunner::run(&mut engine, seed_population)?;
/// println!("best fitness: {}", result.best_fitness);
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Runs until a termination criterion of `engine.config()` fires.
    ///
    /// Errors from `iterate` abort the run and are returned unchanged.
    pub fn run<P, G>(
        engine: &mut GeneticAlgorithm<P, G>,
        population: Population<P, G>,
    ) -> Result<EvolutionResult<P, G>>
    where
        P: Clone + Send + Sync,
        G: Clone + Send + Sync,
    {
        Self::run_with_cancel(engine, population, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next generation and returns the best individual so far.
    pub fn run_with_cancel<P, G>(
        engine: &mut GeneticAlgorithm<P, G>,
        mut population: Population<P, G>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult<P, G>>
    where
        P: Clone + Send + Sync,
        G: Clone + Send + Sync,
    {
        let config = engine.config().clone();
        let start = Instant::now();

        let fitness = engine.evaluate(&population)?;
        let index = fittest(&fitness).ok_or(GeneError::EmptyPopulation)?;
        let mut best = population[index].clone();
        let mut best_fitness = fitness[index];

        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best_fitness);

        let mut stagnation_counter = 0usize;
        let mut generations = 0;
        let mut stagnated = false;
        let mut cancelled = false;
        let mut timed_out = false;

        for gen in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if start.elapsed().as_millis() >= u128::from(limit) {
                    timed_out = true;
                    break;
                }
            }

            population = engine.iterate(population)?;
            generations = gen + 1;

            let fitness = engine.evaluate(&population)?;
            let index = fittest(&fitness).ok_or(GeneError::EmptyPopulation)?;
            let candidate = fitness[index];

            if is_significant(best_fitness, candidate, config.convergence_threshold) {
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }
            if candidate > best_fitness {
                best = population[index].clone();
                best_fitness = candidate;
            }
            fitness_history.push(best_fitness);

            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        debug!(
            "run finished after {generations} generations: best {best_fitness:.6}, \
             stagnated={stagnated}, cancelled={cancelled}, timed_out={timed_out}"
        );

        Ok(EvolutionResult {
            best,
            best_fitness,
            population,
            generations,
            stagnated,
            cancelled,
            timed_out,
            fitness_history,
        })
    }
}

/// Whether `new` improves on `old` by at least `threshold` (relative).
fn is_significant(old: f64, new: f64, threshold: f64) -> bool {
    if new <= old {
        return false;
    }
    if threshold <= 0.0 || old == 0.0 || !old.is_finite() {
        return true;
    }
    (new - old) / old.abs() >= threshold
}

// ============================================================================
// Tests
// ============================================================================
