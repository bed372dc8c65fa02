//! Adapter from a per-individual closure to a [`FitnessFunction`].

use super::types::{FitnessFunction, Individual, PopulationFitness};
use crate::error::Result;
use rayon::prelude::*;

/// Wraps `Fn(&P) -> f64` as a population-level fitness function.
///
/// With [`parallel`](Self::parallel) enabled the closure runs on the rayon
/// thread pool; results keep the population order either way.
///
/// ```
/// use u_gene::ga::{FitnessAdapter, FitnessFunction};
///
/// let fitness = FitnessAdapter::new(|x: &f64| -x * x).parallel(true);
/// let _: &dyn FitnessFunction<f64, Vec<f64>> = &fitness;
/// ```
#[derive(Debug, Clone)]
pub struct FitnessAdapter<F> {
    function: F,
    parallel: bool,
}

impl<F> FitnessAdapter<F> {
    pub fn new(function: F) -> Self {
        Self {
            function,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl<P, G, F> FitnessFunction<P, G> for FitnessAdapter<F>
where
    P: Sync,
    G: Sync,
    F: Fn(&P) -> f64 + Send + Sync,
{
    fn evaluate(&self, population: &[Individual<P, G>]) -> Result<PopulationFitness> {
        let fitness = if self.parallel {
            population
                .par_iter()
                .map(|i| (self.function)(i.phenotype()))
                .collect()
        } else {
            population
                .iter()
                .map(|i| (self.function)(i.phenotype()))
                .collect()
        };
        Ok(fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::types::Codec;

    struct Halve;

    impl Codec<f64, i64> for Halve {
        fn decode(&self, genotype: &i64) -> Result<f64> {
            Ok(*genotype as f64 / 2.0)
        }
        fn encode(&self, phenotype: &f64) -> i64 {
            (*phenotype * 2.0) as i64
        }
    }

    fn population() -> Vec<Individual<f64, i64>> {
        (0..100)
            .map(|g| Individual::decode(g, &Halve).unwrap())
            .collect()
    }

    #[test]
    fn test_adapter_scores_phenotypes() {
        let fitness = FitnessAdapter::new(|x: &f64| *x);
        let scores = FitnessFunction::<f64, i64>::evaluate(&fitness, &population()).unwrap();
        assert_eq!(scores.len(), 100);
        assert_eq!(scores[10], 5.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pop = population();
        let seq = FitnessAdapter::new(|x: &f64| x.sin());
        let par = FitnessAdapter::new(|x: &f64| x.sin()).parallel(true);
        assert_eq!(
            FitnessFunction::<f64, i64>::evaluate(&seq, &pop).unwrap(),
            FitnessFunction::<f64, i64>::evaluate(&par, &pop).unwrap()
        );
    }
}
