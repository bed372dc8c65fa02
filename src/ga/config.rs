//! Engine configuration.
//!
//! [`EvolutionConfig`] holds the parameters that are not policies: sizes,
//! elitism, parallelism, seeding and the termination criteria used by
//! [`EvolutionRunner`](super::EvolutionRunner).

use crate::error::{GeneError, Result};

/// Configuration for the generational engine and its runner.
///
/// # Defaults
///
/// ```
/// use u_gene::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.generation_size, None);
/// assert_eq!(config.max_generations, 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_gene::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_generation_size(200)
///     .with_elite_ratio(0.1)
///     .with_seed(42);
/// assert_eq!(config.elite_count(200), 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Size of every population returned by `iterate`.
    ///
    /// `None` keeps the size of the incoming population.
    pub generation_size: Option<usize>,

    /// Fraction of the incoming population carried over unchanged (0.0–1.0).
    ///
    /// The elites are the top `floor(len * elite_ratio)` parents, held out
    /// before mating and appended after the survival policy ran.
    pub elite_ratio: f64,

    /// Whether offspring genotypes are decoded in parallel using rayon.
    pub parallel: bool,

    /// Seed for the engine's own random source (mutation trials).
    ///
    /// `None` uses a random seed. Operators carry their own seeds.
    pub seed: Option<u64>,

    /// Maximum number of generations the runner executes.
    pub max_generations: usize,

    /// Number of generations with no significant improvement before the
    /// runner stops. Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Minimum relative improvement `(new - old) / |old|` that resets the
    /// stagnation counter. 0.0 counts any improvement.
    pub convergence_threshold: f64,

    /// Optional wall-clock limit for the runner in milliseconds.
    ///
    /// Checked before each generation, so a run may overshoot by one
    /// generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            generation_size: None,
            elite_ratio: 0.1,
            parallel: true,
            seed: None,
            max_generations: 500,
            stagnation_limit: 50,
            convergence_threshold: 0.0,
            time_limit_ms: None,
        }
    }
}

impl EvolutionConfig {
    pub fn with_generation_size(mut self, n: usize) -> Self {
        self.generation_size = Some(n);
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the elite ratio, clamped to `[0, 1]`.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the convergence threshold; negative values become 0.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold.max(0.0);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Preset for quick runs: 50 individuals, 100 generations, 10 s.
    pub fn fast() -> Self {
        Self {
            generation_size: Some(50),
            max_generations: 100,
            stagnation_limit: 20,
            convergence_threshold: 0.001,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// Preset trading quality against time: 100 individuals, 300
    /// generations, 30 s.
    pub fn balanced() -> Self {
        Self {
            generation_size: Some(100),
            max_generations: 300,
            stagnation_limit: 50,
            convergence_threshold: 0.001,
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// Preset for long runs: 150 individuals, 500 generations, 60 s.
    pub fn quality() -> Self {
        Self {
            generation_size: Some(150),
            max_generations: 500,
            stagnation_limit: 80,
            convergence_threshold: 0.0005,
            time_limit_ms: Some(60_000),
            ..Self::default()
        }
    }

    /// Picks a preset from a domain-specific problem size (number of genes,
    /// decision variables, ...).
    ///
    /// - `item_count < 50` → [`fast()`](Self::fast)
    /// - `50 ≤ item_count < 200` → [`balanced()`](Self::balanced)
    /// - `item_count ≥ 200` → [`quality()`](Self::quality)
    pub fn auto_select(item_count: usize) -> Self {
        if item_count < 50 {
            Self::fast()
        } else if item_count < 200 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Number of elites in a generation of `generation_size`.
    pub fn elite_count(&self, generation_size: usize) -> usize {
        (generation_size as f64 * self.elite_ratio) as usize
    }

    /// Validates the configuration.
    ///
    /// The elite check can only run here when `generation_size` is fixed;
    /// otherwise `iterate` runs it against the incoming population size.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.elite_ratio) {
            return Err(GeneError::Config(format!(
                "elite_ratio {} is outside [0, 1]",
                self.elite_ratio
            )));
        }
        if let Some(n) = self.generation_size {
            if n == 0 {
                return Err(GeneError::Config(
                    "generation_size must be at least 1".into(),
                ));
            }
            if self.elite_count(n) >= n {
                return Err(GeneError::Config(
                    "elite_ratio too high: elites fill the entire generation".into(),
                ));
            }
        }
        if self.max_generations == 0 {
            return Err(GeneError::Config(
                "max_generations must be at least 1".into(),
            ));
        }
        if self.convergence_threshold.is_nan() || self.convergence_threshold < 0.0 {
            return Err(GeneError::Config(
                "convergence_threshold must be non-negative".into(),
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(GeneError::Config(
                "time_limit_ms must be positive or None".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvolutionConfig::default();
        assert_eq!(config.generation_size, None);
        assert_eq!(config.max_generations, 500);
        assert!((config.elite_ratio - 0.1).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 50);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.time_limit_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EvolutionConfig::default()
            .with_generation_size(200)
            .with_max_generations(1000)
            .with_elite_ratio(0.2)
            .with_stagnation_limit(100)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.generation_size, Some(200));
        assert_eq!(config.max_generations, 1000);
        assert!((config.elite_ratio - 0.2).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 100);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_elite_count_floors() {
        let config = EvolutionConfig::default().with_elite_ratio(0.15);
        assert_eq!(config.elite_count(10), 1);
        assert_eq!(config.elite_count(6), 0);
        assert_eq!(config.elite_count(100), 15);
    }

    #[test]
    fn test_clamp_elite_ratio() {
        let config = EvolutionConfig::default().with_elite_ratio(1.5);
        assert!((config.elite_ratio - 1.0).abs() < 1e-10);
        let config = EvolutionConfig::default().with_elite_ratio(-0.5);
        assert!(config.elite_ratio.abs() < 1e-10);
    }

    #[test]
    fn test_validate_elite_too_high() {
        let config = EvolutionConfig::default()
            .with_generation_size(10)
            .with_elite_ratio(1.0);
        assert!(matches!(config.validate(), Err(GeneError::Config(_))));
    }

    #[test]
    fn test_validate_elite_ratio_set_directly() {
        let config = EvolutionConfig {
            elite_ratio: 2.0,
            ..EvolutionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generation_size() {
        let config = EvolutionConfig::default().with_generation_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = EvolutionConfig::default().with_max_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_time_limit() {
        assert!(EvolutionConfig::default()
            .with_time_limit_ms(0)
            .validate()
            .is_err());
        assert!(EvolutionConfig::default()
            .with_time_limit_ms(1)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_convergence_threshold_clamps_negative() {
        let config = EvolutionConfig::default().with_convergence_threshold(-0.5);
        assert!(config.convergence_threshold.abs() < 1e-15);
    }

    // ---- Presets ----

    #[test]
    fn test_presets_are_valid() {
        for config in [
            EvolutionConfig::fast(),
            EvolutionConfig::balanced(),
            EvolutionConfig::quality(),
        ] {
            assert!(config.validate().is_ok());
        }
        assert_eq!(EvolutionConfig::fast().generation_size, Some(50));
        assert_eq!(EvolutionConfig::balanced().max_generations, 300);
        assert_eq!(EvolutionConfig::quality().time_limit_ms, Some(60_000));
    }

    #[test]
    fn test_preset_chainable() {
        let config = EvolutionConfig::fast()
            .with_generation_size(75)
            .with_seed(42);
        assert_eq!(config.generation_size, Some(75));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.time_limit_ms, Some(10_000));
    }

    #[test]
    fn test_auto_select_boundaries() {
        assert_eq!(EvolutionConfig::auto_select(49).generation_size, Some(50));
        assert_eq!(EvolutionConfig::auto_select(50).generation_size, Some(100));
        assert_eq!(EvolutionConfig::auto_select(199).generation_size, Some(100));
        assert_eq!(EvolutionConfig::auto_select(200).generation_size, Some(150));
    }
}
