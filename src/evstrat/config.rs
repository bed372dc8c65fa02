//! Evolution Strategies configuration.

use crate::error::{GeneError, Result};

/// Replacement scheme of an evolution strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EsSurvival {
    /// (μ + λ): parents compete with offspring.
    #[default]
    Plus,
    /// (μ, λ): parents die; requires λ ≥ μ.
    Comma,
}

/// Parameters of an evolution strategy.
///
/// ```
/// use u_gene::evstrat::{EsConfig, EsSurvival};
///
/// let config = EsConfig::new(10)
///     .with_bounds(-5.0, 5.0)
///     .with_mu_lambda(15, 100)
///     .with_survival(EsSurvival::Comma)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EsConfig {
    /// Number of object variables.
    pub dimension: usize,

    /// Lower bound of every object variable.
    pub min_value: f64,

    /// Upper bound of every object variable.
    pub max_value: f64,

    /// Smallest step size a mutation may produce.
    pub epsilon0: f64,

    /// Proportionality constant `c` of the learning rates τ and τ'.
    pub tau_proportionality: f64,

    /// Step size of freshly generated individuals.
    pub initial_sigma: f64,

    /// 1 for a shared step size, `dimension` for one per coordinate.
    pub num_sigmas: usize,

    /// Parent population size μ.
    pub mu: usize,

    /// Offspring per generation λ.
    pub lambda: usize,

    pub survival: EsSurvival,

    pub max_generations: usize,

    /// Generations without improvement before stopping (0 disables).
    pub stagnation_limit: usize,

    pub seed: Option<u64>,
}

impl EsConfig {
    /// Defaults for `dimension` variables in `[-10, 10]`: (15 + 100)-ES with
    /// a single step size.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            min_value: -10.0,
            max_value: 10.0,
            epsilon0: 0.1,
            tau_proportionality: 1.0,
            initial_sigma: 1.0,
            num_sigmas: 1,
            mu: 15,
            lambda: 100,
            survival: EsSurvival::Plus,
            max_generations: 100,
            stagnation_limit: 0,
            seed: None,
        }
    }

    pub fn with_bounds(mut self, min_value: f64, max_value: f64) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    pub fn with_epsilon0(mut self, epsilon0: f64) -> Self {
        self.epsilon0 = epsilon0;
        self
    }

    pub fn with_tau_proportionality(mut self, c: f64) -> Self {
        self.tau_proportionality = c;
        self
    }

    pub fn with_initial_sigma(mut self, sigma: f64) -> Self {
        self.initial_sigma = sigma;
        self
    }

    /// Uses one step size per coordinate.
    pub fn with_step_per_coordinate(mut self) -> Self {
        self.num_sigmas = self.dimension;
        self
    }

    pub fn with_mu_lambda(mut self, mu: usize, lambda: usize) -> Self {
        self.mu = mu;
        self.lambda = lambda;
        self
    }

    pub fn with_survival(mut self, survival: EsSurvival) -> Self {
        self.survival = survival;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Half the width of the search box: the largest allowed step size.
    pub fn max_sigma(&self) -> f64 {
        (self.max_value - self.min_value) / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(GeneError::Config("dimension must be at least 1".into()));
        }
        if !self.min_value.is_finite() || !self.max_value.is_finite() {
            return Err(GeneError::Config("bounds must be finite".into()));
        }
        if self.min_value >= self.max_value {
            return Err(GeneError::Config(format!(
                "min_value {} must be below max_value {}",
                self.min_value, self.max_value
            )));
        }
        if !self.epsilon0.is_finite() || self.epsilon0 <= 0.0 {
            return Err(GeneError::Config("epsilon0 must be positive".into()));
        }
        if !self.tau_proportionality.is_finite() || self.tau_proportionality <= 0.0 {
            return Err(GeneError::Config(
                "tau_proportionality must be positive".into(),
            ));
        }
        if !self.initial_sigma.is_finite() || self.initial_sigma <= 0.0 {
            return Err(GeneError::Config("initial_sigma must be positive".into()));
        }
        if self.num_sigmas != 1 && self.num_sigmas != self.dimension {
            return Err(GeneError::Config(format!(
                "num_sigmas must be 1 or {}, got {}",
                self.dimension, self.num_sigmas
            )));
        }
        if self.mu == 0 || self.lambda == 0 {
            return Err(GeneError::Config("mu and lambda must be at least 1".into()));
        }
        if self.survival == EsSurvival::Comma && self.lambda < self.mu {
            return Err(GeneError::Config(format!(
                "(mu, lambda) needs lambda >= mu, got mu={} lambda={}",
                self.mu, self.lambda
            )));
        }
        if self.max_generations == 0 {
            return Err(GeneError::Config(
                "max_generations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
