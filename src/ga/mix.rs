//! Weighted dispatch shared by the mixture operators.

use crate::error::{GeneError, Result};

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Cumulative weight buckets over a list of operators.
///
/// Operator `k` owns `[w_0 + .. + w_{k-1}, w_0 + .. + w_k)`. Points past the
/// total (the residual `1 - Σw`) go to operator 0.
#[derive(Debug, Clone)]
pub(crate) struct WeightedDispatch {
    thresholds: Vec<f64>,
}

impl WeightedDispatch {
    pub(crate) fn new<I>(weights: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut accumulated = 0.0;
        let mut thresholds = Vec::new();
        for weight in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(GeneError::Config(format!(
                    "mixture weight {weight} must be a finite, non-negative number"
                )));
            }
            accumulated += weight;
            if accumulated > 1.0 + WEIGHT_TOLERANCE {
                return Err(GeneError::Config(format!(
                    "mixture weights sum to {accumulated}, which is above 1"
                )));
            }
            thresholds.push(accumulated);
        }
        if thresholds.is_empty() {
            return Err(GeneError::Config(
                "mixture needs at least one operator".into(),
            ));
        }
        Ok(Self { thresholds })
    }

    /// Operator index for a uniform point `p` in `[0, 1)`.
    pub(crate) fn pick(&self, p: f64) -> usize {
        let pos = self.thresholds.partition_point(|&t| t <= p);
        if pos == self.thresholds.len() {
            0
        } else {
            pos
        }
    }
}
