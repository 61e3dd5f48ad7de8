//! Annealing configuration.

use crate::error::{Result, TimetableError};

/// Configuration for the annealing controller.
///
/// Temperature follows a geometric schedule: every
/// `iterations_per_temperature` iterations, `T <- T * cooling_rate`.
///
/// # Examples
///
/// ```
/// use u_timetable::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(500.0)
///     .with_cooling_rate(0.9997)
///     .with_max_iterations(120_000)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Starting temperature. Higher values accept more uphill moves early.
    pub initial_temperature: f64,

    /// Multiplicative cooling factor in (0, 1). Higher = slower cooling.
    pub cooling_rate: f64,

    /// Iterations between two cooling steps.
    pub iterations_per_temperature: usize,

    /// Iteration budget. The run ends `Exhausted` when it is spent.
    pub max_iterations: usize,

    /// The run ends `Converged` once the best total cost is at or below this.
    pub target_cost: f64,

    /// Probability that initialization draws a session's slot from its
    /// teacher's preferred slots. 0.0 = uniform.
    pub preference_bias: f64,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.995,
            iterations_per_temperature: 1,
            max_iterations: 100_000,
            target_cost: 0.0,
            preference_bias: 0.0,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_target_cost(mut self, cost: f64) -> Self {
        self.target_cost = cost;
        self
    }

    pub fn with_preference_bias(mut self, bias: f64) -> Self {
        self.preference_bias = bias;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(TimetableError::config(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(TimetableError::config(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.iterations_per_temperature == 0 {
            return Err(TimetableError::config(
                "iterations_per_temperature must be at least 1",
            ));
        }
        if self.max_iterations == 0 {
            return Err(TimetableError::config("max_iterations must be at least 1"));
        }
        if !(self.target_cost.is_finite() && self.target_cost >= 0.0) {
            return Err(TimetableError::config(format!(
                "target_cost must be non-negative, got {}",
                self.target_cost
            )));
        }
        if !(0.0..=1.0).contains(&self.preference_bias) {
            return Err(TimetableError::config(format!(
                "preference_bias must be in [0, 1], got {}",
                self.preference_bias
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnealConfig::default();
        assert!((config.initial_temperature - 1000.0).abs() < 1e-10);
        assert!((config.cooling_rate - 0.995).abs() < 1e-12);
        assert_eq!(config.max_iterations, 100_000);
        assert_eq!(config.target_cost, 0.0);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_cooling_rate() {
        for rate in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
            let config = AnnealConfig::default().with_cooling_rate(rate);
            assert!(
                matches!(config.validate(), Err(TimetableError::InvalidConfiguration(_))),
                "rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = AnnealConfig::default().with_initial_temperature(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_iterations() {
        let config = AnnealConfig::default().with_max_iterations(0);
        assert!(config.validate().is_err());
        let config = AnnealConfig::default().with_iterations_per_temperature(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_target() {
        let config = AnnealConfig::default().with_target_cost(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bias_range() {
        assert!(AnnealConfig::default().with_preference_bias(0.8).validate().is_ok());
        assert!(AnnealConfig::default().with_preference_bias(1.2).validate().is_err());
    }
}
