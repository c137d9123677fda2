//! Greedy strategy configuration.

use crate::error::AllocError;

/// Configuration for the marginal-utility greedy loop.
///
/// The loop buys one unit at a time of the category with the best
/// marginal utility per dollar. It is bounded by `budget / min_price`
/// purchases and additionally by `max_iterations`, which guards against
/// near-zero prices.
///
/// # Examples
///
/// ```
/// use u_budget::greedy::GreedyConfig;
///
/// let config = GreedyConfig::default().with_max_iterations(10_000);
/// assert_eq!(config.max_iterations, 10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GreedyConfig {
    /// Hard ceiling on unit purchases.
    pub max_iterations: usize,

    /// Ratios and remaining budget at or below this count as zero.
    pub epsilon: f64,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            max_iterations: 250_000,
            epsilon: 1e-9,
        }
    }
}

impl GreedyConfig {
    /// Sets the maximum number of unit purchases.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the zero threshold for ratios and remaining budget.
    pub fn with_epsilon(mut self, eps: f64) -> Self {
        self.epsilon = eps;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AllocError> {
        if self.max_iterations == 0 {
            return Err(AllocError::InvalidConfig(
                "max_iterations must be positive".into(),
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(AllocError::InvalidConfig(format!(
                "epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Configuration for the balanced strategy.
///
/// # Examples
///
/// ```
/// use u_budget::greedy::BalancedConfig;
///
/// let config = BalancedConfig::default().with_basic_ratio(0.7);
/// assert!((config.basic_ratio - 0.7).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct BalancedConfig {
    /// Share of the budget reserved for basic needs, in [0, 1].
    ///
    /// The rest, plus whatever the basic pool does not use, is spent
    /// greedily.
    pub basic_ratio: f64,

    /// Settings for the discretionary greedy pass.
    pub greedy: GreedyConfig,
}

impl Default for BalancedConfig {
    fn default() -> Self {
        Self {
            basic_ratio: 0.6,
            greedy: GreedyConfig::default(),
        }
    }
}

impl BalancedConfig {
    /// Sets the share of the budget reserved for basic needs.
    pub fn with_basic_ratio(mut self, ratio: f64) -> Self {
        self.basic_ratio = ratio;
        self
    }

    /// Sets the discretionary greedy pass configuration.
    pub fn with_greedy(mut self, greedy: GreedyConfig) -> Self {
        self.greedy = greedy;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AllocError> {
        if !(0.0..=1.0).contains(&self.basic_ratio) {
            return Err(AllocError::InvalidConfig(format!(
                "basic_ratio must be in [0, 1], got {}",
                self.basic_ratio
            )));
        }
        self.greedy.validate()
    }
}
