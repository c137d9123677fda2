//! Water-filling configuration.

use crate::error::AllocError;

/// Configuration for the λ-search strategies.
///
/// # Examples
///
/// ```
/// use u_budget::marginal::WaterFillingConfig;
///
/// let config = WaterFillingConfig::default()
///     .with_tolerance(1e-6)
///     .with_max_iterations(100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct WaterFillingConfig {
    /// Absolute budget-matching error at which the λ search stops.
    pub tolerance: f64,

    /// Maximum iterations of the outer λ search.
    pub max_iterations: usize,

    /// Maximum iterations of each per-category root solve.
    pub inner_iterations: usize,

    /// Maximum rounds of the saturation fixed point in the needs stage.
    pub max_rounds: usize,
}

impl Default for WaterFillingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 200,
            inner_iterations: 100,
            max_rounds: 64,
        }
    }
}

impl WaterFillingConfig {
    /// Sets the budget-matching tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Sets the maximum number of λ search iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the maximum iterations of each root solve.
    pub fn with_inner_iterations(mut self, n: usize) -> Self {
        self.inner_iterations = n;
        self
    }

    /// Sets the maximum number of saturation rounds.
    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AllocError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(AllocError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 || self.inner_iterations == 0 || self.max_rounds == 0 {
            return Err(AllocError::InvalidConfig(
                "iteration limits must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the dual gradient strategy.
///
/// λ is updated multiplicatively, `λ ← λ · exp(η · (S(λ) − B) / B)`, where
/// `S(λ)` is the spend implied by λ and `B` the budget to match. `η` starts
/// at `learning_rate` and halves every time the gap changes sign.
#[derive(Debug, Clone)]
pub struct GradientConfig {
    /// Initial step size, positive.
    pub learning_rate: f64,

    /// Shared search limits.
    pub search: WaterFillingConfig,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            search: WaterFillingConfig::default().with_max_iterations(500),
        }
    }
}

impl GradientConfig {
    /// Sets the initial step size.
    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the shared search limits.
    pub fn with_search(mut self, search: WaterFillingConfig) -> Self {
        self.search = search;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AllocError> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(AllocError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        self.search.validate()
    }
}
