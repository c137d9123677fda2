//! Gradient descent on the dual of the surplus problem.

use super::config::GradientConfig;
use super::demand::Inversion;
use super::needs::fill_needs;
use super::solver::{fill_excess, note_outcome, Search};
use crate::algorithm::AllocationAlgorithm;
use crate::error::AllocError;
use crate::ledger::Ledger;
use crate::types::{AllocationResult, Category};

/// Water-filling where λ follows dual gradient steps instead of bisection.
///
/// The budget gap `S(λ) − B` is the gradient of the Lagrangian dual, so λ
/// rises while the implied spend exceeds the budget and falls otherwise.
/// Per-category demand comes from a bracketed Newton iteration. The best
/// feasible λ seen is kept, so a run cut short by the iteration cap still
/// returns a valid allocation.
#[derive(Debug, Clone, Default)]
pub struct GradientDescent {
    config: GradientConfig,
}

impl GradientDescent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the strategy with a validated configuration.
    pub fn with_config(config: GradientConfig) -> Result<Self, AllocError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl AllocationAlgorithm for GradientDescent {
    fn name(&self) -> &str {
        "Gradient Descent"
    }

    fn description(&self) -> &str {
        "Water-fills basic needs, then finds the surplus threshold by dual gradient steps."
    }

    fn calculate(&self, categories: &[Category], budget: f64) -> AllocationResult {
        let mut ledger = Ledger::new(categories, budget);
        if fill_needs(&mut ledger, &self.config.search).all_saturated() {
            let outcome = fill_excess(
                &mut ledger,
                &self.config.search,
                Inversion::Newton,
                Search::DualGradient {
                    learning_rate: self.config.learning_rate,
                },
            );
            note_outcome(&mut ledger, &outcome);
        }
        ledger.finish(self.name())
    }
}
