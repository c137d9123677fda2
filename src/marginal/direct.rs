//! Direct solve: closed-form demand through the Lambert W function.

use super::config::WaterFillingConfig;
use super::demand::Inversion;
use super::needs::fill_needs;
use super::solver::{fill_excess, note_outcome, Search};
use crate::algorithm::AllocationAlgorithm;
use crate::error::AllocError;
use crate::ledger::Ledger;
use crate::types::{AllocationResult, Category};

/// Water-filling where each category's demand at threshold λ is solved in
/// closed form.
///
/// Setting the excess marginal `uf · d^e · (1 + e ln d)` equal to
/// `λ · price` and substituting `y = 1 + e ln d` gives `y e^y = c · e`
/// with `c = λ · price / uf`, hence `e = (W₀(c · e) - 1) / ln d`. `W₀` is
/// evaluated by a capped Halley iteration; when it fails the category
/// stays at its basic need.
#[derive(Debug, Clone, Default)]
pub struct DirectSolve {
    config: WaterFillingConfig,
}

impl DirectSolve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the strategy with a validated configuration.
    pub fn with_config(config: WaterFillingConfig) -> Result<Self, AllocError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl AllocationAlgorithm for DirectSolve {
    fn name(&self) -> &str {
        "Direct Solve"
    }

    fn description(&self) -> &str {
        "Water-filling with closed-form Lambert W demand per category."
    }

    fn calculate(&self, categories: &[Category], budget: f64) -> AllocationResult {
        let mut ledger = Ledger::new(categories, budget);
        if fill_needs(&mut ledger, &self.config).all_saturated() {
            let outcome = fill_excess(
                &mut ledger,
                &self.config,
                Inversion::LambertW,
                Search::Bisection,
            );
            note_outcome(&mut ledger, &outcome);
        }
        ledger.finish(self.name())
    }
}
