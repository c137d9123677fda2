//! Optimised marginal utility: water-filling with bisection at both levels.

use super::config::WaterFillingConfig;
use super::demand::Inversion;
use super::needs::fill_needs;
use super::solver::{fill_excess, note_outcome, Search};
use crate::algorithm::AllocationAlgorithm;
use crate::error::AllocError;
use crate::ledger::Ledger;
use crate::types::{AllocationResult, Category};

/// Equalises marginal utility per dollar instead of buying unit by unit.
///
/// Basic needs are water-filled first (see [`marginal`](crate::marginal)).
/// If all of them fit, the surplus threshold λ is bisected, and each
/// category's demand at λ is itself found by bisection on its marginal
/// utility curve.
///
/// # Examples
///
/// ```
/// use u_budget::{AllocationAlgorithm, Category};
/// use u_budget::marginal::OptimisedMarginal;
///
/// let categories = vec![
///     Category::new("Food", 1.0).with_basic_need(3.0).with_necessity(9.0),
///     Category::new("Fun", 2.0).with_utility_factor(4.0).with_necessity(1.0),
/// ];
/// let result = OptimisedMarginal::new().calculate(&categories, 10.0);
/// assert!(result.get("Food").unwrap().meets_basic_need());
/// assert!(result.total_spent <= 10.0 + 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptimisedMarginal {
    config: WaterFillingConfig,
}

impl OptimisedMarginal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the strategy with a validated configuration.
    pub fn with_config(config: WaterFillingConfig) -> Result<Self, AllocError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl AllocationAlgorithm for OptimisedMarginal {
    fn name(&self) -> &str {
        "Optimised Marginal Utility"
    }

    fn description(&self) -> &str {
        "Water-fills basic needs, then bisects a shared marginal-utility-per-dollar threshold for the surplus."
    }

    fn calculate(&self, categories: &[Category], budget: f64) -> AllocationResult {
        let mut ledger = Ledger::new(categories, budget);
        let needs = fill_needs(&mut ledger, &self.config);
        tracing::debug!(
            level = needs.level,
            saturated = needs.saturated,
            partial = needs.partial,
            rounds = needs.rounds,
            "needs stage finished"
        );
        if needs.all_saturated() {
            let outcome = fill_excess(
                &mut ledger,
                &self.config,
                Inversion::Bisection,
                Search::Bisection,
            );
            note_outcome(&mut ledger, &outcome);
        }
        ledger.finish(self.name())
    }
}
