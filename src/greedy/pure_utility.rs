//! Pure-Utility: one greedy pass over the whole budget, necessity ignored.

use super::config::GreedyConfig;
use super::engine::spend_marginal;
use crate::algorithm::AllocationAlgorithm;
use crate::error::AllocError;
use crate::ledger::Ledger;
use crate::types::{AllocationResult, Category};

/// Marginal-utility greedy from the first dollar, without a needs pass.
///
/// Necessity only matters through the utility curve itself and in the
/// unmet-needs message.
#[derive(Debug, Clone, Default)]
pub struct PureUtility {
    config: GreedyConfig,
}

impl PureUtility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the strategy with a validated configuration.
    pub fn with_config(config: GreedyConfig) -> Result<Self, AllocError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl AllocationAlgorithm for PureUtility {
    fn name(&self) -> &str {
        "Pure Utility"
    }

    fn description(&self) -> &str {
        "Spends every dollar on the best marginal utility per dollar, ignoring necessity order."
    }

    fn calculate(&self, categories: &[Category], budget: f64) -> AllocationResult {
        let mut ledger = Ledger::new(categories, budget);
        let outcome = spend_marginal(&mut ledger, &self.config);
        if outcome.capped {
            ledger.note(format!(
                "Greedy pass stopped at its iteration ceiling after {} purchases",
                outcome.iterations
            ));
        }
        ledger.finish(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greedy::PriorityNecessity;

    fn pair() -> Vec<Category> {
        vec![
            Category::new("Staple", 1.0)
                .with_utility_factor(0.1)
                .with_basic_need(5.0)
                .with_diminishing_factor(0.9)
                .with_necessity(4.0),
            Category::new("Treat", 1.0)
                .with_utility_factor(10.0)
                .with_basic_need(0.0)
                .with_diminishing_factor(0.95)
                .with_necessity(1.0),
        ]
    }

    #[test]
    fn test_ignores_necessity_order() {
        let result = PureUtility::new().calculate(&pair(), 5.0);
        let treat = result.get("Treat").unwrap();
        assert!(treat.quantity > 0.0);
        assert!(result.message.unwrap().contains("Unmet basic needs: Staple"));

        let priority = PriorityNecessity::new().calculate(&pair(), 5.0);
        assert!(priority.get("Staple").unwrap().meets_basic_need());
        assert!(result.total_utility >= priority.total_utility);
    }

    #[test]
    fn test_free_good_untouched() {
        let cats = vec![
            Category::new("Air", 0.0)
                .with_utility_factor(1.0)
                .with_basic_need(10.0),
            Category::new("Food", 2.0).with_basic_need(3.0),
        ];
        let result = PureUtility::new().calculate(&cats, 4.0);
        let air = result.get("Air").unwrap();
        assert_eq!(air.quantity, 10.0);
        assert_eq!(air.spent, 0.0);
        assert!((result.total_spent - result.get("Food").unwrap().spent).abs() < 1e-12);
    }
}
