//! Balanced-Approach: a fixed basic-needs pool plus a discretionary pool.

use super::config::BalancedConfig;
use super::engine::spend_marginal;
use crate::algorithm::AllocationAlgorithm;
use crate::error::AllocError;
use crate::ledger::Ledger;
use crate::types::{AllocationResult, Category};

/// Splits the budget up front.
///
/// The basic-needs pool (`basic_ratio` of the budget, 60% by default) is
/// shared among categories with a basic need in proportion to
/// `necessity_level / 10`, each capped at the cost of its basic need.
/// Whatever the pool does not use rolls into the discretionary pool, which
/// is spent by the marginal greedy loop.
///
/// # Examples
///
/// ```
/// use u_budget::{AllocationAlgorithm, Category};
/// use u_budget::greedy::{BalancedApproach, BalancedConfig};
///
/// let algo = BalancedApproach::with_config(BalancedConfig::default().with_basic_ratio(0.5)).unwrap();
/// let result = algo.calculate(&[Category::new("Food", 1.0).with_basic_need(4.0)], 10.0);
/// assert!(result.total_spent <= 10.0 + 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BalancedApproach {
    config: BalancedConfig,
}

impl BalancedApproach {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the strategy with a validated configuration.
    pub fn with_config(config: BalancedConfig) -> Result<Self, AllocError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BalancedConfig {
        &self.config
    }
}

impl AllocationAlgorithm for BalancedApproach {
    fn name(&self) -> &str {
        "Balanced Approach"
    }

    fn description(&self) -> &str {
        "Reserves a share of the budget (60% by default) for basic needs by necessity weight, then spends the rest greedily."
    }

    fn calculate(&self, categories: &[Category], budget: f64) -> AllocationResult {
        let mut ledger = Ledger::new(categories, budget);
        let pool = ledger.budget() * self.config.basic_ratio;

        let needy: Vec<usize> = ledger
            .paid_indices()
            .into_iter()
            .filter(|&i| ledger.category(i).basic_need_amount > 0.0)
            .collect();
        let total_weight: f64 = needy
            .iter()
            .map(|&i| ledger.category(i).necessity_level / 10.0)
            .sum();

        let mut pool_spent = 0.0;
        if total_weight > 0.0 {
            for &i in &needy {
                let c = ledger.category(i);
                let share = pool * (c.necessity_level / 10.0) / total_weight;
                pool_spent += ledger.spend(i, share.min(c.basic_need_cost()));
            }
        }

        tracing::debug!(
            pool,
            pool_spent,
            discretionary = ledger.remaining(),
            "basic-needs pool distributed"
        );

        let outcome = spend_marginal(&mut ledger, &self.config.greedy);
        if outcome.capped {
            ledger.note(format!(
                "Discretionary pass stopped at its iteration ceiling after {} purchases",
                outcome.iterations
            ));
        }
        ledger.finish(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Vec<Category> {
        vec![
            Category::new("Food", 1.0)
                .with_utility_factor(2.0)
                .with_basic_need(100.0)
                .with_diminishing_factor(0.8)
                .with_necessity(10.0),
            Category::new("Clothes", 1.0)
                .with_utility_factor(2.0)
                .with_basic_need(100.0)
                .with_diminishing_factor(0.8)
                .with_necessity(5.0),
            Category::new("Cinema", 5.0)
                .with_utility_factor(8.0)
                .with_diminishing_factor(0.9)
                .with_necessity(1.0),
        ]
    }

    #[test]
    fn test_pool_split_by_necessity() {
        // Whole budget is the pool: 60 split 2:1 by necessity, nothing left over.
        let algo = BalancedApproach::with_config(BalancedConfig::default().with_basic_ratio(1.0)).unwrap();
        let result = algo.calculate(&cats(), 60.0);
        assert!((result.get("Food").unwrap().quantity - 40.0).abs() < 1e-9);
        assert!((result.get("Clothes").unwrap().quantity - 20.0).abs() < 1e-9);
        assert!((result.total_spent - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_description_matches_default_ratio() {
        let algo = BalancedApproach::new();
        assert!((algo.config().basic_ratio - 0.6).abs() < 1e-12);
        assert!(algo.description().contains("60% by default"));
    }

    #[test]
    fn test_unused_pool_rolls_over() {
        // Needs cost 200 in total; pool is 0.6 * 1000 = 600, so 400 rolls over.
        let result = BalancedApproach::new().calculate(&cats(), 1000.0);
        assert!(result.get("Food").unwrap().meets_basic_need());
        assert!(result.get("Clothes").unwrap().meets_basic_need());
        assert!(result.get("Cinema").unwrap().quantity > 0.0);
        assert!(result.total_spent <= 1000.0 + 1e-6);
    }

    #[test]
    fn test_zero_budget() {
        let result = BalancedApproach::new().calculate(&cats(), 0.0);
        assert_eq!(result.total_spent, 0.0);
    }

    #[test]
    fn test_invalid_ratio() {
        assert!(BalancedApproach::with_config(BalancedConfig::default().with_basic_ratio(-0.1)).is_err());
    }
}
