//! Priority-Necessity: basic needs first, in necessity order, then surplus
//! by marginal utility per dollar.

use super::config::GreedyConfig;
use super::engine::spend_marginal;
use crate::algorithm::AllocationAlgorithm;
use crate::error::AllocError;
use crate::ledger::Ledger;
use crate::types::{AllocationResult, Category};

/// Two-phase greedy, the default strategy.
///
/// 1. **Needs pass**: categories sorted by necessity (descending), ties by
///    `utility_factor / price` (descending). Each category is bought up to
///    its basic need before the next one is touched, so an essential
///    category can exhaust the budget on its own.
/// 2. **Surplus pass**: the remaining budget goes through the marginal
///    greedy loop.
///
/// # Examples
///
/// ```
/// use u_budget::{AllocationAlgorithm, Category};
/// use u_budget::greedy::PriorityNecessity;
///
/// let categories = vec![
///     Category::new("Rent", 1.0).with_basic_need(5.0).with_necessity(10.0),
///     Category::new("Yacht", 1.0).with_utility_factor(1e6).with_basic_need(5.0).with_necessity(1.0),
/// ];
/// let result = PriorityNecessity::new().calculate(&categories, 5.0);
/// assert!((result.allocations[0].quantity - 5.0).abs() < 1e-9);
/// assert_eq!(result.allocations[1].quantity, 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PriorityNecessity {
    config: GreedyConfig,
}

impl PriorityNecessity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the strategy with a validated configuration.
    pub fn with_config(config: GreedyConfig) -> Result<Self, AllocError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GreedyConfig {
        &self.config
    }
}

/// Paid categories in needs-pass order.
pub(crate) fn necessity_order(ledger: &Ledger<'_>) -> Vec<usize> {
    let mut order = ledger.paid_indices();
    order.sort_by(|&a, &b| {
        let ca = ledger.category(a);
        let cb = ledger.category(b);
        cb.necessity_level
            .total_cmp(&ca.necessity_level)
            .then_with(|| (cb.utility_factor / cb.price).total_cmp(&(ca.utility_factor / ca.price)))
    });
    order
}

impl AllocationAlgorithm for PriorityNecessity {
    fn name(&self) -> &str {
        "Priority Necessity"
    }

    fn description(&self) -> &str {
        "Meets basic needs in necessity order, then spends the surplus on the best marginal utility per dollar."
    }

    fn calculate(&self, categories: &[Category], budget: f64) -> AllocationResult {
        let mut ledger = Ledger::new(categories, budget);

        for i in necessity_order(&ledger) {
            if ledger.exhausted() {
                break;
            }
            let need = ledger.category(i).basic_need_amount - ledger.quantity(i);
            if need > 0.0 {
                ledger.buy(i, need);
            }
        }

        let outcome = spend_marginal(&mut ledger, &self.config);
        if outcome.capped {
            ledger.note(format!(
                "Surplus pass stopped at its iteration ceiling after {} purchases",
                outcome.iterations
            ));
        }
        ledger.finish(self.name())
    }
}
