//! Proportional split by utility factor per dollar.

use crate::algorithm::AllocationAlgorithm;
use crate::ledger::Ledger;
use crate::types::{AllocationResult, Category};

/// Splits the budget across paid categories in proportion to
/// `utility_factor / price`. No marginal reasoning and no basic-need
/// guarantee: the whole budget is one bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proportional;

impl Proportional {
    pub fn new() -> Self {
        Self
    }
}

impl AllocationAlgorithm for Proportional {
    fn name(&self) -> &str {
        "Proportional"
    }

    fn description(&self) -> &str {
        "Splits the budget in proportion to utility factor per dollar."
    }

    fn calculate(&self, categories: &[Category], budget: f64) -> AllocationResult {
        let mut ledger = Ledger::new(categories, budget);
        let weighted: Vec<(usize, f64)> = ledger
            .paid_indices()
            .into_iter()
            .map(|i| {
                let c = ledger.category(i);
                (i, (c.utility_factor / c.price).max(0.0))
            })
            .filter(|&(_, w)| w > 0.0)
            .collect();
        let total: f64 = weighted.iter().map(|&(_, w)| w).sum();

        let pool = ledger.budget();
        if total > 0.0 {
            for &(i, w) in &weighted {
                ledger.spend(i, pool * w / total);
            }
        }

        ledger.note(format!(
            "1 bucket over {} categories; budget split by utility per dollar, basic needs not guaranteed",
            weighted.len()
        ));
        ledger.finish(self.name())
    }
}
