//! Allocation bookkeeping shared by every strategy.
//!
//! A [`Ledger`] owns the working quantities for one `calculate` call. It
//! applies the free-good policy up front (price `<= 0` is granted its basic
//! need at zero spend and never touches the budget), keeps spend and
//! remaining budget in sync, and assembles the final [`AllocationResult`]
//! with its advisory message.

use crate::types::{Allocation, AllocationResult, Category};
use crate::utility::utility;

/// Necessity level above which an unmet basic need is reported.
pub const REPORT_NECESSITY_THRESHOLD: f64 = 3.0;

/// Unspent budget below this is not worth mentioning.
const LEFTOVER_REPORT_THRESHOLD: f64 = 0.01;

/// Slack used when comparing quantities against basic needs. Remaining
/// budget at or below this is rounding residue and buys nothing.
pub(crate) const QUANTITY_EPS: f64 = 1e-9;

pub(crate) struct Ledger<'a> {
    categories: &'a [Category],
    quantities: Vec<f64>,
    spent: Vec<f64>,
    budget: f64,
    total_spent: f64,
    notes: Vec<String>,
}

impl<'a> Ledger<'a> {
    /// Starts a ledger. Non-finite or negative budgets are treated as zero.
    pub fn new(categories: &'a [Category], budget: f64) -> Self {
        let budget = if budget.is_finite() { budget.max(0.0) } else { 0.0 };
        let quantities = categories
            .iter()
            .map(|c| {
                if c.is_free() && c.basic_need_amount.is_finite() {
                    c.basic_need_amount.max(0.0)
                } else {
                    0.0
                }
            })
            .collect();
        Self {
            categories,
            quantities,
            spent: vec![0.0; categories.len()],
            budget,
            total_spent: 0.0,
            notes: Vec::new(),
        }
    }

    pub fn category(&self, i: usize) -> &'a Category {
        &self.categories[i]
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn remaining(&self) -> f64 {
        (self.budget - self.total_spent).max(0.0)
    }

    /// Whether only rounding residue is left.
    pub fn exhausted(&self) -> bool {
        self.remaining() <= QUANTITY_EPS
    }

    pub fn quantity(&self, i: usize) -> f64 {
        self.quantities[i]
    }

    /// Indices of categories that cost money and can be bought.
    ///
    /// Categories with non-finite parameters are left out entirely and
    /// stay at zero.
    pub fn paid_indices(&self) -> Vec<usize> {
        self.categories
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_free() && is_well_formed(c))
            .map(|(i, _)| i)
            .collect()
    }

    /// Buys `units` more of category `i`, clamped to what the remaining
    /// budget affords. Returns the units actually bought.
    ///
    /// An [exhausted](Self::exhausted) ledger buys nothing: a speck of
    /// quantity would lift a category off its unmet-need penalty.
    pub fn buy(&mut self, i: usize, units: f64) -> f64 {
        let price = self.categories[i].price;
        if price <= 0.0 || !units.is_finite() || units <= 0.0 || self.exhausted() {
            return 0.0;
        }
        let units = units.min(self.remaining() / price);
        if units <= 0.0 {
            return 0.0;
        }
        let cost = units * price;
        self.quantities[i] += units;
        self.spent[i] += cost;
        self.total_spent += cost;
        units
    }

    /// Spends up to `amount` on category `i`. Returns the amount spent.
    pub fn spend(&mut self, i: usize, amount: f64) -> f64 {
        let price = self.categories[i].price;
        if price <= 0.0 {
            return 0.0;
        }
        self.buy(i, amount / price) * price
    }

    /// Adds an advisory note to the final message.
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Assembles the result and logs a summary.
    pub fn finish(self, algorithm: &str) -> AllocationResult {
        let allocations: Vec<Allocation> = self
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let quantity = sanitize(self.quantities[i]);
                Allocation {
                    index: i,
                    category: c.clone(),
                    quantity,
                    spent: sanitize(self.spent[i]),
                    utility: sanitize(utility(c, quantity)),
                }
            })
            .collect();

        let total_utility: f64 = allocations.iter().map(|a| a.utility).sum();
        let total_spent: f64 = allocations.iter().map(|a| a.spent).sum();
        let leftover = (self.budget - total_spent).max(0.0);

        let mut parts = Vec::new();
        let unmet: Vec<&str> = allocations
            .iter()
            .filter(|a| is_reportable_need(&a.category) && !a.meets_basic_need())
            .map(|a| a.category.name.as_str())
            .collect();
        if !unmet.is_empty() {
            parts.push(format!("Unmet basic needs: {}", unmet.join(", ")));
        } else if allocations.iter().any(|a| is_reportable_need(&a.category)) {
            parts.push("All basic needs met".to_string());
        }
        let has_paid = self.categories.iter().any(|c| !c.is_free());
        if has_paid && leftover > LEFTOVER_REPORT_THRESHOLD {
            parts.push(format!("Unspent budget: {leftover:.2}"));
        }
        parts.extend(self.notes);

        tracing::debug!(
            algorithm,
            categories = allocations.len(),
            budget = self.budget,
            total_spent,
            total_utility,
            unmet = unmet.len(),
            "allocation finished"
        );

        AllocationResult {
            allocations,
            total_utility,
            total_spent,
            message: if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            },
        }
    }
}

fn is_reportable_need(category: &Category) -> bool {
    category.necessity_level > REPORT_NECESSITY_THRESHOLD && category.basic_need_amount > 0.0
}

fn is_well_formed(category: &Category) -> bool {
    category.price.is_finite()
        && category.utility_factor.is_finite()
        && category.basic_need_amount.is_finite()
        && category.diminishing_factor.is_finite()
        && category.necessity_level.is_finite()
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category::new("Rent", 10.0)
                .with_basic_need(1.0)
                .with_necessity(10.0),
            Category::new("Air", 0.0).with_basic_need(10.0),
            Category::new("Games", 5.0).with_necessity(1.0),
        ]
    }

    #[test]
    fn test_free_goods_granted_up_front() {
        let cats = categories();
        let ledger = Ledger::new(&cats, 20.0);
        assert_eq!(ledger.quantity(1), 10.0);
        assert_eq!(ledger.paid_indices(), vec![0, 2]);
        assert_eq!(ledger.remaining(), 20.0);
    }

    #[test]
    fn test_buy_clamps_to_budget() {
        let cats = categories();
        let mut ledger = Ledger::new(&cats, 12.0);
        assert!((ledger.buy(0, 1.0) - 1.0).abs() < 1e-12);
        let bought = ledger.buy(2, 5.0);
        assert!((bought - 0.4).abs() < 1e-12);
        assert!(ledger.remaining() < 1e-12);
        assert_eq!(ledger.buy(2, 1.0), 0.0);
    }

    #[test]
    fn test_rounding_residue_buys_nothing() {
        let cats = vec![
            Category::new("Bread", 1.0)
                .with_basic_need(0.3)
                .with_necessity(8.0),
            Category::new("Milk", 1.0)
                .with_basic_need(1.0)
                .with_necessity(8.0),
        ];
        // 0.1 + 0.2 leaves about 5.6e-17 after buying 0.3 units.
        let mut ledger = Ledger::new(&cats, 0.1 + 0.2);
        ledger.buy(0, 0.3);
        assert!(ledger.remaining() > 0.0);
        assert!(ledger.exhausted());
        assert_eq!(ledger.buy(1, 1.0), 0.0);
        assert_eq!(ledger.spend(1, 1.0), 0.0);

        let result = ledger.finish("test");
        assert_eq!(result.allocations[1].quantity, 0.0);
        assert_eq!(result.allocations[1].utility, -8000.0);
    }

    #[test]
    fn test_negative_budget_is_zero() {
        let cats = categories();
        let ledger = Ledger::new(&cats, -5.0);
        assert_eq!(ledger.budget(), 0.0);
        let ledger = Ledger::new(&cats, f64::NAN);
        assert_eq!(ledger.budget(), 0.0);
    }

    #[test]
    fn test_finish_reports_unmet_and_leftover() {
        let cats = categories();
        let mut ledger = Ledger::new(&cats, 30.0);
        ledger.buy(2, 1.0);
        ledger.note("policy note");
        let result = ledger.finish("test");
        let msg = result.message.unwrap();
        assert!(msg.contains("Unmet basic needs: Rent"));
        assert!(msg.contains("Unspent budget: 25.00"));
        assert!(msg.ends_with("policy note"));
        assert!((result.total_spent - 5.0).abs() < 1e-12);
        let sum: f64 = result.allocations.iter().map(|a| a.utility).sum();
        assert!((result.total_utility - sum).abs() < 1e-9);
    }

    #[test]
    fn test_finish_reports_all_met() {
        let cats = categories();
        let mut ledger = Ledger::new(&cats, 10.0);
        ledger.buy(0, 1.0);
        let msg = ledger.finish("test").message.unwrap();
        assert_eq!(msg, "All basic needs met");
    }
}
