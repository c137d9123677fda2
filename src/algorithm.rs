//! The strategy contract.

use crate::types::{AllocationResult, Category};

/// A pluggable allocation strategy.
///
/// Implementations map `(categories, budget)` to an [`AllocationResult`]
/// in a single synchronous call. They must:
///
/// - treat `categories` as read-only input,
/// - return exactly one allocation per input category, in input order,
/// - never spend more than `budget`,
/// - never fail: insufficient budget or non-convergence are reported in
///   [`AllocationResult::message`].
///
/// Adding a strategy only means implementing this trait and registering
/// it with an [`AlgorithmRegistry`](crate::registry::AlgorithmRegistry).
///
/// # Examples
///
/// ```
/// use u_budget::{AllocationAlgorithm, AllocationResult, Category};
///
/// /// Spends nothing.
/// struct Frugal;
///
/// impl AllocationAlgorithm for Frugal {
///     fn name(&self) -> &str { "Frugal" }
///     fn description(&self) -> &str { "Keeps the whole budget." }
///     fn calculate(&self, categories: &[Category], _budget: f64) -> AllocationResult {
///         u_budget::zero_allocation(categories)
///     }
/// }
///
/// let result = Frugal.calculate(&[Category::new("Food", 1.0)], 10.0);
/// assert_eq!(result.total_spent, 0.0);
/// ```
pub trait AllocationAlgorithm: Send + Sync {
    /// Short label, unique within a registry.
    fn name(&self) -> &str;

    /// One-line summary of the strategy's trade-off.
    fn description(&self) -> &str;

    /// Allocates `budget` across `categories`.
    fn calculate(&self, categories: &[Category], budget: f64) -> AllocationResult;
}

/// The allocation every strategy starts from: free goods at their basic
/// need, everything else at zero.
pub fn zero_allocation(categories: &[Category]) -> AllocationResult {
    crate::ledger::Ledger::new(categories, 0.0).finish("zero")
}
