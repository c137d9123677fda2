//! Derived figures for summaries and charts.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::AllocationResult;

/// Label of the chart segment holding the unspent budget.
pub const REMAINING_LABEL: &str = "Remaining";

/// One slice of a budget chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartSegment {
    pub label: String,
    pub amount: f64,
    /// Share of the budget, in percent.
    pub percentage: f64,
}

/// Mean completion of basic needs, in percent.
///
/// Each category with a basic need contributes `min(q / b, 1) * 100`.
/// Returns 100 when no category has a basic need.
///
/// # Examples
///
/// ```
/// use u_budget::{AllocationAlgorithm, Category};
/// use u_budget::greedy::PriorityNecessity;
/// use u_budget::metrics::basic_needs_satisfaction;
///
/// let categories = vec![
///     Category::new("Food", 1.0).with_basic_need(10.0),
///     Category::new("Rent", 1.0).with_basic_need(10.0),
/// ];
/// let result = PriorityNecessity::new().calculate(&categories, 15.0);
/// assert!((basic_needs_satisfaction(&result) - 75.0).abs() < 1e-9);
/// ```
pub fn basic_needs_satisfaction(result: &AllocationResult) -> f64 {
    let ratios: Vec<f64> = result
        .allocations
        .iter()
        .filter(|a| a.category.basic_need_amount > 0.0)
        .map(|a| (a.quantity / a.category.basic_need_amount).clamp(0.0, 1.0))
        .collect();
    if ratios.is_empty() {
        return 100.0;
    }
    ratios.iter().sum::<f64>() / ratios.len() as f64 * 100.0
}

/// Total utility per unit of money spent; 0 when nothing was spent.
pub fn utility_per_dollar(result: &AllocationResult) -> f64 {
    if result.total_spent <= 0.0 {
        return 0.0;
    }
    result.total_utility / result.total_spent
}

/// Budget chart: one segment per allocation with positive spend, in input
/// order, followed by a [`REMAINING_LABEL`] segment when money is left.
///
/// Percentages are relative to `budget` and sum to 100 for a positive
/// budget. A non-positive budget yields no segments.
pub fn chart_segments(result: &AllocationResult, budget: f64) -> Vec<ChartSegment> {
    if !budget.is_finite() || budget <= 0.0 {
        return Vec::new();
    }
    let mut segments: Vec<ChartSegment> = result
        .allocations
        .iter()
        .filter(|a| a.spent > 0.0)
        .map(|a| ChartSegment {
            label: a.category.name.clone(),
            amount: a.spent,
            percentage: a.spent / budget * 100.0,
        })
        .collect();

    let remaining = (budget - result.total_spent).max(0.0);
    if remaining > 0.0 {
        segments.push(ChartSegment {
            label: REMAINING_LABEL.to_string(),
            amount: remaining,
            percentage: remaining / budget * 100.0,
        });
    }
    segments
}
