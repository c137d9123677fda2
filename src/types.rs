//! Core data model: categories in, allocations out.
//!
//! [`Category`] values are immutable inputs. Every strategy produces an
//! owned [`AllocationResult`] holding its own copy of each category, so
//! no result ever aliases the caller's input.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::AllocError;

/// A spending category definition.
///
/// # Examples
///
/// ```
/// use u_budget::Category;
///
/// let food = Category::new("Food", 2.5)
///     .with_utility_factor(3.0)
///     .with_basic_need(10.0)
///     .with_diminishing_factor(0.8)
///     .with_necessity(9.0);
/// assert!(food.validate().is_ok());
/// assert!(!food.is_free());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Category {
    /// Identifying label. Need not be unique.
    pub name: String,

    /// Cost per unit. Zero means a free good.
    pub price: f64,

    /// Base utility of one unit. Conventionally 0.1–10.
    pub utility_factor: f64,

    /// Quantity considered the basic need threshold. Zero means no floor.
    pub basic_need_amount: f64,

    /// Exponential decay in [0, 1] applied to units beyond the basic need.
    ///
    /// 0 flattens utility immediately past the threshold, 1 disables decay.
    pub diminishing_factor: f64,

    /// Priority class in [1, 10]; 10 is must-have-first, 1 is pure luxury.
    pub necessity_level: f64,
}

impl Category {
    /// Creates a category with neutral parameters: utility factor 1,
    /// no basic need, diminishing factor 0.9, necessity 5.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            utility_factor: 1.0,
            basic_need_amount: 0.0,
            diminishing_factor: 0.9,
            necessity_level: 5.0,
        }
    }

    /// Sets the utility of one unit.
    pub fn with_utility_factor(mut self, factor: f64) -> Self {
        self.utility_factor = factor;
        self
    }

    /// Sets the basic need threshold.
    pub fn with_basic_need(mut self, amount: f64) -> Self {
        self.basic_need_amount = amount;
        self
    }

    /// Sets the decay applied beyond the basic need.
    pub fn with_diminishing_factor(mut self, factor: f64) -> Self {
        self.diminishing_factor = factor;
        self
    }

    /// Sets the necessity level.
    pub fn with_necessity(mut self, level: f64) -> Self {
        self.necessity_level = level;
        self
    }

    /// Whether this is a free good (granted at its basic need, never paid for).
    pub fn is_free(&self) -> bool {
        self.price <= 0.0
    }

    /// Cost of fully meeting the basic need.
    pub fn basic_need_cost(&self) -> f64 {
        if self.is_free() {
            0.0
        } else {
            self.price * self.basic_need_amount.max(0.0)
        }
    }

    /// Checks the category for degenerate parameters.
    pub fn validate(&self) -> Result<(), AllocError> {
        let invalid = |reason: String| AllocError::InvalidCategory {
            name: self.name.clone(),
            reason,
        };
        let fields = [
            ("price", self.price),
            ("utility_factor", self.utility_factor),
            ("basic_need_amount", self.basic_need_amount),
            ("diminishing_factor", self.diminishing_factor),
            ("necessity_level", self.necessity_level),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(invalid(format!("{field} must be finite, got {value}")));
            }
        }
        if self.price < 0.0 {
            return Err(invalid(format!("price must be non-negative, got {}", self.price)));
        }
        if self.basic_need_amount < 0.0 {
            return Err(invalid(format!(
                "basic_need_amount must be non-negative, got {}",
                self.basic_need_amount
            )));
        }
        if !(0.0..=1.0).contains(&self.diminishing_factor) {
            return Err(invalid(format!(
                "diminishing_factor must be in [0, 1], got {}",
                self.diminishing_factor
            )));
        }
        if !(1.0..=10.0).contains(&self.necessity_level) {
            return Err(invalid(format!(
                "necessity_level must be in [1, 10], got {}",
                self.necessity_level
            )));
        }
        Ok(())
    }
}

/// The outcome for one category.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Allocation {
    /// Position of the category in the input slice.
    pub index: usize,

    /// Copy of the originating category.
    pub category: Category,

    /// Units allocated.
    pub quantity: f64,

    /// Money spent, `quantity * price` up to rounding drift.
    pub spent: f64,

    /// Utility attributed to `quantity` units.
    pub utility: f64,
}

impl Allocation {
    /// Whether the allocation reaches the category's basic need.
    pub fn meets_basic_need(&self) -> bool {
        self.quantity + 1e-9 >= self.category.basic_need_amount
    }
}

/// The whole-budget output of one strategy run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllocationResult {
    /// One entry per input category, in input order.
    pub allocations: Vec<Allocation>,

    /// Sum of all allocation utilities. May be negative.
    pub total_utility: f64,

    /// Total budget consumed.
    pub total_spent: f64,

    /// Advisory diagnostic (unmet needs, leftover budget, policy notes).
    pub message: Option<String>,
}

impl AllocationResult {
    /// Looks up the first allocation for a category name.
    pub fn get(&self, name: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.category.name == name)
    }

    /// Allocations ordered by spend, largest first (display order).
    pub fn sorted_by_spend(&self) -> Vec<&Allocation> {
        let mut sorted: Vec<&Allocation> = self.allocations.iter().collect();
        sorted.sort_by(|a, b| b.spent.total_cmp(&a.spent));
        sorted
    }

    /// Allocations whose basic need is unmet, for categories above the
    /// given necessity level.
    pub fn unmet_needs(&self, min_necessity: f64) -> Vec<&Allocation> {
        self.allocations
            .iter()
            .filter(|a| a.category.necessity_level > min_necessity && !a.meets_basic_need())
            .collect()
    }
}
