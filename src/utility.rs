//! The utility function shared by every strategy.
//!
//! Three regimes, by quantity:
//!
//! - **Unmet high-necessity need**: zero units of a category with a basic
//!   need and `necessity_level > 5` scores `-1000 * necessity_level`, so no
//!   greedy comparison ever prefers leaving it empty.
//! - **Below basic need**: `uf * n * (q / b)^(1 / n) * q`. The exponent makes
//!   the curve steeper for essential goods, which is what produces
//!   necessity pressure in marginal comparisons.
//! - **At or above basic need**: `uf * n * b + e * uf * d^e` with excess
//!   `e = q - b`. The excess term rises, peaks at `e* = -1 / ln d` and then
//!   decays, giving diminishing (eventually negative) marginal returns.

use crate::types::Category;

/// Penalty multiplier for an untouched high-necessity need.
pub const UNMET_NEED_PENALTY: f64 = 1000.0;

/// Necessity level above which an empty allocation is penalised.
pub const PENALTY_NECESSITY_THRESHOLD: f64 = 5.0;

/// Diminishing factors at or above this are treated as "no decay".
const LINEAR_DECAY: f64 = 1.0 - 1e-12;

fn necessity(category: &Category) -> f64 {
    category.necessity_level.max(1.0)
}

/// Utility of `quantity` units of `category`.
///
/// Negative and non-finite quantities are treated as zero.
pub fn utility(category: &Category, quantity: f64) -> f64 {
    let q = if quantity.is_finite() { quantity.max(0.0) } else { 0.0 };
    let n = necessity(category);
    let uf = category.utility_factor;
    let basic = category.basic_need_amount.max(0.0);

    if q <= 0.0 && basic > 0.0 && n > PENALTY_NECESSITY_THRESHOLD {
        return -UNMET_NEED_PENALTY * n;
    }

    if q < basic {
        uf * n * (q / basic).powf(1.0 / n) * q
    } else {
        uf * n * basic + excess_utility(category, q - basic)
    }
}

/// Utility value of fully meeting the basic need.
pub fn basic_need_utility(category: &Category) -> f64 {
    category.utility_factor * necessity(category) * category.basic_need_amount.max(0.0)
}

/// Utility gained from `excess` units beyond the basic need.
pub fn excess_utility(category: &Category, excess: f64) -> f64 {
    let e = excess.max(0.0);
    let d = category.diminishing_factor.clamp(0.0, 1.0);
    e * category.utility_factor * d.powf(e)
}

/// Utility gained by buying one more unit at `quantity`.
pub fn marginal_utility(category: &Category, quantity: f64) -> f64 {
    utility(category, quantity + 1.0) - utility(category, quantity)
}

/// Derivative of [`excess_utility`] with respect to the excess quantity:
/// `uf * d^e * (1 + e ln d)`.
pub fn excess_marginal(category: &Category, excess: f64) -> f64 {
    let e = excess.max(0.0);
    let d = category.diminishing_factor.clamp(0.0, 1.0);
    let uf = category.utility_factor;
    if d >= LINEAR_DECAY {
        uf
    } else if d <= 0.0 {
        0.0
    } else {
        uf * d.powf(e) * (1.0 + e * d.ln())
    }
}

/// Excess quantity at which [`excess_utility`] peaks.
///
/// `None` means no decay: the excess utility grows without bound.
pub fn excess_peak(category: &Category) -> Option<f64> {
    let d = category.diminishing_factor.clamp(0.0, 1.0);
    if d >= LINEAR_DECAY {
        None
    } else if d <= 0.0 {
        Some(0.0)
    } else {
        Some(-1.0 / d.ln())
    }
}

/// Whether the category's excess utility never decays.
pub fn is_linear(category: &Category) -> bool {
    excess_peak(category).is_none()
}

/// Utility of the basic bundle per dollar, the ranking key used by the
/// bucket and water-filling strategies.
///
/// Categories without a basic need fall back to `utility_factor / price`.
/// Free goods rank at zero: they are never part of a ranking.
pub fn efficiency(category: &Category) -> f64 {
    if category.is_free() {
        return 0.0;
    }
    let basic = category.basic_need_amount;
    if basic > 0.0 {
        utility(category, basic) / (basic * category.price)
    } else {
        category.utility_factor / category.price
    }
}
