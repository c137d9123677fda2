//! Marginal-utility greedy loop.
//!
//! # Algorithm
//!
//! 1. Compute each paid category's marginal utility per dollar for one
//!    more unit: `(u(q + 1) - u(q)) / price`.
//! 2. Buy one unit of the category with the highest positive ratio. When
//!    the remaining budget is less than its price, buy the affordable
//!    fraction and stop. A step never crosses the peak of the excess
//!    utility curve: the unit that would is shortened to end on the peak.
//! 3. Recompute the ratio of the bought category only, repeat.
//! 4. Stop when the budget is exhausted, no ratio is positive, or the
//!    iteration ceiling is reached.
//!
//! Purchase decisions never depend on the remaining budget, so a larger
//! budget replays the same purchases and then continues. That keeps the
//! allocation monotone in the budget.

use super::config::GreedyConfig;
use crate::ledger::{Ledger, QUANTITY_EPS};
use crate::types::Category;
use crate::utility::{excess_peak, utility};

/// Summary of one greedy pass.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct GreedyOutcome {
    /// Purchases made (a fractional final purchase counts as one).
    pub iterations: usize,

    /// Whether the pass stopped on the iteration ceiling with positive
    /// purchases still available.
    pub capped: bool,
}

/// Spends the ledger's remaining budget greedily by marginal utility per
/// dollar.
pub(crate) fn spend_marginal(ledger: &mut Ledger<'_>, config: &GreedyConfig) -> GreedyOutcome {
    let paid = ledger.paid_indices();
    let eps = config.epsilon;
    if paid.is_empty() || ledger.remaining() <= eps {
        return GreedyOutcome::default();
    }

    let min_price = paid
        .iter()
        .map(|&i| ledger.category(i).price)
        .fold(f64::INFINITY, f64::min);
    let bound = (ledger.remaining() / min_price).ceil() as usize;
    let ceiling = config
        .max_iterations
        .min(bound.saturating_add(paid.len()));

    let ratio = |ledger: &Ledger<'_>, i: usize| {
        let c = ledger.category(i);
        let q = ledger.quantity(i);
        let step = step_size(c, q);
        if step <= QUANTITY_EPS {
            return f64::NEG_INFINITY;
        }
        let r = (utility(c, q + step) - utility(c, q)) / (step * c.price);
        if r.is_finite() {
            r
        } else {
            f64::NEG_INFINITY
        }
    };
    let mut ratios: Vec<f64> = paid.iter().map(|&i| ratio(ledger, i)).collect();

    let mut iterations = 0usize;
    let mut capped = false;

    loop {
        if ledger.remaining() <= eps {
            break;
        }

        let best = best_ratio(&ratios, eps);
        let Some(slot) = best else {
            break;
        };

        if iterations >= ceiling {
            capped = true;
            break;
        }

        let i = paid[slot];
        let step = step_size(ledger.category(i), ledger.quantity(i));
        if ledger.buy(i, step) <= 0.0 {
            break;
        }
        ratios[slot] = ratio(ledger, i);
        iterations += 1;
    }

    if capped {
        tracing::warn!(
            iterations,
            ceiling,
            remaining = ledger.remaining(),
            "greedy pass hit its iteration ceiling"
        );
    }

    GreedyOutcome { iterations, capped }
}

/// Units in the next purchase of `c` at quantity `q`: one, or less when
/// the unit would carry the excess past its utility peak.
fn step_size(c: &Category, q: f64) -> f64 {
    match excess_peak(c) {
        Some(peak) => (c.basic_need_amount.max(0.0) + peak - q).min(1.0),
        _ => 1.0,
    }
}

/// Index of the highest ratio above `eps`; first wins ties.
fn best_ratio(ratios: &[f64], eps: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (slot, &r) in ratios.iter().enumerate() {
        if r > eps && best.is_none_or(|(_, b)| r > b) {
            best = Some((slot, r));
        }
    }
    best.map(|(slot, _)| slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_ratio_first_wins_ties() {
        assert_eq!(best_ratio(&[1.0, 3.0, 3.0, 2.0], 0.0), Some(1));
        assert_eq!(best_ratio(&[-1.0, 0.0], 0.0), None);
        assert_eq!(best_ratio(&[], 0.0), None);
    }

    #[test]
    fn test_spends_budget_on_best_ratio() {
        let cats = vec![
            Category::new("Cheap", 1.0)
                .with_utility_factor(1.0)
                .with_diminishing_factor(1.0)
                .with_necessity(1.0),
            Category::new("Dear", 1.0)
                .with_utility_factor(5.0)
                .with_diminishing_factor(1.0)
                .with_necessity(1.0),
        ];
        let mut ledger = Ledger::new(&cats, 7.5);
        let outcome = spend_marginal(&mut ledger, &GreedyConfig::default());
        assert!(!outcome.capped);
        assert_eq!(ledger.quantity(0), 0.0);
        assert!((ledger.quantity(1) - 7.5).abs() < 1e-9);
        assert!(ledger.remaining() < 1e-9);
    }

    #[test]
    fn test_stops_when_no_positive_ratio() {
        // d = 0.5 peaks at e* = 1.44: the second unit already loses utility.
        let cats = vec![Category::new("Snack", 1.0)
            .with_utility_factor(1.0)
            .with_diminishing_factor(0.5)
            .with_necessity(1.0)];
        let mut ledger = Ledger::new(&cats, 100.0);
        spend_marginal(&mut ledger, &GreedyConfig::default());
        assert!(ledger.quantity(0) >= 1.0);
        assert!(ledger.quantity(0) <= 2.0);
        assert!(ledger.remaining() > 90.0);
    }

    #[test]
    fn test_last_step_ends_on_peak() {
        // d = 0.76 peaks at e* = 3.64; the fourth unit still gains utility
        // but would pass the peak, so it is shortened.
        let cats = vec![Category::new("Tea", 1.0)
            .with_diminishing_factor(0.76)
            .with_necessity(1.0)];
        let mut ledger = Ledger::new(&cats, 100.0);
        spend_marginal(&mut ledger, &GreedyConfig::default());
        let peak = excess_peak(&cats[0]).unwrap();
        assert!((ledger.quantity(0) - peak).abs() < 1e-9);
    }

    #[test]
    fn test_step_size() {
        let c = Category::new("Tea", 1.0)
            .with_basic_need(2.0)
            .with_diminishing_factor(0.5);
        assert_eq!(step_size(&c, 0.0), 1.0);
        assert!((step_size(&c, 3.0) - (excess_peak(&c).unwrap() - 1.0)).abs() < 1e-12);
        let linear = Category::new("Bulk", 1.0).with_diminishing_factor(1.0);
        assert_eq!(step_size(&linear, 50.0), 1.0);
    }

    #[test]
    fn test_iteration_ceiling() {
        let cats = vec![Category::new("Grain", 1e-6)
            .with_diminishing_factor(1.0)
            .with_necessity(1.0)];
        let mut ledger = Ledger::new(&cats, 1000.0);
        let config = GreedyConfig::default().with_max_iterations(50);
        let outcome = spend_marginal(&mut ledger, &config);
        assert!(outcome.capped);
        assert_eq!(outcome.iterations, 50);
        assert!((ledger.quantity(0) - 50.0).abs() < 1e-9);
    }
}
