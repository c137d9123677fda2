//! λ search over the excess stage.
//!
//! Once every basic need is funded, the remaining budget `R` is shared by
//! equalising marginal utility per dollar: find the threshold λ such that
//! the implied spend `S(λ) = Σ price · e(λ)` matches `R`. `S` is
//! non-increasing in λ, zero at `λ_max = max uf / price` and maximal at 0.
//!
//! The search always keeps a feasible end (`S(λ) <= R`), so it never
//! overspends. Whatever the search leaves unspent, for example at the jump
//! of a linear category, is topped up afterwards.

use super::config::WaterFillingConfig;
use super::demand::{excess_demand, Inversion};
use crate::ledger::Ledger;
use crate::utility::{excess_marginal, excess_peak};

/// How λ is searched.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Search {
    /// Bisection on `[0, λ_max]`.
    Bisection,
    /// Multiplicative dual gradient steps, keeping the best feasible λ.
    /// The step halves whenever the budget gap changes sign.
    DualGradient { learning_rate: f64 },
}

/// Outcome of the excess stage.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ExcessOutcome {
    pub lambda: f64,
    pub iterations: usize,
    pub converged: bool,
    pub root_failures: usize,
}

struct Evaluation {
    spend: f64,
    demands: Vec<f64>,
    failures: usize,
}

pub(crate) fn fill_excess(
    ledger: &mut Ledger<'_>,
    config: &WaterFillingConfig,
    inversion: Inversion,
    search: Search,
) -> ExcessOutcome {
    let slots = ledger.paid_indices();
    let budget = ledger.remaining();
    if slots.is_empty() || budget <= config.tolerance {
        return ExcessOutcome {
            converged: true,
            ..ExcessOutcome::default()
        };
    }

    let lambda_max = slots
        .iter()
        .map(|&i| {
            let c = ledger.category(i);
            c.utility_factor / c.price
        })
        .fold(0.0, f64::max);
    if lambda_max <= 0.0 {
        return ExcessOutcome {
            converged: true,
            ..ExcessOutcome::default()
        };
    }

    let evaluate = |ledger: &Ledger<'_>, lambda: f64| {
        let mut spend = 0.0;
        let mut failures = 0;
        let demands = slots
            .iter()
            .map(|&i| {
                let c = ledger.category(i);
                let cap = budget / c.price;
                let demand = excess_demand(c, lambda, cap, inversion, config.inner_iterations);
                if !demand.converged {
                    failures += 1;
                }
                spend += demand.excess * c.price;
                demand.excess
            })
            .collect();
        Evaluation {
            spend,
            demands,
            failures,
        }
    };

    let mut iterations = 0;
    let mut converged = true;
    let unconstrained = evaluate(ledger, 0.0);
    let (lambda, chosen) = if unconstrained.spend <= budget {
        (0.0, unconstrained)
    } else {
        converged = false;
        match search {
            Search::Bisection => {
                let (mut lo, mut hi) = (0.0, lambda_max);
                let mut best = evaluate(ledger, hi);
                while iterations < config.max_iterations {
                    iterations += 1;
                    let mid = 0.5 * (lo + hi);
                    let eval = evaluate(ledger, mid);
                    if eval.spend > budget {
                        lo = mid;
                    } else {
                        hi = mid;
                        best = eval;
                    }
                    if budget - best.spend <= config.tolerance {
                        converged = true;
                        break;
                    }
                    if hi - lo <= 1e-15 * lambda_max {
                        break;
                    }
                }
                (hi, best)
            }
            Search::DualGradient { learning_rate } => {
                let mut lambda = 0.5 * lambda_max;
                let mut step = learning_rate;
                let mut last_over: Option<bool> = None;
                let mut best_lambda = lambda_max;
                let mut best = evaluate(ledger, lambda_max);
                while iterations < config.max_iterations {
                    let eval = evaluate(ledger, lambda);
                    let gap = eval.spend - budget;
                    iterations += 1;
                    let within = gap.abs() <= config.tolerance;
                    if (gap <= 0.0 || within) && eval.spend > best.spend {
                        best_lambda = lambda;
                        best = eval;
                    }
                    if within {
                        converged = true;
                        break;
                    }
                    let over = gap > 0.0;
                    if last_over.is_some_and(|prev| prev != over) {
                        step *= 0.5;
                    }
                    last_over = Some(over);
                    lambda = (lambda * (step * gap / budget).exp())
                        .clamp(lambda_max * 1e-12, lambda_max);
                }
                (best_lambda, best)
            }
        }
    };

    if !converged {
        tracing::warn!(
            iterations,
            lambda,
            gap = budget - chosen.spend,
            "λ search did not converge, keeping best feasible threshold"
        );
    }

    for (&i, &excess) in slots.iter().zip(&chosen.demands) {
        ledger.buy(i, excess);
    }
    top_up(ledger, &slots, lambda, config.tolerance);

    ExcessOutcome {
        lambda,
        iterations,
        converged,
        root_failures: chosen.failures,
    }
}

/// Adds advisory notes for a search that did not fully converge.
pub(crate) fn note_outcome(ledger: &mut Ledger<'_>, outcome: &ExcessOutcome) {
    if !outcome.converged {
        ledger.note(format!(
            "Threshold search stopped after {} iterations at λ = {:.6}; best feasible allocation kept",
            outcome.iterations, outcome.lambda
        ));
    }
    if outcome.root_failures > 0 {
        ledger.note(format!(
            "{} per-category root solves did not converge",
            outcome.root_failures
        ));
    }
}

/// Spends what is left after the search.
///
/// Linear categories priced right at the threshold caused any jump in
/// `S(λ)`, so they absorb the gap first. Anything still left goes to the
/// best remaining marginal ratios, at most one purchase per category.
fn top_up(ledger: &mut Ledger<'_>, slots: &[usize], lambda: f64, tolerance: f64) {
    let mut linear: Vec<usize> = slots
        .iter()
        .copied()
        .filter(|&i| {
            let c = ledger.category(i);
            excess_peak(c).is_none() && c.utility_factor / c.price >= lambda * (1.0 - 1e-9)
        })
        .collect();
    linear.sort_by(|&a, &b| {
        let ca = ledger.category(a);
        let cb = ledger.category(b);
        (cb.utility_factor / cb.price).total_cmp(&(ca.utility_factor / ca.price))
    });
    for i in linear {
        if ledger.remaining() <= tolerance {
            return;
        }
        ledger.spend(i, ledger.remaining());
    }

    for _ in 0..slots.len() {
        if ledger.remaining() <= tolerance {
            return;
        }
        let mut best: Option<(usize, f64, f64)> = None;
        for &i in slots {
            let c = ledger.category(i);
            let excess = (ledger.quantity(i) - c.basic_need_amount).max(0.0);
            let room = match excess_peak(c) {
                Some(peak) => peak - excess,
                None => f64::INFINITY,
            };
            if room <= 1e-12 {
                continue;
            }
            let ratio = excess_marginal(c, excess) / c.price;
            if ratio > 0.0 && best.is_none_or(|(_, r, _)| ratio > r) {
                best = Some((i, ratio, room));
            }
        }
        let Some((i, _, room)) = best else {
            return;
        };
        ledger.buy(i, room);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn cats() -> Vec<Category> {
        vec![
            Category::new("Fruit", 1.0)
                .with_utility_factor(3.0)
                .with_diminishing_factor(0.8)
                .with_necessity(1.0),
            Category::new("Music", 2.0)
                .with_utility_factor(5.0)
                .with_diminishing_factor(0.9)
                .with_necessity(1.0),
        ]
    }

    fn marginal_ratio(ledger: &Ledger<'_>, i: usize) -> f64 {
        let c = ledger.category(i);
        excess_marginal(c, ledger.quantity(i)) / c.price
    }

    #[test]
    fn test_bisection_equalises_ratios() {
        let cats = cats();
        let mut ledger = Ledger::new(&cats, 6.0);
        let outcome = fill_excess(
            &mut ledger,
            &WaterFillingConfig::default(),
            Inversion::Bisection,
            Search::Bisection,
        );
        assert!(outcome.converged);
        assert!(ledger.remaining() < 1e-6);
        let r0 = marginal_ratio(&ledger, 0);
        let r1 = marginal_ratio(&ledger, 1);
        assert!((r0 - r1).abs() < 1e-4, "{r0} vs {r1}");
        assert!((r0 - outcome.lambda).abs() < 1e-4);
    }

    #[test]
    fn test_dual_gradient_matches_bisection() {
        let cats = cats();
        let mut a = Ledger::new(&cats, 6.0);
        fill_excess(
            &mut a,
            &WaterFillingConfig::default(),
            Inversion::LambertW,
            Search::Bisection,
        );
        let mut b = Ledger::new(&cats, 6.0);
        fill_excess(
            &mut b,
            &WaterFillingConfig::default().with_max_iterations(2000),
            Inversion::Newton,
            Search::DualGradient { learning_rate: 0.5 },
        );
        assert!(b.remaining() <= 6.0);
        for i in 0..2 {
            assert!((a.quantity(i) - b.quantity(i)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_note_reports_stopping_threshold() {
        let cats = cats();
        let mut ledger = Ledger::new(&cats, 6.0);
        let outcome = ExcessOutcome {
            lambda: 0.25,
            iterations: 3,
            converged: false,
            root_failures: 2,
        };
        note_outcome(&mut ledger, &outcome);
        let msg = ledger.finish("test").message.unwrap();
        assert!(msg.contains("Threshold search stopped after 3 iterations at λ = 0.250000"));
        assert!(msg.contains("2 per-category root solves did not converge"));
    }

    #[test]
    fn test_budget_beyond_peaks_is_left_over() {
        let cats = cats();
        let mut ledger = Ledger::new(&cats, 1000.0);
        let outcome = fill_excess(
            &mut ledger,
            &WaterFillingConfig::default(),
            Inversion::LambertW,
            Search::Bisection,
        );
        assert_eq!(outcome.lambda, 0.0);
        for i in 0..2 {
            let peak = excess_peak(ledger.category(i)).unwrap();
            assert!((ledger.quantity(i) - peak).abs() < 1e-9);
        }
        assert!(ledger.remaining() > 900.0);
    }

    #[test]
    fn test_linear_category_absorbs_jump() {
        let cats = vec![
            Category::new("Savings", 1.0)
                .with_utility_factor(1.0)
                .with_diminishing_factor(1.0)
                .with_necessity(1.0),
            Category::new("Fruit", 1.0)
                .with_utility_factor(3.0)
                .with_diminishing_factor(0.8)
                .with_necessity(1.0),
        ];
        let mut ledger = Ledger::new(&cats, 50.0);
        fill_excess(
            &mut ledger,
            &WaterFillingConfig::default(),
            Inversion::Bisection,
            Search::Bisection,
        );
        assert!(ledger.remaining() < 1e-6);
        assert!(ledger.quantity(0) > 0.0);
        assert!(ledger.quantity(1) > 0.0);
    }
}
