//! Excess demand at a marginal-utility-per-dollar threshold.
//!
//! Beyond the basic need the marginal utility of the excess `e` is
//! `m(e) = uf · d^e · (1 + e ln d)`, strictly decreasing from `uf` at
//! `e = 0` to zero at the peak `e* = -1 / ln d`. The demand at threshold
//! λ is the excess where `m(e) = λ · price`, found on `[0, e*]`.
//!
//! Special cases: `d = 1` is linear (all-or-nothing up to the cap),
//! `d = 0` has no demand, and thresholds above `uf / price` demand nothing.

use super::lambert::lambert_w0;
use crate::types::Category;
use crate::utility::{excess_marginal, excess_peak};

/// How the per-category root is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Inversion {
    /// Bisection on `[0, e*]`.
    Bisection,
    /// Closed form `e = (W₀(c · e) - 1) / ln d` with `c = λ · price / uf`.
    LambertW,
    /// Newton's method, safeguarded by the `[0, e*]` bracket.
    Newton,
}

/// Demand of one category at one threshold.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Demand {
    pub excess: f64,
    pub converged: bool,
}

impl Demand {
    fn exact(excess: f64) -> Self {
        Self {
            excess,
            converged: true,
        }
    }
}

/// Excess quantity demanded at threshold `lambda`, capped at `cap`.
pub(crate) fn excess_demand(
    category: &Category,
    lambda: f64,
    cap: f64,
    inversion: Inversion,
    max_iterations: usize,
) -> Demand {
    let uf = category.utility_factor;
    let target = lambda * category.price;
    if uf <= 0.0 || cap <= 0.0 {
        return Demand::exact(0.0);
    }

    let Some(peak) = excess_peak(category) else {
        return Demand::exact(if uf > target { cap } else { 0.0 });
    };
    if peak <= 0.0 || target >= uf {
        return Demand::exact(0.0);
    }
    if target <= 0.0 {
        return Demand::exact(peak.min(cap));
    }

    let demand = match inversion {
        Inversion::Bisection => bisect(category, target, peak, max_iterations),
        Inversion::LambertW => lambert(category, target, max_iterations),
        Inversion::Newton => newton(category, target, peak, max_iterations),
    };
    Demand {
        excess: demand.excess.clamp(0.0, peak).min(cap),
        converged: demand.converged,
    }
}

fn bisect(category: &Category, target: f64, peak: f64, max_iterations: usize) -> Demand {
    let (mut lo, mut hi) = (0.0, peak);
    for _ in 0..max_iterations {
        let mid = 0.5 * (lo + hi);
        if excess_marginal(category, mid) > target {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= 1e-12 * (1.0 + peak) {
            return Demand::exact(0.5 * (lo + hi));
        }
    }
    Demand {
        excess: 0.5 * (lo + hi),
        converged: false,
    }
}

fn lambert(category: &Category, target: f64, max_iterations: usize) -> Demand {
    let ln_d = category.diminishing_factor.ln();
    let c = target / category.utility_factor;
    match lambert_w0(c * std::f64::consts::E, max_iterations) {
        Some(w) if ln_d < 0.0 => {
            let excess = (w - 1.0) / ln_d;
            if excess.is_finite() {
                Demand::exact(excess)
            } else {
                fallback()
            }
        }
        _ => fallback(),
    }
}

/// Falls back to the basic-need boundary: no excess.
fn fallback() -> Demand {
    Demand {
        excess: 0.0,
        converged: false,
    }
}

fn newton(category: &Category, target: f64, peak: f64, max_iterations: usize) -> Demand {
    let uf = category.utility_factor;
    let d = category.diminishing_factor;
    let ln_d = d.ln();
    let (mut lo, mut hi) = (0.0, peak);
    let mut e = 0.5 * peak;

    for _ in 0..max_iterations {
        let g = excess_marginal(category, e) - target;
        if g.abs() <= 1e-12 * uf {
            return Demand::exact(e);
        }
        if g > 0.0 {
            lo = e;
        } else {
            hi = e;
        }
        // m'(e) = uf · d^e · ln d · (2 + e ln d), negative on [0, e*].
        let slope = uf * d.powf(e) * ln_d * (2.0 + e * ln_d);
        let step = e - g / slope;
        e = if step.is_finite() && step > lo && step < hi {
            step
        } else {
            0.5 * (lo + hi)
        };
        if hi - lo <= 1e-12 * (1.0 + peak) {
            return Demand::exact(e);
        }
    }
    Demand {
        excess: e,
        converged: false,
    }
}
