//! Principal branch of the Lambert W function.
//!
//! # Reference
//!
//! Corless, Gonnet, Hare, Jeffrey & Knuth (1996), "On the Lambert W
//! Function", *Advances in Computational Mathematics* 5, 329-359.

const BRANCH_POINT: f64 = -1.0 / std::f64::consts::E;

/// Solves `w · e^w = x` for the principal branch `W₀`, `x >= -1/e`.
///
/// Uses Halley's iteration from a regime-dependent initial guess. Returns
/// `None` outside the domain, on non-finite intermediate values, or when
/// `max_iterations` pass without convergence.
///
/// # Examples
///
/// ```
/// use u_budget::marginal::lambert_w0;
///
/// let w = lambert_w0(1.0, 50).unwrap();
/// assert!((w - 0.567_143_290_409_783_8).abs() < 1e-12);
/// ```
pub fn lambert_w0(x: f64, max_iterations: usize) -> Option<f64> {
    if !x.is_finite() || x < BRANCH_POINT {
        return None;
    }
    if x == 0.0 {
        return Some(0.0);
    }
    if (x - BRANCH_POINT).abs() < 1e-15 {
        return Some(-1.0);
    }

    let mut w = initial_guess(x);
    for _ in 0..max_iterations {
        let ew = w.exp();
        let f = w * ew - x;
        let wp1 = w + 1.0;
        if wp1.abs() < 1e-15 {
            return Some(-1.0);
        }
        let denom = ew * wp1 - (w + 2.0) * f / (2.0 * wp1);
        let next = w - f / denom;
        if !next.is_finite() {
            return None;
        }
        if (next - w).abs() <= 1e-14 * (1.0 + next.abs()) {
            return Some(next);
        }
        w = next;
    }
    None
}

fn initial_guess(x: f64) -> f64 {
    if x < -0.25 {
        // Series around the branch point.
        let p = (2.0 * (std::f64::consts::E * x + 1.0)).sqrt();
        -1.0 + p - p * p / 3.0 + 11.0 / 72.0 * p * p * p
    } else if x < 3.0 {
        (1.0 + x).ln()
    } else {
        let l1 = x.ln();
        let l2 = l1.ln();
        l1 - l2 + l2 / l1
    }
}
