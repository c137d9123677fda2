//! Basic-needs water-filling.
//!
//! Raises a single water level λ over all categories with an outstanding
//! basic need. At level λ a category receives `λ · u(b)` dollars, where
//! `u(b)` is the utility of its full basic bundle, capped at the cost of
//! that bundle. Categories that hit the cap are saturated: they become a
//! fixed cost and the level is re-solved over the rest, until no new
//! category saturates.
//!
//! Spend per dollar of need is `λ · u(b) / (p · b)`, so the categories with
//! the best necessity-weighted value per dollar saturate first.

use super::config::WaterFillingConfig;
use crate::ledger::{Ledger, QUANTITY_EPS};
use crate::utility::basic_need_utility;

/// Outcome of the needs stage.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NeedsOutcome {
    /// Final water level; infinite when every need was affordable.
    pub level: f64,

    /// Number of categories whose need was fully funded.
    pub saturated: usize,

    /// Categories with a need that stayed partially funded.
    pub partial: usize,

    /// Fixed-point rounds used.
    pub rounds: usize,
}

impl NeedsOutcome {
    pub fn all_saturated(&self) -> bool {
        self.partial == 0
    }
}

pub(crate) fn fill_needs(ledger: &mut Ledger<'_>, config: &WaterFillingConfig) -> NeedsOutcome {
    let needy: Vec<usize> = ledger
        .paid_indices()
        .into_iter()
        .filter(|&i| ledger.category(i).basic_need_amount > ledger.quantity(i) + QUANTITY_EPS)
        .collect();
    let cost = |ledger: &Ledger<'_>, i: usize| {
        let c = ledger.category(i);
        (c.basic_need_amount - ledger.quantity(i)).max(0.0) * c.price
    };

    let available = ledger.remaining();
    let total: f64 = needy.iter().map(|&i| cost(ledger, i)).sum();
    if total <= available {
        for &i in &needy {
            let need = ledger.category(i).basic_need_amount - ledger.quantity(i);
            ledger.buy(i, need);
        }
        return NeedsOutcome {
            level: f64::INFINITY,
            saturated: needy.len(),
            partial: 0,
            rounds: 0,
        };
    }

    let mut saturated = vec![false; needy.len()];
    let mut level = 0.0;
    let mut rounds = 0;
    while rounds < config.max_rounds {
        rounds += 1;
        let fixed: f64 = needy
            .iter()
            .zip(&saturated)
            .filter(|&(_, &s)| s)
            .map(|(&i, _)| cost(ledger, i))
            .sum();
        let weight: f64 = needy
            .iter()
            .zip(&saturated)
            .filter(|&(_, &s)| !s)
            .map(|(&i, _)| basic_need_utility(ledger.category(i)).max(0.0))
            .sum();
        if weight <= 0.0 {
            level = 0.0;
            break;
        }
        level = ((available - fixed) / weight).max(0.0);

        let mut changed = false;
        for (slot, &i) in needy.iter().enumerate() {
            if !saturated[slot]
                && level * basic_need_utility(ledger.category(i)) >= cost(ledger, i)
            {
                saturated[slot] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut partial = 0;
    for (slot, &i) in needy.iter().enumerate() {
        if saturated[slot] {
            let need = ledger.category(i).basic_need_amount - ledger.quantity(i);
            ledger.buy(i, need);
        } else {
            let amount = (level * basic_need_utility(ledger.category(i)).max(0.0))
                .min(cost(ledger, i));
            ledger.spend(i, amount);
            partial += 1;
        }
    }

    NeedsOutcome {
        level,
        saturated: needy.len() - partial,
        partial,
        rounds,
    }
}
