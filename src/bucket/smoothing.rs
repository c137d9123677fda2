//! Bucketed basic-need funding with surplus smoothing.
//!
//! # Algorithm
//!
//! 1. Rank paid categories by efficiency, `u(b) / cost(b)` (falling back to
//!    `uf / price` without a basic need), and cut the ranking into
//!    `bucket_count` contiguous buckets.
//! 2. Walk the buckets best first. A bucket whose basic needs fit in the
//!    remaining budget is funded in full. The first bucket that does not
//!    fit shares what is left in proportion to efficiency, each category
//!    capped at its own need cost, and funding stops there.
//! 3. If every bucket was funded, the surplus is smoothed over several
//!    rounds: bucket `k` weighs `2^-k`, categories within a bucket weigh
//!    `uf / price`, and nobody is pushed past the peak of its excess
//!    utility. Whatever a round cannot place carries over to the next.

use super::config::BucketConfig;
use crate::algorithm::AllocationAlgorithm;
use crate::error::AllocError;
use crate::ledger::{Ledger, QUANTITY_EPS};
use crate::types::{AllocationResult, Category};
use crate::utility::{efficiency, excess_peak};

/// Funds basic needs bucket by bucket, then smooths the surplus.
///
/// # Examples
///
/// ```
/// use u_budget::{AllocationAlgorithm, Category};
/// use u_budget::bucket::BucketSmoothing;
///
/// let categories = vec![
///     Category::new("Rice", 1.0).with_basic_need(5.0).with_necessity(10.0),
///     Category::new("Films", 8.0).with_basic_need(1.0).with_necessity(2.0),
/// ];
/// let result = BucketSmoothing::new().calculate(&categories, 6.0);
/// assert!(result.get("Rice").unwrap().meets_basic_need());
/// assert!(result.message.unwrap().contains("2 buckets"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BucketSmoothing {
    config: BucketConfig,
}

impl BucketSmoothing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the strategy with a validated configuration.
    pub fn with_config(config: BucketConfig) -> Result<Self, AllocError> {
        config.validate()?;
        Ok(Self { config })
    }
}

/// Paid categories ranked by efficiency, cut into contiguous buckets.
fn buckets(ledger: &Ledger<'_>, bucket_count: usize) -> Vec<Vec<usize>> {
    let mut ranked = ledger.paid_indices();
    if ranked.is_empty() {
        return Vec::new();
    }
    ranked.sort_by(|&a, &b| efficiency(ledger.category(b)).total_cmp(&efficiency(ledger.category(a))));
    let count = bucket_count.clamp(1, ranked.len());
    let size = ranked.len().div_ceil(count);
    ranked.chunks(size).map(<[usize]>::to_vec).collect()
}

fn need_cost(ledger: &Ledger<'_>, i: usize) -> f64 {
    let c = ledger.category(i);
    (c.basic_need_amount - ledger.quantity(i)).max(0.0) * c.price
}

/// Shares the remaining budget across a bucket in proportion to
/// efficiency, capping each category at its need cost and handing the
/// overflow to the others.
fn share_shortfall(ledger: &mut Ledger<'_>, bucket: &[usize]) {
    let mut open: Vec<usize> = bucket
        .iter()
        .copied()
        .filter(|&i| need_cost(ledger, i) > 0.0)
        .collect();
    while !open.is_empty() {
        let pool = ledger.remaining();
        let weight: f64 = open.iter().map(|&i| efficiency(ledger.category(i)).max(0.0)).sum();
        if pool <= QUANTITY_EPS || weight <= 0.0 {
            return;
        }
        let capped: Vec<usize> = open
            .iter()
            .copied()
            .filter(|&i| pool * efficiency(ledger.category(i)).max(0.0) / weight >= need_cost(ledger, i))
            .collect();
        if capped.is_empty() {
            for &i in &open {
                let share = pool * efficiency(ledger.category(i)).max(0.0) / weight;
                ledger.spend(i, share);
            }
            return;
        }
        for &i in &capped {
            let need = ledger.category(i).basic_need_amount - ledger.quantity(i);
            ledger.buy(i, need);
        }
        open.retain(|i| !capped.contains(i));
    }
}

/// Spreads the surplus over all buckets. Returns the rounds used.
fn smooth_surplus(ledger: &mut Ledger<'_>, buckets: &[Vec<usize>], rounds: usize) -> usize {
    let mut used = 0;
    for _ in 0..rounds {
        let pool = ledger.remaining();
        if pool <= QUANTITY_EPS {
            break;
        }

        let mut targets = Vec::new();
        for (rank, bucket) in buckets.iter().enumerate() {
            let bucket_weight = 0.5f64.powi(rank as i32);
            for &i in bucket {
                let c = ledger.category(i);
                let excess = (ledger.quantity(i) - c.basic_need_amount).max(0.0);
                let room = match excess_peak(c) {
                    Some(peak) => peak - excess,
                    None => f64::INFINITY,
                };
                let weight = bucket_weight * (c.utility_factor / c.price).max(0.0);
                if room > QUANTITY_EPS && weight > 0.0 {
                    targets.push((i, weight, room));
                }
            }
        }
        let total: f64 = targets.iter().map(|&(_, w, _)| w).sum();
        if targets.is_empty() || total <= 0.0 {
            break;
        }

        used += 1;
        for (i, weight, room) in targets {
            let share = pool * weight / total;
            let units = (share / ledger.category(i).price).min(room);
            ledger.buy(i, units);
        }
    }
    used
}

impl AllocationAlgorithm for BucketSmoothing {
    fn name(&self) -> &str {
        "Bucket Smoothing"
    }

    fn description(&self) -> &str {
        "Funds basic needs bucket by bucket in utility-per-dollar rank, then smooths the surplus across buckets."
    }

    fn calculate(&self, categories: &[Category], budget: f64) -> AllocationResult {
        let mut ledger = Ledger::new(categories, budget);
        let buckets = buckets(&ledger, self.config.bucket_count);

        let mut funded = 0;
        let mut short = None;
        for (rank, bucket) in buckets.iter().enumerate() {
            let cost: f64 = bucket.iter().map(|&i| need_cost(&ledger, i)).sum();
            if cost <= ledger.remaining() {
                for &i in bucket {
                    let need = ledger.category(i).basic_need_amount - ledger.quantity(i);
                    if need > 0.0 {
                        ledger.buy(i, need);
                    }
                }
                funded += 1;
            } else {
                share_shortfall(&mut ledger, bucket);
                short = Some(rank);
                break;
            }
        }

        let plural = if buckets.len() == 1 { "bucket" } else { "buckets" };
        let summary = match short {
            Some(rank) => format!(
                "{} {plural} by utility per dollar; {funded} fully funded, bucket {} shared the shortfall by efficiency",
                buckets.len(),
                rank + 1
            ),
            None => {
                let rounds = smooth_surplus(&mut ledger, &buckets, self.config.smoothing_rounds);
                format!(
                    "{} {plural} by utility per dollar; all basic needs funded in rank order, surplus smoothed over {rounds} rounds",
                    buckets.len()
                )
            }
        };
        tracing::debug!(buckets = buckets.len(), funded, "bucket funding finished");
        ledger.note(summary);
        ledger.finish(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Vec<Category> {
        vec![
            // efficiency 10 * 1 / 1 = 10
            Category::new("Water", 1.0)
                .with_basic_need(10.0)
                .with_necessity(10.0),
            // efficiency 2 * 8 / 4 = 4
            Category::new("Food", 4.0)
                .with_utility_factor(2.0)
                .with_basic_need(5.0)
                .with_necessity(8.0),
            // efficiency 5 / 10 = 0.5
            Category::new("Shoes", 10.0)
                .with_basic_need(2.0)
                .with_necessity(5.0),
            // efficiency 3 / 2 = 1.5
            Category::new("Radio", 2.0)
                .with_utility_factor(3.0)
                .with_diminishing_factor(0.9)
                .with_necessity(1.0),
        ]
    }

    #[test]
    fn test_buckets_follow_efficiency_rank() {
        let cats = cats();
        let ledger = Ledger::new(&cats, 0.0);
        assert_eq!(buckets(&ledger, 2), vec![vec![0, 1], vec![3, 2]]);
        assert_eq!(buckets(&ledger, 10).len(), 4);
        assert_eq!(buckets(&ledger, 1), vec![vec![0, 1, 3, 2]]);
    }

    #[test]
    fn test_higher_bucket_funded_first() {
        // Bucket 1 (Water, Food) costs 30; bucket 2 (Radio, Shoes) 20.
        let algo = BucketSmoothing::with_config(BucketConfig::default().with_bucket_count(2)).unwrap();
        let result = algo.calculate(&cats(), 40.0);
        assert!(result.get("Water").unwrap().meets_basic_need());
        assert!(result.get("Food").unwrap().meets_basic_need());
        // 10 left for Shoes' 20 need; Radio has no need.
        assert!((result.get("Shoes").unwrap().spent - 10.0).abs() < 1e-9);
        let msg = result.message.unwrap();
        assert!(msg.contains("2 buckets"));
        assert!(msg.contains("bucket 2 shared the shortfall"));
    }

    #[test]
    fn test_shortfall_split_by_efficiency() {
        let algo = BucketSmoothing::with_config(BucketConfig::default().with_bucket_count(1)).unwrap();
        let cats = vec![
            Category::new("Water", 1.0)
                .with_basic_need(100.0)
                .with_necessity(10.0),
            Category::new("Food", 4.0)
                .with_utility_factor(2.0)
                .with_basic_need(50.0)
                .with_necessity(8.0),
        ];
        // Efficiencies 10 and 4: 14 splits 10 / 4.
        let result = algo.calculate(&cats, 14.0);
        assert!((result.allocations[0].spent - 10.0).abs() < 1e-9);
        assert!((result.allocations[1].spent - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_shortfall_overflow_redistributed() {
        let algo = BucketSmoothing::with_config(BucketConfig::default().with_bucket_count(1)).unwrap();
        let cats = vec![
            Category::new("Water", 1.0)
                .with_basic_need(2.0)
                .with_necessity(10.0),
            Category::new("Food", 4.0)
                .with_utility_factor(2.0)
                .with_basic_need(50.0)
                .with_necessity(8.0),
        ];
        // Water's share of 14 would be 10 but its need costs 2; Food gets 12.
        let result = algo.calculate(&cats, 14.0);
        assert!((result.allocations[0].spent - 2.0).abs() < 1e-9);
        assert!((result.allocations[1].spent - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_surplus_smoothed_within_peaks() {
        let result = BucketSmoothing::new().calculate(&cats(), 500.0);
        for a in &result.allocations {
            assert!(a.meets_basic_need());
            if let Some(peak) = excess_peak(&a.category) {
                assert!(a.quantity - a.category.basic_need_amount <= peak + 1e-9);
            }
        }
        assert!(result.get("Radio").unwrap().quantity > 0.0);
        assert!(result.total_spent <= 500.0 + 1e-6);
        assert!(result.message.unwrap().contains("surplus smoothed"));
    }

    #[test]
    fn test_empty_input() {
        let result = BucketSmoothing::new().calculate(&[], 10.0);
        assert!(result.allocations.is_empty());
        assert!(result.message.unwrap().contains("0 buckets"));
    }
}
