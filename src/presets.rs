//! Static category sets and a seeded generator.
//!
//! Presets are plain data fed through the same interface as user input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Category;

/// Monthly budget the default household is sized for.
pub const DEFAULT_BUDGET: f64 = 2000.0;

/// Daily budget the consumption scenario is sized for.
pub const DAILY_BUDGET: f64 = 166.0;

fn category(name: &str, price: f64, uf: f64, basic: f64, d: f64, necessity: f64) -> Category {
    Category::new(name, price)
        .with_utility_factor(uf)
        .with_basic_need(basic)
        .with_diminishing_factor(d)
        .with_necessity(necessity)
}

/// A small monthly household: eight categories from housing to leisure.
pub fn default_household() -> Vec<Category> {
    vec![
        category("Housing", 900.0, 5.0, 1.0, 0.3, 10.0),
        category("Food", 10.0, 3.0, 30.0, 0.9, 10.0),
        category("Utilities", 50.0, 2.0, 2.0, 0.6, 9.0),
        category("Healthcare", 60.0, 4.0, 1.0, 0.5, 8.0),
        category("Transport", 2.5, 1.5, 40.0, 0.9, 7.0),
        category("Clothing", 40.0, 2.0, 1.0, 0.7, 5.0),
        category("Education", 100.0, 3.0, 0.0, 0.8, 4.0),
        category("Entertainment", 15.0, 2.5, 0.0, 0.85, 2.0),
    ]
}

/// One day of consumption for a single person.
///
/// Thirty categories ranging from tap water at 0.009 per litre (basic need
/// 1750) through food, housing, hygiene, health and transport to luxuries
/// priced 600 and up. Sized for [`DAILY_BUDGET`]: every necessity-10 need
/// fits, the luxuries do not.
pub fn daily_consumption() -> Vec<Category> {
    vec![
        // Essentials
        category("Water", 0.009, 1.0, 1750.0, 0.5, 10.0),
        category("Bread", 0.5, 2.0, 4.0, 0.8, 10.0),
        category("Rice", 0.3, 2.0, 3.0, 0.8, 10.0),
        category("Vegetables", 0.4, 2.5, 5.0, 0.8, 10.0),
        category("Rent", 40.0, 3.0, 1.0, 0.5, 10.0),
        category("Electricity", 0.25, 1.5, 20.0, 0.7, 10.0),
        category("Heating", 0.1, 1.5, 30.0, 0.7, 9.0),
        category("Milk", 0.9, 1.5, 1.0, 0.8, 9.0),
        category("Medicine", 3.0, 3.0, 1.0, 0.5, 9.0),
        category("Eggs", 0.25, 1.5, 2.0, 0.8, 8.0),
        category("Fruit", 0.5, 2.0, 2.0, 0.85, 8.0),
        category("Soap", 1.2, 1.0, 1.0, 0.6, 8.0),
        category("Toothpaste", 0.8, 1.0, 1.0, 0.5, 8.0),
        // Everyday
        category("Public transport", 3.0, 1.5, 2.0, 0.6, 7.0),
        category("Phone", 1.0, 1.0, 1.0, 0.5, 7.0),
        category("Internet", 1.5, 1.2, 1.0, 0.5, 6.0),
        category("Clothing", 5.0, 1.5, 1.0, 0.7, 6.0),
        category("Laundry", 2.0, 1.0, 1.0, 0.6, 6.0),
        category("Meat", 4.0, 2.5, 1.0, 0.8, 5.0),
        category("Cheese", 2.0, 2.0, 1.0, 0.8, 5.0),
        category("Coffee", 0.5, 2.0, 2.0, 0.85, 4.0),
        // Leisure
        category("Streaming", 0.5, 1.0, 1.0, 0.5, 3.0),
        category("Books", 10.0, 2.0, 0.0, 0.9, 3.0),
        category("Gym", 2.0, 1.5, 0.0, 0.8, 3.0),
        category("Cinema", 12.0, 3.0, 0.0, 0.8, 2.0),
        category("Restaurant", 25.0, 4.0, 0.0, 0.8, 2.0),
        // Luxuries
        category("Jewellery", 650.0, 8.0, 0.0, 0.95, 1.0),
        category("Car lease", 720.0, 9.0, 0.0, 0.95, 1.0),
        category("Vacation", 900.0, 10.0, 0.0, 0.95, 1.0),
        category("Designer bag", 1200.0, 8.0, 0.0, 0.95, 1.0),
    ]
}

/// `n` random categories from a fixed seed.
///
/// Prices span 0.5 to 100 with roughly one free good in twenty, half of
/// the categories have a basic need, necessity levels are whole numbers.
pub fn random_household(n: usize, seed: u64) -> Vec<Category> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let price = if rng.random_bool(0.05) {
                0.0
            } else {
                rng.random_range(0.5..100.0)
            };
            let basic = if rng.random_bool(0.5) {
                rng.random_range(1.0..20.0)
            } else {
                0.0
            };
            category(
                &format!("Category {i}"),
                price,
                rng.random_range(0.1..10.0),
                basic,
                rng.random_range(0.5..=1.0),
                rng.random_range(1..=10u8) as f64,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AllocationAlgorithm;
    use crate::greedy::PriorityNecessity;
    use crate::registry::AlgorithmRegistry;

    #[test]
    fn test_presets_valid() {
        for c in default_household().iter().chain(&daily_consumption()) {
            assert!(c.validate().is_ok(), "{}", c.name);
        }
        assert_eq!(daily_consumption().len(), 30);
    }

    #[test]
    fn test_daily_consumption_shape() {
        let cats = daily_consumption();
        let water = cats.iter().find(|c| c.name == "Water").unwrap();
        assert_eq!(water.price, 0.009);
        assert_eq!(water.basic_need_amount, 1750.0);
        let luxuries: Vec<&Category> = cats.iter().filter(|c| c.necessity_level == 1.0).collect();
        assert!(!luxuries.is_empty());
        assert!(luxuries.iter().all(|c| c.price >= 600.0));
        let essential_cost: f64 = cats
            .iter()
            .filter(|c| c.necessity_level == 10.0)
            .map(|c| c.basic_need_cost())
            .sum();
        assert!(essential_cost < DAILY_BUDGET);
    }

    #[test]
    fn test_scarcity_necessity_first() {
        let cats = daily_consumption();
        let result = PriorityNecessity::new().calculate(&cats, DAILY_BUDGET);
        assert!(result.total_spent <= DAILY_BUDGET + 1e-6);
        for a in result.allocations.iter().filter(|a| a.category.necessity_level == 10.0) {
            assert!(a.meets_basic_need(), "{} not met", a.category.name);
        }
        let message = result.message.clone().unwrap();
        let unmet = result.unmet_needs(3.0);
        if unmet.is_empty() {
            assert!(message.starts_with("All basic needs met"));
        } else {
            for a in unmet {
                assert!(message.contains(&a.category.name));
            }
        }
    }

    #[test]
    fn test_scarcity_tight_budget_names_unmet() {
        // Enough for the water and little else.
        let cats = daily_consumption();
        let result = PriorityNecessity::new().calculate(&cats, 20.0);
        let message = result.message.unwrap();
        assert!(message.starts_with("Unmet basic needs: "));
        assert!(message.contains("Rent"));
        for a in result.allocations.iter().filter(|a| a.category.necessity_level == 1.0) {
            assert_eq!(a.spent, 0.0, "{}", a.category.name);
        }
    }

    #[test]
    fn test_scarcity_every_strategy_completes() {
        let registry = AlgorithmRegistry::with_defaults();
        for (info, result) in registry.compare(&daily_consumption(), DAILY_BUDGET) {
            assert_eq!(result.allocations.len(), 30, "{}", info.name);
            assert!(result.total_spent <= DAILY_BUDGET + 1e-6, "{}", info.name);
            assert!(result.total_utility.is_finite(), "{}", info.name);
            assert!(result.message.is_some(), "{}", info.name);
        }
    }

    #[test]
    fn test_random_household_seeded() {
        let a = random_household(25, 7);
        assert_eq!(a, random_household(25, 7));
        assert_ne!(a, random_household(25, 8));
        assert!(a.iter().all(|c| c.validate().is_ok()));
    }
}
