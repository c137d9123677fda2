//! Household budget allocation engine.
//!
//! Given a list of spending [`Category`] definitions and a budget, each
//! strategy returns an [`AllocationResult`]: units bought and money spent
//! per category, the total utility achieved and an advisory message.
//!
//! Strategies:
//!
//! - **Greedy** ([`greedy`]): unit-by-unit purchases ranked by marginal
//!   utility per dollar. Priority Necessity (the default) meets basic needs
//!   strictly in necessity order first; Pure Utility does not; Balanced
//!   Approach reserves a share of the budget for basic needs.
//! - **Water-filling** ([`marginal`]): a shared marginal-utility threshold
//!   is searched by bisection, Lambert W inversion or dual gradient steps.
//! - **Buckets** ([`bucket`]): utility-per-dollar proportional split, or
//!   rank buckets funded best first with surplus smoothing.
//!
//! All of them share one [`utility`] function, one free-good policy
//! (`price <= 0` is granted its basic need at zero cost and never ranked)
//! and one result format. [`AlgorithmRegistry`] holds them in display
//! order for selection.
//!
//! # Quick start
//!
//! ```
//! use u_budget::{AlgorithmRegistry, Category};
//! use u_budget::metrics::basic_needs_satisfaction;
//!
//! let categories = vec![
//!     Category::new("Food", 2.0).with_basic_need(10.0).with_necessity(10.0),
//!     Category::new("Cinema", 12.0).with_utility_factor(3.0).with_necessity(2.0),
//! ];
//! let registry = AlgorithmRegistry::with_defaults();
//! let result = registry.calculate(&categories, 50.0);
//! assert!(result.get("Food").unwrap().meets_basic_need());
//! assert_eq!(basic_needs_satisfaction(&result), 100.0);
//! ```
//!
//! Strategies never fail: shortfalls and non-convergence are reported in
//! [`AllocationResult::message`]. [`AllocError`] is only raised by
//! configuration, registry selection and [`input`] parsing.

pub mod algorithm;
pub mod bucket;
pub mod error;
pub mod greedy;
pub mod input;
mod ledger;
pub mod marginal;
pub mod metrics;
pub mod presets;
pub mod registry;
pub mod types;
pub mod utility;

pub use algorithm::{zero_allocation, AllocationAlgorithm};
pub use error::AllocError;
pub use ledger::REPORT_NECESSITY_THRESHOLD;
pub use registry::{AlgorithmInfo, AlgorithmRegistry};
pub use types::{Allocation, AllocationResult, Category};
