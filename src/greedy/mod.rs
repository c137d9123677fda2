//! Unit-by-unit greedy strategies.
//!
//! All three share the same marginal-utility loop: buy one unit of the
//! category with the highest `(u(q + 1) - u(q)) / price` until the budget
//! runs out or no purchase adds utility. They differ in what happens
//! before that loop:
//!
//! - [`PriorityNecessity`]: basic needs first, strictly in necessity order.
//! - [`PureUtility`]: nothing; necessity only shapes the utility curve.
//! - [`BalancedApproach`]: a fixed share of the budget is spread over basic
//!   needs by necessity weight.

mod balanced;
mod config;
mod engine;
mod priority;
mod pure_utility;

pub use balanced::BalancedApproach;
pub use config::{BalancedConfig, GreedyConfig};
pub use priority::PriorityNecessity;
pub use pure_utility::PureUtility;
