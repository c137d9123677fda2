//! Bucketed strategies.
//!
//! Both strategies rank categories by utility per dollar instead of looking
//! at marginal utility:
//!
//! - [`Proportional`]: one bucket, the budget split by `uf / price`. Fast
//!   and predictable, with no basic-need guarantee.
//! - [`BucketSmoothing`]: several efficiency buckets funded best first,
//!   with any surplus spread across them afterwards.

mod config;
mod proportional;
mod smoothing;

pub use config::BucketConfig;
pub use proportional::Proportional;
pub use smoothing::BucketSmoothing;
