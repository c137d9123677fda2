//! Bucket smoothing configuration.

use crate::error::AllocError;

/// Configuration for [`BucketSmoothing`](super::BucketSmoothing).
///
/// # Examples
///
/// ```
/// use u_budget::bucket::BucketConfig;
///
/// let config = BucketConfig::default().with_bucket_count(4);
/// assert_eq!(config.bucket_count, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BucketConfig {
    /// Number of utility-per-dollar buckets. Capped at the number of paid
    /// categories.
    pub bucket_count: usize,

    /// Rounds used to spread the surplus once every basic need is funded.
    pub smoothing_rounds: usize,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            bucket_count: 3,
            smoothing_rounds: 8,
        }
    }
}

impl BucketConfig {
    /// Sets the number of buckets.
    pub fn with_bucket_count(mut self, n: usize) -> Self {
        self.bucket_count = n;
        self
    }

    /// Sets the number of surplus smoothing rounds.
    pub fn with_smoothing_rounds(mut self, n: usize) -> Self {
        self.smoothing_rounds = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AllocError> {
        if self.bucket_count == 0 {
            return Err(AllocError::InvalidConfig(
                "bucket_count must be positive".into(),
            ));
        }
        Ok(())
    }
}
