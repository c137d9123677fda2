//! Error type for the edges of the engine.
//!
//! Strategy runs never fail; these errors come from configuration,
//! registry selection and form input coercion.

/// Errors raised outside of `calculate`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Algorithm index {index} out of range (registry has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Algorithm already registered: {0}")]
    DuplicateAlgorithm(String),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: String, value: String },

    #[error("Invalid category {name}: {reason}")]
    InvalidCategory { name: String, reason: String },
}
