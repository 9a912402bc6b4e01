//! Error types for the cache
//!
//! Cache reads and writes are total and report misses through `Option`.
//! Only construction and configuration can fail.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction and configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must be strictly positive
    #[error("Invalid capacity: must be greater than zero")]
    InvalidCapacity,

    /// Expiration timeout below zero
    #[error("Negative timeout: {0}ms")]
    NegativeTimeout(i64),

    /// Configuration value that could not be parsed
    #[error("Invalid config value for {name}: {value:?}")]
    InvalidConfig { name: &'static str, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
