//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum aggregate size of the underlying LRU cache
    pub capacity: usize,
    /// Expiration timeout in milliseconds, applied to every entry
    pub timeout_ms: i64,
    /// Background purge task interval in milliseconds
    pub purge_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset variables fall back to their defaults; set but unparseable
    /// variables are reported as [`CacheError::InvalidConfig`].
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache size (default: 1000)
    /// - `CACHE_TIMEOUT_MS` - Entry timeout in milliseconds (default: 300000)
    /// - `PURGE_INTERVAL_MS` - Purge frequency in milliseconds (default: 1000)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            capacity: parse_var("CACHE_CAPACITY", defaults.capacity)?,
            timeout_ms: parse_var("CACHE_TIMEOUT_MS", defaults.timeout_ms)?,
            purge_interval_ms: parse_var("PURGE_INTERVAL_MS", defaults.purge_interval_ms)?,
        };
        config.validate()?;
        Ok(config)
    }

    // == Validate ==
    /// Checks that capacity is positive and the timeout is not negative.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }
        if self.timeout_ms < 0 {
            return Err(CacheError::NegativeTimeout(self.timeout_ms));
        }
        Ok(())
    }

    /// Returns the validated timeout as a `Duration`.
    pub fn timeout(&self) -> Result<Duration> {
        timeout_from_millis(self.timeout_ms)
    }

    /// Returns the purge task interval.
    pub fn purge_interval(&self) -> Duration {
        Duration::from_millis(self.purge_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            timeout_ms: 300_000,
            purge_interval_ms: 1000,
        }
    }
}

/// Converts a signed millisecond count to a `Duration`, rejecting negatives.
pub(crate) fn timeout_from_millis(timeout_ms: i64) -> Result<Duration> {
    u64::try_from(timeout_ms)
        .map(Duration::from_millis)
        .map_err(|_| CacheError::NegativeTimeout(timeout_ms))
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidConfig { name, value }),
        Err(_) => Ok(default),
    }
}
