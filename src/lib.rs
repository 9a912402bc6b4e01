//! Expiring LRU - A bounded cache with time-based expiration
//!
//! [`LruCache`] evicts least recently used entries once its capacity is
//! exceeded. [`ExpiringCache`] wraps any [`BaseCache`] and additionally drops
//! entries a fixed timeout after they were written or created, however often
//! they are read.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    BaseCache, CacheStats, Clock, ExpiringCache, LruCache, LruCacheBuilder, MonotonicClock,
};
#[cfg(any(test, feature = "test-util"))]
pub use cache::ManualClock;
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_purge_task;
