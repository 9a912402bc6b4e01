//! Cache Module
//!
//! Provides a size-bounded LRU cache and a time-based expiration layer on top of it.

mod base;
mod builder;
mod clock;
mod deadline;
mod expiring;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use base::BaseCache;
pub use builder::LruCacheBuilder;
pub use clock::{Clock, MonotonicClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use deadline::DeadlineMap;
pub use expiring::ExpiringCache;
pub use lru::LruTracker;
pub use stats::{CacheStats, Counters};
pub use store::LruCache;
