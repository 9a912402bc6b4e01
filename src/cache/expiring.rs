//! Expiring Cache Module
//!
//! Time-based invalidation layered over a size-bounded [`BaseCache`].
//!
//! The base cache keeps values and evicts by recency. This layer keeps a
//! separate deadline per key and turns any read past that deadline into a
//! miss, purging the stale entry from the base cache on the way out.
//!
//! # Locking
//!
//! The base cache and the deadline map have independent locks. A read first
//! asks the base cache for a value and only then takes the deadline lock, so
//! two concurrent reads that both trigger create-on-miss for the same key
//! race on the deadline they record. The last writer wins; the skew is bounded
//! by scheduling latency. Lock order is always deadlines, then base.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::{BaseCache, CacheStats, Clock, DeadlineMap, LruCache, MonotonicClock};
use crate::config::{timeout_from_millis, Config};
use crate::error::Result;

// == Expiring Cache ==
/// A cache whose entries expire a fixed `timeout` after they were last
/// written or created.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use expiring_lru::ExpiringCache;
///
/// let cache = ExpiringCache::new(100, Duration::from_secs(60)).unwrap();
/// cache.put("session", 7);
/// assert_eq!(cache.get(&"session"), Some(7));
/// ```
pub struct ExpiringCache<K, V, B = LruCache<K, V>> {
    base: B,
    deadlines: Mutex<DeadlineMap<K>>,
    timeout: Duration,
    clock: Arc<dyn Clock>,
    _value: PhantomData<fn() -> V>,
}

impl<K, V> ExpiringCache<K, V, LruCache<K, V>>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructors ==
    /// Creates a cache backed by an [`LruCache`] of `capacity` entries.
    ///
    /// A zero `timeout` makes every entry stale the instant it is written.
    pub fn new(capacity: usize, timeout: Duration) -> Result<Self> {
        Ok(Self::from_base(LruCache::new(capacity)?, timeout))
    }

    /// Like [`new`](Self::new), with the timeout given in signed milliseconds.
    ///
    /// # Errors
    /// [`CacheError::NegativeTimeout`](crate::CacheError::NegativeTimeout)
    /// if `timeout_ms` is below zero.
    pub fn with_timeout_ms(capacity: usize, timeout_ms: i64) -> Result<Self> {
        Self::new(capacity, timeout_from_millis(timeout_ms)?)
    }

    /// Creates a cache from validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity, config.timeout()?)
    }
}

impl<K, V, B> ExpiringCache<K, V, B>
where
    K: Eq + Hash + Clone,
    B: BaseCache<K, V>,
{
    /// Wraps an existing base cache, using the monotonic system clock.
    pub fn from_base(base: B, timeout: Duration) -> Self {
        Self::with_clock(base, timeout, Arc::new(MonotonicClock))
    }

    /// Wraps an existing base cache with an explicit time source.
    pub fn with_clock(base: B, timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        debug!(timeout_ms = timeout.as_millis() as u64, "Creating expiring cache");
        Self {
            base,
            deadlines: Mutex::new(DeadlineMap::new()),
            timeout,
            clock,
            _value: PhantomData,
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// A value synthesized by the base cache during this call gets a fresh
    /// deadline. A value found past its deadline, or without one, is removed
    /// from the base cache and reported as a miss; the hit the base cache
    /// counted for it is taken back.
    ///
    /// The hit count is only decremented for values the base cache counted as
    /// hits. A value synthesized during this call that is already stale (a
    /// zero timeout) leaves the hit count untouched, since the base cache
    /// recorded that read as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let created_before = self.base.creation_count();
        let value = self.base.get(key)?;

        let mut deadlines = self.deadlines.lock();
        let now = self.clock.now();
        let created = self.base.creation_count() > created_before;
        if created {
            deadlines.set(key.clone(), now, self.timeout);
        }

        if deadlines.is_expired(key, now) {
            // A synthesized value was counted as a miss, not a hit
            if !created {
                self.base.decrement_hit_count();
            }
            self.base.remove(key);
            deadlines.remove(key);
            trace!("Purged expired entry on read");
            return None;
        }

        Some(value)
    }

    // == Put ==
    /// Caches `value` for `key` and restarts its expiration timeout.
    ///
    /// Returns the previous value mapped by `key`, expired or not.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let previous = self.base.put(key.clone(), value);
        let mut deadlines = self.deadlines.lock();
        deadlines.set(key, self.clock.now(), self.timeout);
        previous
    }

    // == Remove ==
    /// Removes the entry for `key`, returning its previous value.
    pub fn remove(&self, key: &K) -> Option<V> {
        let previous = self.base.remove(key);
        if previous.is_some() {
            self.deadlines.lock().remove(key);
        }
        previous
    }

    // == Time Remaining ==
    /// Returns how long `key` stays fresh, without touching recency or
    /// counters.
    ///
    /// `Some(Duration::ZERO)` means the entry is stored but already stale.
    /// `None` means the base cache does not hold `key` or no deadline is
    /// recorded for it.
    pub fn time_remaining(&self, key: &K) -> Option<Duration> {
        let remaining = self.deadlines.lock().remaining(key, self.clock.now())?;
        self.base.contains_key(key).then_some(remaining)
    }

    // == Purge Expired ==
    /// Removes every entry whose deadline has passed, and forgets deadlines
    /// of keys the base cache evicted on its own.
    ///
    /// Returns the number of values removed from the base cache.
    pub fn purge_expired(&self) -> usize {
        let mut deadlines = self.deadlines.lock();
        let now = self.clock.now();

        let mut removed = 0;
        for key in deadlines.expired_keys(now) {
            if self.base.remove(&key).is_some() {
                removed += 1;
            }
            deadlines.remove(&key);
        }

        let tracked = deadlines.len();
        deadlines.retain(|key| self.base.contains_key(key));
        let orphaned = tracked - deadlines.len();

        debug!(removed, orphaned, "Purged expired entries");
        removed
    }

    // == Clear ==
    /// Evicts every entry and forgets every deadline.
    pub fn clear(&self) {
        let mut deadlines = self.deadlines.lock();
        self.base.evict_all();
        deadlines.clear();
    }

    /// Number of entries held by the base cache, including stale ones not
    /// yet purged.
    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Number of recorded deadlines. May exceed [`len`](Self::len) until the
    /// next purge when the base cache evicts on its own.
    pub fn tracked_deadlines(&self) -> usize {
        self.deadlines.lock().len()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn stats(&self) -> CacheStats {
        self.base.stats()
    }

    /// The wrapped base cache.
    pub fn base(&self) -> &B {
        &self.base
    }
}

impl<K, V, B> fmt::Debug for ExpiringCache<K, V, B>
where
    K: fmt::Debug,
    B: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("base", &self.base)
            .field("deadlines", &*self.deadlines.lock())
            .field("timeout", &self.timeout)
            .field("clock", &self.clock)
            .finish()
    }
}
