//! Base Cache Contract
//!
//! The operations the expiration layer needs from the size-bounded cache it wraps.

use crate::cache::CacheStats;

// == Base Cache Trait ==
/// A size-bounded cache with optional create-on-miss.
///
/// Implementations own their own synchronization: every method takes `&self`
/// and must be safe to call from several threads at once.
pub trait BaseCache<K, V> {
    /// Returns the cached value for `key`, or synthesizes one with the
    /// create-on-miss function. Each synthesized value must advance
    /// [`creation_count`](Self::creation_count) by exactly one.
    fn get(&self, key: &K) -> Option<V>;

    /// Inserts or replaces `key`, returning the previous value.
    ///
    /// May evict other entries to stay within capacity.
    fn put(&self, key: K, value: V) -> Option<V>;

    /// Deletes `key`, returning the previous value.
    fn remove(&self, key: &K) -> Option<V>;

    /// Checks for a stored value without touching recency or counters.
    fn contains_key(&self, key: &K) -> bool;

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    fn evict_all(&self);

    /// Monotonic count of values synthesized on miss.
    fn creation_count(&self) -> u64;

    /// Number of hits recorded so far.
    fn hit_count(&self) -> u64;

    /// Takes back one recorded hit, for reads the caller reclassifies as misses.
    fn decrement_hit_count(&self);

    /// Snapshot of the cache counters and occupancy.
    fn stats(&self) -> CacheStats;
}
