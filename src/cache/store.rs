//! LRU Cache Store Module
//!
//! Size-bounded cache combining HashMap storage with LRU tracking and an
//! optional create-on-miss function.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::builder::LruCacheBuilder;
use crate::cache::stats::Counters;
use crate::cache::{BaseCache, CacheStats, LruTracker};
use crate::error::{CacheError, Result};

pub(crate) type CreateFn<K, V> = Box<dyn Fn(&K) -> Option<V> + Send + Sync>;
pub(crate) type SizeFn<K, V> = Box<dyn Fn(&K, &V) -> usize + Send + Sync>;

/// Stored value with the size it was charged when inserted.
#[derive(Debug)]
struct Slot<V> {
    value: V,
    size: usize,
}

/// State guarded by the cache lock.
#[derive(Debug)]
struct Inner<K, V> {
    entries: HashMap<K, Slot<V>>,
    lru: LruTracker<K>,
    size: usize,
    max_size: usize,
}

impl<K: Eq + Hash + Clone, V> Inner<K, V> {
    /// Stores `value` as the most recently used entry, returning the value it
    /// replaced.
    ///
    /// An entry larger than `max_size` is never stored: trimming would evict
    /// every older entry and then the entry itself, so that happens up front.
    fn insert(&mut self, key: K, value: V, size: usize, counters: &Counters) -> Option<V> {
        let previous = self.remove(&key);
        if size > self.max_size {
            while self.evict_oldest(counters) {}
            counters.record_eviction();
            trace!(size, max_size = self.max_size, "Evicted entry larger than capacity");
            return previous;
        }
        self.lru.touch(&key);
        self.size = self.size.saturating_add(size);
        self.entries.insert(key, Slot { value, size });
        previous
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.entries.remove(key)?;
        self.lru.remove(key);
        self.size = self.size.saturating_sub(slot.size);
        Some(slot.value)
    }

    fn evict_oldest(&mut self, counters: &Counters) -> bool {
        let Some(key) = self.lru.evict_oldest() else {
            return false;
        };
        if let Some(slot) = self.entries.remove(&key) {
            self.size = self.size.saturating_sub(slot.size);
            counters.record_eviction();
        }
        true
    }

    /// Evicts least recently used entries until the size fits in `max_size`.
    fn trim_to(&mut self, max_size: usize, counters: &Counters) -> usize {
        let mut evicted = 0;
        while self.size > max_size && self.evict_oldest(counters) {
            evicted += 1;
        }
        if evicted > 0 {
            trace!(evicted, size = self.size, max_size, "Trimmed LRU cache");
        }
        evicted
    }
}

// == LRU Cache ==
/// Thread-safe cache holding at most `max_size` worth of entries.
///
/// When an insertion pushes the aggregate size past the limit, least recently
/// used entries are evicted. An entry larger than the whole capacity empties
/// the cache and is not kept.
pub struct LruCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    counters: Counters,
    create: Option<CreateFn<K, V>>,
    size_of: Option<SizeFn<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::from_parts(capacity, None, None)
    }

    /// Starts building a cache with a create-on-miss function or a custom sizer.
    pub fn builder(capacity: usize) -> LruCacheBuilder<K, V> {
        LruCacheBuilder::new(capacity)
    }

    pub(crate) fn from_parts(
        capacity: usize,
        create: Option<CreateFn<K, V>>,
        size_of: Option<SizeFn<K, V>>,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }
        debug!(capacity, with_create = create.is_some(), "Creating LRU cache");
        Ok(Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                size: 0,
                max_size: capacity,
            }),
            counters: Counters::new(),
            create,
            size_of,
        })
    }

    fn size_of(&self, key: &K, value: &V) -> usize {
        self.size_of.as_ref().map_or(1, |size_of| size_of(key, value))
    }

    // == Get ==
    /// Returns the value for `key`, marking it most recently used.
    ///
    /// On a miss the create function, if any, runs without the lock held.
    /// If another writer stored a value for `key` while it ran, that value
    /// wins and the created one is dropped.
    pub fn get(&self, key: &K) -> Option<V> {
        {
            let mut inner = self.inner.lock();
            if let Some(value) = inner.entries.get(key).map(|slot| slot.value.clone()) {
                inner.lru.touch(key);
                self.counters.record_hit();
                return Some(value);
            }
            self.counters.record_miss();
        }

        let create = self.create.as_ref()?;
        let created = create(key)?;
        let size = self.size_of(key, &created);

        let mut inner = self.inner.lock();
        self.counters.record_creation();
        if let Some(existing) = inner.entries.get(key).map(|slot| slot.value.clone()) {
            // Lost the race to a concurrent put
            inner.lru.touch(key);
            return Some(existing);
        }
        inner.insert(key.clone(), created.clone(), size, &self.counters);
        let max_size = inner.max_size;
        inner.trim_to(max_size, &self.counters);
        Some(created)
    }

    // == Put ==
    /// Caches `value` for `key` as the most recently used entry.
    ///
    /// Returns the previous value mapped by `key`.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let size = self.size_of(&key, &value);

        let mut inner = self.inner.lock();
        self.counters.record_put();
        let previous = inner.insert(key, value, size, &self.counters);
        let max_size = inner.max_size;
        inner.trim_to(max_size, &self.counters);
        previous
    }

    // == Remove ==
    /// Removes the entry for `key` if it exists, returning its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Checks for `key` without changing its recency.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    // == Trim To Size ==
    /// Evicts least recently used entries until the size is at most `max_size`.
    ///
    /// Returns the number of evicted entries.
    pub fn trim_to_size(&self, max_size: usize) -> usize {
        self.inner.lock().trim_to(max_size, &self.counters)
    }

    // == Resize ==
    /// Changes the capacity, evicting entries if the cache no longer fits.
    pub fn resize(&self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }
        let mut inner = self.inner.lock();
        inner.max_size = capacity;
        inner.trim_to(capacity, &self.counters);
        debug!(capacity, "Resized LRU cache");
        Ok(())
    }

    // == Evict All ==
    /// Evicts every entry, counting each as an eviction.
    pub fn evict_all(&self) {
        let mut inner = self.inner.lock();
        let mut evicted = 0usize;
        while inner.evict_oldest(&self.counters) {
            evicted += 1;
        }
        debug!(evicted, "Evicted all LRU cache entries");
    }

    // == Snapshot ==
    /// Copies the current entries, ordered from least to most recently used.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        let inner = self.inner.lock();
        inner
            .lru
            .iter()
            .filter_map(|key| {
                inner
                    .entries
                    .get(key)
                    .map(|slot| (key.clone(), slot.value.clone()))
            })
            .collect()
    }

    /// Current aggregate size of all entries.
    pub fn size(&self) -> usize {
        self.inner.lock().size
    }

    /// Maximum aggregate size.
    pub fn max_size(&self) -> usize {
        self.inner.lock().max_size
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    pub fn hit_count(&self) -> u64 {
        self.counters.hits()
    }

    pub fn creation_count(&self) -> u64 {
        self.counters.creations()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        self.counters
            .snapshot(inner.entries.len(), inner.size, inner.max_size)
    }
}

impl<K, V> BaseCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn put(&self, key: K, value: V) -> Option<V> {
        LruCache::put(self, key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        LruCache::contains_key(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn evict_all(&self) {
        LruCache::evict_all(self)
    }

    fn creation_count(&self) -> u64 {
        self.counters.creations()
    }

    fn hit_count(&self) -> u64 {
        self.counters.hits()
    }

    fn decrement_hit_count(&self) {
        self.counters.decrement_hits();
    }

    fn stats(&self) -> CacheStats {
        LruCache::stats(self)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("inner", &*self.inner.lock())
            .field("counters", &self.counters)
            .field("create", &self.create.is_some())
            .finish()
    }
}

impl<K, V> fmt::Display for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        write!(
            f,
            "LruCache[maxSize={},hits={},misses={},hitRate={}%]",
            stats.max_size,
            stats.hits,
            stats.misses,
            stats.hit_percent()
        )
    }
}
