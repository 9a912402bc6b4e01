//! Builder for configuring [`LruCache`].

use std::hash::Hash;

use crate::cache::store::{CreateFn, SizeFn};
use crate::cache::LruCache;
use crate::error::Result;

/// Builder for creating an [`LruCache`] with a create-on-miss function or a
/// custom entry sizer.
///
/// Use [`LruCache::builder`] to create a new builder instance.
///
/// # Example
///
/// ```
/// use expiring_lru::LruCache;
///
/// let cache = LruCache::builder(1024)
///     .create(|key: &u32| Some(key.to_string()))
///     .size_of(|_key, value: &String| value.len())
///     .build()
///     .unwrap();
///
/// assert_eq!(cache.get(&42), Some("42".to_string()));
/// ```
pub struct LruCacheBuilder<K, V> {
    capacity: usize,
    create: Option<CreateFn<K, V>>,
    size_of: Option<SizeFn<K, V>>,
}

impl<K, V> LruCacheBuilder<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            create: None,
            size_of: None,
        }
    }

    /// Sets the function used to synthesize a value on a miss.
    ///
    /// It runs without the cache lock held. Returning `None` leaves the miss
    /// unanswered.
    pub fn create<F>(mut self, create: F) -> Self
    where
        F: Fn(&K) -> Option<V> + Send + Sync + 'static,
    {
        self.create = Some(Box::new(create));
        self
    }

    /// Sets the function measuring each entry against the capacity.
    ///
    /// Without one every entry counts as 1, so capacity is an entry count.
    pub fn size_of<F>(mut self, size_of: F) -> Self
    where
        F: Fn(&K, &V) -> usize + Send + Sync + 'static,
    {
        self.size_of = Some(Box::new(size_of));
        self
    }

    /// Builds the cache. Fails if the capacity is zero.
    pub fn build(self) -> Result<LruCache<K, V>> {
        LruCache::from_parts(self.capacity, self.create, self.size_of)
    }
}
