//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, creations and evictions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of retrievals that found no stored value
    pub misses: u64,
    /// Number of values synthesized by the create-on-miss function
    pub creations: u64,
    /// Number of explicit writes
    pub puts: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current aggregate size of all entries
    pub size: usize,
    /// Maximum aggregate size
    pub max_size: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits as f64 + self.misses as f64;
        if total == 0.0 {
            0.0
        } else {
            self.hits as f64 / total
        }
    }

    /// Hit rate as a whole percentage.
    pub fn hit_percent(&self) -> u64 {
        let total = u128::from(self.hits) + u128::from(self.misses);
        if total == 0 {
            0
        } else {
            (u128::from(self.hits) * 100 / total) as u64
        }
    }
}

// == Counters ==
/// Live atomic counters owned by a cache instance.
///
/// Readable without taking the cache lock.
#[derive(Debug, Default)]
pub struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    creations: AtomicU64,
    puts: AtomicU64,
    evictions: AtomicU64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_creation(&self) {
        self.creations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    // == Decrement Hits ==
    /// Takes back one previously recorded hit. Saturates at zero.
    pub fn decrement_hits(&self) {
        let _ = self
            .hits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |hits| {
                hits.checked_sub(1)
            });
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn creations(&self) -> u64 {
        self.creations.load(Ordering::Relaxed)
    }

    // == Snapshot ==
    /// Captures the counters together with the cache's current occupancy.
    pub fn snapshot(&self, total_entries: usize, size: usize, max_size: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            creations: self.creations.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            total_entries,
            size,
            max_size,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_new() {
        let stats = Counters::new().snapshot(0, 0, 10);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.creations, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.max_size, 10);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.hit_percent(), 0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let counters = Counters::new();
        counters.record_hit();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();

        let stats = counters.snapshot(1, 1, 10);
        assert_eq!(stats.hit_rate(), 0.75);
        assert_eq!(stats.hit_percent(), 75);
    }

    #[test]
    fn test_hit_percent_large_counts() {
        let stats = CacheStats {
            hits: u64::MAX / 2,
            misses: u64::MAX / 2,
            ..CacheStats::default()
        };
        assert_eq!(stats.hit_percent(), 50);

        let all_hits = CacheStats {
            hits: u64::MAX,
            ..CacheStats::default()
        };
        assert_eq!(all_hits.hit_percent(), 100);
    }

    #[test]
    fn test_decrement_hits_saturates() {
        let counters = Counters::new();
        counters.record_hit();

        counters.decrement_hits();
        assert_eq!(counters.hits(), 0);

        counters.decrement_hits();
        assert_eq!(counters.hits(), 0);
    }

    #[test]
    fn test_record_creation_put_eviction() {
        let counters = Counters::new();
        counters.record_creation();
        counters.record_put();
        counters.record_put();
        counters.record_eviction();

        let stats = counters.snapshot(2, 2, 10);
        assert_eq!(counters.creations(), 1);
        assert_eq!(stats.puts, 2);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 2);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..CacheStats::default()
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hits"], 3);
        assert_eq!(json["misses"], 1);
        assert_eq!(json["max_size"], 0);
    }
}
