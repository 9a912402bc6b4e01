//! Deadline Map Module
//!
//! Tracks the absolute instant after which each cached key is stale.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Stand-in horizon when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Deadline Map ==
/// Per-key expiration deadlines.
///
/// Not synchronized; the owner is expected to guard it with its own lock.
#[derive(Debug)]
pub struct DeadlineMap<K> {
    deadlines: HashMap<K, Instant>,
}

impl<K: Eq + Hash + Clone> DeadlineMap<K> {
    // == Constructor ==
    /// Creates an empty deadline map.
    pub fn new() -> Self {
        Self {
            deadlines: HashMap::new(),
        }
    }

    // == Set ==
    /// Sets the deadline of `key` to `now + timeout`, replacing any earlier one.
    ///
    /// Returns the new deadline.
    pub fn set(&mut self, key: K, now: Instant, timeout: Duration) -> Instant {
        let deadline = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
        self.deadlines.insert(key, deadline);
        deadline
    }

    // == Is Expired ==
    /// Checks whether `key` is stale at `now`.
    ///
    /// An entry is stale once `now` reaches its deadline. A key with no
    /// recorded deadline counts as stale.
    pub fn is_expired(&self, key: &K, now: Instant) -> bool {
        match self.deadlines.get(key) {
            Some(deadline) => *deadline <= now,
            None => true,
        }
    }

    // == Remaining ==
    /// Returns how long `key` stays fresh, `Duration::ZERO` once stale, or
    /// `None` if no deadline is recorded.
    pub fn remaining(&self, key: &K, now: Instant) -> Option<Duration> {
        self.deadlines
            .get(key)
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    // == Remove ==
    /// Drops the deadline of `key`, returning it if one was recorded.
    pub fn remove(&mut self, key: &K) -> Option<Instant> {
        self.deadlines.remove(key)
    }

    // == Expired Keys ==
    /// Collects every key whose deadline has passed at `now`.
    pub fn expired_keys(&self, now: Instant) -> Vec<K> {
        self.deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Keeps only the keys for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.deadlines.retain(|key, _| keep(key));
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }
}

impl<K: Eq + Hash + Clone> Default for DeadlineMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_records_deadline() {
        let mut map = DeadlineMap::new();
        let now = Instant::now();

        let deadline = map.set("a", now, Duration::from_millis(100));

        assert_eq!(deadline, now + Duration::from_millis(100));
        assert_eq!(map.remaining(&"a", now), Some(Duration::from_millis(100)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_set_refreshes_deadline() {
        let mut map = DeadlineMap::new();
        let now = Instant::now();

        map.set("a", now, Duration::from_millis(100));
        let later = now + Duration::from_millis(60);
        map.set("a", later, Duration::from_millis(100));

        assert_eq!(map.remaining(&"a", later), Some(Duration::from_millis(100)));
        assert!(!map.is_expired(&"a", now + Duration::from_millis(120)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let mut map = DeadlineMap::new();
        let now = Instant::now();
        map.set("a", now, Duration::from_millis(100));

        assert!(!map.is_expired(&"a", now + Duration::from_millis(99)));
        // Stale exactly at the deadline
        assert!(map.is_expired(&"a", now + Duration::from_millis(100)));
    }

    #[test]
    fn test_zero_timeout_is_immediately_expired() {
        let mut map = DeadlineMap::new();
        let now = Instant::now();
        map.set("a", now, Duration::ZERO);

        assert!(map.is_expired(&"a", now));
    }

    #[test]
    fn test_missing_key_is_expired() {
        let map: DeadlineMap<&str> = DeadlineMap::new();
        assert!(map.is_expired(&"missing", Instant::now()));
    }

    #[test]
    fn test_remaining() {
        let mut map = DeadlineMap::new();
        let now = Instant::now();
        map.set("a", now, Duration::from_millis(100));

        assert_eq!(
            map.remaining(&"a", now + Duration::from_millis(30)),
            Some(Duration::from_millis(70))
        );
        assert_eq!(
            map.remaining(&"a", now + Duration::from_millis(500)),
            Some(Duration::ZERO)
        );
        assert_eq!(map.remaining(&"b", now), None);
    }

    #[test]
    fn test_huge_timeout_does_not_overflow() {
        let mut map = DeadlineMap::new();
        let now = Instant::now();

        let deadline = map.set("a", now, Duration::MAX);

        assert!(deadline > now);
        assert!(!map.is_expired(&"a", now + Duration::from_secs(3600)));
    }

    #[test]
    fn test_expired_keys_and_retain() {
        let mut map = DeadlineMap::new();
        let now = Instant::now();
        map.set("short", now, Duration::from_millis(10));
        map.set("long", now, Duration::from_secs(10));
        map.set("orphan", now, Duration::from_secs(10));

        let expired = map.expired_keys(now + Duration::from_millis(20));
        assert_eq!(expired, vec!["short"]);

        map.retain(|key| *key != "orphan");
        assert_eq!(map.remaining(&"orphan", now), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut map = DeadlineMap::new();
        let now = Instant::now();
        map.set("a", now, Duration::from_secs(1));
        map.set("b", now, Duration::from_secs(1));

        assert!(map.remove(&"a").is_some());
        assert!(map.remove(&"a").is_none());

        map.clear();
        assert!(map.is_empty());
    }
}
