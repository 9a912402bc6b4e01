//! Clock Module
//!
//! Monotonic time sources used to compute and check expiration deadlines.

use std::fmt::Debug;
use std::time::Instant;
#[cfg(any(test, feature = "test-util"))]
use std::{sync::Arc, time::Duration};

#[cfg(any(test, feature = "test-util"))]
use parking_lot::Mutex;

// == Clock Trait ==
/// Source of monotonic time for deadline bookkeeping.
pub trait Clock: Debug + Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

// == Monotonic Clock ==
/// Production clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// == Manual Clock ==
/// Clock that only moves when told to.
///
/// Clones share the same elapsed time, so a test can keep one handle and
/// hand another to the cache. Available in tests and with the `test-util`
/// feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

#[cfg(any(test, feature = "test-util"))]
impl ManualClock {
    /// Creates a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    /// Sets the total time elapsed since the clock was created.
    ///
    /// Going backwards is ignored so the clock stays monotonic.
    pub fn set_elapsed(&self, elapsed: Duration) {
        let mut current = self.elapsed.lock();
        if elapsed > *current {
            *current = elapsed;
        }
    }

    /// Returns the time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.elapsed.lock()
    }
}
