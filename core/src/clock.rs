//! Time source shared by the caches and the classifier.
//!
//! Everything that ages records reads "now" through a [`Clock`] so tests and
//! frame replays can drive time explicitly instead of sleeping.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Wall-clock monotonic time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    /// Jump to an absolute offset from the origin. Moving backwards is ignored.
    pub fn set_elapsed(&self, elapsed: Duration) {
        let mut current = self.elapsed.lock();
        if elapsed > *current {
            *current = elapsed;
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.elapsed.lock()
    }
}
