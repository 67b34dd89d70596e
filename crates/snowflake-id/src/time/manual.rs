use crate::{DEFAULT_EPOCH, TimeSource};
use core::time::Duration;
use jiff::Timestamp;
use portable_atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// A deterministic [`TimeSource`] whose tick value is set by hand.
///
/// Clones share the same counter, so a test can keep one handle and give
/// another to a generator, then move time underneath it.
///
/// # Example
///
/// ```
/// use snowflake_id::{ManualClock, TimeSource};
///
/// let clock = ManualClock::with_ticks(42);
/// let handle = clock.clone();
/// handle.advance(1);
/// assert_eq!(clock.ticks(), 43);
/// ```
#[derive(Clone, Debug)]
pub struct ManualClock {
    ticks: Arc<AtomicI64>,
    tick: Duration,
    epoch: Timestamp,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DEFAULT_EPOCH, 0)
    }
}

impl ManualClock {
    /// Creates a millisecond clock frozen at `ticks` past `epoch`.
    pub fn new(epoch: Timestamp, ticks: i64) -> Self {
        Self {
            ticks: Arc::new(AtomicI64::new(ticks)),
            tick: Duration::from_millis(1),
            epoch,
        }
    }

    /// Creates a clock frozen at `ticks` past [`DEFAULT_EPOCH`].
    pub fn with_ticks(ticks: i64) -> Self {
        Self::new(DEFAULT_EPOCH, ticks)
    }

    pub fn set_ticks(&self, ticks: i64) {
        self.ticks.store(ticks, Ordering::Release);
    }

    /// Moves the clock by `delta` ticks, which may be negative.
    pub fn advance(&self, delta: i64) {
        self.ticks.fetch_add(delta, Ordering::AcqRel);
    }
}

impl TimeSource for ManualClock {
    fn ticks(&self) -> i64 {
        self.ticks.load(Ordering::Acquire)
    }

    fn tick_duration(&self) -> Duration {
        self.tick
    }

    fn epoch(&self) -> Timestamp {
        self.epoch
    }
}
