use crate::{DEFAULT_EPOCH, Error, Result, TimeSource};
use core::time::Duration;
use jiff::Timestamp;
use std::time::Instant;

/// A monotonic time source that counts ticks elapsed since process start,
/// offset from a user-defined epoch.
///
/// This avoids wall-clock adjustments (e.g., NTP corrections or leap seconds)
/// while still aligning tick zero to a fixed origin.
///
/// The wall clock is read exactly once, at construction, to compute the signed
/// distance between the epoch and "now". Every later reading only adds the
/// time elapsed on the monotonic [`Instant`] captured at the same moment.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    start: Instant,
    // Nanoseconds from the epoch to `start`. Negative when the epoch lies in
    // the future.
    epoch_offset: i128,
    tick_nanos: i128,
    tick: Duration,
    epoch: Timestamp,
}

impl Default for MonotonicClock {
    /// Constructs a millisecond clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a clock with one-millisecond ticks, using `epoch` as tick
    /// zero.
    ///
    /// # Example
    ///
    /// ```
    /// use snowflake_id::{MonotonicClock, TimeSource, TWITTER_EPOCH};
    ///
    /// let clock = MonotonicClock::with_epoch(TWITTER_EPOCH);
    /// assert!(clock.ticks() > 0);
    /// ```
    pub fn with_epoch(epoch: Timestamp) -> Self {
        Self::build(epoch, Duration::from_millis(1))
    }

    /// Constructs a clock with a custom tick length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTickDuration`] if `tick` is zero.
    pub fn with_tick(epoch: Timestamp, tick: Duration) -> Result<Self> {
        if tick.is_zero() {
            return Err(Error::InvalidTickDuration);
        }
        Ok(Self::build(epoch, tick))
    }

    fn build(epoch: Timestamp, tick: Duration) -> Self {
        let start = Instant::now();
        let epoch_offset = Timestamp::now().as_nanosecond() - epoch.as_nanosecond();
        Self {
            start,
            epoch_offset,
            tick_nanos: tick.as_nanos() as i128,
            tick,
            epoch,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn ticks(&self) -> i64 {
        let elapsed = self.start.elapsed().as_nanos() as i128;
        let ticks = (self.epoch_offset + elapsed).div_euclid(self.tick_nanos);
        i64::try_from(ticks).unwrap_or(if ticks < 0 { i64::MIN } else { i64::MAX })
    }

    fn tick_duration(&self) -> Duration {
        self.tick
    }

    fn epoch(&self) -> Timestamp {
        self.epoch
    }
}
