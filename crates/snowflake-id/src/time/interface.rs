use core::time::Duration;
use jiff::Timestamp;

/// Default epoch: Wednesday, January 1, 2020 00:00:00 UTC
pub const DEFAULT_EPOCH: Timestamp = Timestamp::constant(1_577_836_800, 0);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Timestamp = Timestamp::constant(1_288_834_974, 657_000_000);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Timestamp = Timestamp::constant(1_420_070_400, 0);

/// A source of ticks counted from a fixed epoch.
///
/// Implementations should return non-decreasing, non-negative tick counts, but
/// nothing here enforces that: the generator detects negative ticks and
/// regressions itself. `ticks` may be called concurrently from many threads,
/// so implementations must not rely on unsynchronized interior state.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use jiff::Timestamp;
/// use snowflake_id::{DEFAULT_EPOCH, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn ticks(&self) -> i64 {
///         1234
///     }
///
///     fn tick_duration(&self) -> Duration {
///         Duration::from_millis(1)
///     }
///
///     fn epoch(&self) -> Timestamp {
///         DEFAULT_EPOCH
///     }
/// }
///
/// assert_eq!(FixedTime.ticks(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the number of ticks elapsed since [`TimeSource::epoch`].
    fn ticks(&self) -> i64;

    /// Returns the wall-clock length of a single tick.
    fn tick_duration(&self) -> Duration;

    /// Returns the instant corresponding to tick zero.
    fn epoch(&self) -> Timestamp;
}
