/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `snowflake-id` can produce.
///
/// Layout and generator id errors are raised eagerly at construction. The
/// clock and overflow errors are raised from the [`next`] call that observed
/// them and never poison the generator: a later call re-checks against the
/// same recorded state.
///
/// [`next`]: crate::SnowflakeIdGenerator::next
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A [`Structure`](crate::Structure) bit width is out of range, or the
    /// widths do not add up to 63.
    #[error("invalid layout: {field} {constraint}, but was {actual}")]
    InvalidLayout {
        field: &'static str,
        constraint: &'static str,
        actual: u64,
    },

    /// The generator id does not fit in the layout's generator field.
    #[error(
        "generator_id must be between 0 (inclusive) and {max_generators} (exclusive), but was {generator_id}"
    )]
    InvalidGeneratorId {
        generator_id: i64,
        max_generators: u64,
    },

    /// The time source reported a tick before its epoch.
    #[error("time source gave negative ticks: {ticks}")]
    NegativeClock { ticks: i64 },

    /// The masked timestamp is smaller than the last one recorded. Either the
    /// clock regressed or the timestamp field wrapped around.
    #[error("timestamp moved backwards or wrapped around: {timestamp} < {last_timestamp}")]
    ClockMovedBackwards { timestamp: i64, last_timestamp: i64 },

    /// Every sequence value for `timestamp` has been handed out and the
    /// generator is configured with [`OverflowStrategy::Fail`].
    ///
    /// [`OverflowStrategy::Fail`]: crate::OverflowStrategy::Fail
    #[error("sequence overflow at timestamp {timestamp}")]
    SequenceOverflow { timestamp: i64 },

    /// A clock was configured with a zero-length tick.
    #[error("tick duration must be non-zero")]
    InvalidTickDuration,

    /// The wraparound duration or instant does not fit the target type.
    #[error("wraparound point is not representable")]
    WraparoundOverflow,

    /// An overflow strategy name could not be parsed.
    #[error("unknown sequence overflow strategy: {0:?} (expected fail, spin-wait or sleep)")]
    InvalidOverflowStrategy(String),

    /// The generator state lock was poisoned by a panicking thread.
    ///
    /// Never produced when the `parking-lot` feature is enabled, since
    /// `parking_lot` mutexes do not poison.
    #[error("generator state lock is poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
