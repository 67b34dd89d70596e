use crate::{
    Error, IdGenStatus, MonotonicClock, Options, OverflowStrategy, Result, Structure, TimeSource,
    generator::{Mutex, MutexGuard},
};
use core::{cmp::Ordering, fmt};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Sentinel for "no ID generated yet". Any real timestamp is non-negative.
const NO_TIMESTAMP: i64 = -1;

#[derive(Debug)]
struct State {
    last_timestamp: i64,
    sequence: i64,
}

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// Each generator owns its `(last_timestamp, sequence)` state behind a single
/// mutex, and every ID it returns is strictly greater than the one before.
/// Generators that share a [`Structure`] but have distinct generator ids never
/// produce the same value.
///
/// IDs are laid out as
/// `timestamp << (generator_bits + sequence_bits) | generator_id << sequence_bits | sequence`,
/// with masks and shifts precomputed at construction so the hot path never
/// consults the [`Structure`].
///
/// ## Features
///
/// - ✅ Thread-safe: share it behind an `Arc` or a `&'static`
/// - ✅ Any 63-bit layout
/// - ✅ Pluggable [`TimeSource`] for deterministic tests
///
/// ## See Also
/// - [`Structure`]
/// - [`OverflowStrategy`]
pub struct SnowflakeIdGenerator<T = MonotonicClock>
where
    T: TimeSource,
{
    generator_id: i64,
    structure: Structure,
    options: Options,
    timestamp_mask: i64,
    max_sequence: i64,
    shift_time: u32,
    shift_generator: u32,
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<State>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<State>,
    time: T,
}

impl SnowflakeIdGenerator<MonotonicClock> {
    /// Creates a generator with the default settings: the
    /// [`Structure::TWITTER`] layout (41/10/12), a [`MonotonicClock`] anchored
    /// at 2020-01-01T00:00:00Z, and [`OverflowStrategy::SpinWait`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeneratorId`] unless `generator_id` is in
    /// `0..1024`.
    ///
    /// # Example
    ///
    /// ```
    /// use snowflake_id::SnowflakeIdGenerator;
    ///
    /// let generator = SnowflakeIdGenerator::with_defaults(1)?;
    /// let a = generator.next()?;
    /// let b = generator.next()?;
    /// assert!(a < b);
    /// # Ok::<(), snowflake_id::Error>(())
    /// ```
    pub fn with_defaults(generator_id: i64) -> Result<Self> {
        Self::new(
            generator_id,
            MonotonicClock::default(),
            Structure::TWITTER,
            Options::default(),
        )
    }
}

impl<T> SnowflakeIdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `generator_id` with an explicit time source,
    /// layout and options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeneratorId`] if `generator_id` is negative or
    /// not smaller than [`Structure::max_generators`].
    ///
    /// # Example
    ///
    /// ```
    /// use snowflake_id::{
    ///     ManualClock, Options, OverflowStrategy, SnowflakeIdGenerator, Structure,
    /// };
    ///
    /// let structure = Structure::new(50, 3, 10)?;
    /// let options = Options::new(OverflowStrategy::Fail);
    /// let generator = SnowflakeIdGenerator::new(5, ManualClock::with_ticks(1), structure, options)?;
    ///
    /// assert_eq!(generator.next()?, (1 << 13) | (5 << 10));
    /// assert!(SnowflakeIdGenerator::new(8, ManualClock::default(), structure, options).is_err());
    /// # Ok::<(), snowflake_id::Error>(())
    /// ```
    pub fn new(generator_id: i64, time: T, structure: Structure, options: Options) -> Result<Self> {
        let max_generators = structure.max_generators();
        if generator_id < 0 || generator_id as u64 >= max_generators {
            return Err(Error::InvalidGeneratorId {
                generator_id,
                max_generators,
            });
        }

        let state = Mutex::new(State {
            last_timestamp: NO_TIMESTAMP,
            sequence: 0,
        });

        Ok(Self {
            generator_id,
            structure,
            options,
            timestamp_mask: mask(structure.timestamp_bits()),
            max_sequence: mask(structure.sequence_bits()),
            shift_time: structure.generator_bits() + structure.sequence_bits(),
            shift_generator: structure.sequence_bits(),
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(state),
            #[cfg(not(feature = "cache-padded"))]
            state,
            time,
        })
    }

    /// Generates the next ID, applying the configured [`OverflowStrategy`]
    /// when the current tick's sequence space is exhausted.
    ///
    /// The state lock is released before any spin or sleep, so other callers
    /// are never stalled behind a waiting thread.
    ///
    /// # Errors
    ///
    /// - [`Error::NegativeClock`] if the time source reports negative ticks.
    /// - [`Error::ClockMovedBackwards`] if the masked timestamp is behind the
    ///   last one used, whether the clock regressed or the field wrapped.
    /// - [`Error::SequenceOverflow`] if the sequence space is exhausted and the
    ///   strategy is [`OverflowStrategy::Fail`].
    /// - [`Error::LockPoisoned`] if a thread panicked while holding the lock.
    pub fn next(&self) -> Result<i64> {
        loop {
            match self.poll_next()? {
                IdGenStatus::Ready { id } => break Ok(id),
                IdGenStatus::Pending { exhausted } => self.handle_overflow(exhausted)?,
            }
        }
    }

    /// Attempts to generate the next ID without ever waiting.
    ///
    /// Returns [`IdGenStatus::Pending`] instead of applying the overflow
    /// strategy, leaving the decision of how to back off to the caller.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next`], except that [`Error::SequenceOverflow`] is
    /// never returned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_next(&self) -> Result<IdGenStatus> {
        let mut state = self.lock()?;

        // Read under the lock so timestamps are observed in lock order. A read
        // taken before the lock can be overtaken by a newer one and would look
        // like a regression.
        let ticks = self.time.ticks();
        if ticks < 0 {
            drop(state);
            return Err(Self::cold_negative_clock(ticks));
        }
        let timestamp = ticks & self.timestamp_mask;

        match timestamp.cmp(&state.last_timestamp) {
            Ordering::Equal => {
                if state.sequence >= self.max_sequence {
                    return Ok(IdGenStatus::Pending {
                        exhausted: timestamp,
                    });
                }
                state.sequence += 1;
                Ok(IdGenStatus::Ready {
                    id: self.compose(timestamp, state.sequence),
                })
            }
            Ordering::Greater => {
                state.last_timestamp = timestamp;
                state.sequence = 0;
                Ok(IdGenStatus::Ready {
                    id: self.compose(timestamp, 0),
                })
            }
            Ordering::Less => Err(Self::cold_clock_behind(timestamp, state.last_timestamp)),
        }
    }

    pub const fn generator_id(&self) -> i64 {
        self.generator_id
    }

    pub const fn structure(&self) -> &Structure {
        &self.structure
    }

    pub const fn options(&self) -> &Options {
        &self.options
    }

    pub const fn time_source(&self) -> &T {
        &self.time
    }

    /// Returns `true` once the clock has moved off `exhausted`, or reports
    /// something the next poll will reject anyway.
    pub(crate) fn tick_has_moved(&self, exhausted: i64) -> bool {
        let ticks = self.time.ticks();
        ticks < 0 || ticks & self.timestamp_mask != exhausted
    }

    fn handle_overflow(&self, exhausted: i64) -> Result<()> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            generator_id = self.generator_id,
            timestamp = exhausted,
            strategy = %self.options.sequence_overflow_strategy,
            "sequence space exhausted"
        );

        match self.options.sequence_overflow_strategy {
            OverflowStrategy::Fail => Err(Error::SequenceOverflow {
                timestamp: exhausted,
            }),
            OverflowStrategy::SpinWait => {
                while !self.tick_has_moved(exhausted) {
                    std::thread::yield_now();
                }
                Ok(())
            }
            OverflowStrategy::Sleep => {
                std::thread::sleep(self.time.tick_duration());
                Ok(())
            }
        }
    }

    #[inline]
    fn compose(&self, timestamp: i64, sequence: i64) -> i64 {
        (timestamp << self.shift_time) | (self.generator_id << self.shift_generator) | sequence
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_negative_clock(ticks: i64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(ticks, "time source gave negative ticks");
        Error::NegativeClock { ticks }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(timestamp: i64, last_timestamp: i64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            timestamp,
            last_timestamp,
            "timestamp moved backwards or wrapped around"
        );
        Error::ClockMovedBackwards {
            timestamp,
            last_timestamp,
        }
    }
}

impl<T> fmt::Debug for SnowflakeIdGenerator<T>
where
    T: TimeSource + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeIdGenerator")
            .field("generator_id", &self.generator_id)
            .field("time", &self.time)
            .field("structure", &self.structure)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for SnowflakeIdGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SnowflakeIdGenerator {{ generator_id: {}, epoch: {}, structure: {}, options: {} }}",
            self.generator_id,
            self.time.epoch(),
            self.structure,
            self.options
        )
    }
}

/// `(1 << bits) - 1`. Field widths are at most 61, so this never overflows.
const fn mask(bits: u32) -> i64 {
    (1 << bits) - 1
}
