/// The outcome of a single, non-blocking generation attempt.
///
/// Returned by [`SnowflakeIdGenerator::poll_next`], which never waits. The
/// blocking [`SnowflakeIdGenerator::next`] is a loop around it that applies the
/// configured [`OverflowStrategy`] whenever the status is `Pending`.
///
/// # Example
///
/// ```
/// use snowflake_id::{IdGenStatus, ManualClock, Options, SnowflakeIdGenerator, Structure};
///
/// let structure = Structure::new(50, 12, 1)?;
/// let generator =
///     SnowflakeIdGenerator::new(0, ManualClock::with_ticks(7), structure, Options::default())?;
///
/// assert!(matches!(generator.poll_next()?, IdGenStatus::Ready { .. }));
/// assert!(matches!(generator.poll_next()?, IdGenStatus::Ready { .. }));
/// assert_eq!(generator.poll_next()?, IdGenStatus::Pending { exhausted: 7 });
/// # Ok::<(), snowflake_id::Error>(())
/// ```
///
/// [`SnowflakeIdGenerator::poll_next`]: crate::SnowflakeIdGenerator::poll_next
/// [`SnowflakeIdGenerator::next`]: crate::SnowflakeIdGenerator::next
/// [`OverflowStrategy`]: crate::OverflowStrategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: i64,
    },
    /// The sequence space of the current tick is used up. No state was
    /// changed; try again once the masked timestamp differs from `exhausted`.
    Pending {
        /// The timestamp whose sequence space is exhausted.
        exhausted: i64,
    },
}
