use core::time::Duration;

/// Abstracts how an async generator backs off when a tick's sequence space is
/// exhausted, so the generator is not tied to one runtime's timer.
pub trait SleepProvider {
    /// Suspends for roughly `dur`. Used by [`OverflowStrategy::Sleep`].
    ///
    /// [`OverflowStrategy::Sleep`]: crate::OverflowStrategy::Sleep
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;

    /// Hands control back to the scheduler once. Used between clock polls by
    /// [`OverflowStrategy::SpinWait`].
    ///
    /// [`OverflowStrategy::SpinWait`]: crate::OverflowStrategy::SpinWait
    fn yield_now() -> impl Future<Output = ()> + Send;
}
