use crate::SleepProvider;
use core::time::Duration;

/// An implementation of [`SleepProvider`] using Tokio's timer and scheduler.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;

impl SleepProvider for TokioSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(dur)
    }

    fn yield_now() -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}
