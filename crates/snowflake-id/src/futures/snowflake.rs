use crate::{
    Error, IdGenStatus, OverflowStrategy, Result, SleepProvider, SnowflakeIdGenerator, TimeSource,
    TokioSleep,
};

impl<T> SnowflakeIdGenerator<T>
where
    T: TimeSource,
{
    /// Async counterpart of [`Self::next`], backing off through Tokio.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next`].
    pub async fn next_async(&self) -> Result<i64> {
        self.next_async_with::<TokioSleep>().await
    }

    /// Async counterpart of [`Self::next`] with an explicit [`SleepProvider`].
    ///
    /// The state lock is only taken inside [`Self::poll_next`] and is never
    /// held across an `.await`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next`].
    pub async fn next_async_with<S>(&self) -> Result<i64>
    where
        S: SleepProvider,
    {
        loop {
            let exhausted = match self.poll_next()? {
                IdGenStatus::Ready { id } => break Ok(id),
                IdGenStatus::Pending { exhausted } => exhausted,
            };

            match self.options().sequence_overflow_strategy {
                OverflowStrategy::Fail => {
                    break Err(Error::SequenceOverflow {
                        timestamp: exhausted,
                    });
                }
                OverflowStrategy::SpinWait => {
                    while !self.tick_has_moved(exhausted) {
                        S::yield_now().await;
                    }
                }
                OverflowStrategy::Sleep => {
                    S::sleep_for(self.time_source().tick_duration()).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error, ManualClock, MonotonicClock, Options, OverflowStrategy, Result,
        SnowflakeIdGenerator, Structure,
    };
    use futures::future::try_join_all;
    use std::{collections::HashSet, sync::Arc, time::Duration};

    const NUM_GENERATORS: i64 = 8;
    const IDS_PER_GENERATOR: usize = 4096 * 8; // Enough to overflow at least 8 ticks

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn generates_many_unique_ids_across_generators() -> Result<()> {
        let clock = MonotonicClock::default();
        let tasks: Vec<tokio::task::JoinHandle<Result<Vec<i64>>>> = (0..NUM_GENERATORS)
            .map(|generator_id| {
                let generator = SnowflakeIdGenerator::new(
                    generator_id,
                    clock.clone(),
                    Structure::TWITTER,
                    Options::default(),
                );
                tokio::spawn(async move {
                    let generator = generator?;
                    let mut ids = Vec::with_capacity(IDS_PER_GENERATOR);
                    for _ in 0..IDS_PER_GENERATOR {
                        ids.push(generator.next_async().await?);
                    }
                    Ok(ids)
                })
            })
            .collect();

        let batches = try_join_all(tasks).await.expect("task panicked");
        let mut seen = HashSet::new();
        for batch in batches {
            for id in batch? {
                assert!(seen.insert(id), "Duplicate ID found: {id}");
            }
        }
        assert_eq!(seen.len(), NUM_GENERATORS as usize * IDS_PER_GENERATOR);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn shared_generator_with_sleep_strategy() -> Result<()> {
        let generator = Arc::new(SnowflakeIdGenerator::new(
            0,
            MonotonicClock::default(),
            Structure::new(50, 12, 1)?,
            Options::new(OverflowStrategy::Sleep),
        )?);

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                tokio::spawn(async move {
                    let mut ids = Vec::with_capacity(10);
                    for _ in 0..10 {
                        ids.push(generator.next_async().await?);
                    }
                    Ok::<_, Error>(ids)
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for batch in try_join_all(tasks).await.expect("task panicked") {
            let batch = batch?;
            assert!(batch.windows(2).all(|w| w[0] < w[1]));
            seen.extend(batch);
        }
        assert_eq!(seen.len(), 40);
        Ok(())
    }

    #[tokio::test]
    async fn fail_strategy_surfaces_overflow() -> Result<()> {
        let generator = SnowflakeIdGenerator::new(
            0,
            ManualClock::with_ticks(9),
            Structure::new(50, 12, 1)?,
            Options::new(OverflowStrategy::Fail),
        )?;

        generator.next_async().await?;
        generator.next_async().await?;
        assert_eq!(
            generator.next_async().await.unwrap_err(),
            Error::SequenceOverflow { timestamp: 9 }
        );
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn spin_wait_resumes_when_clock_advances() -> Result<()> {
        let clock = ManualClock::with_ticks(9);
        let generator = Arc::new(SnowflakeIdGenerator::new(
            0,
            clock.clone(),
            Structure::new(50, 12, 1)?,
            Options::new(OverflowStrategy::SpinWait),
        )?);
        generator.next_async().await?;
        generator.next_async().await?;

        let waiter = {
            let generator = Arc::clone(&generator);
            tokio::spawn(async move { generator.next_async().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        clock.advance(1);
        let id = waiter.await.expect("task panicked")?;
        assert_eq!(id, 10 << 13);
        Ok(())
    }
}
