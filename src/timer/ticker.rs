use std::{future::Future, time::Duration};

use log::{debug, warn};
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

/// What the ticker should do after a tick callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Stop,
}

/// A periodic task that lives exactly as long as this value.
///
/// Dropping a `Ticker` cancels its task, so the callback can never outlive
/// the owner that acquired it.
pub struct Ticker {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawns a task that calls `on_tick` every `period`, the first call
    /// happening immediately. Must be called inside a tokio runtime.
    pub fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = TickFlow> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if on_tick().await == TickFlow::Stop {
                            break;
                        }
                    }
                }
            }
            debug!("ticker task exited");
        });

        debug!("ticker spawned with period {period:?}");
        Self {
            token,
            handle: Some(handle),
        }
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }

    /// Stops the task without waiting for it.
    pub fn abort(self) {
        drop(self);
    }

    /// Cancels the task and waits for it to wind down.
    ///
    /// The callback must not be blocked on anything the caller holds.
    pub async fn cancel(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    warn!("ticker task failed: {err}");
                }
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn counting_ticker(period_ms: u64, stop_after: Option<usize>) -> (Ticker, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let ticker = Ticker::spawn(Duration::from_millis(period_ms), move || {
            let counter = counter.clone();
            async move {
                let seen = counter.fetch_add(1, Ordering::SeqCst) + 1;
                match stop_after {
                    Some(limit) if seen >= limit => TickFlow::Stop,
                    _ => TickFlow::Continue,
                }
            }
        });
        (ticker, count)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_on_every_period() {
        let (ticker, count) = counting_ticker(100, None);
        time::sleep(Duration::from_millis(350)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
        ticker.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_further_ticks() {
        let (ticker, count) = counting_ticker(100, None);
        time::sleep(Duration::from_millis(150)).await;
        ticker.cancel().await;
        let seen = count.load(Ordering::SeqCst);

        time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_releases_the_task() {
        let (ticker, count) = counting_ticker(100, None);
        time::sleep(Duration::from_millis(150)).await;
        drop(ticker);
        let seen = count.load(Ordering::SeqCst);

        time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_can_end_the_task() {
        let (ticker, count) = counting_ticker(100, Some(3));
        time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(ticker.is_finished());
    }
}
