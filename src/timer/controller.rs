use std::{sync::Arc, time::Duration};

use anyhow::Result;
use log::{debug, info};
use tokio::sync::Mutex;

use crate::{
    clock::{Clock, MonotonicClock},
    model::StopwatchModel,
    view::{SnapshotSink, StopwatchSnapshot, STATE_CHANGED_EVENT, TICK_EVENT},
};

use super::ticker::{TickFlow, Ticker};

/// Owns the stopwatch model and the refresh ticker that drives it.
///
/// Every user intent locks the model, applies one transition and publishes
/// the resulting snapshot. The ticker exists only while the lap engine runs.
#[derive(Clone)]
pub struct StopwatchController {
    model: Arc<Mutex<StopwatchModel>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    tick_interval: Arc<Mutex<Duration>>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn SnapshotSink>,
}

impl StopwatchController {
    pub fn new(sink: Arc<dyn SnapshotSink>, tick_interval: Duration) -> Self {
        Self::with_clock(sink, Arc::new(MonotonicClock::new()), tick_interval)
    }

    pub fn with_clock(
        sink: Arc<dyn SnapshotSink>,
        clock: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            model: Arc::new(Mutex::new(StopwatchModel::new())),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Arc::new(Mutex::new(tick_interval)),
            clock,
            sink,
        }
    }

    /// Applies to the next ticker acquisition; a running ticker keeps its period.
    pub async fn set_tick_interval(&self, tick_interval: Duration) {
        *self.tick_interval.lock().await = tick_interval;
    }

    pub async fn get_snapshot(&self) -> StopwatchSnapshot {
        let mut guard = self.model.lock().await;
        guard.tick(self.clock.now_ms());
        guard.snapshot()
    }

    pub async fn start(&self) -> Result<StopwatchSnapshot> {
        let now = self.clock.now_ms();
        {
            let mut model = self.model.lock().await;
            model.start(now)?;
            self.spawn_ticker().await;
        }
        self.emit_state_changed().await
    }

    pub async fn lap(&self) -> Result<StopwatchSnapshot> {
        let now = self.clock.now_ms();
        self.apply(|model| model.lap(now)).await?;
        self.emit_state_changed().await
    }

    pub async fn stop(&self) -> Result<StopwatchSnapshot> {
        let now = self.clock.now_ms();
        {
            let mut model = self.model.lock().await;
            model.stop(now)?;
            self.release_ticker().await;
        }
        self.emit_state_changed().await
    }

    pub async fn resume(&self) -> Result<StopwatchSnapshot> {
        let now = self.clock.now_ms();
        {
            let mut model = self.model.lock().await;
            model.resume(now)?;
            self.spawn_ticker().await;
        }
        self.emit_state_changed().await
    }

    pub async fn reset(&self) -> Result<StopwatchSnapshot> {
        self.apply(StopwatchModel::reset).await?;
        self.emit_state_changed().await
    }

    pub async fn toggle_view(&self) -> Result<StopwatchSnapshot> {
        self.apply(StopwatchModel::toggle_view).await?;
        self.emit_state_changed().await
    }

    pub async fn select_lap(&self, lap_number: usize) -> Result<StopwatchSnapshot> {
        let now = self.clock.now_ms();
        self.apply(|model| {
            model.tick(now);
            model.select_lap(lap_number)
        })
        .await?;
        self.emit_state_changed().await
    }

    pub async fn confirm_save(&self) -> Result<StopwatchSnapshot> {
        self.apply(StopwatchModel::confirm_save).await?;
        self.emit_state_changed().await
    }

    pub async fn set_title(&self, title: String) -> Result<StopwatchSnapshot> {
        self.apply(|model| model.set_title(&title)).await?;
        self.emit_state_changed().await
    }

    /// Saves the titled lap. A `title` given here replaces the one the dialog
    /// holds before the empty-title check runs.
    pub async fn confirm_title(&self, title: Option<String>) -> Result<StopwatchSnapshot> {
        self.apply(|model| {
            if let Some(title) = title.as_deref() {
                model.set_title(title)?;
            }
            model.confirm_title()
        })
        .await?;
        self.emit_state_changed().await
    }

    pub async fn cancel_overlay(&self) -> Result<StopwatchSnapshot> {
        self.apply(|model| {
            model.cancel_overlay();
            Ok(())
        })
        .await?;
        self.emit_state_changed().await
    }

    pub async fn select_record(&self, index: usize) -> Result<StopwatchSnapshot> {
        self.apply(|model| model.select_record(index)).await?;
        self.emit_state_changed().await
    }

    pub async fn confirm_delete(&self) -> Result<StopwatchSnapshot> {
        self.apply(StopwatchModel::confirm_delete).await?;
        self.emit_state_changed().await
    }

    pub async fn search(&self, term: Option<String>) -> Result<StopwatchSnapshot> {
        self.apply(|model| {
            model.search(term.as_deref());
            Ok(())
        })
        .await?;
        self.emit_state_changed().await
    }

    /// Releases the ticker. Called when the application exits.
    pub async fn shutdown(&self) {
        self.cancel_ticker().await;
        info!("stopwatch controller shut down");
    }

    async fn apply<F>(&self, transition: F) -> Result<()>
    where
        F: FnOnce(&mut StopwatchModel) -> Result<()>,
    {
        let mut guard = self.model.lock().await;
        transition(&mut *guard)
    }

    /// Swaps in a fresh ticker. Callers hold the model lock so the ticker
    /// slot always agrees with the engine status.
    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.abort();
        }

        let model = self.model.clone();
        let clock = self.clock.clone();
        let sink = self.sink.clone();
        let tick_interval = *self.tick_interval.lock().await;

        let ticker = Ticker::spawn(tick_interval, move || {
            let model = model.clone();
            let clock = clock.clone();
            let sink = sink.clone();
            async move {
                let snapshot = {
                    let mut guard = model.lock().await;
                    if !guard.engine().is_running() {
                        return TickFlow::Stop;
                    }
                    guard.tick(clock.now_ms());
                    guard.snapshot()
                };
                sink.publish(TICK_EVENT, &snapshot);
                TickFlow::Continue
            }
        });

        *ticker_guard = Some(ticker);
        debug!("refresh ticker acquired ({tick_interval:?})");
    }

    /// Drops the ticker without joining it. Callers hold the model lock, which
    /// a pending tick may be waiting on.
    async fn release_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.abort();
            debug!("refresh ticker released");
        }
    }

    /// Cancels and joins the ticker. Must not be called with the model locked.
    async fn cancel_ticker(&self) {
        let ticker = self.ticker.lock().await.take();
        if let Some(ticker) = ticker {
            ticker.cancel().await;
            debug!("refresh ticker released");
        }
    }

    async fn emit_state_changed(&self) -> Result<StopwatchSnapshot> {
        let snapshot = self.get_snapshot().await;
        self.sink.publish(STATE_CHANGED_EVENT, &snapshot);
        Ok(snapshot)
    }
}
