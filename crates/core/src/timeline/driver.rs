//! Repeating tick for internally clocked playback.
//!
//! A driver owns at most one ticker task. Starting playback aborts any
//! previous ticker before spawning a new one; pause, stop, reaching the end
//! and dropping the driver all cancel it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::sync::{PlaybackSnapshot, TickOutcome, TimelineSynchronizer, TICK_SECONDS};

/// Interval between internal ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Drives a [`TimelineSynchronizer`] from a tokio interval.
pub struct PlaybackDriver {
    sync: Arc<Mutex<TimelineSynchronizer>>,
    ticker: Option<JoinHandle<()>>,
    interval: Duration,
    step: f64,
}

impl PlaybackDriver {
    pub fn new(sync: TimelineSynchronizer) -> Self {
        Self {
            sync: Arc::new(Mutex::new(sync)),
            ticker: None,
            interval: TICK_INTERVAL,
            step: TICK_SECONDS,
        }
    }

    /// Shared handle to the synchronizer, for scene updates and snapshots.
    pub fn synchronizer(&self) -> Arc<Mutex<TimelineSynchronizer>> {
        Arc::clone(&self.sync)
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.sync.lock().await.snapshot()
    }

    /// `true` while a ticker task is alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub async fn play(&mut self) -> PlaybackSnapshot {
        self.cancel_ticker();

        let snapshot = {
            let mut sync = self.sync.lock().await;
            sync.play();
            sync.snapshot()
        };

        if snapshot.is_playing {
            let sync = Arc::clone(&self.sync);
            let interval = self.interval;
            let step = self.step;
            self.ticker = Some(tokio::spawn(run_ticker(sync, interval, step)));
        }
        snapshot
    }

    pub async fn pause(&mut self) -> PlaybackSnapshot {
        self.cancel_ticker();
        let mut sync = self.sync.lock().await;
        sync.pause();
        sync.snapshot()
    }

    pub async fn stop(&mut self) -> PlaybackSnapshot {
        self.cancel_ticker();
        let mut sync = self.sync.lock().await;
        sync.stop();
        sync.snapshot()
    }

    /// Seeking does not interrupt an active ticker.
    pub async fn seek(&mut self, time: f64) -> PlaybackSnapshot {
        self.sync.lock().await.seek(time)
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

async fn run_ticker(sync: Arc<Mutex<TimelineSynchronizer>>, period: Duration, step: f64) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        match sync.lock().await.tick(step) {
            TickOutcome::Advanced => {}
            TickOutcome::Ended => {
                tracing::debug!("Playback ticker finished at end of timeline");
                break;
            }
            TickOutcome::Idle => break,
        }
    }
}
