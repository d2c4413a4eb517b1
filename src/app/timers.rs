//! Poll and tick timers.
//!
//! Timers only send events into the app loop; all state changes happen
//! there. Each timer is owned through a [`TimerHandle`] and stops when the
//! handle is stopped or dropped.

use super::events::{Event, NetworkEvent};
use crate::playback::NowPlaying;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
    wake: Arc<Notify>,
}

impl TimerHandle {
    /// Fire now instead of waiting for the rest of the interval.
    pub fn fire_now(&self) {
        self.wake.notify_one();
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Poll the now-playing backend immediately and then every `interval`.
///
/// Failures are reported and polling carries on at the same pace.
pub fn spawn_poller<F, Fut>(fetch: F, interval: Duration, tx: mpsc::Sender<Event>) -> TimerHandle
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<NowPlaying>> + Send + 'static,
{
    let wake = Arc::new(Notify::new());
    let notified = Arc::clone(&wake);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = notified.notified() => {
                    debug!("poll requested");
                    ticker.reset();
                }
            }

            let event = match fetch().await {
                Ok(now_playing) => NetworkEvent::Snapshot(now_playing),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "now-playing poll failed");
                    NetworkEvent::SnapshotFailed(format!("{e:#}"))
                }
            };
            if tx.send(Event::Network(event)).await.is_err() {
                break;
            }
        }
    });

    TimerHandle { task, wake }
}

/// Send [`Event::Tick`] every `interval`.
pub fn spawn_ticker(interval: Duration, tx: mpsc::Sender<Event>) -> TimerHandle {
    let wake = Arc::new(Notify::new());
    let notified = Arc::clone(&wake);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = notified.notified() => {}
            }
            if tx.send(Event::Tick(Instant::now())).await.is_err() {
                break;
            }
        }
    });

    TimerHandle { task, wake }
}
