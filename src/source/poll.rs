//! Background polling task for the prediction service.
//!
//! Fetches `/api/prediction` and `/api/analytics` concurrently on a
//! fixed interval and hands completed cycles to the TUI thread over a
//! bounded channel.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::warn;

use super::{CycleUpdate, UpdateSource};
use crate::client::ApiClient;

/// Default polling interval, matching the service's update cadence.
pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Spawns the background polling loop.
#[derive(Debug)]
pub struct Poller;

impl Poller {
    /// Start polling `client` every `interval`.
    ///
    /// Returns the source half for the UI thread and a handle that
    /// stops the task. The first cycle runs immediately; when a cycle
    /// overruns the interval, missed ticks are skipped rather than
    /// bunched up. Must be called from within a tokio runtime.
    pub fn spawn(client: ApiClient, interval: Duration) -> (PollSource, PollerHandle) {
        let (tx, rx) = mpsc::channel(16);
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let description = format!(
            "poll: {} every {}ms",
            client.endpoint(),
            interval.as_millis()
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let update = run_cycle(&client).await;
                        if tx.send(update).await.is_err() {
                            // Receiver dropped
                            break;
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        (
            PollSource {
                receiver: rx,
                description,
                last_error: None,
            },
            PollerHandle { stop_tx },
        )
    }
}

/// Fetch both endpoints concurrently and fold the results into one
/// cycle. Fetch failures are logged and carried in the update; they
/// never end the polling loop.
async fn run_cycle(client: &ApiClient) -> CycleUpdate {
    let (prediction, analytics) =
        tokio::join!(client.fetch_prediction(), client.fetch_analytics());

    let (prediction, prediction_error) = match prediction {
        Ok(snapshot) => (Some(snapshot), None),
        Err(e) => {
            warn!("Prediction fetch failed: {}", e);
            (None, Some(e.to_string()))
        }
    };

    let (analytics, analytics_error) = match analytics {
        Ok(snapshot) => (Some(snapshot), None),
        Err(e) => {
            warn!("Analytics fetch failed: {}", e);
            (None, Some(e.to_string()))
        }
    };

    CycleUpdate {
        at_ms: now_ms(),
        prediction,
        analytics,
        prediction_error,
        analytics_error,
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// An [`UpdateSource`] fed by the background polling task.
#[derive(Debug)]
pub struct PollSource {
    receiver: mpsc::Receiver<CycleUpdate>,
    description: String,
    last_error: Option<String>,
}

impl UpdateSource for PollSource {
    fn poll(&mut self) -> Option<CycleUpdate> {
        // Try to receive without blocking
        match self.receiver.try_recv() {
            Ok(update) => Some(update),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.last_error = Some("poller stopped".to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Handle for stopping the background polling task.
#[derive(Debug)]
pub struct PollerHandle {
    stop_tx: watch::Sender<bool>,
}

impl PollerHandle {
    /// Stop the polling task.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}
