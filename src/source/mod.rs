//! Update source abstraction for receiving polling results.
//!
//! This module decouples the TUI thread from the async polling task:
//! the task pushes completed cycles into a channel, and the UI drains
//! them between frames through the [`UpdateSource`] trait.

mod poll;

pub use poll::{PollSource, Poller, PollerHandle, POLL_INTERVAL};

use std::fmt::Debug;

use crate::data::{AnalyticsSnapshot, PredictionSnapshot};

/// The results of one polling cycle.
///
/// Both endpoints are fetched every cycle, and each can fail on its
/// own. A failed endpoint leaves its snapshot `None` and carries the
/// error message instead, so one bad endpoint never hides the other's
/// data.
#[derive(Debug, Clone)]
pub struct CycleUpdate {
    /// When the cycle completed, in Unix epoch milliseconds.
    pub at_ms: u64,
    pub prediction: Option<PredictionSnapshot>,
    pub analytics: Option<AnalyticsSnapshot>,
    pub prediction_error: Option<String>,
    pub analytics_error: Option<String>,
}

/// Trait for receiving polled updates from the prediction service.
///
/// Implementations hand over completed polling cycles one at a time.
/// The UI loop calls [`poll`](Self::poll) between frames, so it must
/// be non-blocking.
///
/// # Example
///
/// ```
/// use forewatch::client::ApiClient;
/// use forewatch::source::{Poller, UpdateSource, POLL_INTERVAL};
///
/// # tokio_test::block_on(async {
/// let client = ApiClient::builder().build();
/// let (mut source, poller) = Poller::spawn(client, POLL_INTERVAL);
/// if let Some(update) = source.poll() {
///     println!("Cycle completed at {} ms", update.at_ms);
/// }
/// poller.stop();
/// # });
/// ```
pub trait UpdateSource: Send + Debug {
    /// Poll for the next completed cycle.
    ///
    /// Returns `Some(update)` if a cycle finished since the last call,
    /// `None` otherwise. This method never blocks.
    fn poll(&mut self) -> Option<CycleUpdate>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;

    /// Check if the source itself has failed.
    ///
    /// Per-endpoint fetch errors travel inside [`CycleUpdate`]; this
    /// reports source-level failures such as a dead polling task.
    fn error(&self) -> Option<&str>;
}
