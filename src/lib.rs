// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # forewatch
//!
//! A live terminal dashboard and library for watching a prediction service.
//!
//! This crate polls a prediction service over HTTP, keeps sliding windows of
//! recent multiplier and error samples, raises threshold alerts, and renders
//! everything in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │ (series) │    │(rendering)   │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐       ┌──────────┐        ┌──────────────────┐ │
//! │  │ source  │◀──────│  client  │◀─HTTP──│    prediction    │ │
//! │  │ (input) │       │          │        │     service      │ │
//! │  └─────────┘       └──────────┘        └──────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`client`]**: Typed HTTP client for the prediction service endpoints
//! - **[`source`]**: Update source abstraction ([`UpdateSource`] trait) with a
//!   background polling implementation
//! - **[`data`]**: Data models - sliding series buffers, validated snapshots,
//!   and the alert policy
//! - **[`settings`]**: Two-phase settings persistence (server first, local
//!   JSON cache second)
//! - **[`ui`]**: Terminal rendering using ratatui - live chart, gauges,
//!   settings form, and theme support
//!
//! ## Features
//!
//! - **Dashboard view**: Live multiplier chart with a forecast overlay
//! - **Performance view**: Recent prediction errors and model accuracy
//! - **Settings view**: Edit alert thresholds, accepted server-side before
//!   they are cached locally
//! - **Alerting**: Threshold alerts with a cooldown so they cannot spam
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a local prediction service
//! forewatch --endpoint http://localhost:8080
//!
//! # Poll less often and keep a debug log
//! forewatch -e http://prediction.internal:9000 -i 10000 --log-file forewatch.log
//! ```
//!
//! ### As a library with a polling source
//!
//! ```
//! use forewatch::{ApiClient, App, SettingsStore};
//! use forewatch::source::{Poller, POLL_INTERVAL};
//!
//! # tokio_test::block_on(async {
//! let client = ApiClient::builder().build();
//! let (source, poller) = Poller::spawn(client.clone(), POLL_INTERVAL);
//!
//! let store = SettingsStore::new("forewatch.json");
//! let app = App::new(
//!     Box::new(source),
//!     client,
//!     store,
//!     tokio::runtime::Handle::current(),
//!     true,
//! );
//!
//! poller.stop();
//! # });
//! ```
//!
//! ### Loading cached settings
//!
//! ```
//! use forewatch::SettingsStore;
//!
//! // Missing or corrupt caches fall back to the defaults
//! let store = SettingsStore::new("forewatch.json");
//! let settings = store.load();
//! assert!(settings.alert_threshold > 0.0);
//! ```

pub mod app;
pub mod client;
pub mod data;
pub mod events;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use client::{ApiClient, ClientError};
pub use data::{
    AlertEvent, AlertPolicy, AnalyticsSnapshot, ForecastSegment, PredictionSnapshot, Sample,
    SeriesBuffer, Trend,
};
pub use settings::{SaveError, Settings, SettingsStore};
pub use source::{CycleUpdate, PollSource, Poller, PollerHandle, UpdateSource, POLL_INTERVAL};
pub use ui::Theme;
