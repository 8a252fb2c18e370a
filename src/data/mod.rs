//! Data models for prediction snapshots, rolling series, and alerts.
//!
//! This module holds everything between the wire and the UI: the JSON
//! payload types, the fixed-capacity sample windows the charts read,
//! and the policy that turns qualifying snapshots into alerts.
//!
//! ## Submodules
//!
//! - [`alert`]: Alert policy with cooldown ([`AlertPolicy`], [`AlertEvent`])
//! - [`series`]: Sliding sample windows and the forecast overlay
//! - [`snapshot`]: Wire types for `/api/prediction` and `/api/analytics`
//!
//! ## Data Flow
//!
//! ```text
//! GET /api/prediction (raw JSON)
//!        │
//!        ▼
//! PredictionSnapshot
//!        │
//!        ├──▶ SeriesBuffer::push() (live multiplier window)
//!        │
//!        ├──▶ ForecastSegment::new() (replaced every cycle)
//!        │
//!        └──▶ AlertPolicy::check() ──▶ AlertEvent
//!
//! GET /api/analytics (raw JSON)
//!        │
//!        ▼
//! AnalyticsSnapshot ──▶ SeriesBuffer (recent error window)
//! ```

pub mod alert;
pub mod series;
pub mod snapshot;

pub use alert::{AlertEvent, AlertPolicy, ALERT_COOLDOWN};
pub use series::{
    ForecastSegment, Sample, SeriesBuffer, ERROR_SERIES_CAPACITY, FORECAST_LOOKAHEAD_MS,
    LIVE_SERIES_CAPACITY,
};
pub use snapshot::{AnalyticsSnapshot, PredictionSnapshot, Trend};
