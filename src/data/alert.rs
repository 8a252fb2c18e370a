//! Alert policy for high-multiplier predictions.

use std::time::{Duration, Instant};

use crate::data::snapshot::{PredictionSnapshot, Trend};
use crate::settings::Settings;

/// Minimum quiet period between fired alerts.
pub const ALERT_COOLDOWN: Duration = Duration::from_millis(300_000);

/// A fired alert, ready for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertEvent {
    pub prediction: f64,
    pub confidence: f64,
    pub fired_at: Instant,
}

impl AlertEvent {
    /// Notification body, e.g. `Prediction: 2.05x (confidence: 87%)`.
    pub fn body(&self) -> String {
        format!(
            "Prediction: {:.2}x (confidence: {}%)",
            self.prediction,
            (self.confidence * 100.0).round() as u32
        )
    }
}

/// Decides when a prediction snapshot warrants an alert.
///
/// A snapshot qualifies when the predicted multiplier exceeds the
/// alert threshold, confidence exceeds the confidence threshold, and
/// the trend is rising. Qualifying snapshots inside the cooldown
/// window are dropped without extending it; non-qualifying snapshots
/// never start one.
#[derive(Debug, Clone)]
pub struct AlertPolicy {
    cooldown: Duration,
    last_alert_at: Option<Instant>,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self::new(ALERT_COOLDOWN)
    }
}

impl AlertPolicy {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_alert_at: None,
        }
    }

    /// Evaluate a snapshot against the active thresholds.
    pub fn check(&mut self, snapshot: &PredictionSnapshot, settings: &Settings) -> Option<AlertEvent> {
        self.check_at(snapshot, settings, Instant::now())
    }

    /// Evaluate at an explicit instant. Split out so tests can drive
    /// the clock.
    fn check_at(
        &mut self,
        snapshot: &PredictionSnapshot,
        settings: &Settings,
        now: Instant,
    ) -> Option<AlertEvent> {
        if let Some(last) = self.last_alert_at {
            if now.duration_since(last) <= self.cooldown {
                return None;
            }
        }

        let qualifies = snapshot.prediction > settings.alert_threshold
            && snapshot.confidence > settings.confidence_threshold
            && snapshot.trend == Trend::Up;
        if !qualifies {
            return None;
        }

        self.last_alert_at = Some(now);
        Some(AlertEvent {
            prediction: snapshot.prediction,
            confidence: snapshot.confidence,
            fired_at: now,
        })
    }
}
