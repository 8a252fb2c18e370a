//! Wire types for the prediction service's JSON endpoints.

use serde::Deserialize;

/// Direction the service expects the multiplier to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    /// The service reports a sideways market as `"neutral"`.
    #[serde(alias = "neutral")]
    Flat,
}

impl Trend {
    /// Human-readable badge text with a direction arrow.
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Up => "Rising ↑",
            Trend::Down => "Falling ↓",
            Trend::Flat => "Flat →",
        }
    }
}

/// One response from `GET /api/prediction`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PredictionSnapshot {
    /// Latest observed multiplier.
    pub current: f64,
    /// Expected multiplier ~30 seconds out.
    pub prediction: f64,
    /// Model confidence, 0.0 to 1.0.
    pub confidence: f64,
    /// Recent variance of the multiplier.
    pub volatility: f64,
    pub trend: Trend,
}

impl PredictionSnapshot {
    /// Reject payloads that parsed but carry unusable numbers.
    pub fn validate(&self) -> Result<(), String> {
        if !self.current.is_finite() {
            return Err(format!("current multiplier is not finite: {}", self.current));
        }
        if !self.prediction.is_finite() {
            return Err(format!("prediction is not finite: {}", self.prediction));
        }
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence out of range: {}", self.confidence));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(format!("volatility out of range: {}", self.volatility));
        }
        Ok(())
    }
}

/// One response from `GET /api/analytics`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalyticsSnapshot {
    /// Mean relative prediction error over the service's window.
    pub avg_error: f64,
    /// Relative error of the most recent resolved prediction.
    pub last_error: f64,
    /// Stability score, 0.0 to 1.0.
    pub stability: f64,
    /// Recent per-prediction errors, newest last. Older service
    /// builds omit this field entirely.
    #[serde(default)]
    pub error_history: Vec<f64>,
    /// Share of predictions that landed within tolerance, 0.0 to 1.0.
    pub success_rate: f64,
}

impl AnalyticsSnapshot {
    pub fn validate(&self) -> Result<(), String> {
        if !self.avg_error.is_finite() {
            return Err(format!("avg_error is not finite: {}", self.avg_error));
        }
        if !self.last_error.is_finite() {
            return Err(format!("last_error is not finite: {}", self.last_error));
        }
        if !self.stability.is_finite() {
            return Err(format!("stability is not finite: {}", self.stability));
        }
        if !self.success_rate.is_finite() || !(0.0..=1.0).contains(&self.success_rate) {
            return Err(format!("success_rate out of range: {}", self.success_rate));
        }
        if let Some(bad) = self.error_history.iter().find(|e| !e.is_finite()) {
            return Err(format!("error_history entry is not finite: {}", bad));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prediction_snapshot() {
        let json = r#"{
            "current": 1.42,
            "prediction": 2.05,
            "confidence": 0.87,
            "volatility": 0.34,
            "trend": "up"
        }"#;

        let snapshot: PredictionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.current, 1.42);
        assert_eq!(snapshot.prediction, 2.05);
        assert_eq!(snapshot.confidence, 0.87);
        assert_eq!(snapshot.trend, Trend::Up);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_parse_trend_variants() {
        let up: Trend = serde_json::from_str(r#""up""#).unwrap();
        let down: Trend = serde_json::from_str(r#""down""#).unwrap();
        let flat: Trend = serde_json::from_str(r#""flat""#).unwrap();

        assert_eq!(up, Trend::Up);
        assert_eq!(down, Trend::Down);
        assert_eq!(flat, Trend::Flat);
    }

    #[test]
    fn test_parse_neutral_trend_alias() {
        let trend: Trend = serde_json::from_str(r#""neutral""#).unwrap();
        assert_eq!(trend, Trend::Flat);
    }

    #[test]
    fn test_reject_unknown_trend() {
        let result: Result<Trend, _> = serde_json::from_str(r#""sideways""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_prediction_field_is_an_error() {
        let json = r#"{"current": 1.0, "confidence": 0.5, "volatility": 0.1, "trend": "up"}"#;
        let result: Result<PredictionSnapshot, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_prediction_validation_rejects_out_of_range_confidence() {
        let snapshot = PredictionSnapshot {
            current: 1.0,
            prediction: 2.0,
            confidence: 1.2,
            volatility: 0.1,
            trend: Trend::Up,
        };
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_prediction_validation_rejects_nan() {
        let snapshot = PredictionSnapshot {
            current: f64::NAN,
            prediction: 2.0,
            confidence: 0.5,
            volatility: 0.1,
            trend: Trend::Flat,
        };
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_parse_analytics_snapshot() {
        let json = r#"{
            "avg_error": 0.18,
            "last_error": 0.05,
            "stability": 0.92,
            "error_history": [0.2, 0.1, 0.05],
            "success_rate": 0.74
        }"#;

        let snapshot: AnalyticsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.error_history.len(), 3);
        assert_eq!(snapshot.success_rate, 0.74);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_analytics_error_history_defaults_to_empty() {
        let json = r#"{
            "avg_error": 0.18,
            "last_error": 0.05,
            "stability": 0.92,
            "success_rate": 0.74
        }"#;

        let snapshot: AnalyticsSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.error_history.is_empty());
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_analytics_validation_rejects_bad_history_entry() {
        let snapshot = AnalyticsSnapshot {
            avg_error: 0.1,
            last_error: 0.1,
            stability: 0.9,
            error_history: vec![0.1, f64::INFINITY],
            success_rate: 0.8,
        };
        assert!(snapshot.validate().is_err());
    }
}
