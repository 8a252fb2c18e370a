//! HTTP client for the prediction service's JSON API.
//!
//! The service exposes four endpoints: `/api/prediction` and
//! `/api/analytics` for the polled snapshots, `/api/history` for
//! backfilling the live chart on startup, and `/api/settings` for
//! pushing threshold changes. Any endpoint may answer with an
//! `{"error": "..."}` envelope instead of its payload.
//!
//! ## Example
//!
//! ```rust,no_run
//! use forewatch::client::ApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::builder()
//!         .endpoint("http://localhost:8080")
//!         .build();
//!
//!     let snapshot = client.fetch_prediction().await?;
//!     println!(
//!         "current: {:.2}x -> predicted: {:.2}x",
//!         snapshot.current, snapshot.prediction
//!     );
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{AnalyticsSnapshot, PredictionSnapshot};
use crate::settings::Settings;

/// Errors that can occur when talking to the prediction service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The service answered with an error envelope.
    #[error("Service error: {0}")]
    Service(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

/// A successful payload or the service's error envelope.
///
/// Variant order matters: an object carrying `error` is an envelope
/// even when the rest of the payload is present.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiPayload<T> {
    Failure { error: String },
    Success(T),
}

/// Body for `POST /api/settings`. Both thresholds travel on the
/// fraction scale the service stores.
#[derive(Debug, Serialize)]
struct SettingsBody {
    alert_threshold: f64,
    confidence_threshold: f64,
}

/// Client for the prediction service API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

impl ApiClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// The service base URL this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the current prediction snapshot.
    pub async fn fetch_prediction(&self) -> Result<PredictionSnapshot, ClientError> {
        let snapshot: PredictionSnapshot = self.get_json("/api/prediction").await?;
        snapshot.validate().map_err(ClientError::Parse)?;
        Ok(snapshot)
    }

    /// Fetch the current model analytics snapshot.
    pub async fn fetch_analytics(&self) -> Result<AnalyticsSnapshot, ClientError> {
        let snapshot: AnalyticsSnapshot = self.get_json("/api/analytics").await?;
        snapshot.validate().map_err(ClientError::Parse)?;
        Ok(snapshot)
    }

    /// Fetch recent multiplier history, oldest first.
    pub async fn fetch_history(&self) -> Result<Vec<f64>, ClientError> {
        self.get_json("/api/history").await
    }

    /// Push new thresholds to the service.
    pub async fn update_settings(&self, settings: &Settings) -> Result<(), ClientError> {
        let url = format!("{}/api/settings", self.endpoint);
        let body = SettingsBody {
            alert_threshold: settings.alert_threshold,
            confidence_threshold: settings.confidence_threshold,
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.endpoint, path);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let payload: ApiPayload<T> = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        match payload {
            ApiPayload::Failure { error } => Err(ClientError::Service(error)),
            ApiPayload::Success(value) => Ok(value),
        }
    }
}

/// Builder for ApiClient.
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    /// Set the service base URL (e.g., "http://localhost:8080").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        ApiClient {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = ApiClient::builder().build();
        assert_eq!(client.endpoint, "http://localhost:8080");
    }

    #[test]
    fn test_builder_custom() {
        let client = ApiClient::builder()
            .endpoint("http://predictions.local:9000")
            .timeout(Duration::from_secs(2))
            .build();

        assert_eq!(client.endpoint(), "http://predictions.local:9000");
    }

    #[test]
    fn test_payload_parses_snapshot() {
        let json = r#"{
            "current": 1.42,
            "prediction": 2.05,
            "confidence": 0.87,
            "volatility": 0.34,
            "trend": "up"
        }"#;

        let payload: ApiPayload<PredictionSnapshot> = serde_json::from_str(json).unwrap();
        match payload {
            ApiPayload::Success(snapshot) => assert_eq!(snapshot.prediction, 2.05),
            ApiPayload::Failure { error } => panic!("unexpected envelope: {}", error),
        }
    }

    #[test]
    fn test_payload_prefers_error_envelope() {
        let json = r#"{"error": "model not ready"}"#;

        let payload: ApiPayload<PredictionSnapshot> = serde_json::from_str(json).unwrap();
        match payload {
            ApiPayload::Failure { error } => assert_eq!(error, "model not ready"),
            ApiPayload::Success(_) => panic!("envelope parsed as snapshot"),
        }
    }

    #[test]
    fn test_payload_parses_history_array() {
        let json = "[1.0, 1.5, 2.25]";

        let payload: ApiPayload<Vec<f64>> = serde_json::from_str(json).unwrap();
        match payload {
            ApiPayload::Success(history) => assert_eq!(history, vec![1.0, 1.5, 2.25]),
            ApiPayload::Failure { error } => panic!("unexpected envelope: {}", error),
        }
    }

    #[test]
    fn test_settings_body_shape() {
        let body = SettingsBody {
            alert_threshold: 2.5,
            confidence_threshold: 0.8,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["alert_threshold"], 2.5);
        assert_eq!(value["confidence_threshold"], 0.8);
    }
}
