//! Alert thresholds and the local settings cache.
//!
//! Settings live in two places: the prediction service (the source of
//! truth for alerting) and a small JSON cache file that makes them
//! survive restarts. Saving is two-phase: the service must accept the
//! new thresholds before the cache is rewritten, so a rejected save
//! leaves the cache untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::client::{ApiClient, ClientError};

/// Active alert thresholds.
///
/// `confidence_threshold` is a fraction (0.0 to 1.0) everywhere in
/// memory and on the wire; only the cache file stores it as a percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Alerts require a predicted multiplier above this.
    pub alert_threshold: f64,
    /// Alerts require model confidence above this fraction.
    pub confidence_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alert_threshold: 2.0,
            confidence_threshold: 0.7,
        }
    }
}

/// Errors that can occur when saving settings.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The service rejected the update; the cache was left untouched.
    #[error("settings update rejected: {0}")]
    Remote(#[from] ClientError),

    /// The service accepted the update but the cache write failed.
    #[error("settings cache write failed: {0}")]
    Cache(#[from] io::Error),
}

/// On-disk cache layout. Thresholds keep the percent scale and
/// camelCase keys of the web client this replaces.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CacheFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    dark_mode: Option<bool>,
    alert_threshold: f64,
    /// Percent, 0 to 100.
    confidence_threshold: f64,
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            dark_mode: None,
            alert_threshold: 2.0,
            confidence_threshold: 70.0,
        }
    }
}

impl From<CacheFile> for Settings {
    fn from(cache: CacheFile) -> Self {
        Self {
            alert_threshold: cache.alert_threshold,
            confidence_threshold: cache.confidence_threshold / 100.0,
        }
    }
}

/// Reads and writes the settings cache file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store backed by the given cache file path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load thresholds from the cache, falling back to defaults when
    /// the file is missing or unreadable.
    pub fn load(&self) -> Settings {
        Settings::from(self.read_cache())
    }

    /// The cached dark-mode preference, if the user has set one.
    pub fn dark_mode(&self) -> Option<bool> {
        self.read_cache().dark_mode
    }

    /// Push thresholds to the service, then persist them locally.
    ///
    /// The cache is only rewritten after the service accepts the
    /// update, so on `SaveError::Remote` the old values stay active.
    pub async fn save(&self, client: &ApiClient, settings: Settings) -> Result<(), SaveError> {
        client.update_settings(&settings).await?;
        self.commit(settings)?;
        Ok(())
    }

    /// Persist the dark-mode preference. Local only; the service does
    /// not know about display settings.
    pub fn set_dark_mode(&self, enabled: bool) -> io::Result<()> {
        let mut cache = self.read_cache();
        cache.dark_mode = Some(enabled);
        self.write_cache(&cache)
    }

    fn commit(&self, settings: Settings) -> io::Result<()> {
        let mut cache = self.read_cache();
        cache.alert_threshold = settings.alert_threshold;
        cache.confidence_threshold = settings.confidence_threshold * 100.0;
        self.write_cache(&cache)
    }

    fn read_cache(&self) -> CacheFile {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return CacheFile::default(),
            Err(e) => {
                warn!("Failed to read settings cache {}: {}", self.path.display(), e);
                return CacheFile::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(cache) => cache,
            Err(e) => {
                warn!(
                    "Ignoring corrupt settings cache {}: {}",
                    self.path.display(),
                    e
                );
                CacheFile::default()
            }
        }
    }

    fn write_cache(&self, cache: &CacheFile) -> io::Result<()> {
        let json = serde_json::to_string_pretty(cache).map_err(io::Error::other)?;
        fs::write(&self.path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("absent.json"));

        let settings = store.load();
        assert_eq!(settings.alert_threshold, 2.0);
        assert_eq!(settings.confidence_threshold, 0.7);
        assert!(store.dark_mode().is_none());
    }

    #[test]
    fn test_load_corrupt_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let store = SettingsStore::new(file.path());
        let settings = store.load();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_converts_percent_to_fraction() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"darkMode": true, "alertThreshold": 3.5, "confidenceThreshold": 85}}"#
        )
        .unwrap();

        let store = SettingsStore::new(file.path());
        let settings = store.load();
        assert_eq!(settings.alert_threshold, 3.5);
        assert_eq!(settings.confidence_threshold, 0.85);
        assert_eq!(store.dark_mode(), Some(true));
    }

    #[test]
    fn test_load_tolerates_missing_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"alertThreshold": 4.0}}"#).unwrap();

        let store = SettingsStore::new(file.path());
        let settings = store.load();
        assert_eq!(settings.alert_threshold, 4.0);
        assert_eq!(settings.confidence_threshold, 0.7);
    }

    #[test]
    fn test_commit_writes_percent_and_keeps_dark_mode() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"darkMode": true, "alertThreshold": 2.0, "confidenceThreshold": 70}}"#
        )
        .unwrap();

        let store = SettingsStore::new(file.path());
        store
            .commit(Settings {
                alert_threshold: 2.5,
                confidence_threshold: 0.8,
            })
            .unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["alertThreshold"], 2.5);
        assert_eq!(value["confidenceThreshold"], 80.0);
        assert_eq!(value["darkMode"], true);

        let settings = store.load();
        assert_eq!(settings.confidence_threshold, 0.8);
    }

    #[test]
    fn test_set_dark_mode_keeps_thresholds() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"alertThreshold": 3.0, "confidenceThreshold": 60}}"#
        )
        .unwrap();

        let store = SettingsStore::new(file.path());
        store.set_dark_mode(true).unwrap();

        assert_eq!(store.dark_mode(), Some(true));
        let settings = store.load();
        assert_eq!(settings.alert_threshold, 3.0);
        assert_eq!(settings.confidence_threshold, 0.6);
    }

    #[tokio::test]
    async fn test_save_rejected_remotely_leaves_cache_untouched() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"alertThreshold": 2.0, "confidenceThreshold": 70}}"#
        )
        .unwrap();

        // Nothing listens on port 1, so the update is rejected.
        let client = ApiClient::builder()
            .endpoint("http://127.0.0.1:1")
            .timeout(Duration::from_millis(200))
            .build();
        let store = SettingsStore::new(file.path());

        let result = store
            .save(
                &client,
                Settings {
                    alert_threshold: 9.0,
                    confidence_threshold: 0.9,
                },
            )
            .await;

        assert!(matches!(result, Err(SaveError::Remote(_))));
        let settings = store.load();
        assert_eq!(settings.alert_threshold, 2.0);
        assert_eq!(settings.confidence_threshold, 0.7);
    }
}
