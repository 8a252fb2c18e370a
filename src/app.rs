//! Application state and navigation logic.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::data::{
    AlertEvent, AlertPolicy, AnalyticsSnapshot, ForecastSegment, PredictionSnapshot, Sample,
    SeriesBuffer, ERROR_SERIES_CAPACITY, LIVE_SERIES_CAPACITY,
};
use crate::settings::{SaveError, Settings, SettingsStore};
use crate::source::{CycleUpdate, UpdateSource};
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Live multiplier chart with the forecast overlay.
    Dashboard,
    /// Model accuracy: recent errors, stability, success rate.
    Performance,
    /// Alert threshold form.
    Settings,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::Performance,
            View::Performance => View::Settings,
            View::Settings => View::Dashboard,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Dashboard => View::Settings,
            View::Performance => View::Dashboard,
            View::Settings => View::Performance,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Performance => "Performance",
            View::Settings => "Settings",
        }
    }
}

/// Which settings form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    AlertThreshold,
    ConfidenceThreshold,
}

impl SettingsField {
    /// Cycle focus to the other field.
    pub fn next(self) -> Self {
        match self {
            SettingsField::AlertThreshold => SettingsField::ConfidenceThreshold,
            SettingsField::ConfidenceThreshold => SettingsField::AlertThreshold,
        }
    }
}

/// Editable text buffers for the settings view.
///
/// The confidence buffer is edited on the percent scale people read
/// (70, not 0.7); [`parse`](Self::parse) converts back to the fraction
/// the rest of the app uses.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub alert_threshold: String,
    pub confidence_threshold: String,
    pub focus: SettingsField,
}

impl SettingsForm {
    /// Seed the form from the active settings.
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            alert_threshold: format_threshold(settings.alert_threshold),
            confidence_threshold: format_threshold(settings.confidence_threshold * 100.0),
            focus: SettingsField::default(),
        }
    }

    /// Parse the buffers into settings, if both hold usable numbers.
    pub fn parse(&self) -> Option<Settings> {
        let alert_threshold: f64 = self.alert_threshold.trim().parse().ok()?;
        let confidence_percent: f64 = self.confidence_threshold.trim().parse().ok()?;

        if !alert_threshold.is_finite() || alert_threshold <= 0.0 {
            return None;
        }
        if !confidence_percent.is_finite() || !(0.0..=100.0).contains(&confidence_percent) {
            return None;
        }

        Some(Settings {
            alert_threshold,
            confidence_threshold: confidence_percent / 100.0,
        })
    }

    /// The text buffer currently holding focus.
    pub fn focused_buffer_mut(&mut self) -> &mut String {
        match self.focus {
            SettingsField::AlertThreshold => &mut self.alert_threshold,
            SettingsField::ConfidenceThreshold => &mut self.confidence_threshold,
        }
    }
}

/// Format a threshold without trailing zero noise (2.0 -> "2", 2.5 -> "2.5").
fn format_threshold(value: f64) -> String {
    format!("{:.2}", value)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Result of a background settings save.
#[derive(Debug)]
struct SaveOutcome {
    settings: Settings,
    result: Result<(), SaveError>,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Update source
    source: Box<dyn UpdateSource>,
    pub prediction: Option<PredictionSnapshot>,
    pub analytics: Option<AnalyticsSnapshot>,
    pub live_series: SeriesBuffer,
    pub error_series: SeriesBuffer,
    pub forecast: Option<ForecastSegment>,
    pub prediction_error: Option<String>,
    pub analytics_error: Option<String>,
    pub source_error: Option<String>,
    pub last_update_at: Option<Instant>,

    // Alerting
    alert_policy: AlertPolicy,
    active_alert: Option<AlertEvent>,

    // Settings round-trip
    pub settings: Settings,
    pub settings_form: SettingsForm,
    pub save_in_flight: bool,
    store: SettingsStore,
    client: ApiClient,
    runtime: tokio::runtime::Handle,
    save_tx: mpsc::Sender<SaveOutcome>,
    save_rx: mpsc::Receiver<SaveOutcome>,
    save_feedback: Option<(String, bool, Instant)>,

    // UI
    pub theme: Theme,
    pub dark_mode: bool,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App around the given update source and settings store.
    pub fn new(
        source: Box<dyn UpdateSource>,
        client: ApiClient,
        store: SettingsStore,
        runtime: tokio::runtime::Handle,
        dark_mode: bool,
    ) -> Self {
        let settings = store.load();
        let (save_tx, save_rx) = mpsc::channel(4);

        Self {
            running: true,
            current_view: View::Dashboard,
            show_help: false,
            source,
            prediction: None,
            analytics: None,
            live_series: SeriesBuffer::new(LIVE_SERIES_CAPACITY),
            error_series: SeriesBuffer::new(ERROR_SERIES_CAPACITY),
            forecast: None,
            prediction_error: None,
            analytics_error: None,
            source_error: None,
            last_update_at: None,
            alert_policy: AlertPolicy::default(),
            active_alert: None,
            settings,
            settings_form: SettingsForm::from_settings(settings),
            save_in_flight: false,
            store,
            client,
            runtime,
            save_tx,
            save_rx,
            save_feedback: None,
            theme: if dark_mode { Theme::dark() } else { Theme::light() },
            dark_mode,
            status_message: None,
        }
    }

    /// Returns a description of the current update source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Warm the live series from fetched multiplier history, oldest first.
    ///
    /// Each sample is back-dated by one poll interval so the time axis
    /// starts out plausible. Values past the buffer capacity and
    /// non-finite entries are skipped.
    pub fn seed_history(&mut self, history: &[f64], interval: Duration) {
        let step = interval.as_millis() as u64;
        let now = now_ms();

        let tail: Vec<f64> = history
            .iter()
            .rev()
            .take(self.live_series.capacity())
            .rev()
            .copied()
            .collect();

        let count = tail.len() as u64;
        for (i, value) in tail.into_iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let age = count - 1 - i as u64;
            self.live_series.push(Sample {
                at_ms: now.saturating_sub(age * step),
                value,
            });
        }
    }

    /// Drain all pending cycles from the source.
    ///
    /// Returns true if any update was applied.
    pub fn drain_source(&mut self) -> bool {
        let mut updated = false;
        while let Some(update) = self.source.poll() {
            self.apply_update(update);
            updated = true;
        }
        self.source_error = self.source.error().map(|e| e.to_string());
        updated
    }

    /// Fold one polling cycle into the buffers and latest snapshots.
    ///
    /// Endpoints are independent: a cycle carrying only analytics
    /// leaves all prediction state untouched, and vice versa.
    pub fn apply_update(&mut self, update: CycleUpdate) {
        let mut fresh = false;

        if let Some(prediction) = update.prediction {
            self.live_series.push(Sample {
                at_ms: update.at_ms,
                value: prediction.current,
            });
            self.forecast = Some(ForecastSegment::new(
                update.at_ms,
                prediction.current,
                prediction.prediction,
            ));

            if let Some(event) = self.alert_policy.check(&prediction, &self.settings) {
                info!("Alert fired: {}", event.body());
                self.active_alert = Some(event);
            }

            self.prediction = Some(prediction);
            fresh = true;
        }

        if let Some(analytics) = update.analytics {
            // The error window mirrors the latest history wholesale
            // rather than accumulating across cycles.
            self.error_series = SeriesBuffer::new(ERROR_SERIES_CAPACITY);
            for err in analytics
                .error_history
                .iter()
                .rev()
                .take(ERROR_SERIES_CAPACITY)
                .rev()
            {
                self.error_series.push(Sample {
                    at_ms: update.at_ms,
                    value: *err,
                });
            }

            self.analytics = Some(analytics);
            fresh = true;
        }

        if fresh {
            self.last_update_at = Some(Instant::now());
        }

        self.prediction_error = update.prediction_error;
        self.analytics_error = update.analytics_error;
    }

    /// The alert currently flashing the dashboard chart, if one fired
    /// within the last 2 seconds.
    pub fn alert_flash(&self) -> Option<&AlertEvent> {
        self.active_alert
            .as_ref()
            .filter(|a| a.fired_at.elapsed() < Duration::from_secs(2))
    }

    /// The alert shown on the status line, if one fired within the
    /// last 5 seconds.
    pub fn recent_alert(&self) -> Option<&AlertEvent> {
        self.active_alert
            .as_ref()
            .filter(|a| a.fired_at.elapsed() < Duration::from_secs(5))
    }

    /// Parse the form and push the thresholds to the service.
    ///
    /// The save runs on the runtime and reports back through
    /// [`poll_save_results`](Self::poll_save_results). A save already
    /// in flight is left alone.
    pub fn request_save(&mut self) {
        if self.save_in_flight {
            return;
        }

        let Some(settings) = self.settings_form.parse() else {
            self.set_status_message("Invalid threshold values".to_string());
            return;
        };

        self.save_in_flight = true;
        let client = self.client.clone();
        let store = self.store.clone();
        let tx = self.save_tx.clone();
        self.runtime.spawn(async move {
            let result = store.save(&client, settings).await;
            let _ = tx.send(SaveOutcome { settings, result }).await;
        });
    }

    /// Collect finished saves. Called once per frame.
    pub fn poll_save_results(&mut self) {
        match self.save_rx.try_recv() {
            Ok(outcome) => {
                self.save_in_flight = false;
                match outcome.result {
                    Ok(()) => {
                        self.settings = outcome.settings;
                        let focus = self.settings_form.focus;
                        self.settings_form = SettingsForm::from_settings(outcome.settings);
                        self.settings_form.focus = focus;
                        self.save_feedback = Some(("✓ Saved".to_string(), true, Instant::now()));
                    }
                    Err(e) => {
                        warn!("Settings save failed: {}", e);
                        self.save_feedback =
                            Some((format!("Save failed: {}", e), false, Instant::now()));
                    }
                }
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => {}
        }
    }

    /// Save feedback for the settings view, if it hasn't expired.
    /// Success shows briefly; failures linger a little longer.
    pub fn get_save_feedback(&self) -> Option<(&str, bool)> {
        if let Some((msg, ok, at)) = &self.save_feedback {
            let ttl = if *ok {
                Duration::from_secs(2)
            } else {
                Duration::from_secs(5)
            };
            if at.elapsed() < ttl {
                return Some((msg.as_str(), *ok));
            }
        }
        None
    }

    /// Flip between dark and light themes and persist the choice.
    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.theme = if self.dark_mode {
            Theme::dark()
        } else {
            Theme::light()
        };

        if let Err(e) = self.store.set_dark_mode(self.dark_mode) {
            warn!("Failed to persist theme choice: {}", e);
            self.set_status_message(format!("Failed to save theme: {}", e));
        }
    }

    /// Switch to the next view (cycles through Dashboard → Performance → Settings).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view (cycles through Settings → Performance → Dashboard).
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Navigate back: close the help overlay first, then return to the
    /// dashboard.
    pub fn go_back(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.current_view != View::Dashboard {
            self.current_view = View::Dashboard;
        }
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Trend;

    #[derive(Debug)]
    struct StubSource {
        updates: Vec<CycleUpdate>,
    }

    impl UpdateSource for StubSource {
        fn poll(&mut self) -> Option<CycleUpdate> {
            if self.updates.is_empty() {
                None
            } else {
                Some(self.updates.remove(0))
            }
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn error(&self) -> Option<&str> {
            None
        }
    }

    fn prediction(current: f64, predicted: f64, confidence: f64, trend: Trend) -> PredictionSnapshot {
        PredictionSnapshot {
            current,
            prediction: predicted,
            confidence,
            volatility: 0.2,
            trend,
        }
    }

    fn analytics(error_history: &[f64]) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            avg_error: 0.15,
            last_error: 0.05,
            stability: 0.9,
            error_history: error_history.to_vec(),
            success_rate: 0.8,
        }
    }

    fn cycle(
        at_ms: u64,
        prediction: Option<PredictionSnapshot>,
        analytics: Option<AnalyticsSnapshot>,
    ) -> CycleUpdate {
        CycleUpdate {
            at_ms,
            prediction,
            analytics,
            prediction_error: None,
            analytics_error: None,
        }
    }

    // The TempDir must stay alive alongside the App so cache writes
    // have somewhere to land.
    fn test_app(updates: Vec<CycleUpdate>) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("forewatch.json"));
        let client = ApiClient::builder().endpoint("http://127.0.0.1:1").build();
        let app = App::new(
            Box::new(StubSource { updates }),
            client,
            store,
            tokio::runtime::Handle::current(),
            true,
        );
        (app, dir)
    }

    #[tokio::test]
    async fn test_prediction_cycle_touches_only_prediction_state() {
        let (mut app, _dir) = test_app(vec![]);

        app.apply_update(cycle(1000, Some(prediction(1.4, 1.8, 0.6, Trend::Up)), None));

        assert_eq!(app.live_series.len(), 1);
        assert_eq!(app.live_series.latest().unwrap().value, 1.4);
        let forecast = app.forecast.unwrap();
        assert_eq!(forecast.from.at_ms, 1000);
        assert_eq!(forecast.to.value, 1.8);
        assert!(app.prediction.is_some());

        assert!(app.analytics.is_none());
        assert!(app.error_series.is_empty());
    }

    #[tokio::test]
    async fn test_analytics_cycle_touches_only_analytics_state() {
        let (mut app, _dir) = test_app(vec![]);

        app.apply_update(cycle(1000, None, Some(analytics(&[0.1, 0.2, 0.3]))));

        assert_eq!(app.error_series.len(), 3);
        assert!(app.analytics.is_some());

        assert!(app.prediction.is_none());
        assert!(app.live_series.is_empty());
        assert!(app.forecast.is_none());
    }

    #[tokio::test]
    async fn test_error_series_mirrors_trailing_five() {
        let (mut app, _dir) = test_app(vec![]);

        app.apply_update(cycle(
            1000,
            None,
            Some(analytics(&[0.9, 0.8, 0.7, 0.1, 0.2, 0.3, 0.4, 0.5])),
        ));

        let values: Vec<f64> = app.error_series.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![0.1, 0.2, 0.3, 0.4, 0.5]);

        // The next analytics cycle replaces the window outright.
        app.apply_update(cycle(2000, None, Some(analytics(&[0.6, 0.7]))));
        let values: Vec<f64> = app.error_series.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![0.6, 0.7]);
    }

    #[tokio::test]
    async fn test_partial_cycle_preserves_other_endpoint() {
        let (mut app, _dir) = test_app(vec![]);

        app.apply_update(cycle(1000, Some(prediction(1.4, 1.8, 0.6, Trend::Up)), None));
        app.apply_update(cycle(4000, None, Some(analytics(&[0.1]))));

        // The analytics-only cycle must not disturb prediction state.
        assert_eq!(app.live_series.len(), 1);
        assert!(app.prediction.is_some());
        assert_eq!(app.forecast.unwrap().from.at_ms, 1000);
        assert_eq!(app.error_series.len(), 1);
    }

    #[tokio::test]
    async fn test_cycle_errors_surface_and_clear() {
        let (mut app, _dir) = test_app(vec![]);

        let mut failed = cycle(1000, None, Some(analytics(&[0.1])));
        failed.prediction_error = Some("Request timed out".to_string());
        app.apply_update(failed);
        assert_eq!(app.prediction_error.as_deref(), Some("Request timed out"));

        app.apply_update(cycle(4000, Some(prediction(1.4, 1.8, 0.6, Trend::Up)), None));
        assert!(app.prediction_error.is_none());
    }

    #[tokio::test]
    async fn test_alert_fires_through_apply_update() {
        let (mut app, _dir) = test_app(vec![]);

        // Defaults are 2.0 / 0.7; this snapshot clears both and rises.
        app.apply_update(cycle(1000, Some(prediction(1.9, 2.5, 0.85, Trend::Up)), None));

        let alert = app.alert_flash().expect("alert should be flashing");
        assert_eq!(alert.body(), "Prediction: 2.50x (confidence: 85%)");
        assert!(app.recent_alert().is_some());
    }

    #[tokio::test]
    async fn test_below_threshold_prediction_does_not_alert() {
        let (mut app, _dir) = test_app(vec![]);

        app.apply_update(cycle(1000, Some(prediction(1.2, 1.5, 0.9, Trend::Up)), None));

        assert!(app.alert_flash().is_none());
        assert!(app.recent_alert().is_none());
    }

    #[tokio::test]
    async fn test_drain_source_applies_all_pending() {
        let (mut app, _dir) = test_app(vec![
            cycle(1000, Some(prediction(1.2, 1.4, 0.5, Trend::Flat)), None),
            cycle(4000, Some(prediction(1.3, 1.5, 0.5, Trend::Flat)), None),
        ]);

        assert!(app.drain_source());
        assert_eq!(app.live_series.len(), 2);
        assert!(!app.drain_source());
    }

    #[tokio::test]
    async fn test_seed_history_caps_and_backdates() {
        let (mut app, _dir) = test_app(vec![]);

        let history: Vec<f64> = (0..60).map(|i| 1.0 + i as f64 * 0.01).collect();
        app.seed_history(&history, Duration::from_millis(3000));

        assert_eq!(app.live_series.len(), 50);

        // Only the trailing 50 values survive, in order.
        let first = app.live_series.iter().next().unwrap();
        assert_eq!(first.value, history[10]);
        let last = app.live_series.latest().unwrap();
        assert_eq!(last.value, history[59]);

        // Back-dated one interval per step.
        let stamps: Vec<u64> = app.live_series.iter().map(|s| s.at_ms).collect();
        for pair in stamps.windows(2) {
            assert_eq!(pair[1] - pair[0], 3000);
        }
    }

    #[tokio::test]
    async fn test_seed_history_skips_non_finite() {
        let (mut app, _dir) = test_app(vec![]);

        app.seed_history(&[1.0, f64::NAN, 2.0], Duration::from_millis(3000));

        let values: Vec<f64> = app.live_series.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn test_theme_toggle_twice_round_trips() {
        let (mut app, _dir) = test_app(vec![]);
        assert!(app.dark_mode);

        app.toggle_theme();
        assert!(!app.dark_mode);
        assert_eq!(app.store.dark_mode(), Some(false));

        app.toggle_theme();
        assert!(app.dark_mode);
        assert_eq!(app.store.dark_mode(), Some(true));
    }

    #[tokio::test]
    async fn test_invalid_form_does_not_save() {
        let (mut app, _dir) = test_app(vec![]);

        app.settings_form.alert_threshold = "abc".to_string();
        app.request_save();

        assert!(!app.save_in_flight);
        assert_eq!(app.get_status_message(), Some("Invalid threshold values"));
    }

    #[test]
    fn test_form_parse_converts_percent() {
        let mut form = SettingsForm::from_settings(Settings::default());
        assert_eq!(form.alert_threshold, "2");
        assert_eq!(form.confidence_threshold, "70");

        form.alert_threshold = "2.5".to_string();
        form.confidence_threshold = "85".to_string();

        let settings = form.parse().unwrap();
        assert_eq!(settings.alert_threshold, 2.5);
        assert_eq!(settings.confidence_threshold, 0.85);
    }

    #[test]
    fn test_form_parse_rejects_out_of_range() {
        let mut form = SettingsForm::from_settings(Settings::default());

        form.confidence_threshold = "150".to_string();
        assert!(form.parse().is_none());

        form.confidence_threshold = "70".to_string();
        form.alert_threshold = "-1".to_string();
        assert!(form.parse().is_none());

        form.alert_threshold = "".to_string();
        assert!(form.parse().is_none());
    }

    #[test]
    fn test_view_cycling_round_trips() {
        let mut view = View::Dashboard;
        for _ in 0..3 {
            view = view.next();
        }
        assert_eq!(view, View::Dashboard);
        assert_eq!(View::Dashboard.prev(), View::Settings);
    }
}
