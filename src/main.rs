// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::warn;

mod app;
mod client;
mod data;
mod events;
mod settings;
mod source;
mod ui;

use app::{App, View};
use client::ApiClient;
use settings::SettingsStore;
use source::{Poller, POLL_INTERVAL};

const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
const DEFAULT_SETTINGS_FILE: &str = "forewatch.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "forewatch")]
#[command(about = "Live terminal dashboard for a prediction service")]
struct Args {
    /// Base URL of the prediction service
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Polling interval in milliseconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Path to the settings cache file
    #[arg(short, long)]
    settings_file: Option<PathBuf>,

    /// Path to a config file (flags beat config values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Write debug logs to this file (the TUI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    // Resolve each setting: CLI flag, then config/environment, then default
    let endpoint = args
        .endpoint
        .or_else(|| config.get_string("endpoint").ok())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let interval = args
        .interval
        .or_else(|| config.get_int("interval_ms").ok().and_then(|v| u64::try_from(v).ok()))
        .map(Duration::from_millis)
        .unwrap_or(POLL_INTERVAL);
    let settings_file = args
        .settings_file
        .or_else(|| config.get_string("settings_file").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let timeout = args
        .timeout
        .or_else(|| config.get_int("timeout_secs").ok().and_then(|v| u64::try_from(v).ok()))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let log_file = args
        .log_file
        .or_else(|| config.get_string("log_file").ok().map(PathBuf::from));

    if let Some(ref path) = log_file {
        init_logging(path)?;
    }

    let client = ApiClient::builder()
        .endpoint(endpoint)
        .timeout(Duration::from_secs(timeout))
        .build();
    let store = SettingsStore::new(settings_file);

    // Build a tokio runtime for the poller and settings saves
    let rt = tokio::runtime::Runtime::new()?;

    // Warm the chart from recent history before the first poll lands
    let history = rt.block_on(client.fetch_history()).unwrap_or_else(|e| {
        warn!("History fetch failed: {}", e);
        Vec::new()
    });

    let (poll_source, poller) = rt.block_on(async { Poller::spawn(client.clone(), interval) });

    let dark_mode = store.dark_mode().unwrap_or_else(ui::theme::detect_dark_background);

    let mut app = App::new(
        Box::new(poll_source),
        client,
        store,
        rt.handle().clone(),
        dark_mode,
    );
    app.seed_history(&history, interval);

    // Run the TUI in the main thread while the async runtime runs in the background
    let result = run_tui(&mut app);

    // Signal shutdown
    poller.stop();

    result
}

/// Layered configuration: optional file, then FOREWATCH_* environment variables.
fn load_config(path: Option<&Path>) -> Result<config::Config> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    let config = builder
        .add_source(config::Environment::with_prefix("FOREWATCH"))
        .build()?;
    Ok(config)
}

/// Send tracing output to a file so it never corrupts the alternate screen.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run the TUI around the prepared application state
fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Run the main loop
    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5,
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with connection freshness
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Dashboard => ui::dashboard::render(frame, app, chunks[2]),
                View::Performance => ui::performance::render(frame, app, chunks[2]),
                View::Settings => ui::settings::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Apply whatever landed since the last frame
        app.drain_source();
        app.poll_save_results();
    }

    Ok(())
}
