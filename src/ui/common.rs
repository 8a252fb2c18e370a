//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with connection state and data freshness.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    // Connection dot: red when the source died, yellow when the last
    // cycle had a fetch failure, dim until the first data arrives.
    let status_style = if app.source_error.is_some() {
        Style::default()
            .fg(app.theme.critical)
            .add_modifier(Modifier::BOLD)
    } else if app.prediction_error.is_some() || app.analytics_error.is_some() {
        Style::default().fg(app.theme.warning)
    } else if app.last_update_at.is_some() {
        Style::default().fg(app.theme.healthy)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let freshness = match app.last_update_at {
        Some(at) => format!("updated {:.1}s ago", at.elapsed().as_secs_f64()),
        None => "waiting for data...".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled("FOREWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(app.source_description().to_string()),
        Span::raw(" │ "),
        Span::styled(freshness, Style::default().add_modifier(Modifier::DIM)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Dashboard "),
        Line::from(" 2:Performance "),
        Line::from(" 3:Settings "),
    ];

    let selected = match app.current_view {
        View::Dashboard => 0,
        View::Performance => 1,
        View::Settings => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Priority: temporary status message, then a fresh alert, then fetch
/// errors, then context-sensitive key hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    // A fresh alert owns the status line while it lasts
    if let Some(alert) = app.recent_alert() {
        let line = Line::from(vec![
            Span::styled(
                " ⚠ ALERT ",
                Style::default()
                    .fg(app.theme.critical)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(alert.body()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let status = if let Some(ref err) = app.source_error {
        format!(" Error: {} | q:quit", err)
    } else if let Some(ref err) = app.prediction_error {
        format!(" Prediction: {} | q:quit", err)
    } else if let Some(ref err) = app.analytics_error {
        format!(" Analytics: {} | q:quit", err)
    } else {
        let controls = match app.current_view {
            View::Dashboard | View::Performance => "Tab:switch t:theme ?:help q:quit",
            View::Settings => "↑↓:field Enter:save Tab:switch ?:help q:quit",
        };
        format!(" {} | {}", app.current_view.label(), controls)
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  Tab         Next view"),
        Line::from("  1/2/3       Jump to view"),
        Line::from("  Esc         Back to dashboard"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Settings",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ↑/↓       Switch field"),
        Line::from("  0-9 .     Edit value"),
        Line::from("  Enter     Save thresholds"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  t         Toggle theme"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
