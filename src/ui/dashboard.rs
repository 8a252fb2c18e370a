//! Dashboard view: live multiplier chart with the forecast overlay,
//! plus the prediction indicator panel.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the dashboard: chart on the left, indicators on the right.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).split(area);

    render_chart(frame, app, chunks[0]);
    render_indicators(frame, app, chunks[1]);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    if app.live_series.is_empty() {
        let paragraph = Paragraph::new("Waiting for data...")
            .block(chart_block(app))
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    let live_points = app.live_series.points();
    let forecast_points: Vec<(f64, f64)> = app
        .forecast
        .map(|f| f.points().to_vec())
        .unwrap_or_default();

    let (x_bounds, y_bounds) = chart_bounds(&live_points, &forecast_points);

    let mut datasets = vec![Dataset::default()
        .name("multiplier")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.highlight))
        .data(&live_points)];

    if !forecast_points.is_empty() {
        datasets.push(
            Dataset::default()
                .name("forecast")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.theme.critical))
                .data(&forecast_points),
        );
    }

    let x_labels: Vec<Line> = vec![
        Line::from(clock_label(x_bounds[0] as u64)),
        Line::from(clock_label(((x_bounds[0] + x_bounds[1]) / 2.0) as u64)),
        Line::from(clock_label(x_bounds[1] as u64)),
    ];
    let y_labels: Vec<Line> = vec![
        Line::from(format!("{:.1}x", y_bounds[0])),
        Line::from(format!("{:.1}x", (y_bounds[0] + y_bounds[1]) / 2.0)),
        Line::from(format!("{:.1}x", y_bounds[1])),
    ];

    let chart = Chart::new(datasets)
        .block(chart_block(app))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds(y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// Chart border, highlighted while an alert is flashing.
fn chart_block(app: &App) -> Block<'_> {
    if app.alert_flash().is_some() {
        Block::default()
            .title(" Live Multiplier ")
            .title(" ⚠ ALERT ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(
                Style::default()
                    .fg(app.theme.critical)
                    .add_modifier(Modifier::BOLD),
            )
    } else {
        Block::default()
            .title(" Live Multiplier ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border))
    }
}

/// Axis bounds covering the live series and the forecast overlay.
/// The y axis is anchored at zero with headroom above the peak.
fn chart_bounds(live: &[(f64, f64)], forecast: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_max = f64::MIN;

    for &(x, y) in live.iter().chain(forecast) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_max = y_max.max(y);
    }

    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    let y_max = if y_max <= 0.0 { 1.0 } else { y_max * 1.1 };

    ([x_min, x_max], [0.0, y_max])
}

/// Wall-clock label for an epoch-milliseconds x value (UTC).
fn clock_label(at_ms: u64) -> String {
    let secs = at_ms / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}

fn render_indicators(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Min(0),
    ])
    .split(area);

    render_prediction_panel(frame, app, chunks[0]);
    render_confidence_gauge(frame, app, chunks[1]);
    render_threshold_panel(frame, app, chunks[2]);
}

fn render_prediction_panel(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Prediction ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(ref snapshot) = app.prediction else {
        let paragraph = Paragraph::new("Waiting for data...")
            .block(block)
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("Current:    "),
            Span::styled(
                format!("{:.2}x", snapshot.current),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Predicted:  "),
            Span::styled(
                format!("{:.2}x", snapshot.prediction),
                Style::default()
                    .fg(app.theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Volatility: "),
            Span::raw(format!("{:.2}", snapshot.volatility)),
        ]),
        Line::from(vec![
            Span::raw("Trend:      "),
            Span::styled(snapshot.trend.label(), app.theme.trend_style(snapshot.trend)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_confidence_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Confidence ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(ref snapshot) = app.prediction else {
        frame.render_widget(block, area);
        return;
    };

    let ratio = snapshot.confidence.clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(block)
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0))
        .gauge_style(app.theme.confidence_style(ratio));

    frame.render_widget(gauge, area);
}

fn render_threshold_panel(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Alert Thresholds ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let lines = vec![
        Line::from(format!("Alert above:    {:.2}x", app.settings.alert_threshold)),
        Line::from(format!(
            "Min confidence: {:.0}%",
            app.settings.confidence_threshold * 100.0
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
