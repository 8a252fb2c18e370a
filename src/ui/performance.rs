//! Performance view: recent prediction error bars and model accuracy stats.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::App;

const BAR_LABELS: [&str; 5] = ["1", "2", "3", "4", "5"];

/// Render the performance view: error bars on the left, stats on the right.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).split(area);

    render_error_bars(frame, app, chunks[0]);

    let side = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .split(chunks[1]);

    render_accuracy_stats(frame, app, side[0]);
    render_success_gauge(frame, app, side[1]);
}

fn render_error_bars(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Recent Prediction Errors (%) ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if app.error_series.is_empty() {
        let paragraph = Paragraph::new("Waiting for data...")
            .block(block)
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    // Oldest error on the left, matching the order the series holds them.
    let values: Vec<(&str, u64)> = app
        .error_series
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let label = BAR_LABELS.get(i).copied().unwrap_or("");
            (label, (sample.value * 100.0).round() as u64)
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(values.as_slice())
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(app.theme.critical))
        .value_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    frame.render_widget(chart, area);
}

fn render_accuracy_stats(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Model Accuracy ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(ref analytics) = app.analytics else {
        let paragraph = Paragraph::new("Waiting for data...")
            .block(block)
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("Avg accuracy: "),
            Span::styled(
                format!("{:.0}%", (1.0 - analytics.avg_error) * 100.0),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!("Last error:   {:.1}%", analytics.last_error * 100.0)),
        Line::from(format!("Stability:    {:.0}%", analytics.stability * 100.0)),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_success_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Success Rate ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(ref analytics) = app.analytics else {
        frame.render_widget(block, area);
        return;
    };

    let ratio = analytics.success_rate.clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(block)
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0))
        .gauge_style(Style::default().fg(app.theme.healthy));

    frame.render_widget(gauge, area);
}
