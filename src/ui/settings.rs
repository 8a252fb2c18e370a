//! Settings view: an editable two-field form for the alert thresholds.
//!
//! Edits live in [`crate::app::SettingsForm`] buffers until Enter submits
//! them; the active thresholds shown below only change after the server
//! accepts the update.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, SettingsField};

/// Render the settings form.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Alert Settings ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let form = &app.settings_form;
    let lines = vec![
        Line::default(),
        field_line(
            "Alert threshold (x)",
            &form.alert_threshold,
            form.focus == SettingsField::AlertThreshold,
            app,
        ),
        Line::default(),
        field_line(
            "Confidence threshold (%)",
            &form.confidence_threshold,
            form.focus == SettingsField::ConfidenceThreshold,
            app,
        ),
        Line::default(),
        Line::from(vec![
            Span::styled(" Active:  ", Style::default().add_modifier(Modifier::DIM)),
            Span::raw(format!(
                "alert above {:.2}x at {:.0}%+ confidence",
                app.settings.alert_threshold,
                app.settings.confidence_threshold * 100.0
            )),
        ]),
        Line::default(),
        status_line(app),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(label: &str, value: &str, focused: bool, app: &App) -> Line<'static> {
    let cursor = if focused { "_" } else { " " };
    let style = if focused {
        app.theme.selected
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!(" {:<26} ", label)),
        Span::styled(format!("[ {}{} ]", value, cursor), style),
    ])
}

/// Save progress, save feedback, or the key hint, in that order.
fn status_line(app: &App) -> Line<'static> {
    if app.save_in_flight {
        return Line::from(Span::styled(
            " Saving...",
            Style::default().fg(app.theme.warning),
        ));
    }

    if let Some((message, ok)) = app.get_save_feedback() {
        let style = if ok {
            Style::default()
                .fg(app.theme.healthy)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.critical)
        };
        return Line::from(Span::styled(format!(" {}", message), style));
    }

    Line::from(Span::styled(
        " ↑/↓ switch field | Enter save",
        Style::default().add_modifier(Modifier::DIM),
    ))
}
