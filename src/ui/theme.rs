//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Trend;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level indicators.
    pub warning: Color,
    /// Color for critical-level indicators.
    pub critical: Color,
    /// Color for healthy indicators.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for headings.
    pub header: Style,
    /// Style for the focused form field.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        if detect_dark_background() {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Color for a confidence level, stepped like a traffic light:
    /// healthy at 75%+, warning at 50%+, critical below.
    pub fn confidence_color(&self, confidence: f64) -> Color {
        if confidence >= 0.75 {
            self.healthy
        } else if confidence >= 0.5 {
            self.warning
        } else {
            self.critical
        }
    }

    /// Style for a confidence level.
    pub fn confidence_style(&self, confidence: f64) -> Style {
        Style::default().fg(self.confidence_color(confidence))
    }

    /// Style for a trend badge.
    pub fn trend_style(&self, trend: Trend) -> Style {
        match trend {
            Trend::Up => Style::default().fg(self.healthy).add_modifier(Modifier::BOLD),
            Trend::Down => Style::default()
                .fg(self.critical)
                .add_modifier(Modifier::BOLD),
            Trend::Flat => Style::default().fg(self.border),
        }
    }
}

/// Detect whether the terminal background is dark.
///
/// Used for the initial theme when the settings cache carries no
/// preference. Detection failure assumes dark.
pub fn detect_dark_background() -> bool {
    // Use terminal-light crate to detect background luminance
    match terminal_light::luma() {
        Ok(luma) => luma <= 0.5,
        Err(_) => true,
    }
}
