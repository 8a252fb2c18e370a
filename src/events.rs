use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // The settings form captures editing keys first
    if app.current_view == View::Settings && handle_settings_input(app, key) {
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Dashboard),
        KeyCode::Char('2') => app.set_view(View::Performance),
        KeyCode::Char('3') => app.set_view(View::Settings),

        // Arrow keys and vim-style h/l also switch views
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Theme toggle
        KeyCode::Char('t') => app.toggle_theme(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle key input on the settings form.
///
/// Returns true when the key was consumed by the form. Only editing
/// keys are consumed; everything else falls through to the main
/// handler so navigation keeps working from the Settings view.
fn handle_settings_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        // Move focus between the two fields
        KeyCode::Up | KeyCode::Down => {
            app.settings_form.focus = app.settings_form.focus.next();
            true
        }

        // Save
        KeyCode::Enter => {
            app.request_save();
            true
        }

        KeyCode::Backspace => {
            app.settings_form.focused_buffer_mut().pop();
            true
        }

        // Thresholds are plain decimal numbers
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
            app.settings_form.focused_buffer_mut().push(c);
            true
        }

        _ => false,
    }
}
