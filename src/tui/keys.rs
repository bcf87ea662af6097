/// Keyboard event to action mapping
///
/// This module handles converting crossterm KeyEvents into framework Actions.
/// It contains all the keyboard navigation logic for the TUI.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, trace};

use super::action::Action;
use super::state::AppState;
use super::types::SubView;

/// Handle global keys that work regardless of focus
fn handle_global_keys(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('l') => Some(Action::CycleLanguage),
        KeyCode::Char('d') => Some(Action::CycleDatePreset),
        KeyCode::Char('s') => Some(Action::ToggleSettingsFocus),
        _ => None,
    }
}

/// Handle direct sub-view switching via number keys (1-7)
fn handle_number_keys(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::Char(c) => c
            .to_digit(10)
            .and_then(|n| SubView::from_number(n as usize))
            .map(Action::SelectSubView),
        _ => None,
    }
}

/// Settings bar focused: arrows move the mode cursor, space toggles
fn handle_settings_keys(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::Left => Some(Action::SettingsCursorLeft),
        KeyCode::Right => Some(Action::SettingsCursorRight),
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::ToggleMode),
        KeyCode::Esc | KeyCode::Up => {
            debug!("KEY: leaving settings bar");
            Some(Action::ToggleSettingsFocus)
        }
        _ => None,
    }
}

/// Tab bar focused: arrows and Tab cycle the sub-views
fn handle_tab_bar_keys(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::Left | KeyCode::BackTab => Some(Action::PrevSubView),
        KeyCode::Right | KeyCode::Tab => Some(Action::NextSubView),
        KeyCode::Down => {
            debug!("KEY: Down pressed on tab bar - entering settings bar");
            Some(Action::ToggleSettingsFocus)
        }
        _ => None,
    }
}

/// Convert a KeyEvent into an Action based on current application state
///
/// - Global keys (q, r, l, d, s) work everywhere
/// - Number keys jump straight to a sub-view
/// - The rest depends on whether the settings bar has focus
pub fn key_to_action(key: KeyEvent, state: &AppState) -> Option<Action> {
    let settings_focused = state.navigation.settings_focused;
    trace!(
        "KEY: {:?} (sub_view={:?}, settings_focused={})",
        key.code,
        state.navigation.sub_view,
        settings_focused
    );

    if let Some(action) = handle_global_keys(key) {
        return Some(action);
    }

    if let Some(action) = handle_number_keys(key.code) {
        return Some(action);
    }

    if settings_focused {
        handle_settings_keys(key.code)
    } else {
        handle_tab_bar_keys(key.code)
    }
}
