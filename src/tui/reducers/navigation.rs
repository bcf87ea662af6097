use tracing::{debug, trace};

use crate::tui::action::Action;
use crate::tui::component::Effect;
use crate::tui::state::AppState;
use crate::tui::types::SubView;

use super::player::ensure_same_match;

/// Handle tab bar and settings cursor movement
pub fn reduce_navigation(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::SelectSubView(view) => Ok(select_sub_view(state, *view)),
        Action::NextSubView => {
            let next = state.navigation.sub_view.next();
            Ok(select_sub_view(state, next))
        }
        Action::PrevSubView => {
            let prev = state.navigation.sub_view.prev();
            Ok(select_sub_view(state, prev))
        }
        Action::ToggleSettingsFocus => {
            let mut new_state = state;
            new_state.navigation.settings_focused = !new_state.navigation.settings_focused;
            debug!("FOCUS: settings focused = {}", new_state.navigation.settings_focused);
            Ok((new_state, Effect::None))
        }
        Action::SettingsCursorLeft => {
            let mut new_state = state;
            new_state.navigation.mode_cursor = new_state.navigation.mode_cursor.saturating_sub(1);
            Ok((new_state, Effect::None))
        }
        Action::SettingsCursorRight => {
            let mut new_state = state;
            let last = new_state.offered_modes().len().saturating_sub(1);
            new_state.navigation.mode_cursor = (new_state.navigation.mode_cursor + 1).min(last);
            Ok((new_state, Effect::None))
        }
        _ => Err(state),
    }
}

fn select_sub_view(state: AppState, view: SubView) -> (AppState, Effect) {
    trace!("Navigating to sub-view: {:?}", view);
    let mut new_state = state;
    new_state.navigation.sub_view = view;
    let effect = ensure_same_match(&mut new_state);
    (new_state, effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameMode;

    fn reduce(state: AppState, action: Action) -> (AppState, Effect) {
        match reduce_navigation(state, &action) {
            Ok(result) => result,
            Err(_) => panic!("{:?} not handled", action),
        }
    }

    #[test]
    fn test_select_and_cycle_sub_views() {
        let (state, effect) = reduce(AppState::default(), Action::SelectSubView(SubView::Luck));
        assert_eq!(state.navigation.sub_view, SubView::Luck);
        assert!(matches!(effect, Effect::None));

        let (state, _) = reduce(state, Action::NextSubView);
        assert_eq!(state.navigation.sub_view, SubView::LargestLost);

        let (state, _) = reduce(state, Action::SelectSubView(SubView::Basic));
        let (state, _) = reduce(state, Action::PrevSubView);
        assert_eq!(state.navigation.sub_view, SubView::SameMatch);
    }

    #[test]
    fn test_settings_cursor_is_clamped() {
        let mut state = AppState::default();
        state.player.available_modes = vec![GameMode::Jade4South, GameMode::Throne4South];

        let (state, _) = reduce(state, Action::SettingsCursorLeft);
        assert_eq!(state.navigation.mode_cursor, 0);

        let (state, _) = reduce(state, Action::SettingsCursorRight);
        let (state, _) = reduce(state, Action::SettingsCursorRight);
        assert_eq!(state.navigation.mode_cursor, 1);
    }

    #[test]
    fn test_toggle_settings_focus() {
        let (state, _) = reduce(AppState::default(), Action::ToggleSettingsFocus);
        assert!(state.navigation.settings_focused);
        let (state, _) = reduce(state, Action::ToggleSettingsFocus);
        assert!(!state.navigation.settings_focused);
    }

    #[test]
    fn test_other_actions_pass_through() {
        assert!(reduce_navigation(AppState::default(), &Action::Quit).is_err());
    }
}
