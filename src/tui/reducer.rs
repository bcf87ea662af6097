use tracing::trace;

use super::action::Action;
use super::component::Effect;
use super::reducers::{reduce_navigation, reduce_player, reduce_settings};
use super::state::AppState;

/// Pure state reducer - like Redux reducer
///
/// Takes current state and an action, returns new state and optional effect.
/// No I/O happens here; side effects are returned as `Effect` to be executed
/// by the runtime.
///
/// Ownership is passed through the sub-reducer chain to avoid cloning:
/// - Each sub-reducer returns Ok((state, effect)) if it handled the action
/// - Or Err(state) to pass ownership back for the next reducer to try
pub fn reduce(state: AppState, action: Action) -> (AppState, Effect) {
    trace!("REDUCE: {:?}", action);

    let state = match reduce_navigation(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    let state = match reduce_player(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    let state = match reduce_settings(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    match action {
        Action::SetStatusMessage { message, is_error } => {
            let mut new_state = state;
            if is_error {
                new_state.system.set_status_error_message(message);
            } else {
                new_state.system.set_status_message(message);
            }
            (new_state, Effect::None)
        }

        Action::Quit => (state, Effect::None),

        _ => (state, Effect::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::types::SubView;

    #[test]
    fn test_navigation_actions_are_handled() {
        let (state, _) = reduce(AppState::default(), Action::SelectSubView(SubView::Riichi));
        assert_eq!(state.navigation.sub_view, SubView::Riichi);
    }

    #[test]
    fn test_settings_actions_are_handled() {
        let (_, effect) = reduce(AppState::default(), Action::CycleLanguage);
        assert!(matches!(effect, Effect::SaveLanguage(_)));
    }

    #[test]
    fn test_player_actions_are_handled() {
        let (_, effect) = reduce(AppState::default(), Action::ReloadAdapter { fresh: false });
        assert!(matches!(effect, Effect::LoadAdapter { .. }));
    }

    #[test]
    fn test_set_status_message() {
        let (state, effect) = reduce(
            AppState::default(),
            Action::SetStatusMessage {
                message: "Loaded".to_string(),
                is_error: false,
            },
        );
        assert_eq!(state.system.status_message.as_deref(), Some("Loaded"));
        assert!(!state.system.status_is_error);
        assert!(matches!(effect, Effect::None));
    }

    #[test]
    fn test_quit_action_does_nothing_to_state() {
        let state = AppState::default();
        let (new_state, effect) = reduce(state.clone(), Action::Quit);
        assert_eq!(new_state.navigation.sub_view, state.navigation.sub_view);
        assert!(matches!(effect, Effect::None));
    }
}
