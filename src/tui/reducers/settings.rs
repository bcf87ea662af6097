use std::sync::Arc;
use tracing::debug;

use crate::model::Model;
use crate::tui::action::Action;
use crate::tui::component::Effect;
use crate::tui::state::AppState;

/// Handle the settings bar: lobby toggles, date presets and language
pub fn reduce_settings(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::ToggleMode => Ok(toggle_mode(state)),
        Action::CycleDatePreset => Ok(cycle_date_preset(state)),
        Action::CycleLanguage => Ok(cycle_language(state)),
        Action::PreferenceSaved(result) => {
            let mut new_state = state;
            if let Err(e) = result {
                let message = format!("{}: {}", new_state.system.i18n.t("保存设置失败"), e);
                new_state.system.set_status_error_message(message);
            }
            Ok((new_state, Effect::None))
        }
        _ => Err(state),
    }
}

fn toggle_mode(state: AppState) -> (AppState, Effect) {
    let mut new_state = state;
    let Some(mode) = new_state.mode_under_cursor() else {
        return (new_state, Effect::None);
    };
    let Model::Player(player) = &mut new_state.player.model else {
        return (new_state, Effect::None);
    };
    player.toggle_mode(mode);
    debug!("SETTINGS: modes now {:?}", player.selected_modes);

    let effect = Effect::LoadAdapter {
        query: Some(player.query()),
        fresh: false,
    }
    .and(Effect::SaveModePreference {
        player_id: player.player_id,
        modes: player.selected_modes.clone(),
    });
    (new_state, effect)
}

fn cycle_date_preset(state: AppState) -> (AppState, Effect) {
    let mut new_state = state;
    let preset = new_state.player.date_preset.next();
    new_state.player.date_preset = preset;
    let today = new_state.system.today;
    let Model::Player(player) = &mut new_state.player.model else {
        return (new_state, Effect::None);
    };
    player.start_date = preset.start_date(today);
    player.end_date = None;
    debug!("SETTINGS: date preset {:?} from {:?}", preset, player.start_date);

    let effect = Effect::LoadAdapter {
        query: Some(player.query()),
        fresh: false,
    };
    (new_state, effect)
}

fn cycle_language(state: AppState) -> (AppState, Effect) {
    let mut new_state = state;
    let language = new_state.system.i18n.language().next();
    new_state.system.i18n = Arc::new(new_state.system.i18n.switch_to(language));
    let message = format!("{}: {}", new_state.system.i18n.t("语言已切换"), language.native_name());
    new_state.system.set_status_message(message);
    (new_state, Effect::SaveLanguage(language))
}
