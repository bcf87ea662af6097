use chrono::{Local, NaiveDate};
use std::sync::Arc;

use crate::adapter::EmptyAdapter;
use crate::config::Config;
use crate::data_provider::{PlayerQuery, SameMatchEntry};
use crate::i18n::I18n;
use crate::metadata::PlayerMetadata;
use crate::model::{DateRangePreset, Model};
use crate::preference::PreferenceStore;
use crate::reconcile::Reconciler;
use crate::tracker::PageContext;
use crate::types::GameMode;

use super::types::SubView;

/// Root application state - single source of truth
///
/// All state changes happen through the reducer.
/// Components receive slices of this state as props.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub navigation: NavigationState,
    pub player: PlayerState,
    pub system: SystemState,
}

#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    pub sub_view: SubView,
    /// Keys go to the settings bar instead of the tab bar
    pub settings_focused: bool,
    /// Index into the offered modes
    pub mode_cursor: usize,
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub model: Model,
    /// Latest and displayed adapters; only the reducer swaps them
    pub reconciler: Reconciler,
    /// Modes the player has records in
    pub available_modes: Vec<GameMode>,
    pub date_preset: DateRangePreset,
    pub same_match: SameMatchState,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            model: Model::default(),
            reconciler: Reconciler::new(EmptyAdapter::shared()),
            available_modes: Vec::new(),
            date_preset: DateRangePreset::default(),
            same_match: SameMatchState::default(),
        }
    }
}

impl PlayerState {
    pub fn displayed_metadata(&self) -> Option<Arc<PlayerMetadata>> {
        self.reconciler.displayed_metadata()
    }

    pub fn has_metadata(&self) -> bool {
        self.reconciler.has_metadata()
    }

    pub fn is_changing_settings(&self) -> bool {
        self.reconciler.is_changing_settings()
    }
}

/// Frequent table mates for one query
#[derive(Debug, Clone, Default)]
pub struct SameMatchState {
    /// Query the entries (or the running fetch) belong to
    pub query: Option<PlayerQuery>,
    pub entries: Option<Vec<SameMatchEntry>>,
    pub error: Option<String>,
}

impl SameMatchState {
    pub fn is_loading(&self) -> bool {
        self.query.is_some() && self.entries.is_none() && self.error.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct SystemState {
    pub config: Config,
    pub i18n: Arc<I18n>,
    pub prefs: Arc<PreferenceStore>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    /// Anchor for date presets
    pub today: NaiveDate,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            config: Config::default(),
            i18n: Arc::new(I18n::default()),
            prefs: Arc::new(PreferenceStore::in_memory()),
            status_message: None,
            status_is_error: false,
            today: Local::now().date_naive(),
        }
    }
}

impl SystemState {
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_is_error = false;
    }

    pub fn set_status_error_message(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_is_error = true;
    }
}

impl AppState {
    /// Modes the settings bar offers: what the player played, or every
    /// configured mode while that is unknown
    pub fn offered_modes(&self) -> &[GameMode] {
        if self.player.available_modes.is_empty() {
            &self.system.config.available_modes
        } else {
            &self.player.available_modes
        }
    }

    pub fn mode_under_cursor(&self) -> Option<GameMode> {
        self.offered_modes().get(self.navigation.mode_cursor).copied()
    }

    /// Route of the page currently shown
    pub fn page_path(&self) -> String {
        match self.player.model.player() {
            None => "/".to_string(),
            Some(player) => match self.navigation.sub_view.path() {
                "" => format!("/player/{}", player.player_id),
                path => format!("/player/{}/{}", player.player_id, path),
            },
        }
    }

    pub fn page_context(&self) -> PageContext {
        match self.player.model {
            Model::Player(_) => PageContext::new("Player"),
            Model::Latest => PageContext::default(),
        }
    }

    /// Document title: the displayed nickname once known
    pub fn page_title(&self) -> String {
        self.player
            .displayed_metadata()
            .filter(|m| !m.nickname().is_empty())
            .map(|m| m.nickname().to_string())
            .unwrap_or_else(|| self.system.i18n.t(self.navigation.sub_view.title_key()).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayerModel;

    #[test]
    fn test_set_status_message_overwrites_error_flag() {
        let mut state = SystemState::default();
        state.set_status_error_message("Error".to_string());
        assert!(state.status_is_error);

        state.set_status_message("Normal message".to_string());
        assert_eq!(state.status_message, Some("Normal message".to_string()));
        assert!(!state.status_is_error);
    }

    #[test]
    fn test_page_path_follows_model_and_view() {
        let mut state = AppState::default();
        assert_eq!(state.page_path(), "/");
        assert_eq!(state.page_context(), PageContext::default());

        state.player.model = Model::Player(PlayerModel::new(12));
        assert_eq!(state.page_path(), "/player/12");
        assert_eq!(state.page_context().category, "Player");

        state.navigation.sub_view = SubView::WinLose;
        assert_eq!(state.page_path(), "/player/12/win-lose");
    }

    #[test]
    fn test_offered_modes_fall_back_to_configured() {
        let mut state = AppState::default();
        assert_eq!(state.offered_modes(), state.system.config.available_modes.as_slice());

        state.player.available_modes = vec![GameMode::Jade4South];
        assert_eq!(state.offered_modes(), &[GameMode::Jade4South]);
        assert_eq!(state.mode_under_cursor(), Some(GameMode::Jade4South));
        state.navigation.mode_cursor = 3;
        assert_eq!(state.mode_under_cursor(), None);
    }

    #[test]
    fn test_same_match_loading_flag() {
        let mut same_match = SameMatchState::default();
        assert!(!same_match.is_loading());
        same_match.query = Some(PlayerQuery::new(1, &[], Default::default()));
        assert!(same_match.is_loading());
        same_match.entries = Some(Vec::new());
        assert!(!same_match.is_loading());
    }
}
