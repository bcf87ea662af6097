use tracing::{debug, warn};

use crate::adapter::AdapterRef;
use crate::cache;
use crate::data_provider::{PlayerQuery, SameMatchEntry};
use crate::model::{self, Model};
use crate::preference::MODE_PREFERENCE_KEY;
use crate::reconcile::Reconcile;
use crate::tui::action::Action;
use crate::tui::component::Effect;
use crate::tui::state::{AppState, SameMatchState};
use crate::tui::types::SubView;

/// Handle adapter handoff, reconciliation and player data loads
pub fn reduce_player(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::ReloadAdapter { fresh } => {
            let query = state.player.model.query();
            Ok((state, Effect::LoadAdapter { query, fresh: *fresh }))
        }
        Action::AdapterReplaced(adapter) => Ok(adapter_replaced(state, adapter.clone())),
        Action::AdapterUpdated => {
            let mut new_state = state;
            let outcome = new_state.player.reconciler.reconcile();
            Ok(after_reconcile(new_state, outcome))
        }
        Action::ExtendedStatsResolved { epoch } => {
            let mut new_state = state;
            if new_state.player.reconciler.resolve(*epoch) {
                Ok(after_reconcile(new_state, Reconcile::Switched))
            } else {
                Ok((new_state, Effect::None))
            }
        }
        Action::ExtendedStatsDropped => {
            let mut new_state = state;
            warn!("RECONCILE: extended stats dropped before resolving");
            let message = new_state.system.i18n.t("统计数据加载失败").to_string();
            new_state.system.set_status_error_message(message);
            Ok((new_state, Effect::None))
        }
        Action::SameMatchLoaded { query, result } => Ok(same_match_loaded(state, query, result)),
        Action::Refresh => Ok(refresh(state)),
        _ => Err(state),
    }
}

fn adapter_replaced(state: AppState, adapter: AdapterRef) -> (AppState, Effect) {
    let mut new_state = state;
    let outcome = new_state.player.reconciler.set_latest(adapter);
    after_reconcile(new_state, outcome)
}

/// Follow-up work after every reconciliation run
fn after_reconcile(state: AppState, outcome: Reconcile) -> (AppState, Effect) {
    let mut new_state = state;
    debug!("RECONCILE: {:?}", outcome);
    let wait = match outcome {
        Reconcile::Deferred { epoch, stats } => Effect::AwaitStats { epoch, stats },
        _ => Effect::None,
    };
    let sync = sync_modes(&mut new_state);
    let same_match = ensure_same_match(&mut new_state);
    (new_state, wait.and(sync).and(same_match))
}

/// Refresh the available modes and bring the selection in line with them
fn sync_modes(state: &mut AppState) -> Effect {
    let reconciler = &state.player.reconciler;
    state.player.available_modes = model::available_modes(
        reconciler.latest_metadata().as_deref(),
        reconciler.displayed_metadata().as_deref(),
    );
    let last = state.offered_modes().len().saturating_sub(1);
    state.navigation.mode_cursor = state.navigation.mode_cursor.min(last);

    let prefs = state.system.prefs.clone();
    let config = &state.system.config;
    let updated = model::sync_selected_modes(
        &state.player.model,
        &state.player.available_modes,
        &config.available_modes,
        &config.mode_preference,
        |player_id| prefs.load_player(MODE_PREFERENCE_KEY, player_id, Vec::new()),
    );

    match updated {
        Some(player) => {
            debug!("MODES: selection synced to {:?}", player.selected_modes);
            let query = player.query();
            state.player.model = Model::Player(player);
            Effect::LoadAdapter {
                query: Some(query),
                fresh: false,
            }
        }
        None => Effect::None,
    }
}

/// Start loading frequent table mates when that view is showing current data
pub(crate) fn ensure_same_match(state: &mut AppState) -> Effect {
    if state.navigation.sub_view != SubView::SameMatch
        || !state.player.has_metadata()
        || state.player.is_changing_settings()
    {
        return Effect::None;
    }
    let Some(query) = state.player.model.query() else {
        return Effect::None;
    };
    if state.player.same_match.query.as_ref() == Some(&query) {
        return Effect::None;
    }
    state.player.same_match = SameMatchState {
        query: Some(query.clone()),
        ..Default::default()
    };
    Effect::FetchSameMatch(query)
}

fn same_match_loaded(
    state: AppState,
    query: &PlayerQuery,
    result: &Result<Vec<SameMatchEntry>, String>,
) -> (AppState, Effect) {
    let mut new_state = state;
    let same_match = &mut new_state.player.same_match;
    if same_match.query.as_ref() != Some(query) {
        debug!("SAME_MATCH: dropping result for stale query {}", query.cache_key());
        return (new_state, Effect::None);
    }
    match result {
        Ok(entries) => same_match.entries = Some(entries.clone()),
        Err(e) => {
            warn!("Failed to load same-match stats: {}", e);
            same_match.error = Some(e.clone());
        }
    }
    (new_state, Effect::None)
}

fn refresh(state: AppState) -> (AppState, Effect) {
    let mut new_state = state;
    new_state.player.same_match = SameMatchState::default();
    let message = new_state.system.i18n.t("刷新").to_string();
    new_state.system.set_status_message(message);
    let effect = Effect::Async(Box::pin(async move {
        cache::clear_all_caches().await;
        Action::ReloadAdapter { fresh: true }
    }));
    (new_state, effect)
}
