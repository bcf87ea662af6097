use std::sync::Arc;
use tracing::debug;

use super::action::Action;
use super::component::Effect;
use crate::adapter::AdapterProvider;
use crate::cache;
use crate::data_provider::PlayerQuery;
use crate::i18n::Language;
use crate::metadata::ExtendedStats;
use crate::preference::{PreferenceStore, LANGUAGE_KEY, MODE_PREFERENCE_KEY};
use crate::types::GameMode;

/// Table mates listed in the same-match view
pub const SAME_MATCH_LIMIT: usize = 10;

/// Effect handler for data loading and preference writes
///
/// Each method returns an Effect that dispatches the matching action when
/// the work completes.
pub struct DataEffects {
    provider: AdapterProvider,
    prefs: Arc<PreferenceStore>,
}

impl DataEffects {
    pub fn new(provider: AdapterProvider, prefs: Arc<PreferenceStore>) -> Self {
        Self { provider, prefs }
    }

    /// Hand the adapter for `query` to the reducer
    pub fn load_adapter(&self, query: Option<PlayerQuery>, fresh: bool) -> Effect {
        let adapter = if fresh {
            self.provider.fresh_adapter(query.as_ref())
        } else {
            self.provider.adapter_for(query.as_ref())
        };
        Effect::Action(Action::AdapterReplaced(adapter))
    }

    /// Report when the extended stats of a deferred switch resolve
    pub fn await_stats(&self, epoch: u64, stats: ExtendedStats) -> Effect {
        Effect::Async(Box::pin(async move {
            match stats.wait().await {
                Some(_) => Action::ExtendedStatsResolved { epoch },
                None => Action::ExtendedStatsDropped,
            }
        }))
    }

    /// Fetch frequent table mates (with caching)
    pub fn fetch_same_match(&self, query: PlayerQuery) -> Effect {
        let source = self.provider.source().clone();
        Effect::Async(Box::pin(async move {
            let result = cache::fetch_same_match_cached(source.as_ref(), &query, SAME_MATCH_LIMIT).await;
            Action::SameMatchLoaded {
                query,
                result: result.map_err(|e| e.to_string()),
            }
        }))
    }

    pub fn save_mode_preference(&self, player_id: u32, modes: Vec<GameMode>) -> Effect {
        let prefs = self.prefs.clone();
        Effect::Async(Box::pin(async move {
            let result = prefs.save_player(MODE_PREFERENCE_KEY, player_id, &modes);
            debug!("PREFS: mode preference for {} saved: {}", player_id, result.is_ok());
            Action::PreferenceSaved(result.map_err(|e| format!("{:#}", e)))
        }))
    }

    pub fn save_language(&self, language: Language) -> Effect {
        let prefs = self.prefs.clone();
        Effect::Async(Box::pin(async move {
            let result = prefs.save_global(LANGUAGE_KEY, &language.code());
            Action::PreferenceSaved(result.map_err(|e| format!("{:#}", e)))
        }))
    }
}
