use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::action::Action;
use super::component::{Component, Effect, Element};
use super::components::App;
use super::effects::DataEffects;
use super::reducer::reduce;
use super::state::AppState;
use crate::adapter::ChangeListener;

/// Component runtime - owns the state and processes actions
///
/// The Runtime is responsible for:
/// - Managing the application state
/// - Dispatching actions through the reducer
/// - Executing side effects asynchronously
/// - Building the virtual component tree
pub struct Runtime {
    state: AppState,

    /// Channel for dispatching actions
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,

    /// Channel for queuing effects
    effect_tx: mpsc::UnboundedSender<Effect>,

    data_effects: DataEffects,
}

impl Runtime {
    /// Create a runtime; `data_effects` receives the listener adapters use to
    /// announce finished loads
    pub fn new(
        initial_state: AppState,
        data_effects: impl FnOnce(ChangeListener) -> DataEffects,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (effect_tx, mut effect_rx) = mpsc::unbounded_channel();

        // Spawn effect executor task
        let action_tx_clone = action_tx.clone();
        tokio::spawn(async move {
            Self::run_effect_executor(&mut effect_rx, action_tx_clone).await;
        });

        let listener_tx = action_tx.clone();
        let listener: ChangeListener = Arc::new(move || {
            let _ = listener_tx.send(Action::AdapterUpdated);
        });

        Self {
            state: initial_state,
            action_tx,
            action_rx,
            effect_tx,
            data_effects: data_effects(listener),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Dispatch an action to be processed by the reducer
    ///
    /// Uses mem::take to avoid cloning AppState.
    pub fn dispatch(&mut self, action: Action) {
        trace!("ACTION: Dispatching {:?}", action);
        let state = std::mem::take(&mut self.state);
        let (new_state, effect) = reduce(state, action);
        self.state = new_state;
        self.execute_effect(effect);
    }

    /// Execute an effect, turning data effects into async work first
    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::LoadAdapter { query, fresh } => {
                debug!("EFFECT: loading adapter for {:?} (fresh: {})", query, fresh);
                let _ = self.effect_tx.send(self.data_effects.load_adapter(query, fresh));
            }
            Effect::AwaitStats { epoch, stats } => {
                debug!("EFFECT: awaiting extended stats for epoch {}", epoch);
                let _ = self.effect_tx.send(self.data_effects.await_stats(epoch, stats));
            }
            Effect::FetchSameMatch(query) => {
                debug!("EFFECT: fetching same-match stats for {}", query.cache_key());
                let _ = self.effect_tx.send(self.data_effects.fetch_same_match(query));
            }
            Effect::SaveModePreference { player_id, modes } => {
                let _ = self
                    .effect_tx
                    .send(self.data_effects.save_mode_preference(player_id, modes));
            }
            Effect::SaveLanguage(language) => {
                let _ = self.effect_tx.send(self.data_effects.save_language(language));
            }
            Effect::Batch(effects) => {
                for e in effects {
                    self.execute_effect(e);
                }
            }
            Effect::Action(_) | Effect::Async(_) => {
                trace!("ACTION: Queueing effect for async execution");
                let _ = self.effect_tx.send(effect);
            }
        }
    }

    /// Process all pending actions in the queue
    ///
    /// Returns the number of actions processed
    pub fn process_actions(&mut self) -> usize {
        let mut count = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
            count += 1;
        }
        count
    }

    /// Build the virtual element tree from current state
    pub fn build(&self) -> Element {
        App.view(&self.state)
    }

    /// Get a sender for dispatching actions from external sources
    pub fn action_sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Execute effects asynchronously
    ///
    /// Runs in its own tokio task; effects feed actions back into the runtime.
    async fn run_effect_executor(
        effect_rx: &mut mpsc::UnboundedReceiver<Effect>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) {
        while let Some(effect) = effect_rx.recv().await {
            Self::process_effect_async(effect, &action_tx);
        }
    }

    fn process_effect_async(effect: Effect, action_tx: &mpsc::UnboundedSender<Action>) {
        match effect {
            Effect::None => {}
            Effect::Action(action) => {
                let _ = action_tx.send(action);
            }
            Effect::Batch(effects) => {
                for e in effects {
                    Self::process_effect_async(e, action_tx);
                }
            }
            Effect::Async(future) => {
                let action_tx = action_tx.clone();
                tokio::spawn(async move {
                    let action = future.await;
                    let _ = action_tx.send(action);
                });
            }
            // Data effects are converted by execute_effect() before queueing
            other => {
                warn!("Data effect reached async executor: {:?}", other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AdapterProvider;
    use crate::data_provider::DatasetSource;
    use crate::fixtures;
    use crate::model::{Model, PlayerModel};
    use crate::preference::PreferenceStore;
    use crate::tui::types::SubView;
    use crate::types::GameMode;
    use tokio::runtime::Handle;
    use tokio::time::{sleep, Duration, Instant};

    fn create_test_runtime(state: AppState) -> Runtime {
        let source = Arc::new(DatasetSource::new(fixtures::demo_dataset()));
        Runtime::new(state, move |listener| {
            let provider = AdapterProvider::new(source, Handle::current(), 20, listener);
            DataEffects::new(provider, Arc::new(PreferenceStore::in_memory()))
        })
    }

    /// Pump the action queue until `done` holds or the timeout expires
    async fn pump_until(runtime: &mut Runtime, done: impl Fn(&AppState) -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(5) {
            runtime.process_actions();
            if done(runtime.state()) {
                return true;
            }
            sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_dispatch_action() {
        let mut runtime = create_test_runtime(AppState::default());
        runtime.dispatch(Action::SelectSubView(SubView::Luck));
        assert_eq!(runtime.state().navigation.sub_view, SubView::Luck);
    }

    #[tokio::test]
    async fn test_action_queue() {
        let mut runtime = create_test_runtime(AppState::default());
        let tx = runtime.action_sender();
        tx.send(Action::NextSubView).unwrap();

        let count = runtime.process_actions();
        assert_eq!(count, 1);
        assert_eq!(runtime.state().navigation.sub_view, SubView::Riichi);
    }

    #[tokio::test]
    async fn test_effect_execution() {
        let mut runtime = create_test_runtime(AppState::default());
        let effect = Effect::Async(Box::pin(async { Action::SelectSubView(SubView::WinLose) }));
        runtime.effect_tx.send(effect).unwrap();

        let reached = pump_until(&mut runtime, |s| s.navigation.sub_view == SubView::WinLose).await;
        assert!(reached);
    }

    #[tokio::test]
    async fn test_player_loads_end_to_end() {
        let mut state = AppState::default();
        state.player.model = Model::Player(
            PlayerModel::new(fixtures::DEMO_PLAYER_ID).with_modes(vec![GameMode::Jade4South]),
        );
        let mut runtime = create_test_runtime(state);
        runtime.dispatch(Action::ReloadAdapter { fresh: false });

        let loaded = pump_until(&mut runtime, |s| s.player.has_metadata()).await;
        assert!(loaded, "player metadata never reached the view");
        let metadata = runtime.state().player.displayed_metadata().unwrap();
        assert_eq!(metadata.nickname(), fixtures::DEMO_PLAYER_NICKNAME);
        assert!(!runtime.state().player.available_modes.is_empty());
    }

    #[tokio::test]
    async fn test_build_returns_component_tree() {
        let runtime = create_test_runtime(AppState::default());
        match runtime.build() {
            Element::Container { children, .. } => assert_eq!(children.len(), 3),
            _ => panic!("Expected container element from App component"),
        }
    }
}
