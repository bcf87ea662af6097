use crate::adapter::AdapterRef;
use crate::data_provider::{PlayerQuery, SameMatchEntry};

use super::types::SubView;

/// Global actions - like Redux actions
///
/// All state changes in the application happen through actions.
/// Actions are dispatched from:
/// - User input (key events)
/// - Effects (adapter handoff, stats resolution, async loads)
/// - The adapter change listener
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation actions
    SelectSubView(SubView),
    NextSubView,
    PrevSubView,
    ToggleSettingsFocus,
    SettingsCursorLeft,
    SettingsCursorRight,

    // Settings actions
    /// Toggle the lobby under the settings cursor
    ToggleMode,
    CycleDatePreset,
    CycleLanguage,

    // Data actions
    /// Ask the provider for the adapter matching the current model
    ReloadAdapter { fresh: bool },
    /// Provider handed over the adapter for the current model
    AdapterReplaced(AdapterRef),
    /// Some adapter finished a background load
    AdapterUpdated,
    /// Extended stats awaited by the deferred switch of `epoch` resolved
    ExtendedStatsResolved { epoch: u64 },
    /// Producer of the awaited extended stats went away without a value
    ExtendedStatsDropped,
    SameMatchLoaded {
        query: PlayerQuery,
        result: Result<Vec<SameMatchEntry>, String>,
    },
    /// Drop cached queries and reload the current player
    Refresh,
    PreferenceSaved(Result<(), String>),

    // System actions
    SetStatusMessage { message: String, is_error: bool },
    Quit,
}
