/// What the player view is looking at: player, lobbies and date bounds
use chrono::{Duration, NaiveDate};

use crate::data_provider::PlayerQuery;
use crate::metadata::PlayerMetadata;
use crate::records::DateRange;
use crate::types::GameMode;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Model {
    /// No player selected
    #[default]
    Latest,
    Player(PlayerModel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerModel {
    pub player_id: u32,
    pub selected_modes: Vec<GameMode>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl PlayerModel {
    pub fn new(player_id: u32) -> Self {
        Self {
            player_id,
            selected_modes: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_modes(mut self, modes: Vec<GameMode>) -> Self {
        self.selected_modes = modes;
        self
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn has_date_bounds(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    pub fn query(&self) -> PlayerQuery {
        PlayerQuery::new(self.player_id, &self.selected_modes, self.range())
    }

    /// Add the mode if absent, remove it otherwise
    pub fn toggle_mode(&mut self, mode: GameMode) {
        if let Some(index) = self.selected_modes.iter().position(|&m| m == mode) {
            self.selected_modes.remove(index);
        } else {
            self.selected_modes.push(mode);
        }
    }
}

impl Model {
    pub fn player(&self) -> Option<&PlayerModel> {
        match self {
            Model::Player(player) => Some(player),
            Model::Latest => None,
        }
    }

    pub fn query(&self) -> Option<PlayerQuery> {
        self.player().map(PlayerModel::query)
    }
}

/// Modes offered by the settings bar
///
/// The latest adapter's played modes win over the displayed one's, so the
/// choice tracks the query being loaded.
pub fn available_modes(
    latest: Option<&PlayerMetadata>,
    displayed: Option<&PlayerMetadata>,
) -> Vec<GameMode> {
    latest
        .and_then(PlayerMetadata::played_modes)
        .or_else(|| displayed.and_then(PlayerMetadata::played_modes))
        .map(<[GameMode]>::to_vec)
        .unwrap_or_default()
}

/// Bring the selected modes in line with what the player actually played
///
/// Returns the updated model when it should change, `None` to leave it.
/// `saved_preference` is only consulted when nothing is selected and no
/// date bounds are set.
pub fn sync_selected_modes(
    model: &Model,
    available: &[GameMode],
    configured_modes: &[GameMode],
    mode_preference: &[GameMode],
    saved_preference: impl FnOnce(u32) -> Vec<GameMode>,
) -> Option<PlayerModel> {
    let player = model.player()?;
    if configured_modes.len() < 2 {
        return None;
    }

    if player.selected_modes.is_empty() && !player.has_date_bounds() {
        let saved = saved_preference(player.player_id);
        if !saved.is_empty() {
            return Some(player.clone().with_modes(saved));
        }
    }

    if available.is_empty() {
        return None;
    }

    let mut selected: Vec<GameMode> = player
        .selected_modes
        .iter()
        .copied()
        .filter(|m| available.contains(m))
        .collect();
    if selected.is_empty() {
        let fallback = mode_preference
            .iter()
            .copied()
            .find(|m| available.contains(m))
            .unwrap_or(available[0]);
        selected.push(fallback);
    }

    let changed = selected.len() != player.selected_modes.len()
        || selected.iter().any(|m| !player.selected_modes.contains(m));
    changed.then(|| player.clone().with_modes(selected))
}

/// Quick date filters cycled from the settings bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRangePreset {
    #[default]
    All,
    Last7Days,
    Last30Days,
    Last90Days,
    LastYear,
}

impl DateRangePreset {
    pub fn next(self) -> Self {
        match self {
            DateRangePreset::All => DateRangePreset::Last7Days,
            DateRangePreset::Last7Days => DateRangePreset::Last30Days,
            DateRangePreset::Last30Days => DateRangePreset::Last90Days,
            DateRangePreset::Last90Days => DateRangePreset::LastYear,
            DateRangePreset::LastYear => DateRangePreset::All,
        }
    }

    fn days(self) -> Option<i64> {
        match self {
            DateRangePreset::All => None,
            DateRangePreset::Last7Days => Some(7),
            DateRangePreset::Last30Days => Some(30),
            DateRangePreset::Last90Days => Some(90),
            DateRangePreset::LastYear => Some(365),
        }
    }

    /// Start bound for the preset; presets never set an end bound
    pub fn start_date(self, today: NaiveDate) -> Option<NaiveDate> {
        self.days().map(|days| today - Duration::days(days - 1))
    }

    pub fn label_key(self) -> &'static str {
        match self {
            DateRangePreset::All => "全部",
            DateRangePreset::Last7Days => "最近 7 天",
            DateRangePreset::Last30Days => "最近 30 天",
            DateRangePreset::Last90Days => "最近 90 天",
            DateRangePreset::LastYear => "最近一年",
        }
    }
}
