/// Trait for providing match data, abstracting over dataset files and fixtures
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::metadata::{self, CrossStats, RecordSummary};
use crate::records::{DateRange, GameRecord};
use crate::stats::PlayerExtendedStats;
use crate::types::{GameMode, LevelWithDelta};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What the view asks a source for: one player, some lobbies, a date range
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerQuery {
    pub player_id: u32,
    /// Sorted; empty means every lobby
    pub modes: Vec<GameMode>,
    pub range: DateRange,
}

impl PlayerQuery {
    pub fn new(player_id: u32, modes: &[GameMode], range: DateRange) -> Self {
        let mut modes = modes.to_vec();
        modes.sort();
        modes.dedup();
        Self {
            player_id,
            modes,
            range,
        }
    }

    pub fn matches(&self, record: &GameRecord) -> bool {
        (self.modes.is_empty() || self.modes.contains(&record.mode_id))
            && self.range.contains(record.start_date())
            && record.player(self.player_id).is_some()
    }

    pub fn cache_key(&self) -> String {
        let modes: Vec<String> = self.modes.iter().map(|m| m.to_string()).collect();
        format!("{}:{}:{}", self.player_id, modes.join("."), self.range.cache_key())
    }
}

/// Frequent table mate of the queried player
#[derive(Debug, Clone, PartialEq)]
pub struct SameMatchEntry {
    pub account_id: u32,
    pub nickname: String,
    pub count: usize,
    /// Share of the player's games shared with this account
    pub rate: f64,
}

/// One line of the player directory
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerListing {
    pub account_id: u32,
    pub nickname: String,
    pub count: usize,
    pub level: LevelWithDelta,
}

/// Trait for match data providers
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Stable name used to namespace cached results
    fn name(&self) -> &str;

    /// Record summary for the query, `None` when the player has no matching records
    async fn summary(&self, query: &PlayerQuery) -> Result<Option<RecordSummary>, SourceError>;

    /// Level and played lobbies across the player's whole history
    async fn cross_stats(&self, player_id: u32) -> Result<CrossStats, SourceError>;

    /// Matching records, newest first
    async fn records(
        &self,
        query: &PlayerQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<GameRecord>, SourceError>;

    async fn extended_stats(&self, query: &PlayerQuery) -> Result<PlayerExtendedStats, SourceError>;

    /// Accounts the player shared the most tables with
    async fn same_match(
        &self,
        query: &PlayerQuery,
        limit: usize,
    ) -> Result<Vec<SameMatchEntry>, SourceError>;

    async fn players(&self) -> Result<Vec<PlayerListing>, SourceError>;
}

/// Precomputed extended stats for one player in one lobby
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedStatsEntry {
    pub account_id: u32,
    pub mode: GameMode,
    pub stats: PlayerExtendedStats,
}

/// On-disk dataset layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub records: Vec<GameRecord>,
    #[serde(default)]
    pub extended_stats: Vec<ExtendedStatsEntry>,
}

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Source backed by an in-memory dataset
pub struct DatasetSource {
    name: String,
    /// Records sorted newest first
    records: Arc<Vec<GameRecord>>,
    extended: Arc<HashMap<(u32, GameMode), PlayerExtendedStats>>,
    latency: Option<Duration>,
}

impl DatasetSource {
    pub fn new(dataset: Dataset) -> Self {
        let id = NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed);
        Self::with_name(format!("memory#{}", id), dataset)
    }

    fn with_name(name: String, dataset: Dataset) -> Self {
        let mut records = dataset.records;
        records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        let extended = dataset
            .extended_stats
            .into_iter()
            .map(|entry| ((entry.account_id, entry.mode), entry.stats))
            .collect();
        info!("Dataset {} loaded with {} records", name, records.len());
        Self {
            name,
            records: Arc::new(records),
            extended: Arc::new(extended),
            latency: None,
        }
    }

    /// Load a dataset JSON file
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset: Dataset = serde_json::from_str(&content)?;
        Ok(Self::with_name(path.display().to_string(), dataset))
    }

    /// Delay every response, to behave like a remote service
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn matching<'a>(&'a self, query: &'a PlayerQuery) -> impl Iterator<Item = &'a GameRecord> + 'a {
        self.records.iter().filter(move |r| query.matches(r))
    }
}

#[async_trait]
impl RecordSource for DatasetSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn summary(&self, query: &PlayerQuery) -> Result<Option<RecordSummary>, SourceError> {
        self.simulate_latency().await;
        let records: Vec<GameRecord> = self.matching(query).cloned().collect();
        debug!("SOURCE: summary {} over {} records", query.cache_key(), records.len());
        Ok(metadata::summarize(query.player_id, &records))
    }

    async fn cross_stats(&self, player_id: u32) -> Result<CrossStats, SourceError> {
        self.simulate_latency().await;
        Ok(metadata::cross_stats(player_id, &self.records))
    }

    async fn records(
        &self,
        query: &PlayerQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<GameRecord>, SourceError> {
        self.simulate_latency().await;
        Ok(self.matching(query).skip(offset).take(limit).cloned().collect())
    }

    async fn extended_stats(&self, query: &PlayerQuery) -> Result<PlayerExtendedStats, SourceError> {
        self.simulate_latency().await;
        let parts: Vec<PlayerExtendedStats> = self
            .extended
            .iter()
            .filter(|((account_id, mode), _)| {
                *account_id == query.player_id
                    && (query.modes.is_empty() || query.modes.contains(mode))
            })
            .map(|(_, stats)| stats.clone())
            .collect();
        Ok(PlayerExtendedStats::merge(&parts))
    }

    async fn same_match(
        &self,
        query: &PlayerQuery,
        limit: usize,
    ) -> Result<Vec<SameMatchEntry>, SourceError> {
        self.simulate_latency().await;
        let mut games = 0usize;
        let mut mates: HashMap<u32, (String, usize)> = HashMap::new();
        for record in self.matching(query) {
            games += 1;
            for player in record.players.iter().filter(|p| p.account_id != query.player_id) {
                // Records are newest first, so the first nickname seen is current
                let entry = mates
                    .entry(player.account_id)
                    .or_insert_with(|| (player.nickname.clone(), 0));
                entry.1 += 1;
            }
        }

        let mut entries: Vec<SameMatchEntry> = mates
            .into_iter()
            .map(|(account_id, (nickname, count))| SameMatchEntry {
                account_id,
                nickname,
                count,
                rate: count as f64 / games.max(1) as f64,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.account_id.cmp(&b.account_id)));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn players(&self) -> Result<Vec<PlayerListing>, SourceError> {
        self.simulate_latency().await;
        let mut seen: HashMap<u32, PlayerListing> = HashMap::new();
        for record in self.records.iter() {
            for player in &record.players {
                let listing = seen.entry(player.account_id).or_insert_with(|| PlayerListing {
                    account_id: player.account_id,
                    nickname: player.nickname.clone(),
                    count: 0,
                    level: LevelWithDelta {
                        id: player.level,
                        score: player.level_score,
                        delta: player.grading_score,
                    },
                });
                listing.count += 1;
            }
        }
        let mut players: Vec<PlayerListing> = seen.into_values().collect();
        players.sort_by(|a, b| b.count.cmp(&a.count).then(a.account_id.cmp(&b.account_id)));
        Ok(players)
    }
}
