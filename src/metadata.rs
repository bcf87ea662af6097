/// Player metadata: the summary shown above every statistics view
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

use crate::records::GameRecord;
use crate::stats::PlayerExtendedStats;
use crate::types::{GameMode, LevelWithDelta};

/// Extended statistics that may still be computing
///
/// `Pending` holds a watch receiver that yields `Some` exactly once, when the
/// computation completes.
#[derive(Clone)]
pub enum ExtendedStats {
    Resolved(Arc<PlayerExtendedStats>),
    Pending(watch::Receiver<Option<Arc<PlayerExtendedStats>>>),
}

/// Completes a pending `ExtendedStats`
pub struct StatsResolver {
    tx: watch::Sender<Option<Arc<PlayerExtendedStats>>>,
}

impl StatsResolver {
    pub fn resolve(self, stats: PlayerExtendedStats) {
        // Receivers may all be gone already; nothing left to notify then
        let _ = self.tx.send(Some(Arc::new(stats)));
    }
}

impl ExtendedStats {
    pub fn resolved(stats: PlayerExtendedStats) -> Self {
        ExtendedStats::Resolved(Arc::new(stats))
    }

    pub fn pending() -> (StatsResolver, Self) {
        let (tx, rx) = watch::channel(None);
        (StatsResolver { tx }, ExtendedStats::Pending(rx))
    }

    /// Current value, if the computation has finished
    pub fn peek(&self) -> Option<Arc<PlayerExtendedStats>> {
        match self {
            ExtendedStats::Resolved(stats) => Some(stats.clone()),
            ExtendedStats::Pending(rx) => rx.borrow().clone(),
        }
    }

    /// True while the value is still being computed
    pub fn is_pending(&self) -> bool {
        self.peek().is_none()
    }

    /// Wait for the value; `None` if the producer went away without resolving
    pub async fn wait(&self) -> Option<Arc<PlayerExtendedStats>> {
        match self {
            ExtendedStats::Resolved(stats) => Some(stats.clone()),
            ExtendedStats::Pending(rx) => {
                let mut rx = rx.clone();
                let resolved = match rx.wait_for(|value| value.is_some()).await {
                    Ok(value) => value.clone(),
                    Err(_) => None,
                };
                resolved
            }
        }
    }
}

impl fmt::Debug for ExtendedStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtendedStats::Resolved(stats) => f.debug_tuple("Resolved").field(&stats.count).finish(),
            ExtendedStats::Pending(_) if self.is_pending() => f.write_str("Pending"),
            ExtendedStats::Pending(_) => f.write_str("Pending(resolved)"),
        }
    }
}

/// Level and lobby information across all lobbies, independent of the filter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrossStats {
    pub level: Option<LevelWithDelta>,
    pub max_level: Option<LevelWithDelta>,
    pub played_modes: Vec<GameMode>,
}

/// Basic record summary for a player under one query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSummary {
    pub id: u32,
    pub nickname: String,
    pub count: usize,
    pub level: LevelWithDelta,
    pub max_level: LevelWithDelta,
    pub avg_rank: f64,
    /// Share of games finished in each place, index 0 = first
    pub rank_rates: Vec<f64>,
    /// Share of games finished below zero points
    pub negative_rate: f64,
}

#[derive(Debug, Clone)]
pub struct PlayerMetadata {
    pub summary: RecordSummary,
    pub cross_stats: Option<CrossStats>,
    pub extended_stats: ExtendedStats,
}

impl PlayerMetadata {
    pub fn id(&self) -> u32 {
        self.summary.id
    }

    pub fn nickname(&self) -> &str {
        &self.summary.nickname
    }

    pub fn count(&self) -> usize {
        self.summary.count
    }

    /// Level shown on the basic view, preferring the cross-lobby value
    pub fn display_level(&self) -> LevelWithDelta {
        self.cross_stats
            .as_ref()
            .and_then(|c| c.level)
            .unwrap_or(self.summary.level)
    }

    pub fn display_max_level(&self) -> LevelWithDelta {
        self.cross_stats
            .as_ref()
            .and_then(|c| c.max_level)
            .unwrap_or(self.summary.max_level)
    }

    pub fn played_modes(&self) -> Option<&[GameMode]> {
        self.cross_stats.as_ref().map(|c| c.played_modes.as_slice())
    }
}

/// True when the metadata describes a real player with records
pub fn has_metadata(metadata: Option<&PlayerMetadata>) -> bool {
    metadata.is_some_and(|m| !m.nickname().is_empty() && m.count() != 0)
}

fn level_key(level: &LevelWithDelta) -> (u32, i32) {
    (level.level().ordinal(), level.score + level.delta)
}

/// Summarize a player's records, newest first or in any order
///
/// Returns `None` when the player does not appear in any record.
pub fn summarize(account_id: u32, records: &[GameRecord]) -> Option<RecordSummary> {
    let mut latest: Option<&GameRecord> = None;
    let mut max_level: Option<LevelWithDelta> = None;
    let mut rank_counts: Vec<usize> = Vec::new();
    let mut rank_total = 0usize;
    let mut negative = 0usize;
    let mut count = 0usize;

    for record in records {
        let Some(player) = record.player(account_id) else {
            continue;
        };
        let Some(rank) = record.rank_of(account_id) else {
            continue;
        };
        count += 1;
        rank_total += rank;
        if rank_counts.len() < record.players.len() {
            rank_counts.resize(record.players.len(), 0);
        }
        rank_counts[rank - 1] += 1;
        if player.score < 0 {
            negative += 1;
        }

        if latest.map_or(true, |l| record.start_time > l.start_time) {
            latest = Some(record);
        }
        if let Some(level) = record.level_of(account_id) {
            if max_level.map_or(true, |m| level_key(&level) > level_key(&m)) {
                max_level = Some(level);
            }
        }
    }

    let latest = latest?;
    let level = latest.level_of(account_id)?;
    let nickname = latest.player(account_id)?.nickname.clone();

    Some(RecordSummary {
        id: account_id,
        nickname,
        count,
        level,
        max_level: max_level.unwrap_or(level),
        avg_rank: rank_total as f64 / count as f64,
        rank_rates: rank_counts
            .iter()
            .map(|&n| n as f64 / count as f64)
            .collect(),
        negative_rate: negative as f64 / count as f64,
    })
}

/// Build cross-lobby stats from a player's full, unfiltered history
pub fn cross_stats(account_id: u32, records: &[GameRecord]) -> CrossStats {
    let summary = summarize(account_id, records);
    let mut played_modes: Vec<GameMode> = records
        .iter()
        .filter(|r| r.player(account_id).is_some())
        .map(|r| r.mode_id)
        .collect();
    played_modes.sort();
    played_modes.dedup();

    CrossStats {
        level: summary.as_ref().map(|s| s.level),
        max_level: summary.as_ref().map(|s| s.max_level),
        played_modes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::PlayerRecord;

    fn game(start_time: i64, mode: GameMode, scores: &[(u32, i32)], level: u32) -> GameRecord {
        GameRecord {
            uuid: format!("g{}", start_time),
            mode_id: mode,
            start_time,
            end_time: start_time + 1800,
            players: scores
                .iter()
                .map(|&(account_id, score)| PlayerRecord {
                    account_id,
                    nickname: format!("n{}-{}", account_id, start_time),
                    level,
                    level_score: 1000,
                    score,
                    grading_score: 10,
                })
                .collect(),
        }
    }

    fn metadata(nickname: &str, count: usize) -> PlayerMetadata {
        PlayerMetadata {
            summary: RecordSummary {
                nickname: nickname.to_string(),
                count,
                ..Default::default()
            },
            cross_stats: None,
            extended_stats: ExtendedStats::resolved(PlayerExtendedStats::default()),
        }
    }

    #[test]
    fn test_has_metadata() {
        assert!(!has_metadata(None));
        assert!(!has_metadata(Some(&metadata("", 10))));
        assert!(!has_metadata(Some(&metadata("someone", 0))));
        assert!(has_metadata(Some(&metadata("someone", 10))));
    }

    #[test]
    fn test_summarize() {
        let records = vec![
            game(100, GameMode::Jade4South, &[(1, 40000), (2, 30000), (3, 20000), (4, 10000)], 10301),
            game(200, GameMode::Jade4South, &[(2, 40000), (1, -2000), (3, 32000), (4, 30000)], 10302),
            game(300, GameMode::Jade4East, &[(5, 1), (6, 2), (7, 3), (8, 4)], 10303),
        ];

        let summary = summarize(1, &records).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.nickname, "n1-200");
        assert_eq!(summary.level.id, 10302);
        assert_eq!(summary.max_level.id, 10302);
        assert!((summary.avg_rank - 2.5).abs() < 1e-9);
        assert_eq!(summary.rank_rates, vec![0.5, 0.0, 0.0, 0.5]);
        assert!((summary.negative_rate - 0.5).abs() < 1e-9);

        assert!(summarize(42, &records).is_none());
    }

    #[test]
    fn test_cross_stats_played_modes() {
        let records = vec![
            game(100, GameMode::Throne4South, &[(1, 1), (2, 2), (3, 3), (4, 4)], 10401),
            game(200, GameMode::Jade4South, &[(1, 1), (2, 2), (3, 3), (4, 4)], 10401),
            game(300, GameMode::Jade4South, &[(1, 1), (2, 2), (3, 3), (4, 4)], 10401),
        ];
        let cross = cross_stats(1, &records);
        assert_eq!(cross.played_modes, vec![GameMode::Jade4South, GameMode::Throne4South]);
        assert_eq!(cross.level.map(|l| l.id), Some(10401));
    }

    #[tokio::test]
    async fn test_pending_extended_stats_resolve() {
        let (resolver, stats) = ExtendedStats::pending();
        assert!(stats.is_pending());

        let waiter = stats.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });

        resolver.resolve(PlayerExtendedStats::new(7));
        let resolved = handle.await.unwrap().unwrap();
        assert_eq!(resolved.count, 7);
        assert!(!stats.is_pending());
        assert_eq!(stats.peek().unwrap().count, 7);
    }

    #[tokio::test]
    async fn test_dropped_resolver_yields_none() {
        let (resolver, stats) = ExtendedStats::pending();
        drop(resolver);
        assert!(stats.wait().await.is_none());
    }
}
