/// Match records as stored in a dataset
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GameMode, LevelWithDelta};

/// Base URL for the in-game replay viewer
const RECORD_LINK_BASE: &str = "https://game.maj-soul.com/1/?paipu=";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub uuid: String,
    pub mode_id: GameMode,
    /// Unix seconds
    pub start_time: i64,
    pub end_time: i64,
    /// Players in seat order
    pub players: Vec<PlayerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub account_id: u32,
    pub nickname: String,
    pub level: u32,
    /// Rank points held before the game
    #[serde(default)]
    pub level_score: i32,
    /// In-game points at the end of the match
    pub score: i32,
    /// Rank point change from this match
    #[serde(default)]
    pub grading_score: i32,
}

impl GameRecord {
    pub fn player(&self, account_id: u32) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.account_id == account_id)
    }

    /// 1-based placement of a player by final score, earlier seat wins ties
    pub fn rank_of(&self, account_id: u32) -> Option<usize> {
        let seat = self.players.iter().position(|p| p.account_id == account_id)?;
        let score = self.players[seat].score;
        let ahead = self
            .players
            .iter()
            .enumerate()
            .filter(|(i, p)| p.score > score || (p.score == score && *i < seat))
            .count();
        Some(ahead + 1)
    }

    /// Rank after the game, as shown on the player's level badge
    pub fn level_of(&self, account_id: u32) -> Option<LevelWithDelta> {
        self.player(account_id).map(|p| LevelWithDelta {
            id: p.level,
            score: p.level_score,
            delta: p.grading_score,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        timestamp_to_local(self.start_time).date_naive()
    }

    /// Replay link that opens the record from the given player's seat
    pub fn record_link(uuid: &str, account_id: u32) -> String {
        format!("{}{}_a{}", RECORD_LINK_BASE, uuid, account_id)
    }

    /// Full local start time, e.g. "2024-03-01 21:04"
    pub fn format_full_start_time(start_time: i64) -> String {
        timestamp_to_local(start_time)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}

fn timestamp_to_local(ts: i64) -> DateTime<Local> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .unwrap_or_default()
        .with_timezone(&Local)
}

/// Inclusive date bounds for record queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    pub fn cache_key(&self) -> String {
        let fmt = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        format!("{}..{}", fmt(self.start), fmt(self.end))
    }
}
