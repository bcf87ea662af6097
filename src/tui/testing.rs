//! General test utilities for TUI tests.
//!
//! Buffer helpers read rendered cells back as strings, skipping the filler
//! cell that follows every double-width character, so CJK text compares as
//! written. `ScriptedAdapter` is a `DataAdapter` whose load state is set by
//! hand.
//!
//! ```rust
//! #[cfg(test)]
//! mod tests {
//!     use crate::tui::testing::*;
//!
//!     #[test]
//!     fn test_example() {
//!         let adapter = ScriptedAdapter::with_metadata("someone", 10);
//!         adapter.load_first_item();
//!         // Reconcile against it...
//!     }
//! }
//! ```

use ratatui::buffer::Buffer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use unicode_width::UnicodeWidthStr;

use crate::adapter::{AdapterRef, DataAdapter};
use crate::config::DisplayConfig;
use crate::i18n::{I18n, Language};
use crate::metadata::{ExtendedStats, PlayerMetadata, RecordSummary, StatsResolver};
use crate::records::{GameRecord, PlayerRecord};
use crate::stats::PlayerExtendedStats;
use crate::types::GameMode;

/// Standard width for rendering tests
pub const RENDER_WIDTH: u16 = 80;

/// Each buffer row as a string, one entry per visible glyph
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area();
    (0..area.height)
        .map(|y| {
            let mut line = String::new();
            let mut x = 0;
            while x < area.width {
                let symbol = buf[(area.x + x, area.y + y)].symbol();
                line.push_str(symbol);
                x += symbol.width().max(1) as u16;
            }
            line
        })
        .collect()
}

/// Helper for buffer assertions
pub fn assert_buffer(buf: &Buffer, expected: &[&str]) {
    let actual = buffer_lines(buf);
    let buffer_width = buf.area().width as usize;

    assert_eq!(
        actual.len(),
        expected.len(),
        "Buffer height mismatch: expected {} lines, got {}",
        expected.len(),
        actual.len()
    );
    for (i, expected_line) in expected.iter().enumerate() {
        assert!(
            actual[i].width() <= buffer_width,
            "Line {} wider than the buffer: {}",
            i,
            actual[i].width()
        );
        assert_eq!(
            actual[i].trim_end(),
            expected_line.trim_end(),
            "Line {} mismatch:\nExpected: '{}'\nActual:   '{}'",
            i,
            expected_line,
            actual[i]
        );
    }
}

/// True when any row contains the text
pub fn buffer_contains(buf: &Buffer, text: &str) -> bool {
    buffer_lines(buf).iter().any(|line| line.contains(text))
}

pub fn test_display() -> DisplayConfig {
    DisplayConfig::default()
}

/// Chinese (fallback language) translator, so keys render as-is
pub fn test_i18n() -> Arc<I18n> {
    Arc::new(I18n::new(Language::ZhHans))
}

pub fn test_metadata(nickname: &str, count: usize) -> PlayerMetadata {
    PlayerMetadata {
        summary: RecordSummary {
            id: 42,
            nickname: nickname.to_string(),
            count,
            ..Default::default()
        },
        cross_stats: None,
        extended_stats: ExtendedStats::resolved(PlayerExtendedStats::new(count as u32)),
    }
}

/// Four-player record where player 42 finished in `rank`
pub fn test_record(start_time: i64, rank: usize) -> GameRecord {
    let ids = [42, 7, 8, 9];
    let mut order: Vec<u32> = ids.iter().copied().filter(|&id| id != 42).collect();
    order.insert(rank - 1, 42);
    let players = ids
        .iter()
        .map(|&id| {
            let place = order.iter().position(|&o| o == id).unwrap_or(0);
            PlayerRecord {
                account_id: id,
                nickname: format!("p{}", id),
                level: 10401,
                level_score: 1400,
                score: 40_000 - place as i32 * 10_000,
                grading_score: 0,
            }
        })
        .collect();
    GameRecord {
        uuid: format!("rec-{}", start_time),
        mode_id: GameMode::Jade4South,
        start_time,
        end_time: start_time + 1800,
        players,
    }
}

#[derive(Debug, Default)]
struct Script {
    metadata: Option<Arc<PlayerMetadata>>,
    items: Vec<Arc<GameRecord>>,
    error: Option<String>,
}

/// Adapter whose load state is driven by the test
#[derive(Debug, Default)]
pub struct ScriptedAdapter {
    script: Mutex<Script>,
    pub metadata_requests: AtomicUsize,
    pub item_requests: AtomicUsize,
}

impl ScriptedAdapter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_metadata(nickname: &str, count: usize) -> Arc<Self> {
        let adapter = Self::new();
        adapter.set_metadata(test_metadata(nickname, count));
        adapter
    }

    /// Metadata whose extended stats are still computing
    pub fn with_pending_stats(nickname: &str, count: usize) -> (Arc<Self>, StatsResolver) {
        let (resolver, extended_stats) = ExtendedStats::pending();
        let adapter = Self::new();
        adapter.set_metadata(PlayerMetadata {
            extended_stats,
            ..test_metadata(nickname, count)
        });
        (adapter, resolver)
    }

    pub fn set_metadata(&self, metadata: PlayerMetadata) {
        self.script.lock().unwrap().metadata = Some(Arc::new(metadata));
    }

    /// Expose an existing metadata object, keeping its identity
    pub fn share_metadata(&self, metadata: Arc<PlayerMetadata>) {
        self.script.lock().unwrap().metadata = Some(metadata);
    }

    pub fn load_first_item(&self) {
        self.push_item(test_record(1_700_000_000, 1));
    }

    pub fn push_item(&self, record: GameRecord) {
        self.script.lock().unwrap().items.push(Arc::new(record));
    }

    /// Report a failed load
    pub fn fail(&self, error: &str) {
        self.script.lock().unwrap().error = Some(error.to_string());
    }

    pub fn shared(self: &Arc<Self>) -> AdapterRef {
        self.clone()
    }
}

impl DataAdapter for ScriptedAdapter {
    fn metadata(&self) -> Option<Arc<PlayerMetadata>> {
        self.metadata_requests.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().metadata.clone()
    }

    fn count(&self) -> usize {
        self.script
            .lock()
            .unwrap()
            .metadata
            .as_ref()
            .map_or(0, |m| m.count())
    }

    fn is_item_loaded(&self, index: usize) -> bool {
        index < self.script.lock().unwrap().items.len()
    }

    fn item(&self, index: usize) -> Option<Arc<GameRecord>> {
        let item = self.script.lock().unwrap().items.get(index).cloned();
        if item.is_none() {
            self.item_requests.fetch_add(1, Ordering::SeqCst);
        }
        item
    }

    fn error(&self) -> Option<String> {
        self.script.lock().unwrap().error.clone()
    }
}
