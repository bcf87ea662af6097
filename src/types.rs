/// Core game types shared by the data layer and the views
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ranked lobby a match was played in
///
/// Wire values are the game's numeric room ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum GameMode {
    Gold4East,
    Gold4South,
    Jade4East,
    Jade4South,
    Throne4East,
    Throne4South,
    Gold3East,
    Gold3South,
    Jade3East,
    Jade3South,
    Throne3East,
    Throne3South,
}

impl GameMode {
    pub const ALL: [GameMode; 12] = [
        GameMode::Throne4South,
        GameMode::Jade4South,
        GameMode::Gold4South,
        GameMode::Throne4East,
        GameMode::Jade4East,
        GameMode::Gold4East,
        GameMode::Throne3South,
        GameMode::Jade3South,
        GameMode::Gold3South,
        GameMode::Throne3East,
        GameMode::Jade3East,
        GameMode::Gold3East,
    ];

    pub fn id(self) -> u32 {
        match self {
            GameMode::Gold4East => 8,
            GameMode::Gold4South => 9,
            GameMode::Jade4East => 11,
            GameMode::Jade4South => 12,
            GameMode::Throne4East => 15,
            GameMode::Throne4South => 16,
            GameMode::Gold3East => 21,
            GameMode::Gold3South => 22,
            GameMode::Jade3East => 23,
            GameMode::Jade3South => 24,
            GameMode::Throne3East => 25,
            GameMode::Throne3South => 26,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        GameMode::ALL.iter().copied().find(|mode| mode.id() == id)
    }

    /// Number of seats at the table
    pub fn seats(self) -> usize {
        if self.id() >= 21 {
            3
        } else {
            4
        }
    }

    /// Translation key for the lobby name
    pub fn label_key(self) -> &'static str {
        match self {
            GameMode::Gold4East => "金东",
            GameMode::Gold4South => "金",
            GameMode::Jade4East => "玉东",
            GameMode::Jade4South => "玉",
            GameMode::Throne4East => "王东",
            GameMode::Throne4South => "王座",
            GameMode::Gold3East => "三金东",
            GameMode::Gold3South => "三金",
            GameMode::Jade3East => "三玉东",
            GameMode::Jade3South => "三玉",
            GameMode::Throne3East => "三王东",
            GameMode::Throne3South => "三王座",
        }
    }
}

impl TryFrom<u32> for GameMode {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        GameMode::from_id(value).ok_or_else(|| format!("Unknown game mode: {}", value))
    }
}

impl From<GameMode> for u32 {
    fn from(mode: GameMode) -> u32 {
        mode.id()
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

const MAJOR_RANK_NAMES: [&str; 7] = ["初心", "雀士", "雀杰", "雀豪", "雀圣", "魂天", "魂天"];

/// Points needed to rank up, indexed by (major - 1) * 3 + (minor - 1)
const LEVEL_MAX_POINTS: [i32; 15] = [
    20, 80, 200, 600, 800, 1000, 1200, 1400, 2000, 2800, 3200, 3600, 4000, 6000, 9000,
];

const KONTEN_MAJOR: u32 = 7;
const KONTEN_STARTING_POINT: i32 = 1000;
const KONTEN_MAX_POINT: i32 = 2000;

/// Player rank decoded from a five-digit level id
///
/// Layout is `P MM mm`: P is 1 for four-player and 2 for three-player ranks,
/// MM the major rank and mm the minor rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    id: u32,
    major: u32,
    minor: u32,
}

impl Level {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            major: (id / 100) % 100,
            minor: id % 100,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_konten(&self) -> bool {
        self.major >= KONTEN_MAJOR
    }

    pub fn is_three_player(&self) -> bool {
        self.id / 10000 == 2
    }

    pub fn max_point(&self) -> i32 {
        if self.is_konten() {
            return KONTEN_MAX_POINT;
        }
        let index = (self.major.saturating_sub(1) * 3 + self.minor.saturating_sub(1)) as usize;
        LEVEL_MAX_POINTS.get(index).copied().unwrap_or(0)
    }

    pub fn starting_point(&self) -> i32 {
        if self.is_konten() {
            KONTEN_STARTING_POINT
        } else if self.major <= 1 {
            0
        } else {
            self.max_point() / 2
        }
    }

    /// Sort key: higher ranks compare greater regardless of player count
    pub fn ordinal(&self) -> u32 {
        self.major * 100 + self.minor
    }

    pub fn tag(&self) -> String {
        let name = MAJOR_RANK_NAMES
            .get(self.major.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("?");
        let prefix = if self.is_three_player() { "三" } else { "" };
        if self.is_konten() {
            format!("{}{}{}", prefix, name, self.minor)
        } else {
            format!("{}{}{}", prefix, name, chinese_numeral(self.minor))
        }
    }
}

fn chinese_numeral(n: u32) -> &'static str {
    match n {
        1 => "一",
        2 => "二",
        3 => "三",
        _ => "?",
    }
}

/// Level together with the score held at that level and the change from the last game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LevelWithDelta {
    pub id: u32,
    pub score: i32,
    pub delta: i32,
}

impl LevelWithDelta {
    pub fn level(&self) -> Level {
        Level::new(self.id)
    }

    pub fn tag(&self) -> String {
        self.level().tag()
    }

    pub fn adjusted_score(&self) -> i32 {
        (self.score + self.delta).max(0)
    }

    /// Render the score as "current/max", using points with one decimal for 魂天
    pub fn format_adjusted_score(&self) -> String {
        let level = self.level();
        let score = self.adjusted_score();
        if level.is_konten() {
            format!(
                "{:.1}/{:.1}",
                score as f64 / 100.0,
                level.max_point() as f64 / 100.0
            )
        } else {
            format!("{}/{}", score, level.max_point())
        }
    }

    /// Clamp a historical maximum up to the level's starting point
    ///
    /// Peaks are recorded before the rank-up game is settled, so a peak can read
    /// below the floor of the level it reached.
    pub fn fix_max_level(self) -> Self {
        let starting = self.level().starting_point();
        if self.score + self.delta < starting {
            Self {
                id: self.id,
                score: starting,
                delta: 0,
            }
        } else {
            self
        }
    }
}

/// Server region tag derived from the account id
pub fn account_zone_tag(account_id: u32) -> &'static str {
    match account_id >> 23 {
        0..=6 => "Ⓒ",
        7..=12 => "Ⓙ",
        13..=15 => "Ⓔ",
        _ => "Ⓝ",
    }
}
