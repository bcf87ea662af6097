/// Deterministic demo dataset
///
/// Used by unit tests, the `--demo` flag and the benchmarks. Records are
/// generated from a fixed seed, so every call returns the same data for the
/// same anchor time.
use crate::data_provider::{Dataset, ExtendedStatsEntry};
use crate::records::{GameRecord, PlayerRecord};
use crate::stats::{FanStatEntry, LargestLoss, PlayerExtendedStats, StatKey};
use crate::types::{GameMode, Level};

pub const DEMO_PLAYER_ID: u32 = 60_000_123;
pub const DEMO_PLAYER_NICKNAME: &str = "示例雀士";

/// Account that only ever played in the gold room
pub const DEMO_GOLD_PLAYER_ID: u32 = 60_000_777;

/// Start time of the newest generated record in `demo_dataset`
pub const DEMO_ANCHOR: i64 = 1_727_000_000;

const DEMO_GAMES: usize = 240;
const GAME_SPACING_SECS: i64 = 6 * 3600;

const OPPONENTS: &[(u32, &str)] = &[
    (60_100_001, "东风一号"),
    (60_100_002, "南场之王"),
    (60_100_003, "白发三千"),
    (70_200_004, "ツモ切り"),
    (70_200_005, "リーチ棒"),
    (70_200_006, "一発逆転"),
    (110_300_007, "Dora Hunter"),
    (110_300_008, "Ura Seeker"),
    (60_100_009, "清一色"),
    (60_100_010, "七对子"),
    (70_200_011, "嶺上開花"),
    (110_300_012, "Haitei"),
];

/// Mode played by the demo player, cycled with uneven weights
const MODE_CYCLE: &[GameMode] = &[
    GameMode::Jade4South,
    GameMode::Jade4South,
    GameMode::Throne4South,
    GameMode::Jade4South,
    GameMode::Jade4East,
    GameMode::Throne4South,
    GameMode::Jade4South,
    GameMode::Gold4South,
];

/// Small linear congruential generator, enough for stable demo numbers
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }

    /// Uniform value in [lo, hi)
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (self.below(10_000) as f64 / 10_000.0) * (hi - lo)
    }
}

/// Demo dataset with the newest record at `DEMO_ANCHOR`
pub fn demo_dataset() -> Dataset {
    demo_dataset_ending_at(DEMO_ANCHOR)
}

/// Demo dataset whose newest record starts at `anchor`
pub fn demo_dataset_ending_at(anchor: i64) -> Dataset {
    let mut rng = Lcg(0x5eed);
    let mut records = Vec::with_capacity(DEMO_GAMES + 8);

    // Demo player's rank climbs over time: 雀豪一 -> 雀豪三 -> 雀圣一
    let mut level = 10401;
    let mut level_score = 1400;

    for i in (0..DEMO_GAMES).rev() {
        let start_time = anchor - i as i64 * GAME_SPACING_SECS;
        let mode = MODE_CYCLE[i % MODE_CYCLE.len()];
        let scores = deal_scores(&mut rng);

        let mut table = vec![DEMO_PLAYER_ID];
        while table.len() < 4 {
            let (id, _) = OPPONENTS[rng.below(OPPONENTS.len() as u64) as usize];
            if !table.contains(&id) {
                table.push(id);
            }
        }
        let seat_offset = rng.below(4) as usize;
        table.rotate_left(seat_offset);

        let players: Vec<PlayerRecord> = table
            .iter()
            .zip(scores.iter())
            .map(|(&account_id, &score)| {
                if account_id == DEMO_PLAYER_ID {
                    let delta = grading_delta(score, &scores);
                    let player = PlayerRecord {
                        account_id,
                        nickname: DEMO_PLAYER_NICKNAME.to_string(),
                        level,
                        level_score,
                        score,
                        grading_score: delta,
                    };
                    level_score = (level_score + delta).max(0);
                    let max = Level::new(level).max_point();
                    if level_score >= max {
                        level = next_level(level);
                        level_score = Level::new(level).starting_point();
                    }
                    player
                } else {
                    opponent_record(account_id, score)
                }
            })
            .collect();

        records.push(GameRecord {
            uuid: format!("demo-{:06}-{:04x}", i, rng.below(0x10000)),
            mode_id: mode,
            start_time,
            end_time: start_time + 40 * 60,
            players,
        });
    }

    records.extend(gold_player_records(&mut rng, anchor));

    let mut extended_stats = Vec::new();
    let mut modes: Vec<GameMode> = MODE_CYCLE.to_vec();
    modes.sort();
    modes.dedup();
    for mode in modes {
        extended_stats.push(ExtendedStatsEntry {
            account_id: DEMO_PLAYER_ID,
            mode,
            stats: demo_extended_stats(&mut rng, anchor),
        });
    }
    extended_stats.push(ExtendedStatsEntry {
        account_id: DEMO_GOLD_PLAYER_ID,
        mode: GameMode::Gold4East,
        stats: demo_extended_stats(&mut rng, anchor),
    });

    Dataset {
        records,
        extended_stats,
    }
}

/// Final scores for a table, summing to 100000
fn deal_scores(rng: &mut Lcg) -> [i32; 4] {
    let mut scores = [0i32; 4];
    let mut remaining = 100_000;
    for score in scores.iter_mut().take(3) {
        let value = rng.below(50_000) as i32 - 5_000 + 100 * (rng.below(20) as i32);
        let value = (value / 100) * 100;
        *score = value;
        remaining -= value;
    }
    scores[3] = remaining;
    scores
}

fn grading_delta(score: i32, table: &[i32; 4]) -> i32 {
    let place = table.iter().filter(|&&s| s > score).count();
    let uma = [125, 60, -5, -195][place];
    uma + (score - 25_000) / 1000
}

fn next_level(level: u32) -> u32 {
    let minor = level % 100;
    if minor >= 3 {
        level - minor + 101
    } else {
        level + 1
    }
}

fn opponent_record(account_id: u32, score: i32) -> PlayerRecord {
    let nickname = OPPONENTS
        .iter()
        .find(|(id, _)| *id == account_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_default();
    PlayerRecord {
        account_id,
        nickname,
        level: 10402 + account_id % 3,
        level_score: 1500,
        score,
        grading_score: 0,
    }
}

fn gold_player_records(rng: &mut Lcg, anchor: i64) -> Vec<GameRecord> {
    (0..6)
        .map(|i| {
            let start_time = anchor - 3600 - i * GAME_SPACING_SECS;
            let scores = deal_scores(rng);
            let table = [DEMO_GOLD_PLAYER_ID, OPPONENTS[0].0, OPPONENTS[4].0, OPPONENTS[8].0];
            GameRecord {
                uuid: format!("gold-{:04}", i),
                mode_id: GameMode::Gold4East,
                start_time,
                end_time: start_time + 20 * 60,
                players: table
                    .iter()
                    .zip(scores.iter())
                    .map(|(&account_id, &score)| {
                        if account_id == DEMO_GOLD_PLAYER_ID {
                            PlayerRecord {
                                account_id,
                                nickname: "金之间常客".to_string(),
                                level: 10303,
                                level_score: 800,
                                score,
                                grading_score: grading_delta(score, &scores),
                            }
                        } else {
                            opponent_record(account_id, score)
                        }
                    })
                    .collect(),
            }
        })
        .collect()
}

fn demo_extended_stats(rng: &mut Lcg, anchor: i64) -> PlayerExtendedStats {
    let count = 400 + rng.below(800) as u32;
    let mut stats = PlayerExtendedStats::new(count)
        .with(StatKey::WinRate, rng.range(0.19, 0.25))
        .with(StatKey::DealInRate, rng.range(0.10, 0.14))
        .with(StatKey::TsumoRate, rng.range(0.30, 0.40))
        .with(StatKey::DamaRate, rng.range(0.08, 0.15))
        .with(StatKey::DrawRate, rng.range(0.14, 0.19))
        .with(StatKey::DrawTenpaiRate, rng.range(0.40, 0.55))
        .with(StatKey::CallRate, rng.range(0.28, 0.38))
        .with(StatKey::RiichiRate, rng.range(0.17, 0.23))
        .with(StatKey::WinTurns, rng.range(11.0, 12.5))
        .with(StatKey::AvgWinPoints, (rng.range(6400.0, 7400.0)).round())
        .with(StatKey::AvgDealInPoints, (rng.range(5000.0, 5800.0)).round())
        .with(StatKey::TsumoLossRate, rng.range(0.10, 0.14))
        .with(StatKey::MaxDealerStreak, (rng.below(5) + 3) as f64)
        .with(StatKey::UraRate, rng.range(0.25, 0.35))
        .with(StatKey::DealerBustedRate, rng.range(0.08, 0.14))
        .with(StatKey::AvgDealerBustedPoints, (rng.range(3800.0, 4600.0)).round())
        .with(StatKey::RiichiWhenDealIn, rng.range(0.25, 0.35))
        .with(StatKey::CallWhenDealIn, rng.range(0.30, 0.40))
        .with(StatKey::DealInAfterCall, rng.range(0.12, 0.16))
        .with(StatKey::WinAfterCall, rng.range(0.28, 0.34))
        .with(StatKey::DrawAfterCall, rng.range(0.10, 0.14))
        .with(StatKey::WinAfterRiichi, rng.range(0.44, 0.50))
        .with(StatKey::DealInAfterRiichi, rng.range(0.14, 0.17))
        .with(StatKey::DealInAfterRiichiLater, rng.range(0.10, 0.13))
        .with(StatKey::RiichiBalance, (rng.range(2500.0, 3400.0)).round())
        .with(StatKey::RiichiIncome, (rng.range(8000.0, 8900.0)).round())
        .with(StatKey::RiichiExpense, (rng.range(-7900.0, -7000.0)).round())
        .with(StatKey::FirstRiichiRate, rng.range(0.78, 0.86))
        .with(StatKey::ChaseRiichiRate, rng.range(0.14, 0.20))
        .with(StatKey::ChasedRate, rng.range(0.14, 0.20))
        .with(StatKey::RiichiTurn, rng.range(7.0, 8.2))
        .with(StatKey::DrawAfterRiichi, rng.range(0.16, 0.22))
        .with(StatKey::IppatsuRate, rng.range(0.16, 0.22))
        .with(StatKey::FuritenRiichiRate, rng.range(0.03, 0.06))
        .with(StatKey::Yakuman, rng.below(3) as f64)
        .with(StatKey::CountedYakuman, rng.below(2) as f64)
        .with(StatKey::MaxHan, (rng.below(6) + 8) as f64)
        .with(StatKey::NagashiMangan, rng.below(2) as f64)
        .with(StatKey::DoubleRiichi, (rng.below(4) + 1) as f64)
        .with(StatKey::AvgStartingShanten, rng.range(3.3, 3.6));

    stats.largest_loss = Some(LargestLoss {
        id: format!("demo-loss-{:04x}", rng.below(0x10000)),
        start_time: anchor - rng.below(30) as i64 * 86_400,
        fans: vec![
            fan("立直", 1),
            fan("一发", 1),
            fan("门前清自摸和", 1),
            fan("宝牌", 2 + rng.below(3) as u32),
            fan("里宝牌", rng.below(3) as u32),
        ],
    });
    stats
}

fn fan(label: &str, count: u32) -> FanStatEntry {
    FanStatEntry {
        label: label.to_string(),
        count,
        yakuman: 0,
    }
}
