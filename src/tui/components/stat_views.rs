/// Rows of the stat-list sub-views
///
/// Rows built from the extended stats are left out while the stats are
/// still computing.
use crate::formatting::{format_fixed3, format_percent};
use crate::i18n::I18n;
use crate::metadata::PlayerMetadata;
use crate::stats::{PlayerExtendedStats, StatKey};

use super::stat_list::StatRow;

const BASIC_STATS: &[StatKey] = &[
    StatKey::WinRate,
    StatKey::DealInRate,
    StatKey::TsumoRate,
    StatKey::DamaRate,
    StatKey::DrawRate,
    StatKey::DrawTenpaiRate,
    StatKey::CallRate,
    StatKey::RiichiRate,
    StatKey::WinTurns,
    StatKey::AvgWinPoints,
    StatKey::AvgDealInPoints,
];

const RIICHI_STATS_HEAD: &[StatKey] = &[StatKey::RiichiRate, StatKey::WinAfterRiichi];

const RIICHI_STATS_TAIL: &[StatKey] = &[
    StatKey::RiichiBalance,
    StatKey::RiichiIncome,
    StatKey::RiichiExpense,
    StatKey::FirstRiichiRate,
    StatKey::ChaseRiichiRate,
    StatKey::ChasedRate,
    StatKey::RiichiTurn,
    StatKey::DrawAfterRiichi,
    StatKey::IppatsuRate,
    StatKey::FuritenRiichiRate,
];

const EXTENDED_STATS: &[StatKey] = &[
    StatKey::MaxDealerStreak,
    StatKey::UraRate,
    StatKey::DealerBustedRate,
    StatKey::AvgDealerBustedPoints,
    StatKey::RiichiWhenDealIn,
    StatKey::CallWhenDealIn,
    StatKey::DealInAfterCall,
    StatKey::WinAfterCall,
    StatKey::DrawAfterCall,
];

const LUCK_STATS: &[StatKey] = &[
    StatKey::Yakuman,
    StatKey::CountedYakuman,
    StatKey::MaxHan,
    StatKey::NagashiMangan,
    StatKey::DoubleRiichi,
    StatKey::AvgStartingShanten,
];

fn stat_rows(i18n: &I18n, stats: &PlayerExtendedStats, keys: &[StatKey]) -> Vec<StatRow> {
    keys.iter().map(|&key| StatRow::stat(i18n, stats, key)).collect()
}

/// Record count, level, the main rates and placement
pub fn basic_rows(i18n: &I18n, metadata: &PlayerMetadata) -> Vec<StatRow> {
    let level = metadata.display_level();
    let mut rows = vec![
        StatRow::new(i18n.t("记录场数"), metadata.count().to_string()),
        StatRow::new(i18n.t("记录等级"), level.tag()),
        StatRow::new(i18n.t("记录分数"), level.format_adjusted_score()),
    ];
    if let Some(stats) = metadata.extended_stats.peek() {
        rows.extend(stat_rows(i18n, &stats, BASIC_STATS));
    }
    rows.push(StatRow::new(
        i18n.t("平均顺位"),
        format_fixed3(metadata.summary.avg_rank),
    ));
    rows.push(StatRow::new(
        i18n.t("被飞率"),
        format_percent(metadata.summary.negative_rate),
    ));
    rows
}

pub fn riichi_rows(i18n: &I18n, stats: &PlayerExtendedStats) -> Vec<StatRow> {
    let mut rows = stat_rows(i18n, stats, RIICHI_STATS_HEAD);

    // Deal-ins with and without the riichi tile itself share one row
    let deal_in = StatRow::new(
        i18n.t(StatKey::DealInAfterRiichi.label_key()),
        format!(
            "{} / {}",
            stats.format(StatKey::DealInAfterRiichi),
            stats.format(StatKey::DealInAfterRiichiLater)
        ),
    );
    rows.push(match StatKey::DealInAfterRiichi.description_key() {
        Some(desc) => deal_in.with_description(i18n.t(desc)),
        None => deal_in,
    });

    rows.extend(stat_rows(i18n, stats, RIICHI_STATS_TAIL));
    rows
}

/// Peak level followed by the secondary rates
pub fn extended_rows(
    i18n: &I18n,
    metadata: &PlayerMetadata,
    stats: Option<&PlayerExtendedStats>,
) -> Vec<StatRow> {
    let max_level = metadata.display_max_level().fix_max_level();
    let mut rows = vec![
        StatRow::new(i18n.t("最高等级"), max_level.tag()),
        StatRow::new(i18n.t("最高分数"), max_level.format_adjusted_score()),
    ];
    if let Some(stats) = stats {
        rows.extend(stat_rows(i18n, stats, EXTENDED_STATS));
        rows.push(StatRow::new(i18n.t("总计局数"), stats.count.to_string()));
    }
    rows
}

pub fn luck_rows(i18n: &I18n, stats: &PlayerExtendedStats) -> Vec<StatRow> {
    stat_rows(i18n, stats, LUCK_STATS)
}
