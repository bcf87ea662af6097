/// Extended statistics bundle and the catalog of named stats
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::formatting::{format_fixed3, format_percent, format_points};

/// How a stat is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatFormat {
    Percent,
    Fixed3,
    Points,
}

/// How per-lobby values combine when several lobbies are selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// Mean weighted by round count
    Weighted,
    Sum,
    Max,
}

macro_rules! stat_keys {
    ($($variant:ident => ($wire:literal, $label:literal, $desc:expr, $format:ident, $merge:ident)),+ $(,)?) => {
        /// Named statistic in a `PlayerExtendedStats` bundle
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum StatKey {
            $($variant),+
        }

        impl StatKey {
            pub const ALL: &'static [StatKey] = &[$(StatKey::$variant),+];

            /// Key used in dataset files
            pub fn wire_name(self) -> &'static str {
                match self {
                    $(StatKey::$variant => $wire),+
                }
            }

            /// Translation key for the row label
            pub fn label_key(self) -> &'static str {
                match self {
                    $(StatKey::$variant => $label),+
                }
            }

            /// Translation key for the formula shown next to the value
            pub fn description_key(self) -> Option<&'static str> {
                match self {
                    $(StatKey::$variant => $desc),+
                }
            }

            pub fn format(self) -> StatFormat {
                match self {
                    $(StatKey::$variant => StatFormat::$format),+
                }
            }

            pub fn merge_rule(self) -> MergeRule {
                match self {
                    $(StatKey::$variant => MergeRule::$merge),+
                }
            }
        }
    };
}

stat_keys! {
    WinRate => ("和牌率", "和牌率", Some("和牌局数 / 总局数"), Percent, Weighted),
    DealInRate => ("放铳率", "放铳率", Some("放铳局数 / 总局数"), Percent, Weighted),
    TsumoRate => ("自摸率", "自摸率", Some("自摸局数 / 和牌局数"), Percent, Weighted),
    DamaRate => ("默听率", "默胡率", Some("门清默听和牌局数 / 和牌局数"), Percent, Weighted),
    DrawRate => ("流局率", "流局率", Some("流局局数 / 总局数"), Percent, Weighted),
    DrawTenpaiRate => ("流听率", "流听率", Some("流局听牌局数 / 流局局数"), Percent, Weighted),
    CallRate => ("副露率", "副露率", Some("副露局数 / 总局数"), Percent, Weighted),
    RiichiRate => ("立直率", "立直率", Some("立直局数 / 总局数"), Percent, Weighted),
    WinTurns => ("和了巡数", "和了巡数", None, Fixed3, Weighted),
    AvgWinPoints => ("平均打点", "平均打点", None, Points, Weighted),
    AvgDealInPoints => ("平均铳点", "平均铳点", None, Points, Weighted),
    TsumoLossRate => ("被自摸率", "被自摸率", Some("被自摸局数 / 总局数"), Percent, Weighted),
    MaxDealerStreak => ("最大连庄", "最大连庄", None, Points, Max),
    UraRate => ("里宝率", "里宝率", Some("中里宝局数 / 立直和了局数"), Percent, Weighted),
    DealerBustedRate => ("被炸率", "被炸率", Some("被炸庄（满贯或以上）次数 / 被自摸次数"), Percent, Weighted),
    AvgDealerBustedPoints => ("平均被炸点数", "平均被炸点数", Some("被炸庄（满贯或以上）点数 / 次数"), Points, Weighted),
    RiichiWhenDealIn => ("放铳时立直率", "放铳时立直率", Some("放铳时立直次数 / 放铳次数"), Percent, Weighted),
    CallWhenDealIn => ("放铳时副露率", "放铳时副露率", Some("放铳时副露次数 / 放铳次数"), Percent, Weighted),
    DealInAfterCall => ("副露后放铳率", "副露后放铳率", Some("放铳时副露次数 / 副露次数"), Percent, Weighted),
    WinAfterCall => ("副露后和牌率", "副露后和牌率", Some("副露后和牌次数 / 副露次数"), Percent, Weighted),
    DrawAfterCall => ("副露后流局率", "副露后流局率", Some("副露后流局次数 / 副露次数"), Percent, Weighted),
    WinAfterRiichi => ("立直后和牌率", "立直和了", Some("立直和了局数 / 立直局数"), Percent, Weighted),
    DealInAfterRiichi => ("立直后放铳率", "立直放铳", Some("立直放铳局数（含立直瞬间 / 不含立直瞬间） / 立直局数"), Percent, Weighted),
    DealInAfterRiichiLater => ("立直后非瞬间放铳率", "立直放铳", Some("立直放铳局数（含立直瞬间 / 不含立直瞬间） / 立直局数"), Percent, Weighted),
    RiichiBalance => ("立直收支", "立直收支", Some("立直总收支（含供托） / 立直局数"), Points, Weighted),
    RiichiIncome => ("立直收入", "立直收入", Some("立直和了收入（含供托） / 立直和了局数"), Points, Weighted),
    RiichiExpense => ("立直支出", "立直支出", Some("立直放铳支出（含立直棒） / 立直放铳局数"), Points, Weighted),
    FirstRiichiRate => ("先制率", "先制率", Some("先制立直局数 / 立直局数"), Percent, Weighted),
    ChaseRiichiRate => ("追立率", "追立率", Some("追立局数 / 立直局数"), Percent, Weighted),
    ChasedRate => ("被追率", "被追率", Some("被追立局数 / 立直局数"), Percent, Weighted),
    RiichiTurn => ("立直巡目", "立直巡目", None, Fixed3, Weighted),
    DrawAfterRiichi => ("立直后流局率", "立直流局", Some("立直流局局数 / 立直局数"), Percent, Weighted),
    IppatsuRate => ("一发率", "一发率", Some("一发局数 / 立直和了局数"), Percent, Weighted),
    FuritenRiichiRate => ("振听立直率", "振听率", Some("振听立直局数（不含立直见逃） / 立直局数"), Percent, Weighted),
    Yakuman => ("役满", "役满", Some("和出役满次数"), Points, Sum),
    CountedYakuman => ("累计役满", "累计役满", Some("和出累计役满次数"), Points, Sum),
    MaxHan => ("最大累计番数", "最大累计番数", Some("和出的最大番数（不含役满役）"), Points, Max),
    NagashiMangan => ("流满", "流满", Some("流满次数"), Points, Sum),
    DoubleRiichi => ("W立直", "两立直", Some("两立直次数"), Points, Sum),
    AvgStartingShanten => ("平均起手向听", "平均起手向听", None, Fixed3, Weighted),
}

impl StatKey {
    pub fn format_value(self, value: f64) -> String {
        match self.format() {
            StatFormat::Percent => format_percent(value),
            StatFormat::Fixed3 => format_fixed3(value),
            StatFormat::Points => format_points(value),
        }
    }
}

/// One yaku in a hand, with its han or yakuman count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanStatEntry {
    pub label: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default, rename = "役满")]
    pub yakuman: u32,
}

impl FanStatEntry {
    pub fn format_fan(&self) -> String {
        if self.yakuman > 0 {
            if self.yakuman > 1 {
                format!("{}倍役满", self.yakuman)
            } else {
                "役满".to_string()
            }
        } else {
            format!("{}番", self.count)
        }
    }
}

/// Summarize a hand: yakuman multiple, or the named tier for the han total
pub fn format_fan_summary(fans: &[FanStatEntry]) -> String {
    let yakuman: u32 = fans.iter().map(|f| f.yakuman).sum();
    if yakuman > 0 {
        return if yakuman > 1 {
            format!("{}倍役满", yakuman)
        } else {
            "役满".to_string()
        };
    }
    let han: u32 = fans.iter().map(|f| f.count).sum();
    let tier = match han {
        13..=u32::MAX => "累计役满",
        11..=12 => "三倍满",
        8..=10 => "倍满",
        6..=7 => "跳满",
        5 => "满贯",
        _ => "",
    };
    if tier.is_empty() {
        format!("{}番", han)
    } else {
        format!("{} {}番", tier, han)
    }
}

/// The most recent deal-in of mangan or more
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargestLoss {
    /// Record uuid
    pub id: String,
    pub start_time: i64,
    pub fans: Vec<FanStatEntry>,
}

/// Secondary statistics computed per player and lobby
///
/// Values are kept as raw JSON so a malformed field reads as zero instead of
/// failing the whole bundle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerExtendedStats {
    /// Rounds the stats were computed from
    #[serde(default)]
    pub count: u32,
    #[serde(default, rename = "最近大铳", skip_serializing_if = "Option::is_none")]
    pub largest_loss: Option<LargestLoss>,
    #[serde(flatten)]
    values: BTreeMap<String, serde_json::Value>,
}

impl PlayerExtendedStats {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    pub fn with(mut self, key: StatKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: StatKey) -> f64 {
        self.values
            .get(key.wire_name())
            .and_then(serde_json::Value::as_f64)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, key: StatKey, value: f64) {
        if let Some(number) = serde_json::Number::from_f64(value) {
            self.values
                .insert(key.wire_name().to_string(), serde_json::Value::Number(number));
        }
    }

    pub fn format(&self, key: StatKey) -> String {
        key.format_value(self.get(key))
    }

    /// Combine bundles from several lobbies into one
    pub fn merge(parts: &[PlayerExtendedStats]) -> PlayerExtendedStats {
        match parts {
            [] => return PlayerExtendedStats::default(),
            [single] => return single.clone(),
            _ => {}
        }

        let total: u32 = parts.iter().map(|p| p.count).sum();
        let mut merged = PlayerExtendedStats::new(total);

        for &key in StatKey::ALL {
            let value = match key.merge_rule() {
                MergeRule::Weighted => {
                    if total == 0 {
                        0.0
                    } else {
                        parts
                            .iter()
                            .map(|p| p.get(key) * p.count as f64)
                            .sum::<f64>()
                            / total as f64
                    }
                }
                MergeRule::Sum => parts.iter().map(|p| p.get(key)).sum(),
                MergeRule::Max => parts.iter().map(|p| p.get(key)).fold(0.0, f64::max),
            };
            merged.set(key, value);
        }

        merged.largest_loss = parts
            .iter()
            .filter_map(|p| p.largest_loss.as_ref())
            .max_by_key(|loss| loss.start_time)
            .cloned();

        merged
    }
}

/// Share of rounds by outcome, derived from the extended stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinLoseDistribution {
    pub tsumo: f64,
    pub ron: f64,
    pub deal_in: f64,
    pub tsumo_loss: f64,
    pub draw: f64,
    pub other: f64,
}

impl WinLoseDistribution {
    pub fn from_stats(stats: &PlayerExtendedStats) -> Self {
        let win = stats.get(StatKey::WinRate);
        let tsumo = win * stats.get(StatKey::TsumoRate);
        let ron = win - tsumo;
        let deal_in = stats.get(StatKey::DealInRate);
        let tsumo_loss = stats.get(StatKey::TsumoLossRate);
        let draw = stats.get(StatKey::DrawRate);
        let other = (1.0 - win - deal_in - tsumo_loss - draw).max(0.0);
        Self {
            tsumo,
            ron,
            deal_in,
            tsumo_loss,
            draw,
            other,
        }
    }

    /// (translation key, share) pairs in display order
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("自摸和了", self.tsumo),
            ("荣和", self.ron),
            ("放铳", self.deal_in),
            ("被自摸", self.tsumo_loss),
            ("流局", self.draw),
            ("其他", self.other),
        ]
    }
}
