/// UI language selection and compiled-in translations
///
/// Keys are the simplified Chinese strings, so the fallback language needs no
/// table and a missing key still renders readable text.
use phf::phf_map;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    ZhHans,
    Ja,
    En,
}

pub const FALLBACK_LANGUAGE: Language = Language::ZhHans;

/// Environment variables consulted for the locale, in priority order
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

const DEFAULT_NAMESPACE: &str = "default";

impl Language {
    pub const ALL: [Language; 3] = [Language::ZhHans, Language::Ja, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::ZhHans => "zh-hans",
            Language::Ja => "ja",
            Language::En => "en",
        }
    }

    /// Name of the language in itself
    pub fn native_name(self) -> &'static str {
        match self {
            Language::ZhHans => "简体中文",
            Language::Ja => "日本語",
            Language::En => "English",
        }
    }

    /// Parse a lower- or mixed-case language tag
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "zh-hans" | "zh-cn" | "zh-sg" | "zh" => Some(Language::ZhHans),
            "ja" | "ja-jp" => Some(Language::Ja),
            "en" | "en-us" | "en-gb" => Some(Language::En),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Language::ZhHans => Language::Ja,
            Language::Ja => Language::En,
            Language::En => Language::ZhHans,
        }
    }

    fn table(self) -> Option<&'static phf::Map<&'static str, &'static str>> {
        match self {
            Language::ZhHans => None,
            Language::Ja => Some(&JA),
            Language::En => Some(&EN),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Turn a POSIX locale ("ja_JP.UTF-8") into a tag ("ja-jp") and try it, then
/// its primary subtag
fn language_from_locale(locale: &str) -> Option<Language> {
    let tag = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .replace('_', "-")
        .to_lowercase();
    if tag.is_empty() || tag == "c" || tag == "posix" {
        return None;
    }
    Language::from_code(&tag).or_else(|| {
        tag.split('-')
            .next()
            .and_then(Language::from_code)
    })
}

/// Pick the UI language: persisted choice first, then the environment locale
pub fn detect_language(
    persisted: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Language {
    if let Some(language) = persisted.and_then(language_from_locale) {
        return language;
    }
    LOCALE_VARS
        .iter()
        .filter_map(|var| env(var))
        .find_map(|value| language_from_locale(&value))
        .unwrap_or(FALLBACK_LANGUAGE)
}

/// Collects keys missing from a translation table into a JSON file
///
/// The file is cleared when the recorder is created and rewritten on every
/// new key, shaped `{lang: {namespace: {key: ""}}}`.
#[derive(Debug)]
pub struct MissingKeyRecorder {
    path: PathBuf,
    keys: Mutex<BTreeMap<String, BTreeMap<String, String>>>,
}

impl MissingKeyRecorder {
    pub fn create(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, "{}")?;
        Ok(Self {
            path,
            keys: Mutex::new(BTreeMap::new()),
        })
    }

    pub fn record(&self, language: Language, key: &str) {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = keys.entry(language.code().to_string()).or_default();
        if entries.insert(key.to_string(), String::new()).is_some() {
            return;
        }
        debug!("I18N: missing {} key {:?}", language, key);

        let mut root = Map::new();
        for (lang, entries) in keys.iter() {
            let table: Map<String, Value> = entries
                .keys()
                .map(|k| (k.clone(), Value::String(String::new())))
                .collect();
            let mut namespaces = Map::new();
            namespaces.insert(DEFAULT_NAMESPACE.to_string(), Value::Object(table));
            root.insert(lang.clone(), Value::Object(namespaces));
        }
        let written = serde_json::to_string_pretty(&Value::Object(root))
            .map_err(anyhow::Error::from)
            .and_then(|content| fs::write(&self.path, content).map_err(anyhow::Error::from));
        if let Err(e) = written {
            warn!("I18N: cannot write {}: {}", self.path.display(), e);
        }
    }
}

/// Translator for one language
#[derive(Debug, Clone)]
pub struct I18n {
    language: Language,
    recorder: Option<Arc<MissingKeyRecorder>>,
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(FALLBACK_LANGUAGE)
    }
}

impl I18n {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            recorder: None,
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<MissingKeyRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Same recorder, different language
    pub fn switch_to(&self, language: Language) -> Self {
        Self {
            language,
            recorder: self.recorder.clone(),
        }
    }

    /// Translate `key`; never empty, the key itself when no translation exists
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let Some(table) = self.language.table() else {
            return key;
        };
        match table.get(key) {
            Some(value) if !value.is_empty() => *value,
            _ => {
                if let Some(recorder) = &self.recorder {
                    recorder.record(self.language, key);
                }
                key
            }
        }
    }
}

static EN: phf::Map<&'static str, &'static str> = phf_map! {
    // Views
    "基本" => "Basic",
    "立直" => "Riichi",
    "更多" => "More",
    "和铳分布" => "Win/Loss",
    "血统" => "Luck",
    "最近大铳" => "Largest Loss",
    "最常同桌" => "Frequent Opponents",
    "最近走势" => "Recent Trend",
    "累计战绩" => "Placement",
    "加载中..." => "Loading...",
    "正在切换..." => "Updating...",
    "统计数据加载失败" => "Failed to load stats",
    "保存设置失败" => "Failed to save preference",
    "无超过满贯大铳" => "No deal-in of mangan or more",
    "无数据" => "No data",
    "查看牌谱" => "Replay",
    // Basic stats
    "对局数" => "Games",
    "等级" => "Rank",
    "最高等级" => "Peak Rank",
    "平均顺位" => "Avg Placement",
    "被飞率" => "Bust Rate",
    "一位率" => "1st",
    "二位率" => "2nd",
    "三位率" => "3rd",
    "四位率" => "4th",
    // Extended stats
    "和牌率" => "Win Rate",
    "放铳率" => "Deal-in Rate",
    "自摸率" => "Tsumo Rate",
    "默胡率" => "Dama Rate",
    "流局率" => "Draw Rate",
    "流听率" => "Tenpai at Draw",
    "副露率" => "Call Rate",
    "立直率" => "Riichi Rate",
    "和了巡数" => "Win Turn",
    "平均打点" => "Avg Win Points",
    "平均铳点" => "Avg Deal-in Points",
    "被自摸率" => "Tsumo Loss Rate",
    "最大连庄" => "Max Dealer Streak",
    "里宝率" => "Ura Rate",
    "被炸率" => "Dealer Bust Rate",
    "平均被炸点数" => "Avg Dealer Bust Points",
    "放铳时立直率" => "Riichi at Deal-in",
    "放铳时副露率" => "Call at Deal-in",
    "副露后放铳率" => "Deal-in after Call",
    "副露后和牌率" => "Win after Call",
    "副露后流局率" => "Draw after Call",
    "立直和了" => "Riichi Win",
    "立直放铳" => "Riichi Deal-in",
    "立直收支" => "Riichi Balance",
    "立直收入" => "Riichi Income",
    "立直支出" => "Riichi Expense",
    "先制率" => "First Riichi",
    "追立率" => "Chase Riichi",
    "被追率" => "Chased",
    "立直巡目" => "Riichi Turn",
    "立直流局" => "Riichi Draw",
    "一发率" => "Ippatsu Rate",
    "振听率" => "Furiten Riichi",
    "役满" => "Yakuman",
    "累计役满" => "Counted Yakuman",
    "最大累计番数" => "Max Han",
    "流满" => "Nagashi Mangan",
    "两立直" => "Double Riichi",
    "平均起手向听" => "Avg Starting Shanten",
    // Formulas
    "和牌局数 / 总局数" => "wins / rounds",
    "放铳局数 / 总局数" => "deal-ins / rounds",
    "自摸局数 / 和牌局数" => "tsumo wins / wins",
    "门清默听和牌局数 / 和牌局数" => "closed dama wins / wins",
    "流局局数 / 总局数" => "draws / rounds",
    "流局听牌局数 / 流局局数" => "tenpai at draw / draws",
    "副露局数 / 总局数" => "rounds with calls / rounds",
    "立直局数 / 总局数" => "riichi / rounds",
    "被自摸局数 / 总局数" => "tsumo losses / rounds",
    "中里宝局数 / 立直和了局数" => "wins with ura / riichi wins",
    "被炸庄（满贯或以上）次数 / 被自摸次数" => "dealer busts (mangan+) / tsumo losses",
    "被炸庄（满贯或以上）点数 / 次数" => "dealer bust points (mangan+) / busts",
    "放铳时立直次数 / 放铳次数" => "deal-ins in riichi / deal-ins",
    "放铳时副露次数 / 放铳次数" => "deal-ins with calls / deal-ins",
    "放铳时副露次数 / 副露次数" => "deal-ins with calls / rounds with calls",
    "副露后和牌次数 / 副露次数" => "wins with calls / rounds with calls",
    "副露后流局次数 / 副露次数" => "draws with calls / rounds with calls",
    "立直和了局数 / 立直局数" => "riichi wins / riichi",
    "立直放铳局数（含立直瞬间 / 不含立直瞬间） / 立直局数" => "riichi deal-ins (incl. / excl. riichi tile) / riichi",
    "立直总收支（含供托） / 立直局数" => "riichi net points (incl. sticks) / riichi",
    "立直和了收入（含供托） / 立直和了局数" => "riichi win income (incl. sticks) / riichi wins",
    "立直放铳支出（含立直棒） / 立直放铳局数" => "riichi deal-in cost (incl. stick) / riichi deal-ins",
    "先制立直局数 / 立直局数" => "first riichi / riichi",
    "追立局数 / 立直局数" => "chasing riichi / riichi",
    "被追立局数 / 立直局数" => "chased riichi / riichi",
    "立直流局局数 / 立直局数" => "riichi draws / riichi",
    "一发局数 / 立直和了局数" => "ippatsu / riichi wins",
    "振听立直局数（不含立直见逃） / 立直局数" => "furiten riichi (excl. missed wins) / riichi",
    "和出役满次数" => "yakuman wins",
    "和出累计役满次数" => "counted yakuman wins",
    "和出的最大番数（不含役满役）" => "highest han won (excl. yakuman)",
    "流满次数" => "nagashi mangan count",
    "两立直次数" => "double riichi count",
    // Win/loss distribution
    "自摸和了" => "Tsumo",
    "荣和" => "Ron",
    "放铳" => "Deal-in",
    "被自摸" => "Tsumo Loss",
    "流局" => "Draw",
    "其他" => "Other",
    // Same match
    "同桌次数" => "Games",
    "同桌率" => "Share",
    "昵称" => "Nickname",
    // Command output
    "玩家" => "Players",
    "场数" => "Games",
    // Modes
    "金东" => "Gold East",
    "金" => "Gold",
    "玉东" => "Jade East",
    "玉" => "Jade",
    "王东" => "Throne East",
    "王座" => "Throne",
    "三金东" => "3P Gold East",
    "三金" => "3P Gold",
    "三玉东" => "3P Jade East",
    "三玉" => "3P Jade",
    "三王东" => "3P Throne East",
    "三王座" => "3P Throne",
    // Settings
    "模式" => "Modes",
    "日期" => "Dates",
    "全部" => "All",
    "最近 7 天" => "Last 7 days",
    "最近 30 天" => "Last 30 days",
    "最近 90 天" => "Last 90 days",
    "最近一年" => "Last year",
    "语言" => "Language",
    // Status bar
    "视图" => "views",
    "设置" => "settings",
    "切换" => "toggle",
    "退出" => "quit",
    "未选择玩家" => "No player selected",
    "刷新" => "refresh",
    "语言已切换" => "Language changed",
    "记录场数" => "Games",
    "记录等级" => "Rank",
    "记录分数" => "Points",
    "最高分数" => "Peak Points",
    "总计局数" => "Rounds",
    "对手" => "Opponent",
};

static JA: phf::Map<&'static str, &'static str> = phf_map! {
    // Views
    "基本" => "基本",
    "立直" => "立直",
    "更多" => "その他",
    "和铳分布" => "和了・放銃分布",
    "血统" => "運",
    "最近大铳" => "最近の大放銃",
    "最常同桌" => "よく同卓する相手",
    "最近走势" => "最近の推移",
    "累计战绩" => "累計成績",
    "加载中..." => "読み込み中...",
    "正在切换..." => "更新中...",
    "统计数据加载失败" => "統計の読み込みに失敗しました",
    "保存设置失败" => "設定の保存に失敗しました",
    "无超过满贯大铳" => "満貫以上の放銃なし",
    "无数据" => "データなし",
    "查看牌谱" => "牌譜",
    // Basic stats
    "对局数" => "対局数",
    "等级" => "段位",
    "最高等级" => "最高段位",
    "平均顺位" => "平均順位",
    "被飞率" => "飛び率",
    "一位率" => "1位率",
    "二位率" => "2位率",
    "三位率" => "3位率",
    "四位率" => "4位率",
    // Extended stats
    "和牌率" => "和了率",
    "放铳率" => "放銃率",
    "自摸率" => "ツモ率",
    "默胡率" => "ダマ率",
    "流局率" => "流局率",
    "流听率" => "流局聴牌率",
    "副露率" => "副露率",
    "立直率" => "立直率",
    "和了巡数" => "和了巡目",
    "平均打点" => "平均打点",
    "平均铳点" => "平均放銃点",
    "被自摸率" => "被ツモ率",
    "最大连庄" => "最大連荘",
    "里宝率" => "裏ドラ率",
    "被炸率" => "親被り率",
    "平均被炸点数" => "平均親被り点",
    "放铳时立直率" => "放銃時立直率",
    "放铳时副露率" => "放銃時副露率",
    "副露后放铳率" => "副露後放銃率",
    "副露后和牌率" => "副露後和了率",
    "副露后流局率" => "副露後流局率",
    "立直和了" => "立直和了",
    "立直放铳" => "立直放銃",
    "立直收支" => "立直収支",
    "立直收入" => "立直収入",
    "立直支出" => "立直支出",
    "先制率" => "先制率",
    "追立率" => "追っかけ率",
    "被追率" => "追っかけられ率",
    "立直巡目" => "立直巡目",
    "立直流局" => "立直流局",
    "一发率" => "一発率",
    "振听率" => "振聴立直率",
    "役满" => "役満",
    "累计役满" => "数え役満",
    "最大累计番数" => "最大翻数",
    "流满" => "流し満貫",
    "两立直" => "ダブル立直",
    "平均起手向听" => "平均配牌向聴",
    // Formulas
    "和牌局数 / 总局数" => "和了局数 / 総局数",
    "放铳局数 / 总局数" => "放銃局数 / 総局数",
    "自摸局数 / 和牌局数" => "ツモ和了局数 / 和了局数",
    "门清默听和牌局数 / 和牌局数" => "門前ダマ和了局数 / 和了局数",
    "流局局数 / 总局数" => "流局局数 / 総局数",
    "流局听牌局数 / 流局局数" => "流局聴牌局数 / 流局局数",
    "副露局数 / 总局数" => "副露局数 / 総局数",
    "立直局数 / 总局数" => "立直局数 / 総局数",
    "被自摸局数 / 总局数" => "被ツモ局数 / 総局数",
    "中里宝局数 / 立直和了局数" => "裏ドラ局数 / 立直和了局数",
    "被炸庄（满贯或以上）次数 / 被自摸次数" => "親被り（満貫以上）回数 / 被ツモ回数",
    "被炸庄（满贯或以上）点数 / 次数" => "親被り（満貫以上）点数 / 回数",
    "放铳时立直次数 / 放铳次数" => "放銃時立直回数 / 放銃回数",
    "放铳时副露次数 / 放铳次数" => "放銃時副露回数 / 放銃回数",
    "放铳时副露次数 / 副露次数" => "放銃時副露回数 / 副露回数",
    "副露后和牌次数 / 副露次数" => "副露後和了回数 / 副露回数",
    "副露后流局次数 / 副露次数" => "副露後流局回数 / 副露回数",
    "立直和了局数 / 立直局数" => "立直和了局数 / 立直局数",
    "立直放铳局数（含立直瞬间 / 不含立直瞬间） / 立直局数" => "立直放銃局数（宣言牌含む / 含まない） / 立直局数",
    "立直总收支（含供托） / 立直局数" => "立直総収支（供託含む） / 立直局数",
    "立直和了收入（含供托） / 立直和了局数" => "立直和了収入（供託含む） / 立直和了局数",
    "立直放铳支出（含立直棒） / 立直放铳局数" => "立直放銃支出（立直棒含む） / 立直放銃局数",
    "先制立直局数 / 立直局数" => "先制立直局数 / 立直局数",
    "追立局数 / 立直局数" => "追っかけ立直局数 / 立直局数",
    "被追立局数 / 立直局数" => "追っかけられ局数 / 立直局数",
    "立直流局局数 / 立直局数" => "立直流局局数 / 立直局数",
    "一发局数 / 立直和了局数" => "一発局数 / 立直和了局数",
    "振听立直局数（不含立直见逃） / 立直局数" => "振聴立直局数（見逃し除く） / 立直局数",
    "和出役满次数" => "役満和了回数",
    "和出累计役满次数" => "数え役満和了回数",
    "和出的最大番数（不含役满役）" => "和了最大翻数（役満除く）",
    "流满次数" => "流し満貫回数",
    "两立直次数" => "ダブル立直回数",
    // Win/loss distribution
    "自摸和了" => "ツモ和了",
    "荣和" => "ロン和了",
    "放铳" => "放銃",
    "被自摸" => "被ツモ",
    "流局" => "流局",
    "其他" => "その他",
    // Same match
    "同桌次数" => "同卓数",
    "同桌率" => "同卓率",
    "昵称" => "ニックネーム",
    // Command output
    "玩家" => "プレイヤー",
    "场数" => "対局数",
    // Modes
    "金东" => "金東",
    "金" => "金南",
    "玉东" => "玉東",
    "玉" => "玉南",
    "王东" => "王座東",
    "王座" => "王座南",
    "三金东" => "三麻金東",
    "三金" => "三麻金南",
    "三玉东" => "三麻玉東",
    "三玉" => "三麻玉南",
    "三王东" => "三麻王座東",
    "三王座" => "三麻王座南",
    // Settings
    "模式" => "モード",
    "日期" => "期間",
    "全部" => "全期間",
    "最近 7 天" => "直近7日",
    "最近 30 天" => "直近30日",
    "最近 90 天" => "直近90日",
    "最近一年" => "直近1年",
    "语言" => "言語",
    // Status bar
    "视图" => "表示",
    "设置" => "設定",
    "切换" => "切替",
    "退出" => "終了",
    "未选择玩家" => "プレイヤー未選択",
    "刷新" => "更新",
    "语言已切换" => "言語を切り替えました",
    "记录场数" => "対局数",
    "记录等级" => "段位",
    "记录分数" => "ポイント",
    "最高分数" => "最高ポイント",
    "总计局数" => "総局数",
    "对手" => "相手",
};
