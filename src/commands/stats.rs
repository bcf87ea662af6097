use anyhow::{Context, Result};
use unicode_width::UnicodeWidthStr;

use crate::cache;
use crate::config::DisplayConfig;
use crate::data_provider::{PlayerQuery, RecordSource};
use crate::formatting::{format_header, format_percent};
use crate::i18n::I18n;
use crate::metadata::{ExtendedStats, PlayerMetadata};
use crate::records::DateRange;
use crate::stats::PlayerExtendedStats;
use crate::tui::components::bar_chart::{rank_rate_props, win_lose_props, BarChartProps};
use crate::tui::components::stat_views::{basic_rows, extended_rows, luck_rows, riichi_rows};
use crate::tui::components::StatRow;
use crate::types::{account_zone_tag, GameMode};

/// Rows as aligned `label  value` lines; descriptions are left out
fn format_rows(rows: &[StatRow]) -> String {
    let label_width = rows.iter().map(|r| r.label.width()).max().unwrap_or(0);
    rows.iter()
        .map(|row| {
            let fill = label_width - row.label.width();
            format!("{}{}  {}\n", row.label, " ".repeat(fill), row.value)
        })
        .collect()
}

fn format_shares(props: &BarChartProps) -> String {
    let rows: Vec<StatRow> = props
        .rows
        .iter()
        .map(|(label, share)| StatRow::new(label.clone(), format_percent(*share)))
        .collect();
    format_rows(&rows)
}

fn section(title: &str, body: String, display: &DisplayConfig) -> String {
    format!("\n{}{}", format_header(title, false, display), body)
}

/// Text report of one player's stats under the query
pub fn format_stats(
    metadata: &PlayerMetadata,
    stats: &PlayerExtendedStats,
    i18n: &I18n,
    display: &DisplayConfig,
) -> String {
    let title = format!("{} {}", account_zone_tag(metadata.id()), metadata.nickname());
    let mut output = format_header(&title, true, display);

    output.push_str(&format_rows(&basic_rows(i18n, metadata)));
    let ranks = rank_rate_props(i18n, &metadata.summary);
    output.push_str(&section(
        ranks.title.as_deref().unwrap_or_default(),
        format_shares(&ranks),
        display,
    ));
    output.push_str(&section(i18n.t("立直"), format_rows(&riichi_rows(i18n, stats)), display));
    output.push_str(&section(
        i18n.t("更多"),
        format_rows(&extended_rows(i18n, metadata, Some(stats))),
        display,
    ));
    output.push_str(&section(
        i18n.t("和铳分布"),
        format_shares(&win_lose_props(i18n, stats)),
        display,
    ));
    output.push_str(&section(i18n.t("血统"), format_rows(&luck_rows(i18n, stats)), display));
    output
}

pub async fn run(
    source: &dyn RecordSource,
    player_id: u32,
    modes: &[GameMode],
    range: DateRange,
    i18n: &I18n,
    display: &DisplayConfig,
) -> Result<()> {
    let query = PlayerQuery::new(player_id, modes, range);
    let summary = cache::fetch_summary_cached(source, &query)
        .await
        .context("Failed to fetch player summary")?;
    let Some(summary) = summary else {
        println!("{}", i18n.t("无数据"));
        return Ok(());
    };
    let cross_stats = cache::fetch_cross_stats_cached(source, player_id)
        .await
        .context("Failed to fetch player history")?;
    let stats = cache::fetch_extended_stats_cached(source, &query)
        .await
        .context("Failed to fetch extended stats")?;

    let metadata = PlayerMetadata {
        summary,
        cross_stats: Some(cross_stats),
        extended_stats: ExtendedStats::resolved(stats.clone()),
    };
    print!("{}", format_stats(&metadata, &stats, i18n, display));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatKey;
    use crate::tui::testing::test_metadata;

    #[test]
    fn test_format_rows_aligns_values() {
        let rows = vec![StatRow::new("和牌率", "25.00%"), StatRow::new("ab", "1")];
        assert_eq!(format_rows(&rows), "和牌率  25.00%\nab      1\n");
    }

    #[test]
    fn test_format_stats_sections() {
        let mut metadata = test_metadata("示例雀士", 12);
        metadata.summary.rank_rates = vec![0.25, 0.25, 0.25, 0.25];
        let stats = PlayerExtendedStats::new(40).with(StatKey::WinRate, 0.2345);

        let output = format_stats(&metadata, &stats, &I18n::default(), &DisplayConfig::default());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Ⓒ 示例雀士");
        assert!(lines.iter().any(|l| l.starts_with("记录场数") && l.ends_with("  12")));
        assert!(output.contains("23.45%"));
        for title in ["累计战绩", "立直", "更多", "和铳分布", "血统"] {
            assert!(lines.contains(&title), "missing section {}", title);
        }
        assert!(output.contains("总计局数"));
    }

    #[tokio::test]
    async fn test_run_unknown_player_is_not_an_error() {
        let source = crate::data_provider::DatasetSource::new(crate::fixtures::demo_dataset());
        let result = run(
            &source,
            999_999,
            &[],
            DateRange::all(),
            &I18n::default(),
            &DisplayConfig::default(),
        )
        .await;
        assert!(result.is_ok());
    }
}
