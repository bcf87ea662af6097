use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use unicode_width::UnicodeWidthStr;

use crate::config::DisplayConfig;
use crate::formatting::{format_header, format_percent};
use crate::i18n::I18n;
use crate::metadata::RecordSummary;
use crate::stats::{PlayerExtendedStats, WinLoseDistribution};
use crate::tui::component::{Component, Element, ElementWidget};

const RANK_RATE_KEYS: [&str; 4] = ["一位率", "二位率", "三位率", "四位率"];

/// Width reserved for the percentage ("100.00%")
const PERCENT_WIDTH: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartProps {
    pub title: Option<String>,
    /// Label and share in 0..=1
    pub rows: Vec<(String, f64)>,
}

/// Horizontal bars, one row per share
pub struct BarChart;

impl Component for BarChart {
    type Props = BarChartProps;

    fn view(&self, props: &Self::Props) -> Element {
        Element::Widget(Box::new(BarChartWidget {
            props: props.clone(),
        }))
    }
}

/// Placement shares of the summary, "累计战绩"
pub fn rank_rate_props(i18n: &I18n, summary: &RecordSummary) -> BarChartProps {
    BarChartProps {
        title: Some(i18n.t("累计战绩").to_string()),
        rows: summary
            .rank_rates
            .iter()
            .zip(RANK_RATE_KEYS)
            .map(|(&rate, key)| (i18n.t(key).to_string(), rate))
            .collect(),
    }
}

/// Share of rounds by outcome
pub fn win_lose_props(i18n: &I18n, stats: &PlayerExtendedStats) -> BarChartProps {
    BarChartProps {
        title: None,
        rows: WinLoseDistribution::from_stats(stats)
            .entries()
            .iter()
            .map(|&(key, share)| (i18n.t(key).to_string(), share))
            .collect(),
    }
}

#[derive(Clone)]
struct BarChartWidget {
    props: BarChartProps,
}

impl ElementWidget for BarChartWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        let mut y = area.y;
        let bottom = area.y + area.height;

        if let Some(title) = &self.props.title {
            for line in format_header(title, false, config).lines() {
                if y >= bottom {
                    return;
                }
                buf.set_stringn(area.x, y, line, area.width as usize, Style::default());
                y += 1;
            }
        }

        let label_width = self.props.rows.iter().map(|(l, _)| l.width()).max().unwrap_or(0);
        let bar_width = (area.width as usize).saturating_sub(label_width + PERCENT_WIDTH + 2);
        let bar_style = Style::default().fg(config.theme.selection_fg);

        for (label, share) in &self.props.rows {
            if y >= bottom {
                break;
            }
            let share = if share.is_finite() { share.clamp(0.0, 1.0) } else { 0.0 };
            let filled = (share * bar_width as f64).round() as usize;

            let label_text = format!("{}{} ", label, " ".repeat(label_width - label.width()));
            let (x, _) = buf.set_stringn(area.x, y, &label_text, area.width as usize, Style::default());
            let bar = config.box_chars.bar.repeat(filled);
            buf.set_stringn(x, y, &bar, bar_width, bar_style);

            let percent = format!("{:>width$}", format_percent(share), width = PERCENT_WIDTH);
            let percent_x = x + bar_width as u16 + 1;
            if percent_x < area.x + area.width {
                let room = (area.x + area.width - percent_x) as usize;
                buf.set_stringn(percent_x, y, &percent, room, Style::default());
            }
            y += 1;
        }
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }

    fn preferred_height(&self) -> Option<u16> {
        let title = if self.props.title.is_some() { 2 } else { 0 };
        Some(title + self.props.rows.len() as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatKey;
    use crate::tui::testing::{assert_buffer, test_display, test_i18n};

    fn render(props: BarChartProps, width: u16) -> Buffer {
        let Element::Widget(widget) = BarChart.view(&props) else {
            panic!("expected widget");
        };
        let mut buf = Buffer::empty(Rect::new(0, 0, width, widget.preferred_height().unwrap_or(0)));
        widget.render(buf.area, &mut buf, &test_display());
        buf
    }

    #[test]
    fn test_bars_scale_with_share() {
        let props = BarChartProps {
            title: None,
            rows: vec![("A".to_string(), 1.0), ("B".to_string(), 0.5), ("C".to_string(), 0.0)],
        };
        // 1 label + 1 gap + 10 bar + 1 gap + 7 percent
        let buf = render(props, 20);
        assert_buffer(
            &buf,
            &[
                "A ██████████ 100.00%",
                "B █████       50.00%",
                "C              0.00%",
            ],
        );
    }

    #[test]
    fn test_rank_rate_chart_has_title_and_one_row_per_place() {
        let summary = RecordSummary {
            rank_rates: vec![0.25, 0.25, 0.25, 0.25],
            ..Default::default()
        };
        let props = rank_rate_props(&test_i18n(), &summary);
        assert_eq!(props.rows.len(), 4);
        assert_eq!(props.rows[3].0, "四位率");

        let buf = render(props, 30);
        assert_buffer(
            &buf,
            &[
                "累计战绩",
                "────────",
                "一位率 ████             25.00%",
                "二位率 ████             25.00%",
                "三位率 ████             25.00%",
                "四位率 ████             25.00%",
            ],
        );
    }

    #[test]
    fn test_three_player_summary_has_three_places() {
        let summary = RecordSummary {
            rank_rates: vec![0.5, 0.3, 0.2],
            ..Default::default()
        };
        assert_eq!(rank_rate_props(&test_i18n(), &summary).rows.len(), 3);
    }

    #[test]
    fn test_win_lose_rows_follow_distribution() {
        let stats = PlayerExtendedStats::new(100)
            .with(StatKey::WinRate, 0.2)
            .with(StatKey::TsumoRate, 0.5)
            .with(StatKey::DealInRate, 0.1);
        let props = win_lose_props(&test_i18n(), &stats);
        assert!(props.title.is_none());
        assert_eq!(props.rows[0], ("自摸和了".to_string(), 0.1));
        assert_eq!(props.rows[2], ("放铳".to_string(), 0.1));
        assert_eq!(props.rows.len(), 6);
    }
}
