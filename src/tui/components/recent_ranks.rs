use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use crate::adapter::DataAdapter;
use crate::config::DisplayConfig;
use crate::formatting::format_header;
use crate::tui::component::{Component, Element, ElementWidget};

/// Games plotted in the recent ranks chart
pub const RECENT_GAMES: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct RecentRanksProps {
    pub title: String,
    /// Placements, oldest first
    pub ranks: Vec<usize>,
    pub seats: usize,
    /// Shown instead of the plot when there are no ranks
    pub empty_text: String,
}

impl RecentRanksProps {
    /// Placements from the adapter's first loaded records
    ///
    /// Reading items starts the page loads, so the chart fills in as they
    /// complete. Stops at the first record that is not loaded yet.
    pub fn from_adapter(
        adapter: &dyn DataAdapter,
        player_id: u32,
        title: impl Into<String>,
        empty_text: impl Into<String>,
    ) -> Self {
        let mut ranks = Vec::new();
        let mut seats = 4;
        for index in 0..adapter.count().min(RECENT_GAMES) {
            let Some(record) = adapter.item(index) else {
                break;
            };
            if index == 0 {
                seats = record.players.len().max(1);
            }
            if let Some(rank) = record.rank_of(player_id) {
                ranks.push(rank);
            }
        }
        ranks.reverse();
        Self {
            title: title.into(),
            ranks,
            seats,
            empty_text: empty_text.into(),
        }
    }
}

/// "最近走势": one column per game, one row per place
pub struct RecentRanks;

impl Component for RecentRanks {
    type Props = RecentRanksProps;

    fn view(&self, props: &Self::Props) -> Element {
        Element::Widget(Box::new(RecentRanksWidget {
            props: props.clone(),
        }))
    }
}

#[derive(Clone)]
struct RecentRanksWidget {
    props: RecentRanksProps,
}

impl ElementWidget for RecentRanksWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        let mut lines: Vec<(String, Style)> = format_header(&self.props.title, false, config)
            .lines()
            .map(|l| (l.to_string(), Style::default()))
            .collect();

        if self.props.ranks.is_empty() {
            lines.push((self.props.empty_text.clone(), Style::default().fg(config.theme.muted_fg)));
        } else {
            // "1 " row label, then two columns per game
            let columns = (area.width as usize).saturating_sub(2) / 2;
            let shown = &self.props.ranks[self.props.ranks.len().saturating_sub(columns)..];
            for place in 1..=self.props.seats {
                let mut row = format!("{} ", place);
                for &rank in shown {
                    if rank == place {
                        row.push_str(&config.box_chars.marker);
                    } else {
                        row.push(' ');
                    }
                    row.push(' ');
                }
                lines.push((row, Style::default()));
            }
        }

        for (i, (line, style)) in lines.iter().enumerate().take(area.height as usize) {
            buf.set_stringn(area.x, area.y + i as u16, line, area.width as usize, *style);
        }
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }

    fn preferred_height(&self) -> Option<u16> {
        let body = if self.props.ranks.is_empty() { 1 } else { self.props.seats };
        Some(2 + body as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::testing::{assert_buffer, test_display, test_record, ScriptedAdapter};

    fn props(ranks: Vec<usize>) -> RecentRanksProps {
        RecentRanksProps {
            title: "最近走势".to_string(),
            ranks,
            seats: 4,
            empty_text: "无数据".to_string(),
        }
    }

    fn render(props: RecentRanksProps, width: u16) -> Buffer {
        let Element::Widget(widget) = RecentRanks.view(&props) else {
            panic!("expected widget");
        };
        let mut buf = Buffer::empty(Rect::new(0, 0, width, widget.preferred_height().unwrap_or(0)));
        widget.render(buf.area, &mut buf, &test_display());
        buf
    }

    #[test]
    fn test_plots_one_marker_per_game() {
        let buf = render(props(vec![1, 3, 4, 1]), 20);
        assert_buffer(
            &buf,
            &[
                "最近走势",
                "────────",
                "1 ●     ●",
                "2",
                "3   ●",
                "4     ●",
            ],
        );
    }

    #[test]
    fn test_narrow_chart_keeps_latest_games() {
        let buf = render(props(vec![4, 4, 1, 2]), 6);
        assert_buffer(&buf, &["最近走", "──────", "1 ●", "2   ●", "3", "4"]);
    }

    #[test]
    fn test_empty_chart_shows_placeholder() {
        let buf = render(props(vec![]), 20);
        assert_buffer(&buf, &["最近走势", "────────", "无数据"]);
    }

    #[test]
    fn test_from_adapter_reads_loaded_prefix_oldest_first() {
        let adapter = ScriptedAdapter::with_metadata("someone", 5);
        // Newest first, as the adapter serves them
        adapter.push_item(test_record(1_700_000_300, 2));
        adapter.push_item(test_record(1_700_000_200, 4));
        adapter.push_item(test_record(1_700_000_100, 1));

        let props = RecentRanksProps::from_adapter(adapter.as_ref(), 42, "t", "e");
        assert_eq!(props.ranks, vec![1, 4, 2]);
        assert_eq!(props.seats, 4);
        // The fourth record was requested and is not loaded yet
        assert_eq!(adapter.item_requests.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
